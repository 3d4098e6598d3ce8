use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::db_ref;
use crate::ipc::types::{AppState, Request};

fn handle_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "stats": db.dashboard_stats() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.stats" => Some(handle_stats(state, req)),
        _ => None,
    }
}
