use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{db_mut, db_ref, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{ClassPatch, NewClass};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "classes": db.list_classes() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new: NewClass = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if new.name.trim().is_empty() {
        return err(&req.id, "bad_params", "name must not be empty", None);
    }
    match db.add_class(new) {
        Ok(class) => ok(&req.id, json!({ "class": class })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: ClassPatch = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if matches!(&patch.name, Some(n) if n.trim().is_empty()) {
        return err(&req.id, "bad_params", "name must not be empty", None);
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.update_class(&id, patch) {
        Ok(class) => ok(&req.id, json!({ "class": class })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.delete_class(&id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_list(state, req)),
        "classes.create" => Some(handle_create(state, req)),
        "classes.update" => Some(handle_update(state, req)),
        "classes.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
