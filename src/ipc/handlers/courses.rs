use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{db_mut, db_ref, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{CoursePatch, NewCourse};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "courses": db.list_courses() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewCourse = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if new.name.trim().is_empty() {
        return err(&req.id, "bad_params", "name must not be empty", None);
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.add_course(new) {
        Ok(course) => ok(&req.id, json!({ "course": course })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: CoursePatch = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.update_course(&id, patch) {
        Ok(course) => ok(&req.id, json!({ "course": course })),
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
    match db.delete_course(&id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "courses.list" => Some(handle_list(state, req)),
        "courses.create" => Some(handle_create(state, req)),
        "courses.update" => Some(handle_update(state, req)),
        "courses.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
