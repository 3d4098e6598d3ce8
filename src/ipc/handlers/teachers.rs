use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{db_mut, db_ref, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewTeacher, TeacherPatch};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "teachers": db.list_teachers() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewTeacher = match parse_params(req) {
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
    match db.add_teacher(new) {
        Ok(teacher) => ok(&req.id, json!({ "teacher": teacher })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: TeacherPatch = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.update_teacher(&id, patch) {
        Ok(teacher) => ok(&req.id, json!({ "teacher": teacher })),
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
    match db.delete_teacher(&id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(handle_list(state, req)),
        "teachers.create" => Some(handle_create(state, req)),
        "teachers.update" => Some(handle_update(state, req)),
        "teachers.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
