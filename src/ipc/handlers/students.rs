use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{db_mut, db_ref, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewStudent, StudentPatch};

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "students": db.list_students() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewStudent = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if new.name.trim().is_empty() {
        return err(&req.id, "bad_params", "name must not be empty", None);
    }
    if new.age == 0 {
        return err(&req.id, "bad_params", "age must be a positive integer", None);
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.add_student(new) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: StudentPatch = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if matches!(patch.age, Some(0)) {
        return err(&req.id, "bad_params", "age must be a positive integer", None);
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.update_student(&id, patch) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
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
    match db.delete_student(&id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
