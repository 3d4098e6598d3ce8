use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{db_mut, db_ref, parse_params, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::{GradePatch, NewGrade};

// Grade values live on a 0..=100 scale; out-of-range writes are rejected
// here rather than tolerated and patched up at read time.
const MAX_GRADE: u32 = 100;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "grades": db.list_grades() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let new: NewGrade = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if new.value > MAX_GRADE {
        return err(
            &req.id,
            "bad_params",
            "value must be between 0 and 100",
            Some(json!({ "value": new.value })),
        );
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.add_grade(new) {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match required_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: GradePatch = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if matches!(patch.value, Some(v) if v > MAX_GRADE) {
        return err(
            &req.id,
            "bad_params",
            "value must be between 0 and 100",
            None,
        );
    }
    let db = match db_mut(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match db.update_grade(&id, patch) {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
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
    match db.delete_grade(&id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_for_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "grades": db.student_grades(&student_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_list(state, req)),
        "grades.create" => Some(handle_create(state, req)),
        "grades.update" => Some(handle_update(state, req)),
        "grades.delete" => Some(handle_delete(state, req)),
        "grades.forStudent" => Some(handle_for_student(state, req)),
        _ => None,
    }
}
