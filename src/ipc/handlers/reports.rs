use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{db_ref, required_str};
use crate::ipc::types::{AppState, Request};
use crate::report::{NarrativeBackend, ReportBackend, ReportInput, REPORT_UNAVAILABLE};

fn handle_generate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let db = match db_ref(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(student) = db.find_student(&student_id) else {
        return err(&req.id, "not_found", "student not found", None);
    };

    let input = ReportInput {
        grades: db.student_grades(&student_id),
        student,
    };
    // A failing backend never fails the request; the view gets a
    // placeholder instead.
    let report = NarrativeBackend
        .generate(&input)
        .unwrap_or_else(|_| REPORT_UNAVAILABLE.to_string());

    ok(
        &req.id,
        json!({
            "report": report,
            "generatedAt": chrono::Utc::now().to_rfc3339(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.generate" => Some(handle_generate(state, req)),
        _ => None,
    }
}
