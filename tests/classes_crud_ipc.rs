use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn create_class_appears_once_with_fresh_id() {
    let workspace = temp_dir("schoold-classes-create");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let before = request_ok(&mut stdin, &mut reader, "2", "classes.list", json!({}));
    let before_count = before
        .get("classes")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .unwrap_or(0);
    assert_eq!(before_count, 3);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "classes.create",
        json!({ "name": "3º Ano B", "year": 2024 }),
    );
    let new_id = created
        .pointer("/class/id")
        .and_then(|v| v.as_str())
        .expect("class id")
        .to_string();
    assert!(!new_id.is_empty());

    let after = request_ok(&mut stdin, &mut reader, "4", "classes.list", json!({}));
    let classes = after
        .get("classes")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert_eq!(classes.len(), before_count + 1);
    let matches: Vec<_> = classes
        .iter()
        .filter(|c| c.get("name").and_then(|v| v.as_str()) == Some("3º Ano B"))
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0].get("year").and_then(|v| v.as_i64()),
        Some(2024)
    );
    assert_eq!(
        matches[0].get("id").and_then(|v| v.as_str()),
        Some(new_id.as_str())
    );
}

#[test]
fn empty_class_name_is_rejected() {
    let workspace = temp_dir("schoold-classes-empty-name");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "classes.create",
        json!({ "name": "   ", "year": 2024 }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.pointer("/error/code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}

#[test]
fn update_class_merges_partial_fields() {
    let workspace = temp_dir("schoold-classes-update");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.update",
        json!({ "id": "c1", "year": 2025 }),
    );
    // Name untouched, year overwritten.
    assert_eq!(
        updated.pointer("/class/name").and_then(|v| v.as_str()),
        Some("1º Ano EM - A")
    );
    assert_eq!(
        updated.pointer("/class/year").and_then(|v| v.as_i64()),
        Some(2025)
    );
}

#[test]
fn delete_class_leaves_students_with_no_class_sentinel() {
    let workspace = temp_dir("schoold-classes-delete");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.delete",
        json!({ "id": "c2" }),
    );

    let students = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    let list = students
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    assert_eq!(list.len(), 4, "students must survive a class delete");
    let ana = list
        .iter()
        .find(|s| s.get("id").and_then(|v| v.as_str()) == Some("s1"))
        .expect("s1 present");
    assert_eq!(
        ana.get("className").and_then(|v| v.as_str()),
        Some("No Class")
    );

    // Deleting a missing id is a no-op, not an error.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "classes.delete",
        json!({ "id": "c2" }),
    );
}
