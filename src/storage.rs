use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SLOT_CLASSES: &str = "school_classes";
pub const SLOT_TEACHERS: &str = "school_teachers";
pub const SLOT_STUDENTS: &str = "school_students";
pub const SLOT_COURSES: &str = "school_courses";
pub const SLOT_GRADES: &str = "school_grades";

/// Every collection slot, in snapshot order.
pub const ALL_SLOTS: [&str; 5] = [
    SLOT_CLASSES,
    SLOT_TEACHERS,
    SLOT_STUDENTS,
    SLOT_COURSES,
    SLOT_GRADES,
];

pub fn ensure_workspace(workspace: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })
}

pub fn slot_path(workspace: &Path, slot: &str) -> PathBuf {
    workspace.join(format!("{slot}.json"))
}

/// Load one collection slot. Absent and unparsable slots are both `None`;
/// the store falls back to its seed fixture for those.
pub fn load_slot<T: DeserializeOwned>(workspace: &Path, slot: &str) -> Option<Vec<T>> {
    let text = std::fs::read_to_string(slot_path(workspace, slot)).ok()?;
    serde_json::from_str(&text).ok()
}

/// Write one collection slot atomically (temp file, then rename).
pub fn save_slot<T: Serialize>(workspace: &Path, slot: &str, items: &[T]) -> anyhow::Result<()> {
    let path = slot_path(workspace, slot);
    let tmp = workspace.join(format!("{slot}.json.writing"));
    let text =
        serde_json::to_string(items).with_context(|| format!("failed to serialize slot {slot}"))?;
    std::fs::write(&tmp, text)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    std::fs::rename(&tmp, &path).with_context(|| {
        format!(
            "failed to move slot into place: {}",
            path.to_string_lossy()
        )
    })?;
    Ok(())
}
