use std::path::PathBuf;

use serde::Deserialize;

use crate::store::SchoolDb;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Owns the store explicitly; handlers receive it by reference. There is no
/// ambient singleton anywhere.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<SchoolDb>,
}
