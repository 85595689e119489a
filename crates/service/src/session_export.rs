//! Session JSON export and re-import.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use therapy_core::Session;

use crate::ServiceError;

/// Fields regenerated on import.
const IDENTITY_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// `session_<id>_<YYYYMMDDTHHMMSSZ>.json`
#[must_use]
pub fn export_file_name(session_id: &str, at: DateTime<Utc>) -> String {
    format!("session_{session_id}_{}.json", at.format("%Y%m%dT%H%M%SZ"))
}

/// Writes a pretty-printed export into `dir`, creating it if needed.
pub async fn write_session_export(
    session: &Session,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, ServiceError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(&session.id, at));
    let json = serde_json::to_string_pretty(session)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// Reads an export and turns it into a new session document: a fresh id and
/// fresh audit timestamps, everything else as exported.
pub async fn read_session_export(path: &Path, now: DateTime<Utc>) -> Result<Session, ServiceError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let mut value: Value = serde_json::from_str(&raw)?;
    let Some(doc) = value.as_object_mut() else {
        return Err(ServiceError::InvalidInput(format!(
            "{} does not contain a session object",
            path.display()
        )));
    };
    for field in IDENTITY_FIELDS {
        doc.remove(field);
    }
    doc.insert("id".to_owned(), Value::String(therapy_core::new_id()));
    doc.insert("created_at".to_owned(), serde_json::to_value(now)?);
    doc.insert("updated_at".to_owned(), serde_json::to_value(now)?);
    Ok(serde_json::from_value(value)?)
}
