// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for each storage entity.
//!
//! Each module exposes async functions taking `&Database`. Synchronous
//! helpers that take `&rusqlite::Connection` are shared between modules so
//! multi-table operations can compose them inside one transaction.

pub mod archive;
pub mod reports;
pub mod tasks;
pub mod tools;
pub mod work;

use rusqlite::types::Type;
use worktrack_core::types::{Attributes, WorkStatus};
use worktrack_core::WorktrackError;

/// Current UTC time in the same format as the schema's `strftime` defaults.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Serialize a JSON object for a TEXT column.
pub(crate) fn attributes_to_sql(attrs: &Attributes) -> rusqlite::Result<String> {
    serde_json::to_string(attrs).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Parse a JSON object stored in column `idx`.
pub(crate) fn attributes_from_sql(idx: usize, text: &str) -> rusqlite::Result<Attributes> {
    serde_json::from_str(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse a nullable JSON object column.
pub(crate) fn optional_attributes_from_sql(
    idx: usize,
    text: Option<String>,
) -> rusqlite::Result<Option<Attributes>> {
    text.map(|t| attributes_from_sql(idx, &t)).transpose()
}

/// Parse a work status stored in column `idx`.
pub(crate) fn status_from_sql(idx: usize, text: &str) -> rusqlite::Result<WorkStatus> {
    text.parse::<WorkStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn tool_not_found(tool_id: &str) -> WorktrackError {
    WorktrackError::NotFound(format!("Tool '{tool_id}' does not exist"))
}

pub(crate) fn task_not_found(task_id: &str) -> WorktrackError {
    WorktrackError::NotFound(format!("Task '{task_id}' does not exist"))
}

pub(crate) fn work_not_found(work_id: i64) -> WorktrackError {
    WorktrackError::NotFound(format!("Work '{work_id}' does not exist"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::json;
    use tempfile::TempDir;
    use worktrack_core::types::Attributes;

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    pub fn attrs(value: serde_json::Value) -> Attributes {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    pub fn empty() -> Attributes {
        attrs(json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_matches_schema_format() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn bad_status_is_a_conversion_error() {
        let err = status_from_sql(3, "paused").unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _)
        ));
    }

    #[test]
    fn attributes_parse_objects_only() {
        assert!(attributes_from_sql(0, r#"{"a":1}"#).is_ok());
        assert!(attributes_from_sql(0, "[1,2]").is_err());
        assert_eq!(optional_attributes_from_sql(0, None).unwrap(), None);
    }
}
