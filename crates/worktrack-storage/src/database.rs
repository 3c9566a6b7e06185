// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};
use worktrack_core::WorktrackError;

use crate::migrations::run_migrations;

/// Handle to the worktrack SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection`. Query modules accept
/// `&Database` and run their closures through [`Database::connection`].
pub struct Database {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, WorktrackError> {
        Self::open_with_options(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    ///
    /// The parent directory is created if it does not exist. Foreign keys are
    /// enabled on every open; the schema relies on `ON DELETE` actions.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, WorktrackError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WorktrackError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| WorktrackError::Storage {
                source: Box::new(e),
            })?;

        // Migration failures are returned as the inner result so they keep
        // their own error source.
        conn.call(move |conn| -> Result<Result<(), WorktrackError>, rusqlite::Error> {
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.query_row(&format!("PRAGMA journal_mode = {journal}"), [], |row| {
                row.get::<_, String>(0)
            })?;
            conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(run_migrations(conn))
        })
        .await
        .map_err(map_tr_err)??;

        info!(path = %path, wal_mode, "database opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Filesystem path the database was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn close(&self) -> Result<(), WorktrackError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        debug!(path = %self.path, "WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the storage error kind.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> WorktrackError {
    WorktrackError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("schema.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table'
                     AND name NOT LIKE 'sqlite_%' AND name NOT LIKE 'refinery_%'
                     ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();

        assert_eq!(
            tables,
            vec!["tasks", "tools", "work", "work_archive", "work_reports"]
        );
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enabled() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("fk.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let enabled: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        let db = Database::open(path).await.unwrap();
        assert_eq!(db.path(), path);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directory() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("w.db");
        let db = Database::open_with_options(db_path.to_str().unwrap(), false)
            .await
            .unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_under_a_regular_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"plain file").unwrap();
        let db_path = blocker.join("w.db");

        let err = Database::open(db_path.to_str().unwrap()).await.unwrap_err();
        assert!(
            matches!(err, WorktrackError::Storage { .. }),
            "expected storage error, got {err:?}"
        );
        assert!(!db_path.exists());
    }
}
