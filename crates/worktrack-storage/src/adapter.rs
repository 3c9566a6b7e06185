// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use worktrack_config::model::StorageConfig;
use worktrack_core::types::{
    Archive, Attributes, Outcome, Report, Task, Tool, Work, WorkDetail, WorkFilter, WorkStatus,
};
use worktrack_core::{HealthStatus, StorageAdapter, WorktrackError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, WorktrackError> {
        self.db.get().ok_or_else(|| WorktrackError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), WorktrackError> {
        let db = Database::open_with_options(&self.config.database_path, self.config.wal_mode)
            .await?;
        self.db.set(db).map_err(|_| WorktrackError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Unhealthy when the database is not open or cannot answer a query;
    /// degraded when WAL was requested but SQLite is in another journal mode.
    async fn health_check(&self) -> Result<HealthStatus, WorktrackError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        let checked = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
            })
            .await;

        match checked {
            Err(e) => {
                warn!(error = %e, "storage health check failed");
                Ok(HealthStatus::Unhealthy(format!("query failed: {e}")))
            }
            Ok(mode) if self.config.wal_mode && !mode.eq_ignore_ascii_case("wal") => Ok(
                HealthStatus::Degraded(format!("journal_mode is {mode}, expected wal")),
            ),
            Ok(_) => Ok(HealthStatus::Healthy),
        }
    }

    async fn close(&self) -> Result<(), WorktrackError> {
        self.db()?.close().await
    }

    // --- Tool operations ---

    async fn create_tool(
        &self,
        tool_id: &str,
        skills: &Attributes,
    ) -> Result<Outcome, WorktrackError> {
        queries::tools::create_tool(self.db()?, tool_id, skills).await
    }

    async fn mark_tool_ready(&self, tool_id: &str) -> Result<Outcome, WorktrackError> {
        queries::tools::mark_tool_ready(self.db()?, tool_id).await
    }

    async fn set_tool_enabled(
        &self,
        tool_id: &str,
        enabled: bool,
    ) -> Result<Outcome, WorktrackError> {
        queries::tools::set_tool_enabled(self.db()?, tool_id, enabled).await
    }

    async fn delete_tool(&self, tool_id: &str) -> Result<Outcome, WorktrackError> {
        queries::tools::delete_tool(self.db()?, tool_id).await
    }

    async fn delete_all_tools(&self) -> Result<Outcome, WorktrackError> {
        queries::tools::delete_all_tools(self.db()?).await
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, WorktrackError> {
        queries::tools::list_tools(self.db()?).await
    }

    async fn get_tool(&self, tool_id: &str) -> Result<Tool, WorktrackError> {
        queries::tools::get_tool(self.db()?, tool_id).await
    }

    async fn list_available_tools(&self) -> Result<Vec<Tool>, WorktrackError> {
        queries::tools::list_available_tools(self.db()?).await
    }

    async fn get_work_for_tool(
        &self,
        tool_id: &str,
    ) -> Result<Option<WorkDetail>, WorktrackError> {
        queries::tools::get_work_for_tool(self.db()?, tool_id).await
    }

    // --- Task operations ---

    async fn create_task(
        &self,
        task_id: &str,
        needs: &Attributes,
    ) -> Result<Outcome, WorktrackError> {
        queries::tasks::create_task(self.db()?, task_id, needs).await
    }

    async fn delete_task(&self, task_id: &str) -> Result<Outcome, WorktrackError> {
        queries::tasks::delete_task(self.db()?, task_id).await
    }

    async fn delete_all_tasks(&self) -> Result<Outcome, WorktrackError> {
        queries::tasks::delete_all_tasks(self.db()?).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, WorktrackError> {
        queries::tasks::list_tasks(self.db()?).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task, WorktrackError> {
        queries::tasks::get_task(self.db()?, task_id).await
    }

    async fn list_available_tasks(&self) -> Result<Vec<Task>, WorktrackError> {
        queries::tasks::list_available_tasks(self.db()?).await
    }

    // --- Work lifecycle ---

    async fn create_work(&self, tool_id: &str, task_id: &str) -> Result<Work, WorktrackError> {
        queries::work::create_work(self.db()?, tool_id, task_id).await
    }

    async fn submit_report(
        &self,
        work_id: i64,
        status: WorkStatus,
        details: &Attributes,
    ) -> Result<Outcome, WorktrackError> {
        queries::reports::submit_report(self.db()?, work_id, status, details).await
    }

    async fn finalize_work(
        &self,
        work_id: i64,
        succeeded: bool,
        details: &Attributes,
    ) -> Result<Outcome, WorktrackError> {
        queries::work::finalize_work(self.db()?, work_id, succeeded, details).await
    }

    async fn list_work(&self, filter: WorkFilter) -> Result<Vec<Work>, WorktrackError> {
        queries::work::list_work(self.db()?, filter).await
    }

    async fn get_work(&self, work_id: i64) -> Result<WorkDetail, WorktrackError> {
        queries::work::get_work(self.db()?, work_id).await
    }

    async fn list_reports(&self, work_id: i64) -> Result<Vec<Report>, WorktrackError> {
        queries::reports::list_reports(self.db()?, work_id).await
    }

    async fn delete_work(&self, work_id: i64) -> Result<Outcome, WorktrackError> {
        queries::work::delete_work(self.db()?, work_id).await
    }

    async fn delete_all_work(&self) -> Result<Outcome, WorktrackError> {
        queries::work::delete_all_work(self.db()?).await
    }

    async fn delete_all_reports(&self) -> Result<Outcome, WorktrackError> {
        queries::reports::delete_all_reports(self.db()?).await
    }

    // --- Archive operations ---

    async fn list_archives(&self) -> Result<Vec<Archive>, WorktrackError> {
        queries::archive::list_archives(self.db()?).await
    }

    async fn get_archive(&self, work_id: i64) -> Result<Option<Archive>, WorktrackError> {
        queries::archive::get_archive(self.db()?, work_id).await
    }

    async fn delete_archive(&self, work_id: i64) -> Result<Outcome, WorktrackError> {
        queries::archive::delete_archive(self.db()?, work_id).await
    }

    async fn delete_all_archives(&self) -> Result<Outcome, WorktrackError> {
        queries::archive::delete_all_archives(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        let result = storage.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        let status = storage.health_check().await.unwrap();
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_is_healthy_without_wal() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("plain.db");
        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
            wal_mode: false,
        });
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_degrades_when_wal_is_not_active() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("journal.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let db = storage.db().unwrap();
        db.connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode = DELETE", [], |row| row.get(0))
            })
            .await
            .unwrap();

        match storage.health_check().await.unwrap() {
            HealthStatus::Degraded(detail) => assert!(detail.contains("delete"), "{detail}"),
            other => panic!("expected degraded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy("storage not initialized".to_string())
        );
        assert!(matches!(
            storage.list_tools().await,
            Err(WorktrackError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn full_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        storage
            .create_tool("Tool-AB-1234", &attrs(json!({"skill1": "x"})))
            .await
            .unwrap();
        storage
            .create_task("Task-10-A-5000", &attrs(json!({"need1": "y"})))
            .await
            .unwrap();

        let work = storage
            .create_work("Tool-AB-1234", "Task-10-A-5000")
            .await
            .unwrap();
        assert_eq!(work.status, WorkStatus::New);

        storage
            .submit_report(work.work_id, WorkStatus::Processing, &Attributes::new())
            .await
            .unwrap();
        let detail = storage.get_work(work.work_id).await.unwrap();
        assert_eq!(detail.work.status, WorkStatus::Processing);
        assert!(!detail.work.completed);

        let outcome = storage
            .finalize_work(work.work_id, true, &attrs(json!({"r": "ok"})))
            .await
            .unwrap();
        assert!(outcome.success);

        assert!(matches!(
            storage.get_work(work.work_id).await,
            Err(WorktrackError::NotFound(_))
        ));
        let archive = storage.get_archive(work.work_id).await.unwrap().unwrap();
        assert_eq!(archive.status, WorkStatus::Succeeded);
        assert_eq!(archive.reports.len(), 2);
        assert_eq!(archive.reports[0].status, WorkStatus::Processing);
        assert_eq!(archive.reports[1].status, WorkStatus::Succeeded);
        assert!(matches!(
            storage.get_task("Task-10-A-5000").await,
            Err(WorktrackError::NotFound(_))
        ));
        assert!(storage.get_tool("Tool-AB-1234").await.unwrap().work_id().is_none());

        storage.close().await.unwrap();
    }
}
