// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;

use crate::error::WorktrackError;
use crate::types::{
    Archive, Attributes, HealthStatus, Outcome, Report, Task, Tool, Work, WorkDetail, WorkFilter,
    WorkStatus,
};

/// Adapter for storage backends.
///
/// Every operation runs against the backend's own connection; no state is
/// held between calls. Domain failures are returned as
/// [`WorktrackError::NotFound`] / [`WorktrackError::AlreadyExists`], while
/// "nothing to do" cases come back as an [`Outcome`] with `success = false`.
#[async_trait]
pub trait StorageAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), WorktrackError>;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, WorktrackError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), WorktrackError>;

    // --- Tool operations ---

    async fn create_tool(&self, tool_id: &str, skills: &Attributes)
        -> Result<Outcome, WorktrackError>;

    /// Marks a tool ready. Soft-fails if the tool is linked to work that has
    /// progressed past `new`.
    async fn mark_tool_ready(&self, tool_id: &str) -> Result<Outcome, WorktrackError>;

    async fn set_tool_enabled(&self, tool_id: &str, enabled: bool)
        -> Result<Outcome, WorktrackError>;

    async fn delete_tool(&self, tool_id: &str) -> Result<Outcome, WorktrackError>;

    async fn delete_all_tools(&self) -> Result<Outcome, WorktrackError>;

    async fn list_tools(&self) -> Result<Vec<Tool>, WorktrackError>;

    async fn get_tool(&self, tool_id: &str) -> Result<Tool, WorktrackError>;

    /// Tools with no work link and a non-null `ready_since`.
    async fn list_available_tools(&self) -> Result<Vec<Tool>, WorktrackError>;

    /// Work currently assigned to the tool, if any.
    async fn get_work_for_tool(&self, tool_id: &str)
        -> Result<Option<WorkDetail>, WorktrackError>;

    // --- Task operations ---

    async fn create_task(&self, task_id: &str, needs: &Attributes)
        -> Result<Outcome, WorktrackError>;

    async fn delete_task(&self, task_id: &str) -> Result<Outcome, WorktrackError>;

    async fn delete_all_tasks(&self) -> Result<Outcome, WorktrackError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, WorktrackError>;

    async fn get_task(&self, task_id: &str) -> Result<Task, WorktrackError>;

    /// Tasks with no work link.
    async fn list_available_tasks(&self) -> Result<Vec<Task>, WorktrackError>;

    // --- Work lifecycle ---

    /// Creates a work item in status `new` and links the tool and task to it.
    async fn create_work(&self, tool_id: &str, task_id: &str) -> Result<Work, WorktrackError>;

    /// Records a progress report and moves the work to the report's status.
    async fn submit_report(
        &self,
        work_id: i64,
        status: WorkStatus,
        details: &Attributes,
    ) -> Result<Outcome, WorktrackError>;

    /// Finalizes a work item and replaces it with an archive record.
    async fn finalize_work(
        &self,
        work_id: i64,
        succeeded: bool,
        details: &Attributes,
    ) -> Result<Outcome, WorktrackError>;

    async fn list_work(&self, filter: WorkFilter) -> Result<Vec<Work>, WorktrackError>;

    async fn get_work(&self, work_id: i64) -> Result<WorkDetail, WorktrackError>;

    async fn list_reports(&self, work_id: i64) -> Result<Vec<Report>, WorktrackError>;

    /// Not supported: always returns a failed outcome.
    async fn delete_work(&self, work_id: i64) -> Result<Outcome, WorktrackError>;

    async fn delete_all_work(&self) -> Result<Outcome, WorktrackError>;

    async fn delete_all_reports(&self) -> Result<Outcome, WorktrackError>;

    // --- Archive operations ---

    async fn list_archives(&self) -> Result<Vec<Archive>, WorktrackError>;

    /// Absent archives are `None`, not an error.
    async fn get_archive(&self, work_id: i64) -> Result<Option<Archive>, WorktrackError>;

    async fn delete_archive(&self, work_id: i64) -> Result<Outcome, WorktrackError>;

    async fn delete_all_archives(&self) -> Result<Outcome, WorktrackError>;
}
