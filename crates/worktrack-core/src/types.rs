// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the storage layer and the HTTP gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Free-form JSON object used for tool skills, task needs, and report details.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Lifecycle status of a work item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkStatus {
    New,
    Processing,
    Succeeded,
    Failed,
}

impl WorkStatus {
    /// Succeeded and failed are terminal; reaching one marks the work completed.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Health status reported by the storage health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Storage is fully operational.
    Healthy,
    /// Storage is operational but experiencing issues.
    Degraded(String),
    /// Storage is not operational.
    Unhealthy(String),
}

/// Uniform response envelope for mutation operations.
///
/// `success = false` means the operation ran but had nothing to do. It is not
/// an error and is returned with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub message: String,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl Outcome {
    /// A successful outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// A soft failure: nothing was changed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// The work item a tool is currently linked to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolAssignment {
    pub work_id: i64,
    pub status: WorkStatus,
    pub completed: bool,
    /// Task linked to the same work item, if it still exists.
    pub task_id: Option<String>,
}

/// A worker capable of performing tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub tool_id: String,
    pub tool_skills: Attributes,
    pub enabled: bool,
    /// When the tool was last marked ready; `None` means not ready.
    pub ready_since: Option<String>,
    pub created_at: String,
    pub assignment: Option<ToolAssignment>,
}

impl Tool {
    pub fn work_id(&self) -> Option<i64> {
        self.assignment.as_ref().map(|a| a.work_id)
    }

    /// A tool is available when it has no work link and has been marked ready.
    pub fn is_available(&self) -> bool {
        self.assignment.is_none() && self.ready_since.is_some()
    }
}

/// The work item a task is currently linked to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub work_id: i64,
    pub status: WorkStatus,
    pub completed: bool,
    /// Tool linked to the same work item, if it still exists.
    pub tool_id: Option<String>,
}

/// A unit of work needing assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub task_needs: Attributes,
    pub created_at: String,
    pub assignment: Option<TaskAssignment>,
}

impl Task {
    pub fn work_id(&self) -> Option<i64> {
        self.assignment.as_ref().map(|a| a.work_id)
    }

    /// A task is available when it has no work link.
    pub fn is_available(&self) -> bool {
        self.assignment.is_none()
    }
}

/// An active assignment of one tool to one task.
///
/// `tool_id` and `task_id` are resolved through the tools/tasks tables and
/// are `None` only if the linked row was deleted while the work was active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Work {
    pub work_id: i64,
    pub status: WorkStatus,
    pub completed: bool,
    pub created_at: String,
    pub tool_id: Option<String>,
    pub task_id: Option<String>,
}

/// A work item together with the linked tool skills and task needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDetail {
    pub work: Work,
    pub tool_skills: Option<Attributes>,
    pub task_needs: Option<Attributes>,
}

/// Filter for work listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkFilter {
    #[default]
    All,
    /// Work with `completed = true`, succeeded or failed.
    Completed,
    Succeeded,
    Failed,
}

/// A timestamped status update attached to a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub work_id: i64,
    pub status: WorkStatus,
    pub details: Attributes,
    pub created_at: String,
}

/// A report as embedded in an archive record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedReport {
    pub status: WorkStatus,
    pub details: Attributes,
    pub created_at: String,
}

impl From<Report> for ArchivedReport {
    fn from(report: Report) -> Self {
        Self {
            status: report.status,
            details: report.details,
            created_at: report.created_at,
        }
    }
}

/// Immutable snapshot of a finalized work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    pub work_id: i64,
    pub status: WorkStatus,
    pub tool_id: Option<String>,
    pub task_id: Option<String>,
    pub tool_skills: Option<Attributes>,
    pub task_needs: Option<Attributes>,
    /// Reports in submission order, the terminal report last.
    pub reports: Vec<ArchivedReport>,
    pub created_at: String,
    pub archived_at: String,
}
