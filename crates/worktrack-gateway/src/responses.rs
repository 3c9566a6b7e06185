// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response views rendered by the gateway.
//!
//! Views flatten the storage types into the shapes API clients consume and
//! render timestamps as `YYYY-MM-DD HH:MM:SS`.

use serde::{Deserialize, Serialize};
use worktrack_core::types::{
    Archive, ArchivedReport, Attributes, Report, Task, Tool, Work, WorkDetail, WorkStatus,
};

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Render a stored ISO-8601 timestamp for display. Unparseable values pass
/// through unchanged.
pub fn display_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub tool_id: String,
    pub work_id: Option<i64>,
    pub enabled: bool,
    pub ready_since: Option<String>,
    pub task_id: Option<String>,
    pub status: Option<WorkStatus>,
    pub complete: Option<bool>,
}

impl From<Tool> for ToolSummary {
    fn from(tool: Tool) -> Self {
        let assignment = tool.assignment;
        Self {
            tool_id: tool.tool_id,
            work_id: assignment.as_ref().map(|a| a.work_id),
            enabled: tool.enabled,
            ready_since: tool.ready_since.as_deref().map(display_timestamp),
            task_id: assignment.as_ref().and_then(|a| a.task_id.clone()),
            status: assignment.as_ref().map(|a| a.status),
            complete: assignment.as_ref().map(|a| a.completed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTool {
    pub tool_id: String,
    pub tool_skills: Attributes,
    pub created_at: String,
}

impl From<Tool> for AvailableTool {
    fn from(tool: Tool) -> Self {
        Self {
            tool_id: tool.tool_id,
            tool_skills: tool.tool_skills,
            created_at: display_timestamp(&tool.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: String,
    pub work_id: Option<i64>,
    pub tool_id: Option<String>,
    pub status: Option<WorkStatus>,
    pub complete: Option<bool>,
}

impl From<Task> for TaskSummary {
    fn from(task: Task) -> Self {
        let assignment = task.assignment;
        Self {
            task_id: task.task_id,
            work_id: assignment.as_ref().map(|a| a.work_id),
            tool_id: assignment.as_ref().and_then(|a| a.tool_id.clone()),
            status: assignment.as_ref().map(|a| a.status),
            complete: assignment.as_ref().map(|a| a.completed),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTask {
    pub task_id: String,
    pub task_needs: Attributes,
    pub created_at: String,
}

impl From<Task> for AvailableTask {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.task_id,
            task_needs: task.task_needs,
            created_at: display_timestamp(&task.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSummary {
    pub work_id: i64,
    pub status: WorkStatus,
    pub completed: bool,
    pub tool_id: Option<String>,
    pub task_id: Option<String>,
}

impl From<Work> for WorkSummary {
    fn from(work: Work) -> Self {
        Self {
            work_id: work.work_id,
            status: work.status,
            completed: work.completed,
            tool_id: work.tool_id,
            task_id: work.task_id,
        }
    }
}

/// A work summary with the linked tool skills and task needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkInfo {
    #[serde(flatten)]
    pub summary: WorkSummary,
    pub tool_skills: Option<Attributes>,
    pub task_needs: Option<Attributes>,
}

impl From<WorkDetail> for WorkInfo {
    fn from(detail: WorkDetail) -> Self {
        Self {
            summary: detail.work.into(),
            tool_skills: detail.tool_skills,
            task_needs: detail.task_needs,
        }
    }
}

/// Work linked to a tool, or an empty object when the tool is idle.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AssignedWork {
    Assigned(WorkInfo),
    Unassigned {},
}

impl From<Option<WorkDetail>> for AssignedWork {
    fn from(detail: Option<WorkDetail>) -> Self {
        match detail {
            Some(detail) => Self::Assigned(detail.into()),
            None => Self::Unassigned {},
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportView {
    pub status: WorkStatus,
    pub details: Attributes,
    pub created_at: String,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        ArchivedReport::from(report).into()
    }
}

impl From<ArchivedReport> for ReportView {
    fn from(report: ArchivedReport) -> Self {
        Self {
            status: report.status,
            details: report.details,
            created_at: display_timestamp(&report.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSummary {
    pub work_id: i64,
    pub status: WorkStatus,
    pub tool_id: Option<String>,
    pub task_id: Option<String>,
    pub created_at: String,
    pub archived_at: String,
}

impl From<&Archive> for ArchiveSummary {
    fn from(archive: &Archive) -> Self {
        Self {
            work_id: archive.work_id,
            status: archive.status,
            tool_id: archive.tool_id.clone(),
            task_id: archive.task_id.clone(),
            created_at: display_timestamp(&archive.created_at),
            archived_at: display_timestamp(&archive.archived_at),
        }
    }
}

/// An archive summary with skills, needs, and the full report history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveInfo {
    #[serde(flatten)]
    pub summary: ArchiveSummary,
    pub tool_skills: Option<Attributes>,
    pub task_needs: Option<Attributes>,
    pub reports: Vec<ReportView>,
}

impl From<Archive> for ArchiveInfo {
    fn from(archive: Archive) -> Self {
        let summary = ArchiveSummary::from(&archive);
        Self {
            summary,
            tool_skills: archive.tool_skills,
            task_needs: archive.task_needs,
            reports: archive.reports.into_iter().map(ReportView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use worktrack_core::types::ToolAssignment;

    use super::*;

    #[test]
    fn timestamps_render_without_fraction() {
        assert_eq!(
            display_timestamp("2026-03-04T05:06:07.890Z"),
            "2026-03-04 05:06:07"
        );
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn idle_tool_summary_has_null_assignment_fields() {
        let tool = Tool {
            tool_id: "t1".into(),
            tool_skills: Attributes::new(),
            enabled: true,
            ready_since: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            assignment: None,
        };
        let value = serde_json::to_value(ToolSummary::from(tool)).unwrap();
        assert_eq!(
            value,
            json!({
                "tool_id": "t1",
                "work_id": null,
                "enabled": true,
                "ready_since": null,
                "task_id": null,
                "status": null,
                "complete": null,
            })
        );
    }

    #[test]
    fn assigned_tool_summary() {
        let tool = Tool {
            tool_id: "t1".into(),
            tool_skills: Attributes::new(),
            enabled: true,
            ready_since: Some("2026-01-01T10:00:00.000Z".into()),
            created_at: "2026-01-01T00:00:00.000Z".into(),
            assignment: Some(ToolAssignment {
                work_id: 4,
                status: WorkStatus::Processing,
                completed: false,
                task_id: Some("k1".into()),
            }),
        };
        let summary = ToolSummary::from(tool);
        assert_eq!(summary.work_id, Some(4));
        assert_eq!(summary.status, Some(WorkStatus::Processing));
        assert_eq!(summary.ready_since.as_deref(), Some("2026-01-01 10:00:00"));
    }

    #[test]
    fn unassigned_work_is_empty_object() {
        let value = serde_json::to_value(AssignedWork::from(None)).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn work_info_is_flat() {
        let detail = WorkDetail {
            work: Work {
                work_id: 1,
                status: WorkStatus::New,
                completed: false,
                created_at: "2026-01-01T00:00:00.000Z".into(),
                tool_id: Some("t1".into()),
                task_id: Some("k1".into()),
            },
            tool_skills: None,
            task_needs: None,
        };
        let value = serde_json::to_value(WorkInfo::from(detail)).unwrap();
        assert_eq!(value["work_id"], 1);
        assert_eq!(value["status"], "new");
        assert_eq!(value["tool_skills"], serde_json::Value::Null);
    }
}
