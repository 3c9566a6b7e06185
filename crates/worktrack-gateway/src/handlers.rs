// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the worktrack REST API.
//!
//! Mutations return an [`Outcome`]. A soft failure (`success = false`) is
//! still HTTP 200; only errors change the status code.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use worktrack_core::types::{Attributes, HealthStatus, Outcome, WorkFilter, WorkStatus};

use crate::error::ApiError;
use crate::responses::{
    ArchiveInfo, ArchiveSummary, AssignedWork, AvailableTask, AvailableTool, HealthResponse,
    ReportView, TaskSummary, ToolSummary, WorkInfo, WorkSummary,
};
use crate::server::GatewayState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Request body for POST /v1/tool.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateToolRequest {
    pub tool_id: String,
    #[serde(default)]
    pub tool_skills: Attributes,
}

/// Request body for PUT /v1/tool/{tool_id}/enabled.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetEnabledRequest {
    pub enabled: bool,
}

/// Request body for POST /v1/task.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub task_id: String,
    #[serde(default)]
    pub task_needs: Attributes,
}

/// Request body for POST /v1/work.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkRequest {
    pub tool_id: String,
    pub task_id: String,
}

/// Request body for POST /v1/report/{work_id}.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportRequest {
    pub status: WorkStatus,
    #[serde(default)]
    pub details: Attributes,
}

/// Request body for PUT /v1/work/{work_id}/succeeded and /failed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FinalizeRequest {
    #[serde(default)]
    pub details: Attributes,
}

// --- Health ---

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, detail) = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy", None),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, "degraded", Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            Some(e.to_string()),
        ),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            service: state.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            detail,
        }),
    )
}

// --- Tools ---

/// POST /v1/tool
pub async fn create_tool(
    State(state): State<GatewayState>,
    Json(body): Json<CreateToolRequest>,
) -> ApiResult<Outcome> {
    let outcome = state
        .storage
        .create_tool(&body.tool_id, &body.tool_skills)
        .await?;
    Ok(Json(outcome))
}

/// GET /v1/tool
pub async fn list_tools(State(state): State<GatewayState>) -> ApiResult<Vec<ToolSummary>> {
    let tools = state.storage.list_tools().await?;
    Ok(Json(tools.into_iter().map(ToolSummary::from).collect()))
}

/// DELETE /v1/tool
pub async fn delete_all_tools(State(state): State<GatewayState>) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_all_tools().await?))
}

/// GET /v1/tool/available
pub async fn list_available_tools(
    State(state): State<GatewayState>,
) -> ApiResult<Vec<AvailableTool>> {
    let tools = state.storage.list_available_tools().await?;
    Ok(Json(tools.into_iter().map(AvailableTool::from).collect()))
}

/// GET /v1/tool/work/{tool_id}
pub async fn get_work_for_tool(
    State(state): State<GatewayState>,
    Path(tool_id): Path<String>,
) -> ApiResult<AssignedWork> {
    let detail = state.storage.get_work_for_tool(&tool_id).await?;
    Ok(Json(detail.into()))
}

/// GET /v1/tool/{tool_id}
pub async fn get_tool(
    State(state): State<GatewayState>,
    Path(tool_id): Path<String>,
) -> ApiResult<ToolSummary> {
    Ok(Json(state.storage.get_tool(&tool_id).await?.into()))
}

/// PUT /v1/tool/{tool_id}
pub async fn mark_tool_ready(
    State(state): State<GatewayState>,
    Path(tool_id): Path<String>,
) -> ApiResult<Outcome> {
    Ok(Json(state.storage.mark_tool_ready(&tool_id).await?))
}

/// PUT /v1/tool/{tool_id}/enabled
pub async fn set_tool_enabled(
    State(state): State<GatewayState>,
    Path(tool_id): Path<String>,
    Json(body): Json<SetEnabledRequest>,
) -> ApiResult<Outcome> {
    Ok(Json(
        state
            .storage
            .set_tool_enabled(&tool_id, body.enabled)
            .await?,
    ))
}

/// DELETE /v1/tool/{tool_id}
pub async fn delete_tool(
    State(state): State<GatewayState>,
    Path(tool_id): Path<String>,
) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_tool(&tool_id).await?))
}

// --- Tasks ---

/// POST /v1/task
pub async fn create_task(
    State(state): State<GatewayState>,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<Outcome> {
    let outcome = state
        .storage
        .create_task(&body.task_id, &body.task_needs)
        .await?;
    Ok(Json(outcome))
}

/// GET /v1/task
pub async fn list_tasks(State(state): State<GatewayState>) -> ApiResult<Vec<TaskSummary>> {
    let tasks = state.storage.list_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskSummary::from).collect()))
}

/// DELETE /v1/task
pub async fn delete_all_tasks(State(state): State<GatewayState>) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_all_tasks().await?))
}

/// GET /v1/task/available
pub async fn list_available_tasks(
    State(state): State<GatewayState>,
) -> ApiResult<Vec<AvailableTask>> {
    let tasks = state.storage.list_available_tasks().await?;
    Ok(Json(tasks.into_iter().map(AvailableTask::from).collect()))
}

/// GET /v1/task/{task_id}
pub async fn get_task(
    State(state): State<GatewayState>,
    Path(task_id): Path<String>,
) -> ApiResult<TaskSummary> {
    Ok(Json(state.storage.get_task(&task_id).await?.into()))
}

/// DELETE /v1/task/{task_id}
pub async fn delete_task(
    State(state): State<GatewayState>,
    Path(task_id): Path<String>,
) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_task(&task_id).await?))
}

// --- Work ---

/// POST /v1/work
pub async fn create_work(
    State(state): State<GatewayState>,
    Json(body): Json<CreateWorkRequest>,
) -> ApiResult<Outcome> {
    let work = state
        .storage
        .create_work(&body.tool_id, &body.task_id)
        .await?;
    Ok(Json(Outcome::ok(format!(
        "Work item {} for tool {} and task {} created successfully",
        work.work_id, body.tool_id, body.task_id
    ))))
}

async fn list_work_filtered(state: &GatewayState, filter: WorkFilter) -> ApiResult<Vec<WorkSummary>> {
    let work = state.storage.list_work(filter).await?;
    Ok(Json(work.into_iter().map(WorkSummary::from).collect()))
}

/// GET /v1/work
pub async fn list_work(State(state): State<GatewayState>) -> ApiResult<Vec<WorkSummary>> {
    list_work_filtered(&state, WorkFilter::All).await
}

/// GET /v1/work/completed
pub async fn list_completed_work(
    State(state): State<GatewayState>,
) -> ApiResult<Vec<WorkSummary>> {
    list_work_filtered(&state, WorkFilter::Completed).await
}

/// GET /v1/work/succeeded
pub async fn list_succeeded_work(
    State(state): State<GatewayState>,
) -> ApiResult<Vec<WorkSummary>> {
    list_work_filtered(&state, WorkFilter::Succeeded).await
}

/// GET /v1/work/failed
pub async fn list_failed_work(State(state): State<GatewayState>) -> ApiResult<Vec<WorkSummary>> {
    list_work_filtered(&state, WorkFilter::Failed).await
}

/// DELETE /v1/work
pub async fn delete_all_work(State(state): State<GatewayState>) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_all_work().await?))
}

/// GET /v1/work/{work_id}
pub async fn get_work(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
) -> ApiResult<WorkInfo> {
    Ok(Json(state.storage.get_work(work_id).await?.into()))
}

/// DELETE /v1/work/{work_id}
pub async fn delete_work(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_work(work_id).await?))
}

/// PUT /v1/work/{work_id}/succeeded
pub async fn work_succeeded(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
    Json(body): Json<FinalizeRequest>,
) -> ApiResult<Outcome> {
    Ok(Json(
        state
            .storage
            .finalize_work(work_id, true, &body.details)
            .await?,
    ))
}

/// PUT /v1/work/{work_id}/failed
pub async fn work_failed(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
    Json(body): Json<FinalizeRequest>,
) -> ApiResult<Outcome> {
    Ok(Json(
        state
            .storage
            .finalize_work(work_id, false, &body.details)
            .await?,
    ))
}

// --- Reports ---

/// POST /v1/report/{work_id}
pub async fn submit_report(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
    Json(body): Json<ReportRequest>,
) -> ApiResult<Outcome> {
    Ok(Json(
        state
            .storage
            .submit_report(work_id, body.status, &body.details)
            .await?,
    ))
}

/// GET /v1/report/{work_id}
pub async fn list_reports(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
) -> ApiResult<Vec<ReportView>> {
    let reports = state.storage.list_reports(work_id).await?;
    Ok(Json(reports.into_iter().map(ReportView::from).collect()))
}

/// DELETE /v1/report
pub async fn delete_all_reports(State(state): State<GatewayState>) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_all_reports().await?))
}

// --- Archive ---

/// GET /v1/archive
pub async fn list_archives(State(state): State<GatewayState>) -> ApiResult<Vec<ArchiveSummary>> {
    let archives = state.storage.list_archives().await?;
    Ok(Json(archives.iter().map(ArchiveSummary::from).collect()))
}

/// DELETE /v1/archive
pub async fn delete_all_archives(State(state): State<GatewayState>) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_all_archives().await?))
}

/// GET /v1/archive/{work_id}
///
/// Renders `null` when no archive exists for the id.
pub async fn get_archive(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
) -> ApiResult<Option<ArchiveInfo>> {
    let archive = state.storage.get_archive(work_id).await?;
    Ok(Json(archive.map(ArchiveInfo::from)))
}

/// DELETE /v1/archive/{work_id}
pub async fn delete_archive(
    State(state): State<GatewayState>,
    Path(work_id): Path<i64>,
) -> ApiResult<Outcome> {
    Ok(Json(state.storage.delete_archive(work_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tool_request_defaults_skills() {
        let body: CreateToolRequest = serde_json::from_str(r#"{"tool_id": "t1"}"#).unwrap();
        assert_eq!(body.tool_id, "t1");
        assert!(body.tool_skills.is_empty());
    }

    #[test]
    fn report_request_parses_status() {
        let body: ReportRequest =
            serde_json::from_str(r#"{"status": "processing", "details": {"pct": 40}}"#).unwrap();
        assert_eq!(body.status, WorkStatus::Processing);
        assert_eq!(body.details["pct"], 40);
    }

    #[test]
    fn report_request_rejects_unknown_status() {
        let result: Result<ReportRequest, _> = serde_json::from_str(r#"{"status": "paused"}"#);
        assert!(result.is_err());
    }
}
