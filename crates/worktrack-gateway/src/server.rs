// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use worktrack_core::{StorageAdapter, WorktrackError};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Storage backend all handlers delegate to.
    pub storage: Arc<dyn StorageAdapter>,
    /// Service name reported by the health endpoint.
    pub service_name: String,
}

impl GatewayState {
    pub fn new(storage: Arc<dyn StorageAdapter>, service_name: impl Into<String>) -> Self {
        Self {
            storage,
            service_name: service_name.into(),
        }
    }
}

/// Gateway server configuration (mirrors `ServerConfig` from worktrack-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string passed to `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the full application router.
pub fn build_router(state: GatewayState) -> Router {
    let tools = Router::new()
        .route(
            "/v1/tool",
            post(handlers::create_tool)
                .get(handlers::list_tools)
                .delete(handlers::delete_all_tools),
        )
        .route("/v1/tool/available", get(handlers::list_available_tools))
        .route("/v1/tool/work/{tool_id}", get(handlers::get_work_for_tool))
        .route(
            "/v1/tool/{tool_id}",
            get(handlers::get_tool)
                .put(handlers::mark_tool_ready)
                .delete(handlers::delete_tool),
        )
        .route("/v1/tool/{tool_id}/enabled", put(handlers::set_tool_enabled));

    let tasks = Router::new()
        .route(
            "/v1/task",
            post(handlers::create_task)
                .get(handlers::list_tasks)
                .delete(handlers::delete_all_tasks),
        )
        .route("/v1/task/available", get(handlers::list_available_tasks))
        .route(
            "/v1/task/{task_id}",
            get(handlers::get_task).delete(handlers::delete_task),
        );

    let work = Router::new()
        .route(
            "/v1/work",
            post(handlers::create_work)
                .get(handlers::list_work)
                .delete(handlers::delete_all_work),
        )
        .route("/v1/work/completed", get(handlers::list_completed_work))
        .route("/v1/work/succeeded", get(handlers::list_succeeded_work))
        .route("/v1/work/failed", get(handlers::list_failed_work))
        .route(
            "/v1/work/{work_id}",
            get(handlers::get_work).delete(handlers::delete_work),
        )
        .route("/v1/work/{work_id}/succeeded", put(handlers::work_succeeded))
        .route("/v1/work/{work_id}/failed", put(handlers::work_failed));

    let reports = Router::new()
        .route(
            "/v1/report/{work_id}",
            post(handlers::submit_report).get(handlers::list_reports),
        )
        .route(
            "/v1/report",
            axum::routing::delete(handlers::delete_all_reports),
        );

    let archive = Router::new()
        .route(
            "/v1/archive",
            get(handlers::list_archives).delete(handlers::delete_all_archives),
        )
        .route(
            "/v1/archive/{work_id}",
            get(handlers::get_archive).delete(handlers::delete_archive),
        );

    Router::new()
        .route("/health", get(handlers::get_health))
        .merge(tools)
        .merge(tasks)
        .merge(work)
        .merge(reports)
        .merge(archive)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `shutdown` resolves,
/// letting in-flight requests finish.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), WorktrackError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WorktrackError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WorktrackError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
