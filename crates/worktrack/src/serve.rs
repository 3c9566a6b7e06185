// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `worktrack serve` implementation.
//!
//! Opens the storage backend (running migrations), serves the HTTP gateway
//! until SIGINT/SIGTERM, then closes storage so the WAL is checkpointed.

use std::sync::Arc;

use tracing::{debug, info, warn};
use worktrack_config::model::WorktrackConfig;
use worktrack_core::{StorageAdapter, WorktrackError};
use worktrack_gateway::{start_server, GatewayState, ServerConfig};
use worktrack_storage::SqliteStorage;

/// Runs the service until a shutdown signal arrives.
pub async fn run_serve(config: WorktrackConfig) -> Result<(), WorktrackError> {
    init_tracing(&config.service.log_level);

    info!(
        service = %config.service.name,
        database = %config.storage.database_path,
        "starting worktrack serve"
    );

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = GatewayState::new(storage.clone(), &config.service.name);

    let served = start_server(&server_config, state, shutdown_signal()).await;

    // Close storage even if the server failed, then surface the server error.
    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    served?;

    info!("worktrack serve shutdown complete");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler, Ctrl+C only");
                ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }

    debug!("shutdown signal handler completed");
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "worktrack={log_level},worktrack_storage={log_level},worktrack_gateway={log_level},tower_http={log_level},warn"
        ))
    });

    // try_init: seed and serve may both initialize in one process under test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
