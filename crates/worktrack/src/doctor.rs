// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `worktrack doctor` diagnostic command.
//!
//! Prints a configuration summary and runs quick health checks against the
//! configured database.

use std::path::Path;
use std::time::{Duration, Instant};

use worktrack_config::model::WorktrackConfig;
use worktrack_core::{HealthStatus, StorageAdapter, WorktrackError};
use worktrack_storage::SqliteStorage;

/// Status of a single diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run all diagnostic checks and print the results.
pub async fn run_doctor(config: &WorktrackConfig) -> Result<(), WorktrackError> {
    println!();
    println!("  worktrack doctor");
    println!();
    println!("  Effective configuration:");
    for line in effective_config(config)?.lines() {
        println!("    {line}");
    }
    println!();

    let results = vec![
        check_config(),
        check_database(&config.storage.database_path),
        check_storage(config).await,
    ];

    let mut issues = 0;
    for result in &results {
        let duration_ms = result.duration.as_millis();
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => {
                issues += 1;
                "[WARN]"
            }
            CheckStatus::Fail => {
                issues += 1;
                "[FAIL]"
            }
        };
        println!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

/// Render the merged configuration as TOML.
fn effective_config(config: &WorktrackConfig) -> Result<String, WorktrackError> {
    toml::to_string_pretty(config)
        .map_err(|e| WorktrackError::Config(format!("cannot render configuration: {e}")))
}

impl CheckResult {
    fn finish(name: &str, started: Instant, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: started.elapsed(),
        }
    }
}

/// Re-load the configuration from disk and environment.
fn check_config() -> CheckResult {
    let started = Instant::now();
    match worktrack_config::load_and_validate() {
        Ok(_) => CheckResult::finish("Configuration", started, CheckStatus::Pass, "valid"),
        Err(errors) => CheckResult::finish(
            "Configuration",
            started,
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
        ),
    }
}

fn check_database(db_path: &str) -> CheckResult {
    let started = Instant::now();
    match std::fs::metadata(db_path) {
        Ok(meta) => CheckResult::finish(
            "Database",
            started,
            CheckStatus::Pass,
            format!("{} bytes", meta.len()),
        ),
        Err(_) => CheckResult::finish(
            "Database",
            started,
            CheckStatus::Warn,
            "not found (created on first serve)",
        ),
    }
}

/// Open the database (applying pending migrations) and run the health check.
///
/// Skipped when the database does not exist yet, so doctor never creates it.
async fn check_storage(config: &WorktrackConfig) -> CheckResult {
    let started = Instant::now();

    if !Path::new(&config.storage.database_path).exists() {
        return CheckResult::finish("Storage", started, CheckStatus::Warn, "skipped (no database)");
    }

    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        return CheckResult::finish(
            "Storage",
            started,
            CheckStatus::Fail,
            format!("open failed: {e}"),
        );
    }

    let (status, message) = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "healthy".to_string()),
        Ok(HealthStatus::Degraded(detail)) => (CheckStatus::Warn, format!("degraded: {detail}")),
        Ok(HealthStatus::Unhealthy(detail)) => {
            (CheckStatus::Fail, format!("unhealthy: {detail}"))
        }
        Err(e) => (CheckStatus::Fail, format!("check failed: {e}")),
    };
    let _ = storage.close().await;

    CheckResult::finish("Storage", started, status, message)
}

#[cfg(test)]
mod tests {
    use worktrack_config::model::StorageConfig;

    use super::*;

    fn config_for(db_path: &Path) -> WorktrackConfig {
        let mut config = WorktrackConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config
    }

    #[test]
    fn check_status_equality() {
        assert_eq!(CheckStatus::Pass, CheckStatus::Pass);
        assert_ne!(CheckStatus::Pass, CheckStatus::Fail);
    }

    #[test]
    fn effective_config_lists_every_section() {
        let rendered = effective_config(&WorktrackConfig::default()).unwrap();
        assert!(rendered.contains("[service]"));
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("[storage]"));
        assert!(rendered.contains("port = 8000"));
    }

    #[test]
    fn check_database_missing_warns() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_database(dir.path().join("absent.db").to_str().unwrap());
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[tokio::test]
    async fn check_storage_skips_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("absent.db");
        let result = check_storage(&config_for(&db_path)).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(!db_path.exists(), "doctor must not create the database");
    }

    #[tokio::test]
    async fn check_storage_passes_on_initialized_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("present.db");
        let config = config_for(&db_path);

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await.unwrap();
        storage.close().await.unwrap();

        let db = check_database(db_path.to_str().unwrap());
        assert_eq!(db.status, CheckStatus::Pass);

        let result = check_storage(&config).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
        assert_eq!(result.message, "healthy");
    }
}
