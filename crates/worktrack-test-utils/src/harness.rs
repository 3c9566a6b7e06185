// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the storage adapter and HTTP router over a temp
//! SQLite database. Requests go straight into the router with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;
use worktrack_config::model::{StorageConfig, WorktrackConfig};
use worktrack_core::{StorageAdapter, WorktrackError};
use worktrack_gateway::{build_router, GatewayState};
use worktrack_storage::SqliteStorage;

/// Largest response body the harness will buffer.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    service_name: String,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            service_name: "worktrack-test".to_string(),
            wal_mode: true,
        }
    }

    /// Set the service name reported by `/health`.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Use rollback-journal mode instead of WAL.
    pub fn without_wal(mut self) -> Self {
        self.wal_mode = false;
        self
    }

    /// Build the test harness, creating the database and router.
    pub async fn build(self) -> Result<TestHarness, WorktrackError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| WorktrackError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: self.wal_mode,
        };
        let storage = SqliteStorage::new(storage_config.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let router = build_router(GatewayState::new(storage.clone(), &self.service_name));

        let mut config = WorktrackConfig::default();
        config.service.name = self.service_name;
        config.storage = storage_config;

        Ok(TestHarness {
            storage,
            router,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete service stack over a throwaway database.
pub struct TestHarness {
    /// Storage adapter shared with the router.
    pub storage: Arc<dyn StorageAdapter>,
    /// The gateway router.
    pub router: Router,
    /// Configuration matching the harness setup.
    pub config: WorktrackConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start building a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Build a harness with default settings.
    pub async fn new() -> Result<Self, WorktrackError> {
        Self::builder().build().await
    }

    /// Send a request through the router and decode the JSON response.
    ///
    /// Empty or non-JSON bodies decode to `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), WorktrackError> {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| WorktrackError::Internal(format!("invalid test request: {e}")))?;

        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| WorktrackError::Internal(format!("router error: {e}")))?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| WorktrackError::Internal(format!("unreadable response body: {e}")))?;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value), WorktrackError> {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value), WorktrackError> {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), WorktrackError> {
        self.request("PUT", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value), WorktrackError> {
        self.request("DELETE", uri, None).await
    }

    /// Flush the database. Call at the end of a test that inspects the file.
    pub async fn close(&self) -> Result<(), WorktrackError> {
        self.storage.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_builds_and_serves_health() {
        let harness = TestHarness::builder()
            .with_service_name("checkup")
            .build()
            .await
            .unwrap();
        let (status, body) = harness.get("/health").await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "checkup");
        assert_eq!(harness.config.service.name, "checkup");
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn harness_without_wal() {
        let harness = TestHarness::builder().without_wal().build().await.unwrap();
        assert!(!harness.config.storage.wal_mode);
        let (status, body) = harness.get("/v1/tool").await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}
