// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for worktrack integration tests.
//!
//! Provides a [`TestHarness`] that owns a temp SQLite database, the storage
//! adapter on top of it, and the gateway router, so tests can drive the
//! service over HTTP without binding a socket.

pub mod harness;

pub use axum::http::StatusCode;
pub use harness::{TestHarness, TestHarnessBuilder};
