// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the worktrack service.
//!
//! This crate provides the domain types (tools, tasks, work, reports,
//! archives), the error type, and the storage trait shared by the storage
//! backend and the HTTP gateway. It performs no I/O.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WorktrackError;
pub use traits::StorageAdapter;
pub use types::{
    Archive, ArchivedReport, Attributes, HealthStatus, Outcome, Report, Task, TaskAssignment, Tool,
    ToolAssignment, Work, WorkDetail, WorkFilter, WorkStatus,
};
