// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `worktrack-core::types` for use across
//! the adapter trait boundary. This module re-exports them for convenience
//! within the storage crate.

pub use worktrack_core::types::{
    Archive, ArchivedReport, Attributes, Report, Task, TaskAssignment, Tool, ToolAssignment,
    Work, WorkDetail, WorkFilter, WorkStatus,
};
