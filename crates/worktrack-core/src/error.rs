// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the worktrack service.

use thiserror::Error;

/// The primary error type returned by storage operations and the service core.
///
/// The first four variants are domain errors and map to stable HTTP status
/// codes at the gateway boundary. The rest are ambient failures.
#[derive(Debug, Error)]
pub enum WorktrackError {
    /// A referenced tool, task, work item, or archive does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A tool or task with the same natural key already exists.
    #[error("{0}")]
    AlreadyExists(String),

    /// The entity is still referenced and cannot be removed.
    ///
    /// Reserved: no operation raises it today.
    #[error("{0}")]
    Referenced(String),

    /// The entity is in a status that does not permit the operation.
    ///
    /// Reserved: no operation raises it today.
    #[error("{0}")]
    WrongStatus(String),

    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WorktrackError {
    /// Returns true for the domain error kinds callers are expected to handle.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::AlreadyExists(_) | Self::Referenced(_) | Self::WrongStatus(_)
        )
    }
}
