// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented by worktrack backends.

pub mod storage;

pub use storage::StorageAdapter;
