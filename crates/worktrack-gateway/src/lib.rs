// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the worktrack service.
//!
//! Exposes the [`StorageAdapter`](worktrack_core::StorageAdapter) operations as
//! a JSON API under `/v1`. Handlers hold no domain logic: they decode the
//! request, call storage, and render a view. Every error passes through
//! [`error::status_for`] on its way out.

pub mod error;
pub mod handlers;
pub mod responses;
pub mod server;

pub use error::{status_for, ApiError};
pub use server::{build_router, start_server, GatewayState, ServerConfig};
