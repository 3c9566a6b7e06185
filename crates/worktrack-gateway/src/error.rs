// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of storage errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use worktrack_core::WorktrackError;

use crate::responses::ErrorResponse;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub WorktrackError);

impl From<WorktrackError> for ApiError {
    fn from(err: WorktrackError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind. The only place this mapping lives.
pub fn status_for(err: &WorktrackError) -> StatusCode {
    match err {
        WorktrackError::NotFound(_) => StatusCode::NOT_FOUND,
        WorktrackError::AlreadyExists(_) | WorktrackError::Referenced(_) => StatusCode::CONFLICT,
        WorktrackError::WrongStatus(_) => StatusCode::INTERNAL_SERVER_ERROR,
        WorktrackError::Config(_)
        | WorktrackError::Storage { .. }
        | WorktrackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_domain() {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        } else {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
