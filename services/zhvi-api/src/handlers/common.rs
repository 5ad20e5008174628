//! Shared response helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use zhvi_common::ZhviError;

/// JSON error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A handler error paired with the ZIP code the client asked for.
#[derive(Debug)]
pub struct ApiError {
    pub error: ZhviError,
    pub requested: String,
}

impl ApiError {
    pub fn new(error: ZhviError, requested: impl Into<String>) -> Self {
        Self {
            error,
            requested: requested.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.error.client_message(&self.requested),
        };
        (status, Json(body)).into_response()
    }
}
