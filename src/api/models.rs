//! Request/response bodies for the HTTP API

use crate::errors::DataError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure summary
    pub error: String,
}

/// Handler error; always surfaces as a 500 with a generic message
#[derive(Debug)]
pub struct ApiError(pub DataError);

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Message exposed to clients. The underlying cause is only logged.
    pub fn public_message(&self) -> &'static str {
        if self.0.is_io() {
            "Failed to read data"
        } else {
            "Failed to parse data"
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "stock data request failed");
        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
