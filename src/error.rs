//! API error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::routes::json_response;

/// Errors surfaced to API clients as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    // ---
    #[error("Not found. Try /sf-weather or /sf-weather/:neighborhood")]
    NotFound,

    #[error("Unknown neighborhood: {0}")]
    UnknownNeighborhood(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded. Try again in a minute.")]
    RateLimited,

    /// Fetching or decoding sensor data failed.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::UnknownNeighborhood(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:#}", self);
        }
        json_response(status, &json!({ "error": self.to_string() }))
    }
}
