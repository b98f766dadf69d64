//! HTTP routes gateway.
//!
//! Each sibling module exports a subrouter; this module merges them, adds the
//! fallbacks and the cross-cutting layers (rate limiting, CORS), and attaches
//! the shared [`AppState`]. `main.rs` only ever sees [`router`].

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::{error::ApiError, rate_limit, state::AppState};

mod get_neighborhoods;
mod get_weather;
mod health;
mod landing;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(landing::router())
        .merge(health::router())
        .merge(get_weather::router())
        .merge(get_neighborhoods::router())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ))
        // Outermost, so every OPTIONS request is answered here (with or
        // without Access-Control-Request-Method) and 429s carry CORS headers
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Pretty-printed JSON with the API's standard headers.
pub(crate) fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    // ---
    match serde_json::to_string_pretty(body) {
        Ok(text) => (
            status,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CACHE_CONTROL, "public, max-age=300"),
            ],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
