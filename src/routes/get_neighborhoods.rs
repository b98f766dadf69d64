use axum::{http::StatusCode, response::Response, routing::get, Router};
use serde::Serialize;

use super::json_response;
use crate::neighborhoods;

// ---

#[derive(Serialize)]
struct NeighborhoodEntry {
    key: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct NeighborhoodList {
    neighborhoods: Vec<NeighborhoodEntry>,
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/neighborhoods", get(handler))
        .route("/neighborhoods/", get(handler))
}

/// `GET /neighborhoods` - every key and display name, in registry order.
async fn handler() -> Response {
    // ---
    let list = NeighborhoodList {
        neighborhoods: neighborhoods::regions()
            .iter()
            .map(|r| NeighborhoodEntry {
                key: r.key,
                name: r.name,
            })
            .collect(),
    };
    json_response(StatusCode::OK, &list)
}
