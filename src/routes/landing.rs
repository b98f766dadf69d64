use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

const LANDING_HTML: &str = include_str!("landing.html");

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(handler))
}

/// `GET /` - static documentation page.
async fn handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Html(LANDING_HTML),
    )
}
