use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tracing::{debug, info};

use super::json_response;
use crate::{
    error::ApiError, neighborhoods, pipeline::fill_gap, state::AppState, NeighborhoodReport,
};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/sf-weather", get(all_neighborhoods))
        .route("/sf-weather/", get(all_neighborhoods))
        .route("/sf-weather/{neighborhood}", get(one_neighborhood))
}

/// `GET /sf-weather` - the full snapshot for every neighborhood.
async fn all_neighborhoods(State(state): State<AppState>) -> Result<Response, ApiError> {
    // ---
    info!("GET /sf-weather");
    let snapshot = state.snapshot().await?;
    Ok(json_response(StatusCode::OK, &*snapshot))
}

/// `GET /sf-weather/{neighborhood}` - one neighborhood, gap-filled from the
/// nearest neighborhood with sensors when it has none of its own.
async fn one_neighborhood(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    // ---
    info!("GET /sf-weather/{}", key);

    if !is_well_formed_key(&key) {
        debug!("Rejecting malformed neighborhood key {:?}", key);
        return Err(ApiError::NotFound);
    }
    let region = neighborhoods::find(&key).ok_or(ApiError::UnknownNeighborhood(key))?;

    let snapshot = state.snapshot().await?;
    let (data, fallback) = fill_gap(region, &snapshot.neighborhoods, neighborhoods::regions());

    let report = NeighborhoodReport {
        updated: snapshot.updated,
        neighborhood: region.key,
        name: region.name,
        data,
        fallback,
    };
    Ok(json_response(StatusCode::OK, &report))
}

/// Keys are lowercase ASCII letters and underscores.
fn is_well_formed_key(key: &str) -> bool {
    // ---
    !key.is_empty() && key.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_key_shape() {
        // ---
        assert!(is_well_formed_key("noe_valley"));
        assert!(is_well_formed_key("atlantis"));
        assert!(!is_well_formed_key(""));
        assert!(!is_well_formed_key("Mission"));
        assert!(!is_well_formed_key("mission-bay"));
        assert!(!is_well_formed_key("district9"));
    }
}
