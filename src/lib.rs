//! Neighborhood-level weather and air quality for San Francisco.
//!
//! PurpleAir sensor readings are binned into fixed neighborhood boxes,
//! averaged, bias corrected, converted to AQI and smoothed for outliers by
//! [`pipeline`]. The remaining modules wrap that pipeline in an HTTP service:
//! - `config` loads settings from the environment
//! - `fetch` talks to PurpleAir
//! - `cache` holds the latest snapshot for its TTL
//! - `rate_limit` and `routes` make up the axum application
//!
//! Modules follow the Explicit Module Boundary Pattern (EMBP): siblings import
//! shared types from the crate root, not from each other's files.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod neighborhoods;
pub mod pipeline;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use models::{
    AqiCategory, Fallback, NeighborhoodMap, NeighborhoodReport, OutlierCorrection, Reading,
    RegionResult, WeatherSnapshot,
};
pub use state::AppState;
