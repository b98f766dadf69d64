//! Shared application state and the snapshot refresh cycle.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::{
    cache::SnapshotCache, fetch, neighborhoods, pipeline, rate_limit::RateLimiter, Config,
    WeatherSnapshot,
};

// ---

/// Everything handlers need, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub cache: Arc<SnapshotCache>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    // ---
    pub fn new(config: Config) -> Result<Self> {
        // ---
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            cache: Arc::new(SnapshotCache::new(config.cache_ttl())),
            limiter: Arc::new(RateLimiter::new(config.rate_limit_per_minute)),
            config: Arc::new(config),
            http,
        })
    }

    /// Latest snapshot, recomputed from PurpleAir when the cache is stale.
    pub async fn snapshot(&self) -> Result<Arc<WeatherSnapshot>> {
        // ---
        if let Some(snapshot) = self.cache.get().await {
            return Ok(snapshot);
        }

        let readings = fetch::fetch_readings(&self.http, &self.config).await?;
        let snapshot = WeatherSnapshot {
            updated: Utc::now(),
            neighborhoods: pipeline::run(&readings, neighborhoods::regions()),
        };
        info!(
            "Computed snapshot from {} readings at {}",
            readings.len(),
            snapshot.updated
        );
        Ok(self.cache.put(snapshot).await)
    }
}
