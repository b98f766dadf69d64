//! In-process cache for the latest computed snapshot.
//!
//! There is only one cached value, the whole-city snapshot. Concurrent misses
//! may each recompute it; the last writer wins.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::WeatherSnapshot;

// ---

struct Entry {
    stored_at: Instant,
    snapshot: Arc<WeatherSnapshot>,
}

pub struct SnapshotCache {
    ttl: Duration,
    slot: RwLock<Option<Entry>>,
}

impl SnapshotCache {
    // ---
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// The cached snapshot, unless it is missing or older than the TTL.
    pub async fn get(&self) -> Option<Arc<WeatherSnapshot>> {
        // ---
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("snapshot cache hit");
                Some(Arc::clone(&entry.snapshot))
            }
            Some(_) => {
                debug!("snapshot cache expired");
                None
            }
            None => {
                debug!("snapshot cache empty");
                None
            }
        }
    }

    /// Store a freshly computed snapshot and hand back a shared handle to it.
    pub async fn put(&self, snapshot: WeatherSnapshot) -> Arc<WeatherSnapshot> {
        // ---
        let snapshot = Arc::new(snapshot);
        *self.slot.write().await = Some(Entry {
            stored_at: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        snapshot
    }
}
