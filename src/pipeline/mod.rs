//! Spatial aggregation pipeline.
//!
//! Turns a flat list of sensor [`Reading`]s into one [`RegionResult`] per
//! neighborhood:
//!
//! 1. `classify` assigns each reading to the first neighborhood containing it
//! 2. `aggregate` averages each neighborhood's readings
//! 3. `aqi` converts the PM2.5 average to an AQI and category
//! 4. `outlier` pulls thinly-sampled temperature spikes toward their neighbors
//!
//! `gap_fill` is not part of the batch pass; it is used per request when a
//! single neighborhood has no sensors.
//!
//! Everything here is synchronous and free of I/O.
//!
//! [`RegionResult`]: crate::models::RegionResult

use tracing::debug;

use crate::models::{NeighborhoodMap, Reading};
use crate::neighborhoods::Region;

pub mod aggregate;
pub mod aqi;
pub mod classify;
pub mod gap_fill;
pub mod outlier;

pub use aggregate::aggregate;
pub use classify::classify;
pub use gap_fill::{fill_gap, nearest, nearest_n};
pub use outlier::correct;

// ---

/// Run the full batch pipeline over one set of readings.
pub fn run(readings: &[Reading], regions: &'static [Region]) -> NeighborhoodMap {
    // ---
    let mut map = aggregate(readings, regions);
    aqi::apply(&mut map);
    correct(&mut map, regions);

    debug!(
        readings = readings.len(),
        with_data = map.iter().filter(|(_, r)| r.sensor_count > 0).count(),
        "pipeline complete"
    );
    map
}

/// Round to the nearest integer, with halves going toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place, halves toward positive infinity.
pub(crate) fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    // ---
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
