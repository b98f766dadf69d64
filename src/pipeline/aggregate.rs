//! Per-neighborhood averaging of sensor readings.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::{classify, mean, round_half_up, round_tenth};
use crate::models::{NeighborhoodMap, Reading};
use crate::neighborhoods::Region;

/// PurpleAir sensors read warm because of heat from their own housing.
/// Subtracted from the rounded neighborhood average, never per reading.
pub const TEMP_CORRECTION_F: i64 = 8;

/// Operating range of the sensor's temperature element (-40°C to 85°C).
/// Anything outside it comes from a faulty unit.
pub const SENSOR_TEMP_RANGE_F: std::ops::RangeInclusive<f64> = -40.0..=185.0;

// ---

/// Valid values collected for one neighborhood during a single pass.
#[derive(Debug, Default)]
struct RegionSample {
    temps: Vec<f64>,
    humidities: Vec<f64>,
    pm2_5: Vec<f64>,
}

/// Bin readings into neighborhoods and average them.
///
/// Fills `temp_f`, `humidity`, `pm2_5` and `sensor_count`; AQI and outlier
/// fields are left for later stages. Readings outside every neighborhood,
/// missing or non-finite values, temperatures outside [`SENSOR_TEMP_RANGE_F`]
/// and negative PM2.5 values are dropped.
pub fn aggregate(readings: &[Reading], regions: &'static [Region]) -> NeighborhoodMap {
    // ---
    let mut samples: HashMap<&'static str, RegionSample> = regions
        .iter()
        .map(|r| (r.key, RegionSample::default()))
        .collect();

    let mut unassigned = 0usize;
    for reading in readings {
        let Some(region) = classify(regions, reading.latitude, reading.longitude) else {
            trace!(sensor = reading.sensor_index, "reading outside all neighborhoods");
            unassigned += 1;
            continue;
        };
        let Some(sample) = samples.get_mut(region.key) else {
            continue;
        };

        if let Some(t) = reading.temperature.filter(|t| t.is_finite()) {
            if SENSOR_TEMP_RANGE_F.contains(&t) {
                sample.temps.push(t);
            } else {
                trace!(sensor = reading.sensor_index, t, "discarding out-of-range temperature");
            }
        }
        if let Some(h) = reading.humidity.filter(|h| h.is_finite()) {
            sample.humidities.push(h);
        }
        if let Some(pm) = reading.pm2_5.filter(|pm| pm.is_finite()) {
            if pm >= 0.0 {
                sample.pm2_5.push(pm);
            } else {
                trace!(sensor = reading.sensor_index, pm, "discarding negative pm2.5");
            }
        }
    }

    debug!(
        total = readings.len(),
        unassigned, "assigned readings to neighborhoods"
    );

    let mut map = NeighborhoodMap::empty_for(regions);
    for (key, result) in map.iter_mut() {
        let Some(sample) = samples.get(key) else {
            continue;
        };
        result.temp_f = mean(&sample.temps)
            .map(|t| (round_half_up(t) as i64).saturating_sub(TEMP_CORRECTION_F));
        result.humidity = mean(&sample.humidities).map(|h| round_half_up(h) as i64);
        result.pm2_5 = mean(&sample.pm2_5).map(round_tenth);
        result.sensor_count = sample.temps.len();
    }
    map
}
