//! US EPA Air Quality Index from PM2.5 concentration.

use super::round_half_up;
use crate::models::{AqiCategory, NeighborhoodMap};

/// Highest value on the AQI scale.
pub const AQI_MAX: u32 = 500;

/// `(concentration low, concentration high, index low, index high)`,
/// ordered from the highest bracket down.
const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 7] = [
    (350.5, 500.4, 401.0, 500.0),
    (250.5, 350.5, 301.0, 400.0),
    (150.5, 250.5, 201.0, 300.0),
    (55.5, 150.5, 151.0, 200.0),
    (35.5, 55.5, 101.0, 150.0),
    (12.1, 35.5, 51.0, 100.0),
    (0.0, 12.1, 0.0, 50.0),
];

// ---

/// Convert a PM2.5 concentration (µg/m³) to an AQI value.
///
/// Brackets are tried from the top; the first whose lower bound is exceeded
/// wins. Negative input clamps to 0 and the result never exceeds
/// [`AQI_MAX`].
pub fn aqi_from_concentration(pm: f64) -> u32 {
    // ---
    if pm.is_nan() || pm <= 0.0 {
        return 0;
    }

    let (bp_lo, bp_hi, i_lo, i_hi) = PM25_BREAKPOINTS
        .iter()
        .copied()
        .find(|(bp_lo, ..)| pm > *bp_lo)
        .unwrap_or(PM25_BREAKPOINTS[PM25_BREAKPOINTS.len() - 1]);

    let aqi = round_half_up((i_hi - i_lo) / (bp_hi - bp_lo) * (pm - bp_lo) + i_lo);
    (aqi.max(0.0) as u32).min(AQI_MAX)
}

/// Map an AQI value to its EPA category.
pub fn aqi_category(aqi: u32) -> AqiCategory {
    // ---
    match aqi {
        0..=50 => AqiCategory::Good,
        51..=100 => AqiCategory::Moderate,
        101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
        151..=200 => AqiCategory::Unhealthy,
        201..=300 => AqiCategory::VeryUnhealthy,
        _ => AqiCategory::Hazardous,
    }
}

/// Fill `aqi` and `aqi_category` for every neighborhood with a PM2.5 average.
pub fn apply(map: &mut NeighborhoodMap) {
    // ---
    for (_, result) in map.iter_mut() {
        let aqi = result.pm2_5.map(aqi_from_concentration);
        result.aqi = aqi;
        result.aqi_category = aqi.map(aqi_category);
    }
}
