//! Nearest-neighborhood lookup and substitution for empty neighborhoods.
//!
//! Distances are planar Euclidean distances between bounding-box centers in
//! raw lat/lng degrees. Good enough inside one city, and it keeps neighbor
//! selection stable.

use tracing::info;

use crate::models::{Fallback, NeighborhoodMap, RegionResult};
use crate::neighborhoods::Region;

// ---

/// Center-to-center distance between two regions.
pub fn distance(a: &Region, b: &Region) -> f64 {
    // ---
    let (a_lat, a_lng) = a.center();
    let (b_lat, b_lng) = b.center();
    ((a_lat - b_lat).powi(2) + (a_lng - b_lng).powi(2)).sqrt()
}

/// The `n` regions nearest to `target`, closest first.
///
/// `target` itself is never returned. Equal distances keep the order of
/// `available`.
pub fn nearest_n<'r, I>(target: &Region, available: I, n: usize) -> Vec<&'r Region>
where
    I: IntoIterator<Item = &'r Region>,
{
    // ---
    let mut candidates: Vec<(f64, &'r Region)> = available
        .into_iter()
        .filter(|r| r.key != target.key)
        .map(|r| (distance(target, r), r))
        .collect();

    // Stable sort, so ties resolve to registry order
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates.into_iter().take(n).map(|(_, r)| r).collect()
}

/// The single region nearest to `target`, if any.
pub fn nearest<'r, I>(target: &Region, available: I) -> Option<&'r Region>
where
    I: IntoIterator<Item = &'r Region>,
{
    nearest_n(target, available, 1).into_iter().next()
}

/// Result to report for `region`, borrowing from the nearest neighborhood with
/// sensors when `region` has none.
///
/// The borrowed result keeps `sensor_count` at 0 so clients can tell the
/// data is not local. When no neighborhood has sensors, the empty result is
/// returned unchanged.
pub fn fill_gap(
    region: &Region,
    map: &NeighborhoodMap,
    regions: &'static [Region],
) -> (RegionResult, Option<Fallback>) {
    // ---
    let own = map.get(region.key).cloned().unwrap_or_default();
    if own.sensor_count > 0 {
        return (own, None);
    }

    let with_data = regions
        .iter()
        .filter(|r| map.get(r.key).is_some_and(|result| result.sensor_count > 0));

    let Some(source) = nearest(region, with_data) else {
        return (own, None);
    };
    let Some(source_result) = map.get(source.key) else {
        return (own, None);
    };

    info!(
        neighborhood = region.key,
        source = source.key,
        "no sensors, using nearest neighborhood"
    );

    let fallback = Fallback {
        source: source.key,
        source_name: source.name,
        source_sensor_count: source_result.sensor_count,
        reason: format!(
            "No sensors in {}; showing data from nearby {}",
            region.name, source.name
        ),
    };
    let data = RegionResult {
        sensor_count: 0,
        ..source_result.clone()
    };
    (data, Some(fallback))
}
