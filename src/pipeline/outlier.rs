//! Geographic outlier correction for thinly sampled neighborhoods.
//!
//! One or two sensors can report a temperature far from everything around
//! them (a unit in direct sun, a failing sensor). When that happens the
//! neighborhood's value is replaced by the average of its nearest neighbors
//! and the original is kept in an [`OutlierCorrection`] annotation.

use std::collections::HashMap;

use tracing::info;

use super::{mean, nearest_n, round_half_up, round_tenth};
use crate::models::{NeighborhoodMap, OutlierCorrection};
use crate::neighborhoods::Region;

/// Degrees F a neighborhood may differ from its neighbors before correction.
pub const OUTLIER_THRESHOLD_F: f64 = 10.0;

/// Neighborhoods with more sensors than this are never corrected.
pub const MAX_CORRECTABLE_SENSORS: usize = 2;

/// Number of neighbors averaged for the comparison.
pub const NEIGHBOR_COUNT: usize = 3;

// ---

/// Replace outlying temperatures with the average of the nearest neighbors.
///
/// Only `temp_f` and `outlier_corrected` change. Neighbor averages use the
/// temperatures as they were before this pass, so the outcome does not depend
/// on iteration order.
pub fn correct(map: &mut NeighborhoodMap, regions: &[Region]) {
    // ---
    let with_temp: Vec<(&Region, i64)> = regions
        .iter()
        .filter_map(|r| map.get(r.key).and_then(|result| result.temp_f).map(|t| (r, t)))
        .collect();
    let temps: HashMap<&str, i64> = with_temp.iter().map(|(r, t)| (r.key, *t)).collect();

    let mut corrections = Vec::new();
    for (region, temp) in &with_temp {
        let Some(result) = map.get(region.key) else {
            continue;
        };
        let sensors = result.sensor_count;
        if sensors == 0 || sensors > MAX_CORRECTABLE_SENSORS {
            continue;
        }

        let neighbors = nearest_n(region, with_temp.iter().map(|(r, _)| *r), NEIGHBOR_COUNT);
        if neighbors.len() < NEIGHBOR_COUNT {
            continue;
        }
        let neighbor_temps: Vec<f64> = neighbors
            .iter()
            .filter_map(|n| temps.get(n.key))
            .map(|t| *t as f64)
            .collect();
        let Some(avg) = mean(&neighbor_temps) else {
            continue;
        };

        let diff = (*temp as f64 - avg).abs();
        if diff <= OUTLIER_THRESHOLD_F {
            continue;
        }

        let names: Vec<&str> = neighbors.iter().map(|n| n.name).collect();
        let annotation = OutlierCorrection {
            original_temp_f: *temp,
            neighbor_avg_f: round_tenth(avg),
            diff_f: round_tenth(diff),
            reason: format!(
                "{} reported {}°F from {} sensor{}, {:.1}°F away from the {:.1}°F average of {}",
                region.name,
                temp,
                sensors,
                if sensors == 1 { "" } else { "s" },
                diff,
                avg,
                names.join(", ")
            ),
        };
        corrections.push((region.key, round_half_up(avg) as i64, annotation));
    }

    for (key, corrected, annotation) in corrections {
        let Some(result) = map.get_mut(key) else {
            continue;
        };
        info!(
            neighborhood = key,
            original = annotation.original_temp_f,
            corrected,
            "corrected temperature outlier"
        );
        result.temp_f = Some(corrected);
        result.outlier_corrected = Some(annotation);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::RegionResult;
    use crate::neighborhoods::Bounds;

    /// Four unit squares in a 2x2 block plus one far away.
    static GRID: &[Region] = &[
        Region {
            key: "a",
            name: "A",
            bounds: Bounds::new(1.0, 0.0, 0.0, 1.0),
        },
        Region {
            key: "b",
            name: "B",
            bounds: Bounds::new(1.0, 1.0, 0.0, 2.0),
        },
        Region {
            key: "c",
            name: "C",
            bounds: Bounds::new(0.0, 0.0, -1.0, 1.0),
        },
        Region {
            key: "d",
            name: "D",
            bounds: Bounds::new(0.0, 1.0, -1.0, 2.0),
        },
        Region {
            key: "e",
            name: "E",
            bounds: Bounds::new(1.0, 10.0, 0.0, 11.0),
        },
    ];

    fn create_test_map(rows: &[(&str, i64, usize)]) -> NeighborhoodMap {
        // ---
        let mut map = NeighborhoodMap::empty_for(GRID);
        for (key, temp, count) in rows {
            let result = map.get_mut(key).unwrap();
            result.temp_f = Some(*temp);
            result.sensor_count = *count;
            result.humidity = Some(40);
            result.pm2_5 = Some(5.0);
            result.aqi = Some(21);
        }
        map
    }

    #[test]
    fn test_single_sensor_spike_is_corrected() {
        // ---
        let mut map = create_test_map(&[
            ("a", 90, 1),
            ("b", 70, 3),
            ("c", 70, 3),
            ("d", 70, 3),
            ("e", 40, 3),
        ]);

        correct(&mut map, GRID);

        let a = map.get("a").unwrap();
        assert_eq!(a.temp_f, Some(70));
        let note = a.outlier_corrected.as_ref().unwrap();
        assert_eq!(note.original_temp_f, 90);
        assert_eq!(note.neighbor_avg_f, 70.0);
        assert_eq!(note.diff_f, 20.0);
        assert!(note.reason.contains("B, C, D"), "{}", note.reason);

        // Untouched fields
        assert_eq!(a.sensor_count, 1);
        assert_eq!(a.humidity, Some(40));
        assert_eq!(a.pm2_5, Some(5.0));
        assert_eq!(a.aqi, Some(21));
    }

    #[test]
    fn test_well_sampled_region_is_never_corrected() {
        // ---
        let mut map = create_test_map(&[
            ("a", 90, 3),
            ("b", 70, 3),
            ("c", 70, 3),
            ("d", 70, 3),
            ("e", 40, 3),
        ]);
        let before = map.clone();

        correct(&mut map, GRID);
        assert_eq!(map, before);
    }

    #[test]
    fn test_two_sensors_are_still_correctable() {
        // ---
        let mut map = create_test_map(&[("a", 50, 2), ("b", 70, 3), ("c", 71, 3), ("d", 72, 3)]);

        correct(&mut map, GRID);
        let a = map.get("a").unwrap();
        assert_eq!(a.temp_f, Some(71));
        assert_eq!(a.outlier_corrected.as_ref().unwrap().diff_f, 21.0);
    }

    #[test]
    fn test_deviation_at_threshold_is_kept() {
        // ---
        let mut map = create_test_map(&[("a", 80, 1), ("b", 70, 3), ("c", 70, 3), ("d", 70, 3)]);

        correct(&mut map, GRID);
        let a = map.get("a").unwrap();
        assert_eq!(a.temp_f, Some(80));
        assert!(a.outlier_corrected.is_none());
    }

    #[test]
    fn test_fewer_than_three_neighbors_skips() {
        // ---
        let mut map = create_test_map(&[("a", 95, 1), ("b", 70, 3), ("c", 70, 3)]);

        correct(&mut map, GRID);
        assert_eq!(map.get("a").unwrap().temp_f, Some(95));
    }

    #[test]
    fn test_neighbors_use_uncorrected_values() {
        // ---
        // Both a and b are single-sensor spikes. Each sees the other's raw value.
        let mut map = create_test_map(&[
            ("a", 100, 1),
            ("b", 100, 1),
            ("c", 70, 3),
            ("d", 70, 3),
        ]);

        correct(&mut map, GRID);

        // a: neighbors b (100), c (70), d (70) -> 80
        let a = map.get("a").unwrap();
        assert_eq!(a.temp_f, Some(80));
        assert_eq!(a.outlier_corrected.as_ref().unwrap().neighbor_avg_f, 80.0);

        let b = map.get("b").unwrap();
        assert_eq!(b.temp_f, Some(80));
    }

    #[test]
    fn test_regions_without_temperature_are_ignored() {
        // ---
        let mut map = create_test_map(&[("b", 70, 3), ("c", 70, 3), ("d", 70, 3)]);
        *map.get_mut("a").unwrap() = RegionResult {
            humidity: Some(99),
            ..Default::default()
        };

        correct(&mut map, GRID);
        assert_eq!(map.get("a").unwrap().temp_f, None);
        assert!(map.iter().all(|(_, r)| r.outlier_corrected.is_none()));
    }
}
