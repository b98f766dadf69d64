//! Point to neighborhood assignment.

use crate::neighborhoods::Region;

/// Find the first region whose bounds contain the point.
///
/// Returns `None` for points outside every neighborhood (over the water,
/// outside city limits).
pub fn classify(regions: &[Region], lat: f64, lng: f64) -> Option<&Region> {
    // ---
    regions.iter().find(|r| r.bounds.contains(lat, lng))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::neighborhoods::{regions, Bounds};

    #[test]
    fn test_point_inside_a_neighborhood() {
        // ---
        let region = classify(regions(), 37.758, -122.415).unwrap();
        assert_eq!(region.key, "mission");

        let region = classify(regions(), 37.750, -122.490).unwrap();
        assert_eq!(region.key, "outer_sunset");
    }

    #[test]
    fn test_point_outside_every_neighborhood() {
        // ---
        // Out in the Pacific
        assert!(classify(regions(), 37.760, -122.600).is_none());
        // Oakland
        assert!(classify(regions(), 37.804, -122.271).is_none());
        assert!(classify(regions(), f64::NAN, -122.415).is_none());
    }

    #[test]
    fn test_overlap_resolves_to_first_listed() {
        // ---
        // Inside both Financial District and Embarcadero; Financial District is listed first.
        assert!(regions()[0].bounds.contains(37.790, -122.395));
        let region = classify(regions(), 37.790, -122.395).unwrap();
        assert_eq!(region.key, "financial_district");

        let swapped = [
            Region {
                key: "second",
                name: "Second",
                bounds: Bounds::new(1.0, 0.0, 0.0, 1.0),
            },
            Region {
                key: "first",
                name: "First",
                bounds: Bounds::new(1.0, 0.0, 0.0, 1.0),
            },
        ];
        assert_eq!(classify(&swapped, 0.5, 0.5).unwrap().key, "second");
    }
}
