//! Static registry of San Francisco neighborhoods.
//!
//! Each neighborhood is an axis-aligned bounding box in lat/lng degrees.
//! Boxes overlap in places, so the order of [`SF_NEIGHBORHOODS`] matters:
//! a point that falls in several boxes belongs to the first one listed.

// ---

/// Bounding rectangle given by its north-west and south-east corners.
///
/// The north-west corner has the larger latitude and the smaller (more
/// negative) longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    // ---
    pub nw_lat: f64,
    pub nw_lng: f64,
    pub se_lat: f64,
    pub se_lng: f64,
}

impl Bounds {
    // ---
    pub const fn new(nw_lat: f64, nw_lng: f64, se_lat: f64, se_lng: f64) -> Self {
        Self {
            nw_lat,
            nw_lng,
            se_lat,
            se_lng,
        }
    }

    /// True if the point lies inside the box. Edges are inclusive.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        // ---
        lat <= self.nw_lat && lat >= self.se_lat && lng >= self.nw_lng && lng <= self.se_lng
    }

    /// Midpoint of the two corners as `(lat, lng)`.
    pub fn center(&self) -> (f64, f64) {
        // ---
        (
            (self.nw_lat + self.se_lat) / 2.0,
            (self.nw_lng + self.se_lng) / 2.0,
        )
    }
}

/// A named neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    // ---
    /// Stable identifier used in URLs and response maps.
    pub key: &'static str,

    /// Human readable name.
    pub name: &'static str,

    pub bounds: Bounds,
}

impl Region {
    // ---
    pub fn center(&self) -> (f64, f64) {
        self.bounds.center()
    }
}

const fn region(
    key: &'static str,
    name: &'static str,
    nw_lat: f64,
    nw_lng: f64,
    se_lat: f64,
    se_lng: f64,
) -> Region {
    Region {
        key,
        name,
        bounds: Bounds::new(nw_lat, nw_lng, se_lat, se_lng),
    }
}

/// Box covering the whole city, used to scope the upstream sensor query.
pub const SF_BOUNDS: Bounds = Bounds::new(37.8120, -122.5200, 37.7080, -122.3550);

/// Every neighborhood, in classification order.
pub static SF_NEIGHBORHOODS: &[Region] = &[
    region("financial_district", "Financial District", 37.7960, -122.4050, 37.7880, -122.3920),
    region("chinatown", "Chinatown", 37.7980, -122.4100, 37.7920, -122.4030),
    region("union_square", "Union Square", 37.7920, -122.4120, 37.7850, -122.4030),
    region("tenderloin", "Tenderloin", 37.7880, -122.4200, 37.7800, -122.4080),
    region("civic_center", "Civic Center", 37.7830, -122.4250, 37.7750, -122.4130),
    region("embarcadero", "Embarcadero", 37.8050, -122.4000, 37.7850, -122.3850),
    region("rincon_hill", "Rincon Hill", 37.7900, -122.3950, 37.7830, -122.3850),
    region("south_beach", "South Beach", 37.7870, -122.3950, 37.7780, -122.3850),
    region("north_beach", "North Beach", 37.8080, -122.4180, 37.7970, -122.4020),
    region("telegraph_hill", "Telegraph Hill", 37.8050, -122.4080, 37.7980, -122.3990),
    region("russian_hill", "Russian Hill", 37.8030, -122.4250, 37.7940, -122.4100),
    region("nob_hill", "Nob Hill", 37.7950, -122.4200, 37.7880, -122.4080),
    region("marina", "Marina", 37.8080, -122.4500, 37.7980, -122.4280),
    region("pacific_heights", "Pacific Heights", 37.7980, -122.4450, 37.7870, -122.4200),
    region("presidio", "Presidio", 37.8050, -122.4850, 37.7850, -122.4450),
    region("sea_cliff", "Sea Cliff", 37.7900, -122.4950, 37.7820, -122.4780),
    region("lands_end", "Lands End", 37.7900, -122.5150, 37.7780, -122.4950),
    region("inner_richmond", "Inner Richmond", 37.7870, -122.4650, 37.7750, -122.4450),
    region("outer_richmond", "Outer Richmond", 37.7870, -122.5100, 37.7750, -122.4650),
    region("inner_sunset", "Inner Sunset", 37.7680, -122.4700, 37.7550, -122.4500),
    region("outer_sunset", "Outer Sunset", 37.7600, -122.5100, 37.7380, -122.4700),
    region("parkside", "Parkside", 37.7450, -122.4900, 37.7350, -122.4700),
    region("haight", "Haight-Ashbury", 37.7750, -122.4550, 37.7660, -122.4400),
    region("lower_haight", "Lower Haight", 37.7750, -122.4400, 37.7700, -122.4250),
    region("hayes_valley", "Hayes Valley", 37.7800, -122.4320, 37.7720, -122.4180),
    region("cole_valley", "Cole Valley", 37.7680, -122.4530, 37.7600, -122.4420),
    region("castro", "Castro", 37.7680, -122.4400, 37.7560, -122.4280),
    region("noe_valley", "Noe Valley", 37.7560, -122.4400, 37.7420, -122.4200),
    region("mission", "Mission District", 37.7680, -122.4280, 37.7480, -122.4050),
    region("soma", "SoMa", 37.7880, -122.4150, 37.7700, -122.3900),
    region("mission_bay", "Mission Bay", 37.7780, -122.4000, 37.7650, -122.3850),
    region("twin_peaks", "Twin Peaks", 37.7600, -122.4550, 37.7480, -122.4380),
    region("diamond_heights", "Diamond Heights", 37.7480, -122.4450, 37.7380, -122.4300),
    region("glen_park", "Glen Park", 37.7420, -122.4400, 37.7280, -122.4250),
    region("forest_hill", "Forest Hill", 37.7550, -122.4650, 37.7450, -122.4500),
    region("west_portal", "West Portal", 37.7450, -122.4700, 37.7350, -122.4580),
    region("st_francis_wood", "St. Francis Wood", 37.7400, -122.4700, 37.7300, -122.4550),
    region("bernal_heights", "Bernal Heights", 37.7480, -122.4200, 37.7320, -122.4000),
    region("potrero_hill", "Potrero Hill", 37.7650, -122.4050, 37.7500, -122.3900),
    region("dogpatch", "Dogpatch", 37.7650, -122.3950, 37.7530, -122.3850),
    region("bayview", "Bayview", 37.7450, -122.4000, 37.7200, -122.3700),
    region("hunters_point", "Hunters Point", 37.7350, -122.3900, 37.7100, -122.3650),
    region("excelsior", "Excelsior", 37.7320, -122.4350, 37.7150, -122.4100),
    region("visitacion_valley", "Visitacion Valley", 37.7200, -122.4150, 37.7080, -122.3950),
    region("crocker_amazon", "Crocker Amazon", 37.7220, -122.4400, 37.7080, -122.4200),
    region("ingleside", "Ingleside", 37.7300, -122.4600, 37.7150, -122.4400),
    region("oceanview", "Oceanview", 37.7200, -122.4600, 37.7100, -122.4400),
    region("merced_heights", "Merced Heights", 37.7180, -122.4700, 37.7100, -122.4550),
    region("lakeside", "Lakeside", 37.7300, -122.4850, 37.7200, -122.4700),
    region("stonestown", "Stonestown", 37.7280, -122.4800, 37.7200, -122.4700),
];

// ---

/// The full, ordered neighborhood registry.
pub fn regions() -> &'static [Region] {
    SF_NEIGHBORHOODS
}

/// Look up a neighborhood by key.
pub fn find(key: &str) -> Option<&'static Region> {
    // ---
    SF_NEIGHBORHOODS.iter().find(|r| r.key == key)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_stable() {
        // ---
        assert_eq!(regions().len(), 50);
        assert_eq!(regions()[0].key, "financial_district");
        assert_eq!(regions()[49].key, "stonestown");

        let keys: HashSet<_> = regions().iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), regions().len(), "duplicate neighborhood keys");
    }

    #[test]
    fn test_bounds_follow_corner_convention() {
        // ---
        for r in regions() {
            assert!(r.bounds.nw_lat > r.bounds.se_lat, "{} latitude", r.key);
            assert!(r.bounds.nw_lng < r.bounds.se_lng, "{} longitude", r.key);
        }
    }

    #[test]
    fn test_every_neighborhood_is_inside_the_city() {
        // ---
        for r in regions() {
            let (lat, lng) = r.center();
            assert!(SF_BOUNDS.contains(lat, lng), "{} outside SF_BOUNDS", r.key);
        }
    }

    #[test]
    fn test_bounds_edges_are_inclusive() {
        // ---
        let b = Bounds::new(2.0, 0.0, 1.0, 1.0);
        assert!(b.contains(2.0, 0.0));
        assert!(b.contains(1.0, 1.0));
        assert!(b.contains(1.5, 0.5));
        assert!(!b.contains(2.0001, 0.5));
        assert!(!b.contains(1.5, -0.0001));
        assert_eq!(b.center(), (1.5, 0.5));
    }

    #[test]
    fn test_find() {
        // ---
        assert_eq!(find("mission").map(|r| r.name), Some("Mission District"));
        assert!(find("atlantis").is_none());
    }
}
