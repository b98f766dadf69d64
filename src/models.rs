//! Data models for the neighborhood weather pipeline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::neighborhoods::Region;

// ---

/// A single upstream sensor observation.
///
/// Any of the measured values may be absent; absent is never the same as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    // ---
    pub sensor_index: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Fahrenheit, as reported by the sensor.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// PM2.5 concentration in µg/m³.
    pub pm2_5: Option<f64>,
}

/// EPA air quality category for an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiCategory {
    // ---
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
}

impl AqiCategory {
    // ---
    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a temperature that was replaced by its neighbors' consensus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierCorrection {
    // ---
    pub original_temp_f: i64,
    pub neighbor_avg_f: f64,
    pub diff_f: f64,
    pub reason: String,
}

/// Computed values for one neighborhood.
///
/// Field names are the JSON contract with API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionResult {
    // ---
    pub temp_f: Option<i64>,
    pub humidity: Option<i64>,
    pub pm2_5: Option<f64>,
    pub aqi: Option<u32>,
    pub aqi_category: Option<AqiCategory>,
    /// Number of readings that contributed a temperature.
    pub sensor_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_corrected: Option<OutlierCorrection>,
}

/// Per-neighborhood results, kept in registry order.
///
/// Serializes as a JSON object whose keys appear in the same order as the
/// neighborhood registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborhoodMap {
    entries: Vec<(&'static str, RegionResult)>,
}

impl NeighborhoodMap {
    // ---
    /// One empty result per region.
    pub fn empty_for(regions: &[Region]) -> Self {
        // ---
        Self {
            entries: regions
                .iter()
                .map(|r| (r.key, RegionResult::default()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RegionResult> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, result)| result)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RegionResult> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RegionResult)> + '_ {
        self.entries.iter().map(|(k, result)| (*k, result))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut RegionResult)> + '_ {
        self.entries.iter_mut().map(|(k, result)| (*k, result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NeighborhoodMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // ---
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, result) in &self.entries {
            map.serialize_entry(key, result)?;
        }
        map.end()
    }
}

/// The output of one aggregation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    // ---
    #[serde(serialize_with = "serialize_iso_millis")]
    pub updated: DateTime<Utc>,
    pub neighborhoods: NeighborhoodMap,
}

/// Where a single-neighborhood response borrowed its data from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fallback {
    // ---
    pub source: &'static str,
    pub source_name: &'static str,
    pub source_sensor_count: usize,
    pub reason: String,
}

/// Response body for a single neighborhood query.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodReport {
    // ---
    #[serde(serialize_with = "serialize_iso_millis")]
    pub updated: DateTime<Utc>,
    pub neighborhood: &'static str,
    pub name: &'static str,
    #[serde(flatten)]
    pub data: RegionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

/// `2025-03-26T18:45:00.000Z` style timestamps.
fn serialize_iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    // ---
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
