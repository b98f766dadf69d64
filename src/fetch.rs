//! PurpleAir client.
//!
//! The sensors endpoint returns a columnar payload:
//! `{"fields": ["sensor_index", ...], "data": [[123, ...], ...]}`.
//! Columns are located by name, so the order PurpleAir chooses does not matter.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::neighborhoods::SF_BOUNDS;
use crate::{Config, Reading};

/// Columns requested from PurpleAir.
pub const SENSOR_FIELDS: &str = "sensor_index,latitude,longitude,temperature,humidity,pm2.5_atm";

// ---

#[derive(Debug, Deserialize)]
struct SensorsResponse {
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Fetch current outdoor sensor readings inside the city bounds.
pub async fn fetch_readings(client: &reqwest::Client, config: &Config) -> Result<Vec<Reading>> {
    // ---
    let query = [
        ("fields", SENSOR_FIELDS.to_string()),
        ("location_type", "0".to_string()),
        ("nwlat", SF_BOUNDS.nw_lat.to_string()),
        ("nwlng", SF_BOUNDS.nw_lng.to_string()),
        ("selat", SF_BOUNDS.se_lat.to_string()),
        ("selng", SF_BOUNDS.se_lng.to_string()),
    ];

    debug!("Fetching sensors from: {}", config.api_url);

    let response = client
        .get(&config.api_url)
        .header("X-API-Key", &config.api_key)
        .query(&query)
        .send()
        .await
        .with_context(|| format!("Failed to reach PurpleAir at '{}'", config.api_url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("PurpleAir API error: {}", status.as_u16());
    }

    let body: SensorsResponse = response
        .json()
        .await
        .context("Failed to parse PurpleAir response")?;

    let readings = parse_rows(&body)?;
    info!(
        "Fetched {} sensors, {} usable readings",
        body.data.len(),
        readings.len()
    );
    Ok(readings)
}

/// Convert columnar rows into readings.
///
/// Rows without an id or coordinates are skipped. Measurement columns that are
/// absent from the payload, or null in a row, become `None`.
fn parse_rows(body: &SensorsResponse) -> Result<Vec<Reading>> {
    // ---
    let column = |name: &str| body.fields.iter().position(|f| f == name);
    let required = |name: &str| {
        column(name).ok_or_else(|| anyhow!("PurpleAir response missing '{}' column", name))
    };

    let id_col = required("sensor_index")?;
    let lat_col = required("latitude")?;
    let lng_col = required("longitude")?;
    let temp_col = column("temperature");
    let humidity_col = column("humidity");
    let pm_col = column("pm2.5_atm").or_else(|| column("pm2.5"));

    let mut readings = Vec::with_capacity(body.data.len());
    for (i, row) in body.data.iter().enumerate() {
        let number = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(Value::as_f64);

        let (Some(sensor_index), Some(latitude), Some(longitude)) = (
            row.get(id_col).and_then(Value::as_i64),
            number(Some(lat_col)),
            number(Some(lng_col)),
        ) else {
            debug!("Skipping row {}: missing id or coordinates - Raw row: {:?}", i, row);
            continue;
        };

        readings.push(Reading {
            sensor_index,
            latitude,
            longitude,
            temperature: number(temp_col),
            humidity: number(humidity_col),
            pm2_5: number(pm_col),
        });
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    fn create_test_response(value: Value) -> SensorsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_columns_are_matched_by_name() {
        // ---
        let body = create_test_response(json!({
            "fields": ["sensor_index", "pm2.5_atm", "humidity", "longitude", "temperature", "latitude"],
            "data": [[131, 8.2, 55, -122.415, 70, 37.758]]
        }));

        let readings = parse_rows(&body).unwrap();
        assert_eq!(
            readings,
            vec![Reading {
                sensor_index: 131,
                latitude: 37.758,
                longitude: -122.415,
                temperature: Some(70.0),
                humidity: Some(55.0),
                pm2_5: Some(8.2),
            }]
        );
    }

    #[test]
    fn test_nulls_are_missing_not_zero() {
        // ---
        let body = create_test_response(json!({
            "fields": ["sensor_index", "latitude", "longitude", "temperature", "humidity", "pm2.5_atm"],
            "data": [[7, 37.7, -122.4, null, null, null]]
        }));

        let readings = parse_rows(&body).unwrap();
        assert_eq!(readings[0].temperature, None);
        assert_eq!(readings[0].humidity, None);
        assert_eq!(readings[0].pm2_5, None);
    }

    #[test]
    fn test_rows_without_position_are_dropped() {
        // ---
        let body = create_test_response(json!({
            "fields": ["sensor_index", "latitude", "longitude", "temperature"],
            "data": [
                [1, null, -122.4, 60],
                [2, 37.7, "bogus", 60],
                [null, 37.7, -122.4, 60],
                [4, 37.7, -122.4, 60],
                [5]
            ]
        }));

        let readings = parse_rows(&body).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].sensor_index, 4);
        assert_eq!(readings[0].pm2_5, None);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        // ---
        let body = create_test_response(json!({
            "fields": ["sensor_index", "latitude", "temperature"],
            "data": []
        }));

        let err = parse_rows(&body).unwrap_err();
        assert!(err.to_string().contains("longitude"), "{err}");
    }
}
