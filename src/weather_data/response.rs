//! Serde models of the archive JSON payload.

use crate::weather_data::error::WeatherDataError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timezone: String,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub hourly: Option<HourlyPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HourlyPayload {
    pub time: Vec<i64>,
    #[serde(rename = "temperature_2m")]
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    reason: String,
}

/// Extracts the `reason` of an archive error body such as
/// `{"error": true, "reason": "..."}`.
pub(crate) fn error_reason(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorPayload>(body)
        .ok()
        .map(|e| e.reason)
}

/// Parses a body that must describe exactly one location.
///
/// The archive answers with a bare object for a single location and with an
/// array for several; an array is accepted only when it holds one element.
pub(crate) fn parse_single_location(body: &[u8]) -> Result<LocationPayload, WeatherDataError> {
    let value: Value = serde_json::from_slice(body)?;
    let location = match value {
        Value::Array(mut results) => {
            if results.len() != 1 {
                return Err(WeatherDataError::ProtocolViolation(format!(
                    "expected exactly one location result, got {}",
                    results.len()
                )));
            }
            results.remove(0)
        }
        object @ Value::Object(_) => object,
        other => {
            return Err(WeatherDataError::ProtocolViolation(format!(
                "expected a location object, got {other}"
            )))
        }
    };
    Ok(serde_json::from_value(location)?)
}
