//! Turns a parsed archive payload into a [`WeatherSeries`].

use crate::archive::LatLon;
use crate::types::weather_series::{Observation, WeatherSeries};
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::request::ArchiveRequest;
use crate::weather_data::response::{HourlyPayload, LocationPayload};
use chrono::DateTime;
use chrono_tz::Tz;
use haversine::{distance, Location as HaversineLocation, Units};
use log::{debug, info};

/// Sample spacing of the archive's hourly variables, in seconds.
pub(crate) const EXPECTED_INTERVAL: i64 = 3600;

/// Time axis metadata of an hourly block: `[start, end)` stepped by `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HourlyAxis {
    pub start: i64,
    pub end: i64,
    pub interval: i64,
}

impl HourlyAxis {
    /// Derives the axis from the unix timestamps of the block and checks that
    /// they are evenly spaced at [`EXPECTED_INTERVAL`].
    pub fn from_times(times: &[i64]) -> Result<Self, WeatherDataError> {
        let Some(&start) = times.first() else {
            return Ok(Self {
                start: 0,
                end: 0,
                interval: EXPECTED_INTERVAL,
            });
        };
        for (position, pair) in times.windows(2).enumerate() {
            let step = pair[1] - pair[0];
            if step != EXPECTED_INTERVAL {
                return Err(WeatherDataError::IrregularTimeAxis {
                    expected: EXPECTED_INTERVAL,
                    found: step,
                    position: position + 1,
                });
            }
        }
        Ok(Self {
            start,
            end: start + times.len() as i64 * EXPECTED_INTERVAL,
            interval: EXPECTED_INTERVAL,
        })
    }

    /// Timestamps from `start`, stepping by `interval`, stopping before `end`.
    pub fn timestamps(&self) -> impl Iterator<Item = i64> + '_ {
        (self.start..self.end).step_by(self.interval as usize)
    }
}

pub(crate) fn build_series(
    request: &ArchiveRequest,
    payload: LocationPayload,
) -> Result<WeatherSeries, WeatherDataError> {
    let LatLon(requested_lat, requested_lon) = request.location();
    let offset_km = distance(
        HaversineLocation {
            latitude: requested_lat,
            longitude: requested_lon,
        },
        HaversineLocation {
            latitude: payload.latitude,
            longitude: payload.longitude,
        },
        Units::Kilometers,
    );
    info!(
        "Coordinates {}°N {}°E, {:.3} km from the requested point",
        payload.latitude, payload.longitude, offset_km
    );
    match payload.elevation {
        Some(elevation) => info!("Elevation {} m asl", elevation),
        None => info!("Elevation not reported"),
    }
    info!(
        "Timezone {} (UTC offset {} s)",
        payload.timezone, payload.utc_offset_seconds
    );

    let timezone: Tz = payload
        .timezone
        .parse()
        .map_err(|_| WeatherDataError::UnknownTimezone(payload.timezone.clone()))?;

    let HourlyPayload { time, values } = payload.hourly.ok_or_else(|| {
        WeatherDataError::ProtocolViolation("response has no hourly block".to_string())
    })?;

    let axis = HourlyAxis::from_times(&time)?;
    let timestamps = axis
        .timestamps()
        .map(|secs| {
            DateTime::from_timestamp(secs, 0)
                .map(|utc| utc.with_timezone(&timezone))
                .ok_or(WeatherDataError::InvalidTimestamp(secs))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if timestamps.len() != values.len() {
        return Err(WeatherDataError::SampleCountMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }

    let received = timestamps.len();
    let observations: Vec<Observation> = timestamps
        .into_iter()
        .zip(values)
        .map(|(time, temperature)| Observation { time, temperature })
        .filter(|o| {
            let local = o.time.naive_local();
            local >= request.start() && local < request.end()
        })
        .collect();
    debug!(
        "Kept {} of {} hourly samples within [{}, {})",
        observations.len(),
        received,
        request.start(),
        request.end()
    );

    Ok(WeatherSeries::new(
        LatLon(payload.latitude, payload.longitude),
        payload.elevation,
        timezone,
        payload.utc_offset_seconds,
        observations,
    ))
}
