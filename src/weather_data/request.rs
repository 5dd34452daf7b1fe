//! Parameters of a single historical-archive request.

use crate::archive::LatLon;
use crate::weather_data::error::WeatherDataError;
use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};

pub(crate) const HOURLY_VARIABLE: &str = "temperature_2m";
pub(crate) const TIMEZONE_MODE: &str = "auto";
pub(crate) const TIME_FORMAT: &str = "unixtime";
const ENDPOINT_DIGEST_BYTES: usize = 8;

/// One hourly-temperature request against the archive, for the closed date
/// interval `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRequest {
    location: LatLon,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ArchiveRequest {
    /// Validates the caller's arguments.
    ///
    /// # Errors
    ///
    /// [`WeatherDataError::InvalidCoordinates`] for non-finite or out-of-range
    /// coordinates and [`WeatherDataError::InvalidDateRange`] unless
    /// `start < end`.
    pub fn new(
        location: LatLon,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, WeatherDataError> {
        let LatLon(latitude, longitude) = location;
        let latitude_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let longitude_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !latitude_ok || !longitude_ok {
            return Err(WeatherDataError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        if start >= end {
            return Err(WeatherDataError::InvalidDateRange { start, end });
        }
        Ok(Self {
            location,
            start,
            end,
        })
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    /// Requested civil start (inclusive).
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Requested civil end (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.0.to_string()),
            ("longitude", self.location.1.to_string()),
            ("start_date", self.start_date().format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date().format("%Y-%m-%d").to_string()),
            ("hourly", HOURLY_VARIABLE.to_string()),
            ("timezone", TIMEZONE_MODE.to_string()),
            ("timeformat", TIME_FORMAT.to_string()),
        ]
    }

    /// Stable key for the response cache; identical parameters against the
    /// same archive endpoint give identical keys.
    pub(crate) fn cache_key(&self, archive_url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(archive_url.as_bytes());
        let endpoint = hex::encode(&hasher.finalize()[..ENDPOINT_DIGEST_BYTES]);
        format!(
            "{}_{}_{}_{}_{}_{}_{}",
            self.location.0,
            self.location.1,
            self.start_date().format("%Y%m%d"),
            self.end_date().format("%Y%m%d"),
            HOURLY_VARIABLE,
            TIMEZONE_MODE,
            endpoint
        )
    }
}
