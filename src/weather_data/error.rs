use chrono::NaiveDateTime;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    // Caller contract violations, raised before any request is made
    #[error("Invalid coordinates ({latitude}, {longitude}): latitude must be within -90..=90 and longitude within -180..=180")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {reason}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to parse archive response")]
    JsonParse(#[from] serde_json::Error),

    // Upstream protocol violations
    #[error("Archive protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Archive returned {timestamps} timestamps but {values} values")]
    SampleCountMismatch { timestamps: usize, values: usize },

    #[error("Archive time axis is not evenly spaced at {expected} s (found a step of {found} s at sample {position})")]
    IrregularTimeAxis {
        expected: i64,
        found: i64,
        position: usize,
    },

    #[error("Archive reported unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Archive returned an out-of-range timestamp {0}")]
    InvalidTimestamp(i64),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to delete cache '{0}'")]
    CacheDeletion(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
