//! Entry point for fetching historical hourly temperature from the Open-Meteo
//! archive.

use crate::error::HeatPumpDataError;
use crate::types::weather_series::WeatherSeries;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::loader::ArchiveLoader;
use crate::weather_data::request::ArchiveRequest;
use crate::weather_data::response::parse_single_location;
use crate::weather_data::series_builder::build_series;
use bon::{bon, Builder};
use chrono::NaiveDateTime;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://archive-api.open-meteo.com/v1";

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use heatpump_data::LatLon;
///
/// let calgary = LatLon(51.0447, -114.0719);
/// assert_eq!(calgary.0, 51.0447); // Latitude
/// assert_eq!(calgary.1, -114.0719); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Settings for a [`WeatherArchive`].
///
/// # Examples
///
/// ```
/// use heatpump_data::ArchiveConfig;
/// use std::time::Duration;
///
/// let config = ArchiveConfig::builder()
///     .base_url("http://localhost:8080/v1".to_string())
///     .timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(config.cache_folder, None);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ArchiveConfig {
    /// Archive API root; `/archive` is appended.
    #[builder(default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Where raw responses are cached. Defaults to the user cache directory.
    pub cache_folder: Option<PathBuf>,
    /// Whole-request timeout. None waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Client for the historical weather archive.
///
/// Every raw response is cached on disk forever, keyed by the request
/// parameters: archive data for elapsed periods does not change, so a repeated
/// call with identical arguments never touches the network.
///
/// # Examples
///
/// ```no_run
/// # use heatpump_data::{WeatherArchive, HeatPumpDataError};
/// # use chrono::NaiveDate;
/// # async fn run() -> Result<(), HeatPumpDataError> {
/// let archive = WeatherArchive::new().await?;
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
///
/// let series = archive
///     .get_weather_data()
///     .latitude(51.0447)
///     .longitude(-114.0719)
///     .start(start)
///     .end(end)
///     .call()
///     .await?;
/// let daily = series.daily_mean()?;
/// println!("{} days, first {:?}", daily.len(), daily.rows().first());
/// # Ok(())
/// # }
/// ```
pub struct WeatherArchive {
    loader: ArchiveLoader,
}

#[bon]
impl WeatherArchive {
    /// Creates a client with the default configuration, caching under the
    /// user cache directory (e.g. `~/.cache/heatpump_data_cache` on Linux).
    ///
    /// # Errors
    ///
    /// [`HeatPumpDataError::CacheDirResolution`] if no cache directory can be
    /// found and [`HeatPumpDataError::CacheDirCreation`] if it cannot be created.
    pub async fn new() -> Result<Self, HeatPumpDataError> {
        Self::with_config(ArchiveConfig::default()).await
    }

    /// Creates a client that caches responses in `cache_folder`, which is
    /// created if it does not exist.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, HeatPumpDataError> {
        Self::with_config(ArchiveConfig::builder().cache_folder(cache_folder).build()).await
    }

    pub async fn with_config(config: ArchiveConfig) -> Result<Self, HeatPumpDataError> {
        let cache_folder = match config.cache_folder {
            Some(folder) => folder,
            None => get_cache_dir().map_err(HeatPumpDataError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| HeatPumpDataError::CacheDirCreation(cache_folder.clone(), e))?;
        let loader = ArchiveLoader::new(&cache_folder, &config.base_url, config.timeout)?;
        Ok(Self { loader })
    }

    /// Fetches hourly 2 m temperature for a point and a civil time window.
    ///
    /// The archive picks the location's timezone; `start` (inclusive) and
    /// `end` (exclusive) are read as wall-clock times in that timezone.
    ///
    /// # Errors
    ///
    /// Invalid coordinates or a window with `start >= end` fail before any
    /// request. Network failures, HTTP errors and malformed or ambiguous
    /// responses are returned as [`HeatPumpDataError::WeatherData`].
    #[builder]
    pub async fn get_weather_data(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<WeatherSeries, HeatPumpDataError> {
        self.get_weather_data_at(LatLon(latitude, longitude), start, end)
            .await
    }

    /// Same as [`WeatherArchive::get_weather_data`] with a [`LatLon`].
    pub async fn get_weather_data_at(
        &self,
        location: LatLon,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<WeatherSeries, HeatPumpDataError> {
        let request = ArchiveRequest::new(location, start, end)?;
        info!(
            "Fetching hourly temperature for {}, {} from {} to {}",
            location.0,
            location.1,
            request.start_date(),
            request.end_date()
        );
        let body = self.loader.get_body(&request).await?;
        let payload = parse_single_location(&body)?;
        Ok(build_series(&request, payload)?)
    }

    /// Removes every cached archive response. Returns the number of entries
    /// deleted.
    pub async fn clear_cache(&self) -> Result<usize, HeatPumpDataError> {
        Ok(self.loader.clear_cache().await?)
    }
}
