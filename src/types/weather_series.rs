use crate::archive::LatLon;
use crate::types::daily_mean::DailyMeanSeries;
use crate::weather_data::error::WeatherDataError;
use chrono::DateTime;
use chrono_tz::Tz;
use polars::prelude::*;

pub const DATETIME_COLUMN: &str = "datetime";
pub const TEMPERATURE_COLUMN: &str = "temperature_2m";

/// One hourly reading. `temperature` is `None` when the archive has no value
/// for that hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Tz>,
    pub temperature: Option<f64>,
}

/// Hourly 2 m air temperature for one location, in the location's own timezone.
///
/// Observations are evenly spaced one hour apart with strictly increasing
/// timestamps and cover the requested `[start, end)` window.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    location: LatLon,
    elevation: Option<f64>,
    timezone: Tz,
    utc_offset_seconds: i32,
    observations: Vec<Observation>,
}

impl WeatherSeries {
    pub(crate) fn new(
        location: LatLon,
        elevation: Option<f64>,
        timezone: Tz,
        utc_offset_seconds: i32,
        observations: Vec<Observation>,
    ) -> Self {
        Self {
            location,
            elevation,
            timezone,
            utc_offset_seconds,
            observations,
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// UTC offset the archive reported for the location, in seconds.
    pub fn utc_offset_seconds(&self) -> i32 {
        self.utc_offset_seconds
    }

    pub fn timestamps(&self) -> Vec<DateTime<Tz>> {
        self.observations.iter().map(|o| o.time).collect()
    }

    pub fn temperatures(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.temperature).collect()
    }

    /// Grid point the archive actually answered for. Usually a little off the
    /// requested coordinates.
    pub fn resolved_location(&self) -> LatLon {
        self.location
    }

    /// Elevation of the resolved grid point in metres, if reported.
    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Converts the series into a `DataFrame` with a `datetime` column holding
    /// local wall-clock time (millisecond precision, no timezone attached) and
    /// a nullable `temperature_2m` column.
    pub fn to_frame(&self) -> Result<DataFrame, WeatherDataError> {
        let millis: Vec<i64> = self
            .observations
            .iter()
            .map(|o| o.time.naive_local().and_utc().timestamp_millis())
            .collect();
        let datetime = Series::new(DATETIME_COLUMN.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let temperature = Series::new(TEMPERATURE_COLUMN.into(), self.temperatures());

        Ok(DataFrame::new(vec![
            Column::from(datetime),
            Column::from(temperature),
        ])?)
    }

    /// Averages the observations per calendar date.
    ///
    /// Dates are taken in the series' own timezone, so a day runs from local
    /// midnight to local midnight. Missing readings are skipped; a date whose
    /// readings are all missing gets `NaN`. Rows come out in ascending date
    /// order.
    pub fn daily_mean(&self) -> Result<DailyMeanSeries, WeatherDataError> {
        let frame = self
            .to_frame()?
            .lazy()
            .group_by([col(DATETIME_COLUMN).dt().date().alias("date")])
            .agg([col(TEMPERATURE_COLUMN).mean()])
            .sort_by_exprs([col("date")], SortMultipleOptions::default())
            .collect()?;
        DailyMeanSeries::from_frame(frame, self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Europe::Amsterdam;

    fn hourly(tz: Tz, from: NaiveDate, values: &[Option<f64>]) -> WeatherSeries {
        let start = tz
            .from_local_datetime(&from.and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        let observations = values
            .iter()
            .enumerate()
            .map(|(h, &temperature)| Observation {
                time: start + chrono::Duration::hours(h as i64),
                temperature,
            })
            .collect();
        WeatherSeries::new(LatLon(52.37, 4.89), Some(2.0), tz, 3600, observations)
    }

    #[test]
    fn test_to_frame() -> Result<(), WeatherDataError> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let series = hourly(Amsterdam, day, &[Some(1.5), None, Some(2.5)]);
        let frame = series.to_frame()?;

        assert_eq!(frame.shape(), (3, 2));
        assert_eq!(
            frame.column(DATETIME_COLUMN)?.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        let temperatures: Vec<Option<f64>> =
            frame.column(TEMPERATURE_COLUMN)?.f64()?.into_iter().collect();
        assert_eq!(temperatures, [Some(1.5), None, Some(2.5)]);
        Ok(())
    }

    #[test]
    fn test_daily_mean_of_full_days() -> Result<(), WeatherDataError> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let values: Vec<Option<f64>> = (0..72).map(|h| Some(h as f64)).collect();
        let daily = hourly(Amsterdam, day, &values).daily_mean()?;

        assert_eq!(daily.len(), 3);
        for (i, row) in daily.rows().iter().enumerate() {
            let expected = (0..24).map(|h| (i * 24 + h) as f64).sum::<f64>() / 24.0;
            assert_eq!(row.date, day + chrono::Duration::days(i as i64));
            assert!((row.temperature - expected).abs() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_daily_mean_uses_local_dates() -> Result<(), WeatherDataError> {
        // 00:00..02:00 local is still the previous day in UTC
        let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let daily = hourly(Amsterdam, day, &[Some(10.0), Some(20.0)]).daily_mean()?;
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.rows()[0].date, day);
        assert_eq!(daily.rows()[0].temperature, 15.0);
        Ok(())
    }

    #[test]
    fn test_daily_mean_skips_missing() -> Result<(), WeatherDataError> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut values = vec![None; 48];
        values[0] = Some(4.0);
        values[1] = Some(6.0);
        let daily = hourly(Amsterdam, day, &values).daily_mean()?;

        assert_eq!(daily.rows()[0].temperature, 5.0);
        assert!(daily.rows()[1].temperature.is_nan());
        Ok(())
    }

    #[test]
    fn test_empty_series() -> Result<(), WeatherDataError> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let series = hourly(Amsterdam, day, &[]);
        assert!(series.is_empty());
        assert!(series.daily_mean()?.is_empty());
        Ok(())
    }
}
