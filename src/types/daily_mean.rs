use crate::types::weather_series::TEMPERATURE_COLUMN;
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDate;
use chrono_tz::Tz;
use polars::prelude::*;

pub const DATE_COLUMN: &str = "date";

// Polars dates count days from 1970-01-01, chrono from 0001-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub temperature: f64,
}

/// Mean temperature per local calendar date, ascending.
#[derive(Debug, Clone)]
pub struct DailyMeanSeries {
    frame: DataFrame,
    rows: Vec<DailyMean>,
    timezone: Tz,
}

impl DailyMeanSeries {
    /// Expects a frame with a `date` column and a `temperature_2m` column,
    /// already sorted by date.
    pub(crate) fn from_frame(frame: DataFrame, timezone: Tz) -> Result<Self, WeatherDataError> {
        let dates = frame.column(DATE_COLUMN)?.date()?;
        let temperatures = frame.column(TEMPERATURE_COLUMN)?.f64()?;

        let rows = dates
            .into_iter()
            .zip(temperatures)
            .map(|(date, temperature)| {
                let days = date.ok_or_else(|| {
                    WeatherDataError::ProtocolViolation("observation without a date".to_string())
                })?;
                let date = NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
                    .ok_or_else(|| {
                        WeatherDataError::ProtocolViolation(format!("date out of range: {days}"))
                    })?;
                Ok(DailyMean {
                    date,
                    temperature: temperature.unwrap_or(f64::NAN),
                })
            })
            .collect::<Result<Vec<_>, WeatherDataError>>()?;

        Ok(Self {
            frame,
            rows,
            timezone,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DailyMean] {
        &self.rows
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|i| self.rows[i].temperature)
    }

    /// Timezone the dates were taken in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `date` and `temperature_2m` columns.
    pub fn to_frame(&self) -> DataFrame {
        self.frame.clone()
    }
}

impl PartialEq for DailyMeanSeries {
    fn eq(&self, other: &Self) -> bool {
        self.timezone == other.timezone && self.rows == other.rows
    }
}
