#![doc = include_str!("../README.md")]

mod archive;
mod cop;
mod error;
mod types;
mod units;
mod utils;
mod weather_data;

pub use archive::*;
pub use error::HeatPumpDataError;

pub use units::dimension::Dimension;
pub use units::error::UnitError;
pub use units::registry::{convert_temperature, UnitRegistry};
pub use units::unit::Unit;

pub use cop::calculate::{calculate_cop, COP_COLUMN};
pub use cop::error::CopError;
pub use cop::table::{ColumnKey, MeasurementTable};

pub use types::daily_mean::{DailyMean, DailyMeanSeries, DATE_COLUMN};
pub use types::weather_series::{Observation, WeatherSeries, DATETIME_COLUMN, TEMPERATURE_COLUMN};

pub use weather_data::cache::CachedResponse;
pub use weather_data::error::WeatherDataError;
pub use weather_data::request::ArchiveRequest;
