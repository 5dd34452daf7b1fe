pub mod daily_mean;
pub mod weather_series;
