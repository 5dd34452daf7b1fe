//! Archive client tests against a mock Open-Meteo server.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use heatpump_data::{
    ArchiveConfig, HeatPumpDataError, LatLon, WeatherArchive, WeatherDataError,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2024-01-01T00:00 in America/Edmonton (UTC-7)
const EDMONTON_MIDNIGHT: i64 = 1_704_092_400;
const HOUR: i64 = 3600;

fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Archive payload with `values.len()` hourly samples from Edmonton midnight.
fn archive_response(values: &[Option<f64>]) -> Value {
    let time: Vec<i64> = (0..values.len() as i64)
        .map(|h| EDMONTON_MIDNIGHT + h * HOUR)
        .collect();
    json!({
        "latitude": 51.1,
        "longitude": -114.1,
        "generationtime_ms": 0.5,
        "utc_offset_seconds": -25200,
        "timezone": "America/Edmonton",
        "timezone_abbreviation": "MST",
        "elevation": 1049.0,
        "hourly_units": {"time": "unixtime", "temperature_2m": "°C"},
        "hourly": {"time": time, "temperature_2m": values}
    })
}

fn hourly_values(hours: usize) -> Vec<Option<f64>> {
    (0..hours).map(|h| Some(-20.0 + h as f64 * 0.5)).collect()
}

async fn archive_for(mock_server: &MockServer) -> (WeatherArchive, TempDir) {
    let cache = TempDir::new().unwrap();
    let config = ArchiveConfig::builder()
        .base_url(mock_server.uri())
        .cache_folder(cache.path().to_path_buf())
        .timeout(std::time::Duration::from_secs(5))
        .build();
    let archive = WeatherArchive::with_config(config).await.unwrap();
    (archive, cache)
}

#[tokio::test]
async fn test_one_day_window_has_24_hourly_samples() -> Result<(), HeatPumpDataError> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("latitude", "51.115"))
        .and(query_param("longitude", "-114.0675"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-02"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("timezone", "auto"))
        .and(query_param("timeformat", "unixtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_response(&hourly_values(48))))
        .expect(1)
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let series = archive
        .get_weather_data()
        .latitude(51.115)
        .longitude(-114.0675)
        .start(datetime(2024, 1, 1))
        .end(datetime(2024, 1, 2))
        .call()
        .await?;

    assert_eq!(series.len(), 24);
    assert_eq!(series.resolved_location(), LatLon(51.1, -114.1));
    assert_eq!(series.elevation(), Some(1049.0));
    assert_eq!(series.timezone(), chrono_tz::America::Edmonton);

    let timestamps = series.timestamps();
    assert_eq!(timestamps[0].naive_local(), datetime(2024, 1, 1));
    assert_eq!(timestamps[23].naive_local().hour(), 23);
    for pair in timestamps.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::hours(1));
    }
    Ok(())
}

#[tokio::test]
async fn test_identical_calls_are_served_from_cache() -> Result<(), HeatPumpDataError> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_response(&hourly_values(48))))
        .expect(1)
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let location = LatLon(51.115, -114.0675);
    let first = archive
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;
    let second = archive
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_cache_survives_a_new_client() -> Result<(), HeatPumpDataError> {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_response(&hourly_values(48))))
        .expect(2)
        .mount(&mock_server)
        .await;
    let (archive, cache) = archive_for(&mock_server).await;
    let location = LatLon(51.115, -114.0675);

    let first = archive
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;

    let reopened = WeatherArchive::with_config(
        ArchiveConfig::builder()
            .base_url(mock_server.uri())
            .cache_folder(cache.path().to_path_buf())
            .build(),
    )
    .await?;
    let second = reopened
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;
    assert_eq!(first, second);

    // after clearing, the next call goes back to the server
    assert_eq!(reopened.clear_cache().await?, 1);
    reopened
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_cache_is_separate_per_archive_endpoint() -> Result<(), HeatPumpDataError> {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    for (server, reading) in [(&primary, 1.0), (&mirror, 99.0)] {
        Mock::given(method("GET"))
            .and(path("/archive"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(archive_response(&[Some(reading); 48])),
            )
            .expect(1)
            .mount(server)
            .await;
    }
    let cache = TempDir::new().unwrap();
    let client_for = |server: &MockServer| {
        WeatherArchive::with_config(
            ArchiveConfig::builder()
                .base_url(server.uri())
                .cache_folder(cache.path().to_path_buf())
                .build(),
        )
    };
    let location = LatLon(51.115, -114.0675);

    let from_primary = client_for(&primary)
        .await?
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;
    let from_mirror = client_for(&mirror)
        .await?
        .get_weather_data_at(location, datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;

    assert_eq!(from_primary.temperatures()[0], Some(1.0));
    assert_eq!(from_mirror.temperatures()[0], Some(99.0));
    Ok(())
}

#[tokio::test]
async fn test_daily_mean_over_three_days() -> Result<(), HeatPumpDataError> {
    let mock_server = MockServer::start().await;
    // [Jan 1, Jan 4) asks for dates Jan 1..=Jan 4, 96 hours
    let values = hourly_values(96);
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_response(&values)))
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let daily = archive
        .get_weather_data()
        .latitude(51.115)
        .longitude(-114.0675)
        .start(datetime(2024, 1, 1))
        .end(datetime(2024, 1, 4))
        .call()
        .await?
        .daily_mean()?;

    assert_eq!(daily.len(), 3);
    for (day, row) in daily.rows().iter().enumerate() {
        let expected = values[day * 24..(day + 1) * 24]
            .iter()
            .flatten()
            .sum::<f64>()
            / 24.0;
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 1 + day as u32).unwrap());
        assert!((row.temperature - expected).abs() < 1e-9);
    }
    Ok(())
}

#[tokio::test]
async fn test_null_readings_are_missing_observations() -> Result<(), HeatPumpDataError> {
    let mock_server = MockServer::start().await;
    let mut values = hourly_values(48);
    values[3] = None;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_response(&values)))
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let series = archive
        .get_weather_data_at(LatLon(51.1, -114.1), datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await?;
    assert_eq!(series.len(), 24);
    assert_eq!(series.temperatures()[3], None);
    Ok(())
}

#[tokio::test]
async fn test_multiple_locations_are_a_protocol_violation() {
    let mock_server = MockServer::start().await;
    let single = archive_response(&hourly_values(48));
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([single.clone(), single])))
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let result = archive
        .get_weather_data_at(LatLon(51.1, -114.1), datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await;
    assert!(matches!(
        result,
        Err(HeatPumpDataError::WeatherData(
            WeatherDataError::ProtocolViolation(_)
        ))
    ));
}

#[tokio::test]
async fn test_empty_result_list_is_a_protocol_violation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let result = archive
        .get_weather_data_at(LatLon(51.1, -114.1), datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await;
    assert!(matches!(
        result,
        Err(HeatPumpDataError::WeatherData(
            WeatherDataError::ProtocolViolation(_)
        ))
    ));
}

#[tokio::test]
async fn test_sample_count_mismatch() {
    let mock_server = MockServer::start().await;
    let mut body = archive_response(&hourly_values(48));
    body["hourly"]["temperature_2m"] = json!(hourly_values(47));
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let result = archive
        .get_weather_data_at(LatLon(51.1, -114.1), datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await;
    assert!(matches!(
        result,
        Err(HeatPumpDataError::WeatherData(
            WeatherDataError::SampleCountMismatch {
                timestamps: 48,
                values: 47
            }
        ))
    ));
}

#[tokio::test]
async fn test_http_error_carries_reason_and_is_not_cached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;
    let (archive, cache) = archive_for(&mock_server).await;

    for _ in 0..2 {
        let result = archive
            .get_weather_data_at(LatLon(51.1, -114.1), datetime(1900, 1, 1), datetime(1900, 1, 2))
            .await;
        match result {
            Err(HeatPumpDataError::WeatherData(WeatherDataError::HttpStatus {
                status,
                reason,
                ..
            })) => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(reason, "Parameter 'start_date' is out of allowed range");
            }
            other => panic!("expected an HTTP status error, got {other:?}"),
        }
    }
    assert_eq!(std::fs::read_dir(cache.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_invalid_input_makes_no_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let (archive, _cache) = archive_for(&mock_server).await;

    let bad_latitude = archive
        .get_weather_data_at(LatLon(95.0, 0.0), datetime(2024, 1, 1), datetime(2024, 1, 2))
        .await;
    assert!(matches!(
        bad_latitude,
        Err(HeatPumpDataError::WeatherData(
            WeatherDataError::InvalidCoordinates { .. }
        ))
    ));

    let reversed = archive
        .get_weather_data_at(LatLon(51.1, -114.1), datetime(2024, 1, 2), datetime(2024, 1, 1))
        .await;
    assert!(matches!(
        reversed,
        Err(HeatPumpDataError::WeatherData(
            WeatherDataError::InvalidDateRange { .. }
        ))
    ));
}

#[tokio::test]
#[ignore = "needs network access to archive-api.open-meteo.com"]
async fn test_live_archive_year() -> Result<(), HeatPumpDataError> {
    let cache = TempDir::new().unwrap();
    let archive = WeatherArchive::with_cache_folder(cache.path().to_path_buf()).await?;

    let series = archive
        .get_weather_data()
        .latitude(51.0447)
        .longitude(-114.0719)
        .start(datetime(2023, 1, 1))
        .end(datetime(2024, 1, 1))
        .call()
        .await?;
    assert_eq!(series.len(), 365 * 24);
    assert_eq!(series.daily_mean()?.len(), 365);
    Ok(())
}
