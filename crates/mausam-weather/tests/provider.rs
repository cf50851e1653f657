//! WeatherProvider against a mocked OpenWeatherMap.

use mausam_core::WeatherConfig;
use mausam_weather::{
    AggregateError, AqiCategory, AqiReading, ForecastAggregator, ForecastMode, WeatherError,
    WeatherProvider,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> WeatherProvider {
    let config = WeatherConfig {
        api_base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        ..Default::default()
    };
    WeatherProvider::new(&config).unwrap()
}

fn pune_weather() -> serde_json::Value {
    json!({
        "coord": { "lat": 18.52, "lon": 73.86 },
        "main": { "temp": 29.4, "humidity": 62 },
        "name": "Pune"
    })
}

#[tokio::test]
async fn test_current_passes_raw_document_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Pune,IN"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pune_weather()))
        .expect(1)
        .mount(&server)
        .await;

    let weather = provider(&server).current("Pune").await.unwrap();
    assert_eq!(weather, pune_weather());
}

#[tokio::test]
async fn test_current_not_found_carries_upstream_message() {
    let server = MockServer::start().await;
    let not_found = json!({ "cod": "404", "message": "city not found" });
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(not_found))
        .mount(&server)
        .await;

    let err = provider(&server).current("Atlantis").await.unwrap_err();
    match err {
        WeatherError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_error_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = provider(&server).current("Pune").await.unwrap_err();
    assert_eq!(err.to_string(), "City not found or weather API error");
}

#[tokio::test]
async fn test_report_includes_aqi() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pune_weather()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .and(query_param("lat", "18.52"))
        .and(query_param("lon", "73.86"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [ { "main": { "aqi": 2 }, "components": { "pm2_5": 12.0 } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = provider(&server).report("Pune").await.unwrap();
    assert_eq!(report.weather["name"], "Pune");
    assert_eq!(report.aqi.display(), "50 (Good)");
    assert_eq!(report.aqi.result().map(|r| r.category), Some(AqiCategory::Good));
}

#[tokio::test]
async fn test_missing_pm25_is_unavailable_not_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pune_weather()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [ { "components": { "pm10": 40.0 } } ]
        })))
        .mount(&server)
        .await;

    let report = provider(&server).report("Pune").await.unwrap();
    assert_eq!(report.aqi, AqiReading::Unavailable);
    assert_eq!(report.aqi.display(), "-");
}

#[tokio::test]
async fn test_air_quality_failure_keeps_weather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pune_weather()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = provider(&server).report("Pune").await.unwrap();
    assert_eq!(report.weather, pune_weather());
    assert_eq!(report.aqi, AqiReading::Unavailable);
}

#[tokio::test]
async fn test_report_without_coordinates_skips_air_quality() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Pune" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let report = provider(&server).report("Pune").await.unwrap();
    assert_eq!(report.aqi, AqiReading::Unavailable);
}

#[tokio::test]
async fn test_forecast_samples_feed_the_aggregator() {
    let server = MockServer::start().await;
    // 2024-10-06 00:00 IST, then every three hours
    let start = 1_728_153_000_i64;
    let list: Vec<_> = (0..40)
        .map(|i| {
            json!({
                "dt": start + i * 3 * 3600,
                "main": { "temp": 20.0 + i as f64, "temp_max": 21.0 + i as f64 }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Pune,IN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cnt": 40, "list": list })))
        .mount(&server)
        .await;

    let samples = provider(&server).forecast("Pune").await.unwrap();
    assert_eq!(samples.len(), 40);
    assert_eq!(samples[0].timestamp, start);
    assert_eq!(samples[0].temperature, 20.0);

    let series = ForecastAggregator::from_offset_minutes(330)
        .aggregate(&samples, ForecastMode::Daily)
        .unwrap();
    assert_eq!(series.labels(), ["6/10", "7/10", "8/10", "9/10", "10/10"]);
    assert_eq!(series.values(), [28.0, 36.0, 44.0, 52.0, 60.0]);
}

#[tokio::test]
async fn test_forecast_without_list_is_empty_input() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": "200" })))
        .mount(&server)
        .await;

    let err = provider(&server).forecast("Pune").await.unwrap_err();
    assert!(matches!(err, WeatherError::Aggregate(AggregateError::EmptyInput)));
    assert_eq!(err.to_string(), "No forecast data found in API response.");
}
