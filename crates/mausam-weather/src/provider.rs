//! OpenWeatherMap 2.5 client: current weather, air pollution and the 5-day
//! forecast.

use std::sync::Arc;

use mausam_core::WeatherConfig;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::types::{AggregateError, AqiReading, RawSample, WeatherError};

const NOT_FOUND_MESSAGE: &str = "City not found or weather API error";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Option<Vec<ForecastItem>>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: ForecastMain,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
    temp_max: f64,
}

/// Current conditions plus the AQI for the same place
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Upstream current-weather document, passed through untouched
    pub weather: Value,
    pub aqi: AqiReading,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: Option<String>,
    country_code: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.effective_api_key(),
            country_code: config.country_code.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, WeatherError> {
        self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)
    }

    fn city_query(&self, city: &str) -> String {
        if self.country_code.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, self.country_code)
        }
    }

    /// Turn a non-2xx response into an error carrying the upstream message.
    async fn check(response: Response) -> Result<Response, WeatherError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());

        tracing::warn!("Weather API returned {}: {}", status, message);
        Err(WeatherError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Current weather for `city` as the raw upstream JSON.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn current(&self, city: &str) -> Result<Value, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let q = self.city_query(city);
        let response = self
            .client
            .get(&url)
            .query(&[("q", q.as_str()), ("appid", self.api_key()?), ("units", "metric")])
            .send()
            .await?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }

    /// Latest pm2.5 reading near the given point.
    ///
    /// `Ok(None)` when the response carries no usable pm2.5 value.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<Option<f64>, WeatherError> {
        let url = format!("{}/air_pollution", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("lat", lat), ("lon", lon)])
            .query(&[("appid", self.api_key()?)])
            .send()
            .await?;

        let body: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(pm25_from(&body))
    }

    /// Current weather plus AQI. Air quality failures only cost the AQI.
    pub async fn report(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let weather = self.current(city).await?;

        let aqi = match coordinates(&weather) {
            Some((lat, lon)) => match self.air_quality(lat, lon).await {
                Ok(pm25) => AqiReading::from_pm25(pm25),
                Err(e) => {
                    tracing::warn!("Air quality lookup failed for {}: {}", city, e);
                    AqiReading::Unavailable
                }
            },
            None => AqiReading::Unavailable,
        };

        Ok(WeatherReport { weather, aqi })
    }

    /// 3-hourly forecast samples for `city`.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn forecast(&self, city: &str) -> Result<Vec<RawSample>, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let q = self.city_query(city);
        let response = self
            .client
            .get(&url)
            .query(&[("q", q.as_str()), ("appid", self.api_key()?), ("units", "metric")])
            .send()
            .await?;

        let body: ForecastResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let list = body.list.ok_or(AggregateError::EmptyInput)?;

        Ok(list
            .into_iter()
            .map(|item| RawSample::new(item.dt, item.main.temp, item.main.temp_max))
            .collect())
    }
}

fn coordinates(weather: &Value) -> Option<(f64, f64)> {
    let coord = weather.get("coord")?;
    Some((coord.get("lat")?.as_f64()?, coord.get("lon")?.as_f64()?))
}

fn pm25_from(body: &Value) -> Option<f64> {
    body.get("list")?
        .get(0)?
        .get("components")?
        .get("pm2_5")?
        .as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coordinates() {
        let weather = json!({ "coord": { "lat": 18.52, "lon": 73.86 }, "name": "Pune" });
        assert_eq!(coordinates(&weather), Some((18.52, 73.86)));
        assert_eq!(coordinates(&json!({ "name": "Pune" })), None);
        assert_eq!(coordinates(&json!({ "coord": { "lat": "x", "lon": 1.0 } })), None);
    }

    #[test]
    fn test_pm25_extraction() {
        let body = json!({ "list": [ { "components": { "pm2_5": 35.4, "pm10": 50.0 } } ] });
        assert_eq!(pm25_from(&body), Some(35.4));

        assert_eq!(pm25_from(&json!({ "list": [] })), None);
        assert_eq!(pm25_from(&json!({ "list": [ { "components": {} } ] })), None);
        assert_eq!(pm25_from(&json!({ "list": [ { "components": { "pm2_5": "high" } } ] })), None);
    }

    #[test]
    fn test_city_query_appends_country() {
        let config = WeatherConfig {
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let provider = WeatherProvider::new(&config).unwrap();
        assert_eq!(provider.city_query("Pune"), "Pune,IN");

        let config = WeatherConfig {
            country_code: String::new(),
            ..config
        };
        let provider = WeatherProvider::new(&config).unwrap();
        assert_eq!(provider.city_query("Pune"), "Pune");
    }
}
