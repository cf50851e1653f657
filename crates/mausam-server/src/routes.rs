//! Request handlers.

use axum::extract::{Query, State};
use axum::Json;
use mausam_weather::ForecastMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatesQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CitiesQuery {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuery {
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub weather: Value,
    pub aqi: String,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub dates: Vec<String>,
    pub temps: Vec<f64>,
}

fn required_city(city: Option<String>) -> Result<String, ApiError> {
    city.map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(ApiError::missing_city)
}

/// GET /api/states?query=
pub async fn states(
    State(state): State<AppState>,
    Query(params): Query<StatesQuery>,
) -> Json<Vec<String>> {
    Json(state.locations.list_regions(&params.query, state.result_limit))
}

/// GET /api/cities?state=&query=
pub async fn cities(
    State(state): State<AppState>,
    Query(params): Query<CitiesQuery>,
) -> Json<Vec<String>> {
    Json(
        state
            .locations
            .list_places(&params.state, &params.query, state.result_limit),
    )
}

/// GET /api/weather?city=
pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let city = required_city(params.city)?;
    let report = state.weather.report(&city).await?;

    Ok(Json(WeatherResponse {
        weather: report.weather,
        aqi: report.aqi.display(),
    }))
}

/// GET /api/forecastTemps?city=&range=hourly|daily
pub async fn forecast_temps(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let city = required_city(params.city)?;
    let mode: ForecastMode = params
        .range
        .as_deref()
        .and_then(|r| r.parse().ok())
        .unwrap_or_default();

    let samples = state.weather.forecast(&city).await?;
    let (dates, temps) = state.aggregator.aggregate(&samples, mode)?.into_parts();

    tracing::debug!("{:?} forecast for {}: {} points", mode, city, dates.len());
    Ok(Json(ForecastResponse { dates, temps }))
}
