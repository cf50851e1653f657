use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mausam_core::{AppError, WeatherError};
use mausam_weather::AggregateError;
use serde_json::json;

/// An [`AppError`] rendered as `{ "error": <message> }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn missing_city() -> Self {
        Self(WeatherError::MissingCity.into())
    }

    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Weather errors carry their own text; anything else gets the
    /// user-facing message.
    pub fn message(&self) -> String {
        match &self.0 {
            AppError::Weather(e) => e.to_string(),
            other => other.user_message().to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<mausam_weather::WeatherError> for ApiError {
    fn from(err: mausam_weather::WeatherError) -> Self {
        Self(err.into())
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        mausam_weather::WeatherError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
