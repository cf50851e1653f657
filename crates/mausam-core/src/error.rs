//! Centralized error types for Mausam.
//!
//! Each crate keeps its own precise error enum; the HTTP layer maps them into
//! [`AppError`] to pick a status code and a message that is safe to show to
//! users.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Text that can be shown to whoever made the request.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Upstream(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }

    /// Whether the request itself was at fault (maps to 400).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Weather(WeatherError::MissingCity)
                | AppError::Weather(WeatherError::LocationNotFound(_))
        )
    }
}

/// Failures talking to an HTTP upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Unreachable: {0}")]
    Unreachable(String),

    #[error("Timed out")]
    TimedOut,

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn user_message(&self) -> &'static str {
        match self {
            UpstreamError::Unreachable(_) => "The weather service could not be reached.",
            UpstreamError::TimedOut => "The weather service took too long to answer.",
            UpstreamError::Status { status, .. } if *status >= 500 => {
                "The weather service is having trouble right now."
            }
            UpstreamError::Status { .. } => "The weather service rejected the request.",
            UpstreamError::Malformed(_) => "The weather service sent data we could not read.",
        }
    }
}

/// Weather lookup failures. The display text is what the API returns.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City required")]
    MissingCity,

    #[error("{0}")]
    LocationNotFound(String),

    #[error("{0}")]
    ApiError(String),

    #[error("API_KEY missing")]
    InvalidApiKey,

    #[error("No forecast data found in API response.")]
    NoForecastData,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::MissingCity => "City required",
            WeatherError::LocationNotFound(_) => "City not found. Check the spelling.",
            WeatherError::ApiError(_) => "Weather lookup failed.",
            WeatherError::InvalidApiKey => "No weather API key is configured.",
            WeatherError::NoForecastData => "No forecast is available for this city.",
        }
    }
}

/// Classify a reqwest failure.
pub trait ReqwestErrorExt {
    fn into_upstream_error(self) -> UpstreamError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_upstream_error(self) -> UpstreamError {
        if self.is_timeout() {
            UpstreamError::TimedOut
        } else if self.is_decode() {
            UpstreamError::Malformed(self.to_string())
        } else if let Some(status) = self.status() {
            UpstreamError::Status {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            UpstreamError::Unreachable(self.to_string())
        }
    }
}
