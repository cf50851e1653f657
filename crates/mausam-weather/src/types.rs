use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One forecast sample as reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Unix time in seconds
    pub timestamp: i64,
    pub temperature: f64,
    pub temp_max: f64,
    /// Fine particulate reading, when the source reports one
    #[serde(default)]
    pub pm25: Option<f64>,
}

impl RawSample {
    pub fn new(timestamp: i64, temperature: f64, temp_max: f64) -> Self {
        Self {
            timestamp,
            temperature,
            temp_max,
            pm25: None,
        }
    }

    pub fn with_pm25(mut self, pm25: f64) -> Self {
        self.pm25 = Some(pm25);
        self
    }

    pub fn aqi(&self) -> AqiReading {
        AqiReading::from_pm25(self.pm25)
    }
}

/// Labels paired with values, ready to chart.
///
/// Always holds as many labels as values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl AggregatedSeries {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        (self.labels, self.values)
    }
}

impl FromIterator<(String, f64)> for AggregatedSeries {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let (labels, values) = iter.into_iter().unzip();
        Self { labels, values }
    }
}

/// How forecast samples are reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    /// The next 16 samples, one label each
    Hourly,
    /// Maximum temperature per calendar day, up to 5 days
    #[default]
    Daily,
}

impl FromStr for ForecastMode {
    type Err = Infallible;

    /// Anything other than `hourly` means daily.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("hourly") {
            Ok(Self::Hourly)
        } else {
            Ok(Self::Daily)
        }
    }
}

/// US EPA air quality category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitive => "Unhealthy for Sensitive",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiResult {
    pub value: u16,
    pub category: AqiCategory,
}

impl fmt::Display for AqiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.category.label())
    }
}

/// An AQI, or the fact that none could be computed.
///
/// A missing or malformed pm2.5 reading is never turned into a zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiReading {
    Available(AqiResult),
    Unavailable,
}

impl AqiReading {
    pub fn from_pm25(pm25: Option<f64>) -> Self {
        match pm25 {
            Some(v) if v.is_finite() && v >= 0.0 => Self::Available(crate::aqi::compute_aqi(v)),
            _ => Self::Unavailable,
        }
    }

    /// `"<value> (<label>)"`, or `"-"` when unavailable
    pub fn display(&self) -> String {
        self.to_string()
    }

    pub fn result(&self) -> Option<AqiResult> {
        match self {
            Self::Available(r) => Some(*r),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for AqiReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(r) => r.fmt(f),
            Self::Unavailable => f.write_str("-"),
        }
    }
}

/// Forecast aggregation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("No forecast data found in API response.")]
    EmptyInput,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("API_KEY missing")]
    MissingApiKey,
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl From<WeatherError> for mausam_core::AppError {
    fn from(err: WeatherError) -> Self {
        use mausam_core::error::ReqwestErrorExt;
        use mausam_core::{UpstreamError, WeatherError as Core};

        match err {
            WeatherError::Network(e) => Self::Upstream(e.into_upstream_error()),
            WeatherError::Api { status: 404, message } => {
                Self::Weather(Core::LocationNotFound(message))
            }
            WeatherError::Api { message, .. } => Self::Weather(Core::ApiError(message)),
            WeatherError::Parse(msg) => Self::Upstream(UpstreamError::Malformed(msg)),
            WeatherError::MissingApiKey => Self::Weather(Core::InvalidApiKey),
            WeatherError::Aggregate(AggregateError::EmptyInput) => {
                Self::Weather(Core::NoForecastData)
            }
        }
    }
}
