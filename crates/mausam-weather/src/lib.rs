//! Weather data for Mausam
//!
//! Fetches current conditions, air quality and the 5-day forecast from
//! OpenWeatherMap, turns pm2.5 readings into an AQI and reduces forecast
//! samples into chartable series.

pub mod aggregate;
pub mod aqi;
pub mod provider;
pub mod types;

pub use aggregate::ForecastAggregator;
pub use aqi::compute_aqi;
pub use provider::{WeatherProvider, WeatherReport};
pub use types::*;
