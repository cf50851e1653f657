use std::sync::Arc;

use anyhow::{Context, Result};
use mausam_core::Config;
use mausam_locations::LocationIndex;
use mausam_weather::{ForecastAggregator, WeatherProvider};

/// Shared state for HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub locations: Arc<LocationIndex>,
    pub weather: WeatherProvider,
    pub aggregator: ForecastAggregator,
    pub result_limit: usize,
}

impl AppState {
    pub fn new(locations: LocationIndex, weather: WeatherProvider, config: &Config) -> Self {
        Self {
            locations: Arc::new(locations),
            weather,
            aggregator: ForecastAggregator::from_offset_minutes(config.weather.utc_offset_minutes),
            result_limit: config.locations.result_limit,
        }
    }

    /// Load the location file and build the weather client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = &config.locations.data_path;
        let locations = LocationIndex::load(path)
            .with_context(|| format!("Failed to load locations from {}", path.display()))?;

        let weather =
            WeatherProvider::new(&config.weather).context("Failed to create weather client")?;

        Ok(Self::new(locations, weather, config))
    }
}
