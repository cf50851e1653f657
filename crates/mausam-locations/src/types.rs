use serde::{Deserialize, Serialize};

/// A single place and the region (state) it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    #[serde(alias = "state")]
    pub region: String,
}

impl LocationEntry {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

/// Errors raised while loading location data
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Failed to read location data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse location data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid location data: {0}")]
    InvalidFormat(String),
}

/// Errors raised by a [`crate::LocationSource`]
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location service returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}
