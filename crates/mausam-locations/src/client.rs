//! HTTP client for a remote location service exposing `/api/states` and
//! `/api/cities`.

use std::time::Duration;

use reqwest::Client;
use tracing::instrument;

use crate::source::LocationSource;
use crate::types::LookupError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct HttpLocationSource {
    client: Client,
    base_url: String,
}

impl HttpLocationSource {
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_list(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<String>, LookupError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        match body {
            serde_json::Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect()),
            other => Err(LookupError::Parse(format!("expected an array, got {}", other))),
        }
    }
}

impl LocationSource for HttpLocationSource {
    #[instrument(skip(self), level = "debug")]
    async fn find_regions(&self, query: &str) -> Result<Vec<String>, LookupError> {
        self.get_list("/api/states", &[("query", query)]).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn find_places(&self, region: &str, query: &str) -> Result<Vec<String>, LookupError> {
        self.get_list("/api/cities", &[("state", region), ("query", query)])
            .await
    }
}
