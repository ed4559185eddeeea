//! blockchain.info charts provider.
//!
//! Fetches one window of a chart (`market-price`, `hash-rate`) per request
//! from `https://api.blockchain.info/charts/{name}`. No retries: a failed
//! request is reported to the caller as-is.

use super::provider::{ChartPoint, DataError, SeriesKind, SeriesProvider};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.blockchain.info/charts";

/// Charts API response. Only `values` is used.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    status: Option<String>,
    values: Option<Vec<ChartPoint>>,
}

/// blockchain.info charts provider.
pub struct BlockchainInfoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BlockchainInfoProvider {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at another host (mirrors, local fixtures).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart URL for one window.
    pub fn chart_url(&self, kind: SeriesKind, timespan: &str, start: NaiveDate) -> String {
        format!(
            "{}/{}?timespan={timespan}&start={}&format=json",
            self.base_url,
            kind.slug(),
            start.format("%Y-%m-%d")
        )
    }

    /// Parse a response body into chart points.
    fn parse_response(kind: SeriesKind, body: &str) -> Result<Vec<ChartPoint>, DataError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse {kind} response: {e}"))
        })?;

        match resp.values {
            Some(values) => Ok(values),
            None => Err(DataError::ResponseFormatChanged(format!(
                "{kind} response has no values (status: {})",
                resp.status.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}

impl SeriesProvider for BlockchainInfoProvider {
    fn name(&self) -> &str {
        "blockchain.info"
    }

    fn fetch(
        &self,
        kind: SeriesKind,
        timespan: &str,
        start: NaiveDate,
    ) -> Result<Vec<ChartPoint>, DataError> {
        let url = self.chart_url(kind, timespan, start);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        Self::parse_response(kind, &body)
    }
}
