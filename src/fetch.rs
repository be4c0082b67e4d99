//! HTTP client for retrieving WeatherLink summary pages.
//!
//! This module handles the request to the WeatherLink web service for a
//! station's summary page. The service signals an unknown station id by
//! redirecting to its error page rather than returning a 404, so the final
//! URL is inspected after the request completes.

use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};

use crate::parser;
use crate::record::WeatherRecord;

/// Default WeatherLink service base URL.
pub const WEATHERLINK_BASE_URL: &str = "http://www.weatherlink.com";

/// Path the service redirects to for unknown station ids.
const ERROR_PAGE_PATH: &str = "/error.php";

/// Configuration for the WeatherLink client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the WeatherLink service.
    pub base_url: String,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Total request timeout.
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: WEATHERLINK_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl FetchConfig {
    /// Create a configuration pointing at a different service base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Errors from fetching a summary page. The parser never sees these; it
/// receives either valid bytes or is not invoked.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service redirected to its error page: no such station.
    #[error("invalid station id: {0}")]
    InvalidStation(String),

    /// A non-2xx response.
    #[error("unexpected status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the WeatherLink summary page endpoint.
pub struct WeatherLinkClient {
    config: FetchConfig,
    http: reqwest::Client,
}

impl WeatherLinkClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, http })
    }

    /// The summary page URL for a station id.
    pub fn summary_url(&self, station_id: &str) -> String {
        format!(
            "{}/user/{}/index.php?view=summary&headers=1&type=1",
            self.config.base_url, station_id
        )
    }

    /// Fetch the raw summary page body for a station.
    pub async fn fetch_summary(&self, station_id: &str) -> Result<String, FetchError> {
        let url = self.summary_url(station_id);
        info!("Fetching summary page for {}", station_id);

        let response = self.http.get(&url).send().await?;

        if response.url().path() == ERROR_PAGE_PATH {
            return Err(FetchError::InvalidStation(station_id.to_string()));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        let body = response.text().await?;
        debug!("Received {} bytes for {}", body.len(), station_id);
        Ok(body)
    }

    /// Fetch and parse a station's summary page in one call.
    pub async fn fetch_record(&self, station_id: &str) -> anyhow::Result<WeatherRecord> {
        let body = self
            .fetch_summary(station_id)
            .await
            .with_context(|| format!("Failed to fetch summary page for {}", station_id))?;

        let record = parser::parse(&body)
            .with_context(|| format!("Failed to parse summary page for {}", station_id))?;

        Ok(record)
    }
}
