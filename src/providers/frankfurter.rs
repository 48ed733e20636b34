use crate::core::{Endpoint, Transport, TransportError};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the Frankfurter exchange-rate API.
pub struct FrankfurterClient {
    base_url: String,
    http: reqwest::Client,
}

impl FrankfurterClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(TransportError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("xrates/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(FrankfurterClient {
            base_url: base_url.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for FrankfurterClient {
    #[instrument(name = "FrankfurterSend", skip(self, endpoint), fields(endpoint = %endpoint))]
    async fn send(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
        let url = endpoint.url(&self.base_url)?;
        debug!("Requesting exchange data from {}", url);

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            TransportError::InvalidResponse(format!("Request error: {e} for URL: {url}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, "Unexpected status");
            return Err(TransportError::StatusCode(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            TransportError::InvalidResponse(format!("Failed to read body: {e} for URL: {url}"))
        })?;
        if body.is_empty() {
            return Err(TransportError::EmptyData);
        }

        Ok(body.to_vec())
    }
}
