//! Async page fetcher wrapping reqwest.
//!
//! One GET per call, no retry. Every outcome is classified into a
//! [`FetchResult`]; failures are logged here so callers can simply move on
//! to the next URL.

use crate::config::HarvestConfig;
use crate::error::{HarvestError, Result};
use tracing::{debug, warn};

/// Outcome of fetching one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// 2xx response with its full body.
    Success(String),
    /// Non-2xx response status.
    HttpError(u16),
    /// Timeout, refused connection, DNS failure or unreadable body.
    NetworkError(String),
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into the page body, or the matching [`HarvestError`].
    pub fn into_body(self, url: &str) -> Result<String> {
        match self {
            Self::Success(body) => Ok(body),
            Self::HttpError(status) => Err(HarvestError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            Self::NetworkError(message) => Err(HarvestError::Network {
                url: url.to_string(),
                message,
            }),
        }
    }
}

/// HTTP client for workshop pages.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    extra_headers: Vec<(String, String)>,
}

impl PageFetcher {
    /// Build a client with the configured User-Agent and timeout.
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            extra_headers: config.extra_headers.clone(),
        })
    }

    /// Perform a single GET request.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut builder = self.client.get(url);
        for (name, value) in &self.extra_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                let message = describe_transport_error(&e);
                warn!(%url, error = %message, "failed to fetch page");
                return FetchResult::NetworkError(message);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "failed to fetch page");
            return FetchResult::HttpError(status.as_u16());
        }

        match resp.text().await {
            Ok(body) => {
                debug!(%url, bytes = body.len(), "fetched page");
                FetchResult::Success(body)
            }
            Err(e) => {
                let message = describe_transport_error(&e);
                warn!(%url, error = %message, "failed to read page body");
                FetchResult::NetworkError(message)
            }
        }
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
