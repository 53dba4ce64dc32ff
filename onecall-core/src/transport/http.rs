use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::TransportError;

use super::{Transport, TransportResponse};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Transport`] over a blocking `reqwest` client.
///
/// Must not be created or dropped on an async runtime thread.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new("Failed to build HTTP client", e))?;

        Ok(Self::from_client(http))
    }

    /// Wraps a caller-built client, e.g. one with a proxy or custom headers.
    /// Its own timeout settings apply.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let res = self
            .http
            .get(url)
            .send()
            .map_err(|e| TransportError::new("Failed to send request to OpenWeather (one call)", e))?;

        let status = res.status();
        let body = res
            .bytes()
            .map_err(|e| TransportError::new("Failed to read OpenWeather one call response body", e))?;

        debug!(status = status.as_u16(), len = body.len(), "received one call response");

        Ok(TransportResponse { status: status.as_u16(), body: body.to_vec() })
    }
}
