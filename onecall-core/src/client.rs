//! The public entry point: build the URL, GET it once, decode the body.

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::{
    config::Config,
    decode,
    error::OneCallError,
    model::ForecastResponse,
    request::{self, DEFAULT_BASE_URL, OptionalParameter},
    transport::{ReqwestTransport, Transport},
};

#[derive(Debug, Clone)]
pub struct OneCallClient<T = ReqwestTransport> {
    base_url: String,
    transport: T,
}

impl OneCallClient<ReqwestTransport> {
    pub fn new() -> Result<Self, OneCallError> {
        Ok(Self::with_transport(DEFAULT_BASE_URL, ReqwestTransport::new()?))
    }

    /// Client honouring the configured endpoint and timeout.
    pub fn from_config(config: &Config) -> Result<Self, OneCallError> {
        let transport = ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::with_transport(config.base_url(), transport))
    }
}

impl<T: Transport> OneCallClient<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        Self { base_url: base_url.into(), transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_url(
        &self,
        lat: Decimal,
        lon: Decimal,
        app_id: &str,
        params: &[OptionalParameter],
    ) -> String {
        request::build_url(&self.base_url, lat, lon, app_id, params)
    }

    /// Fetch the forecast for one coordinate pair.
    ///
    /// Exactly one request is made. Any response that arrives is decoded,
    /// whatever its status, since the service reports errors as JSON too.
    ///
    /// # Errors
    ///
    /// [`OneCallError::Transport`] when no response was received,
    /// [`OneCallError::Decode`] when the body is not a forecast.
    #[instrument(skip(self, app_id, params), fields(params = params.len()))]
    pub fn fetch_forecast(
        &self,
        lat: Decimal,
        lon: Decimal,
        app_id: &str,
        params: &[OptionalParameter],
    ) -> Result<ForecastResponse, OneCallError> {
        let url = self.request_url(lat, lon, app_id, params);
        debug!(base_url = %self.base_url, "requesting forecast");

        let response = self.transport.get(&url)?;

        if !response.is_success() {
            warn!(status = response.status, "one call returned a non-success status");
        }

        decode::from_slice(&response.body).map_err(|err| {
            if response.is_success() {
                OneCallError::Decode(err)
            } else {
                let message = decode::service_error_message(&response.body);
                OneCallError::Decode(err.with_response(response.status, message))
            }
        })
    }
}

/// One-shot [`OneCallClient::fetch_forecast`] against the production endpoint.
pub fn fetch_forecast(
    lat: Decimal,
    lon: Decimal,
    app_id: &str,
    params: &[OptionalParameter],
) -> Result<ForecastResponse, OneCallError> {
    OneCallClient::new()?.fetch_forecast(lat, lon, app_id, params)
}
