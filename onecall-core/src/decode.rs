//! JSON decoding and re-encoding of [`ForecastResponse`].
//!
//! `serde_json` is built with `arbitrary_precision`, so decimal fields are
//! parsed straight from the number's digits instead of through `f64`.

use std::io;

use serde::Deserialize;
use serde_json::error::Category;
use tracing::debug;

use crate::{
    error::{DecodeError, DecodeErrorKind},
    model::ForecastResponse,
};

pub fn from_slice(bytes: &[u8]) -> Result<ForecastResponse, DecodeError> {
    let parsed = serde_json::from_slice(bytes).map_err(into_decode_error)?;
    debug!(len = bytes.len(), "decoded forecast response");
    Ok(parsed)
}

pub fn from_str(body: &str) -> Result<ForecastResponse, DecodeError> {
    from_slice(body.as_bytes())
}

pub fn from_reader<R: io::Read>(reader: R) -> Result<ForecastResponse, DecodeError> {
    serde_json::from_reader(reader).map_err(into_decode_error)
}

/// Re-encode with decimals written as JSON numbers, digits unchanged.
pub fn to_string(response: &ForecastResponse) -> serde_json::Result<String> {
    serde_json::to_string(response)
}

pub fn to_string_pretty(response: &ForecastResponse) -> serde_json::Result<String> {
    serde_json::to_string_pretty(response)
}

pub fn to_vec(response: &ForecastResponse) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(response)
}

/// Error payload the service sends alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `message` from a `{"cod": ..., "message": ...}` body, if the body is one.
pub(crate) fn service_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ServiceErrorBody>(body).ok().and_then(|b| b.message)
}

fn into_decode_error(err: serde_json::Error) -> DecodeError {
    let kind = match err.classify() {
        Category::Io => DecodeErrorKind::Io,
        Category::Syntax => DecodeErrorKind::Syntax,
        Category::Eof => DecodeErrorKind::Truncated,
        // serde's `de::Error::missing_field` renders as "missing field `name`";
        // `serde_json` exposes no finer category than `Data` for it.
        Category::Data if err.to_string().starts_with("missing field `") => {
            DecodeErrorKind::MissingField
        }
        Category::Data => DecodeErrorKind::InvalidType,
    };

    DecodeError::new(kind, err)
}
