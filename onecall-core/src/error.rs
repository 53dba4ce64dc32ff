//! Error types surfaced by the One Call client.

use std::fmt;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level failure of a forecast call.
#[derive(Error, Debug)]
pub enum OneCallError {
    /// No response was received: connection, DNS, timeout or body read failure.
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A response body arrived but does not match the forecast schema.
    #[error("Decode failure: {0}")]
    Decode(#[from] DecodeError),
}

impl OneCallError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// User-friendly error message for terminal output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the weather service. Check your connection.".to_string(),
            Self::Decode(err) => match err.service_message() {
                Some(msg) => format!("The weather service rejected the request: {msg}"),
                None => "The weather service returned an unexpected response.".to_string(),
            },
        }
    }
}

/// The request could not be sent or no complete response was received.
#[derive(Error, Debug)]
#[error("{context}")]
pub struct TransportError {
    context: String,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self { context: context.into(), source: source.into() }
    }
}

/// Which stage of decoding failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not valid JSON.
    Syntax,
    /// The document ended early (empty or cut-off body).
    Truncated,
    /// A structurally required field is absent.
    MissingField,
    /// A field is present with an incompatible type or value, e.g. `1.5` for a timestamp.
    InvalidType,
    /// Reading the body failed.
    Io,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecodeErrorKind::Syntax => "malformed JSON",
            DecodeErrorKind::Truncated => "truncated JSON document",
            DecodeErrorKind::MissingField => "missing required field",
            DecodeErrorKind::InvalidType => "unexpected type or value",
            DecodeErrorKind::Io => "error reading body",
        })
    }
}

/// A response body could not be interpreted as a forecast.
#[derive(Error, Debug)]
#[error("{kind}{}: {source}", status_suffix(.status, .service_message))]
pub struct DecodeError {
    kind: DecodeErrorKind,
    status: Option<u16>,
    service_message: Option<String>,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, source: serde_json::Error) -> Self {
        Self { kind, status: None, service_message: None, source }
    }

    pub(crate) fn with_response(mut self, status: u16, service_message: Option<String>) -> Self {
        self.status = Some(status);
        self.service_message = service_message;
        self
    }

    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// HTTP status of the response that failed to decode, when it came over the wire.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The `message` of the service's own error payload, if it sent one.
    pub fn service_message(&self) -> Option<&str> {
        self.service_message.as_deref()
    }
}

fn status_suffix(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message.as_deref()) {
        (Some(code), Some(msg)) => format!(" (HTTP {code}, service said: {msg})"),
        (Some(code), None) => format!(" (HTTP {code})"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_kind_predicates() {
        let err = OneCallError::from(TransportError::new("connect", "refused"));
        assert!(err.is_transport());
        assert!(!err.is_decode());

        let err = OneCallError::from(DecodeError::new(DecodeErrorKind::Syntax, json_error()));
        assert!(err.is_decode());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_error_keeps_source() {
        use std::error::Error as _;

        let err = TransportError::new("Failed to send request", "connection refused");
        assert_eq!(err.to_string(), "Failed to send request");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_decode_error_display_includes_response_details() {
        let err = DecodeError::new(DecodeErrorKind::MissingField, json_error())
            .with_response(401, Some("Invalid API key".into()));

        let msg = err.to_string();
        assert!(msg.starts_with("missing required field (HTTP 401, service said: Invalid API key)"));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_user_messages() {
        let err = OneCallError::from(TransportError::new("timeout", "deadline elapsed"));
        assert!(err.user_message().contains("connection"));

        let err = OneCallError::from(
            DecodeError::new(DecodeErrorKind::MissingField, json_error())
                .with_response(401, Some("Invalid API key".into())),
        );
        assert!(err.user_message().contains("Invalid API key"));

        let err = OneCallError::from(DecodeError::new(DecodeErrorKind::Syntax, json_error()));
        assert!(err.user_message().contains("unexpected response"));
    }
}
