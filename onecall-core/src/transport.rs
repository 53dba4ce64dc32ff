use std::fmt::Debug;

use crate::error::TransportError;

pub mod http;

pub use http::ReqwestTransport;

/// Status and raw body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking "send GET, receive status + body" capability.
///
/// Implementations own timeouts and connection reuse; a non-2xx status is a
/// response, not an error.
pub trait Transport: Send + Sync + Debug {
    fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        (**self).get(url)
    }
}
