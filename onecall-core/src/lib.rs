//! Core library for the `onecall` CLI.
//!
//! This crate defines:
//! - Request URL construction with optional parameters
//! - The typed forecast model with exact decimal measurements
//! - JSON decoding of One Call responses
//! - A blocking transport seam and the `fetch_forecast` entry point
//! - Configuration & credentials handling
//!
//! It is used by `onecall-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod request;
pub mod transport;

pub use client::{OneCallClient, fetch_forecast};
pub use config::Config;
pub use error::{DecodeError, DecodeErrorKind, OneCallError, TransportError};
pub use model::{
    Alert, CurrentConditions, DailyPoint, DayFeelsLike, DayTemperature, ForecastResponse,
    HourlyPoint, MinutelyPoint, PrecipitationMap, WeatherCondition,
};
pub use request::{
    OptionalParameter, Section, Units, build_url, exclude_sections, imperial_units, language,
    metric_units, standard_units, units,
};
pub use rust_decimal::Decimal;
pub use transport::{ReqwestTransport, Transport, TransportResponse};
