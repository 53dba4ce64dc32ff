//! Typed view of a One Call response.
//!
//! Every physical measurement is a [`Decimal`] so values survive a
//! decode/re-encode cycle exactly as the service sent them. Optional wire
//! fields are `Option`s and are omitted again on serialization; a missing
//! field and a zero are different states. Sequences that are absent or
//! `null` decode as empty.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

mod wire;

/// Precipitation amount keyed by accumulation window, e.g. `"1h"`.
pub type PrecipitationMap = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(with = "wire::decimal")]
    pub lat: Decimal,
    #[serde(with = "wire::decimal")]
    pub lon: Decimal,
    pub timezone: String,
    /// Shift in seconds from UTC.
    pub timezone_offset: i64,
    pub current: CurrentConditions,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub minutely: Vec<MinutelyPoint>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub hourly: Vec<HourlyPoint>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub daily: Vec<DailyPoint>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub alerts: Vec<Alert>,
}

impl ForecastResponse {
    /// `None` when the offset is outside ±24h.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        i32::try_from(self.timezone_offset).ok().and_then(FixedOffset::east_opt)
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    #[serde(with = "wire::decimal")]
    pub temp: Decimal,
    #[serde(with = "wire::decimal")]
    pub feels_like: Decimal,
    /// hPa at sea level.
    pub pressure: i64,
    /// Percent.
    pub humidity: i64,
    #[serde(with = "wire::decimal")]
    pub dew_point: Decimal,
    #[serde(with = "wire::decimal")]
    pub uvi: Decimal,
    /// Percent.
    pub clouds: i64,
    /// Metres.
    pub visibility: i64,
    #[serde(with = "wire::decimal")]
    pub wind_speed: Decimal,
    #[serde(with = "wire::decimal")]
    pub wind_deg: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::decimal_option"
    )]
    pub wind_gust: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub weather: Vec<WeatherCondition>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::precipitation"
    )]
    pub rain: Option<PrecipitationMap>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::precipitation"
    )]
    pub snow: Option<PrecipitationMap>,
}

impl CurrentConditions {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }

    /// The service sends a list, but in practice it holds a single entry.
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    /// Rain volume for the last hour, if the service reported any rain data.
    pub fn rain_last_hour(&self) -> Option<Decimal> {
        self.rain.as_ref().and_then(|r| r.get("1h")).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutelyPoint {
    pub dt: i64,
    #[serde(with = "wire::decimal")]
    pub precipitation: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub dt: i64,
    #[serde(with = "wire::decimal")]
    pub temp: Decimal,
    #[serde(with = "wire::decimal")]
    pub feels_like: Decimal,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(with = "wire::decimal")]
    pub dew_point: Decimal,
    #[serde(with = "wire::decimal")]
    pub uvi: Decimal,
    pub clouds: i64,
    pub visibility: i64,
    #[serde(with = "wire::decimal")]
    pub wind_speed: Decimal,
    #[serde(with = "wire::decimal")]
    pub wind_deg: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::decimal_option"
    )]
    pub wind_gust: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub weather: Vec<WeatherCondition>,
    /// Probability of precipitation, 0..1.
    #[serde(with = "wire::decimal")]
    pub pop: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::precipitation"
    )]
    pub rain: Option<PrecipitationMap>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::precipitation"
    )]
    pub snow: Option<PrecipitationMap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTemperature {
    #[serde(with = "wire::decimal")]
    pub day: Decimal,
    #[serde(with = "wire::decimal")]
    pub min: Decimal,
    #[serde(with = "wire::decimal")]
    pub max: Decimal,
    #[serde(with = "wire::decimal")]
    pub night: Decimal,
    #[serde(with = "wire::decimal")]
    pub eve: Decimal,
    #[serde(with = "wire::decimal")]
    pub morn: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFeelsLike {
    #[serde(with = "wire::decimal")]
    pub day: Decimal,
    #[serde(with = "wire::decimal")]
    pub night: Decimal,
    #[serde(with = "wire::decimal")]
    pub eve: Decimal,
    #[serde(with = "wire::decimal")]
    pub morn: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub moonrise: i64,
    pub moonset: i64,
    /// 0 and 1 are new moon, 0.5 is full moon.
    #[serde(with = "wire::decimal")]
    pub moon_phase: Decimal,
    pub temp: DayTemperature,
    pub feels_like: DayFeelsLike,
    pub pressure: i64,
    pub humidity: i64,
    #[serde(with = "wire::decimal")]
    pub dew_point: Decimal,
    #[serde(with = "wire::decimal")]
    pub wind_speed: Decimal,
    #[serde(with = "wire::decimal")]
    pub wind_deg: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::decimal_option"
    )]
    pub wind_gust: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub weather: Vec<WeatherCondition>,
    pub clouds: i64,
    #[serde(with = "wire::decimal")]
    pub pop: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::decimal_option"
    )]
    pub rain: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::decimal_option"
    )]
    pub snow: Option<Decimal>,
    #[serde(with = "wire::decimal")]
    pub uvi: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    /// Kept verbatim, line breaks included.
    pub description: String,
    #[serde(default, deserialize_with = "wire::null_as_empty")]
    pub tags: Vec<String>,
}

impl Alert {
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.start)
    }

    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.end)
    }
}

pub fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
