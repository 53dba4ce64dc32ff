//! Request URL construction for the One Call endpoint.
//!
//! Everything here is pure: no I/O, deterministic output for a given input.

use std::{convert::TryFrom, fmt, str::FromStr};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Unreserved characters plus `,` stay literal so that `excludes=foo,bar` reads as the service documents it.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b',');

/// Unit system requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin, metre/sec. What the service returns when `units` is omitted.
    #[default]
    Standard,
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}

impl FromStr for Units {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::try_from(s)
    }
}

/// Response sections the service can be asked to leave out.
///
/// `exclude_sections` accepts plain strings too; nothing is validated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Current,
    Minutely,
    Hourly,
    Daily,
    Alerts,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Current => "current",
            Section::Minutely => "minutely",
            Section::Hourly => "hourly",
            Section::Daily => "daily",
            Section::Alerts => "alerts",
        }
    }
}

impl AsRef<str> for Section {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query modifier appended after the required parameters.
///
/// Only constructible through [`exclude_sections`], [`units`] and [`language`]
/// (and the unit shortcuts), so parameter names are always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionalParameter {
    name: &'static str,
    value: String,
}

impl OptionalParameter {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// `excludes=<comma separated names>`.
pub fn exclude_sections<I, S>(sections: I) -> OptionalParameter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = sections
        .into_iter()
        .map(|s| s.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",");

    OptionalParameter { name: "excludes", value: joined }
}

pub fn units(kind: Units) -> OptionalParameter {
    OptionalParameter { name: "units", value: kind.as_str().to_owned() }
}

pub fn standard_units() -> OptionalParameter {
    units(Units::Standard)
}

pub fn metric_units() -> OptionalParameter {
    units(Units::Metric)
}

pub fn imperial_units() -> OptionalParameter {
    units(Units::Imperial)
}

/// `lang=<code>`, passed through verbatim.
pub fn language(code: impl Into<String>) -> OptionalParameter {
    OptionalParameter { name: "lang", value: code.into() }
}

/// Build the GET URL: `lat`, `lon`, `appid` first, then `params` in the order given.
pub fn build_url(
    base_url: &str,
    lat: Decimal,
    lon: Decimal,
    app_id: &str,
    params: &[OptionalParameter],
) -> String {
    let mut url = String::from(base_url);
    url.push('?');
    push_pair(&mut url, "lat", &canonical_decimal(lat));
    url.push('&');
    push_pair(&mut url, "lon", &canonical_decimal(lon));
    url.push('&');
    push_pair(&mut url, "appid", app_id);

    for param in params {
        url.push('&');
        push_pair(&mut url, param.name, &param.value);
    }

    url
}

/// Shortest exact form: `3.140` renders as `3.14`, never in exponent notation.
pub fn canonical_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn push_pair(url: &mut String, name: &str, value: &str) {
    url.extend(utf8_percent_encode(name, QUERY_COMPONENT));
    url.push('=');
    url.extend(utf8_percent_encode(value, QUERY_COMPONENT));
}
