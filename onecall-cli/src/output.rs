//! Human-readable rendering of a forecast.

use std::fmt::Write as _;

use chrono::{FixedOffset, Offset, Utc};
use onecall_core::{Decimal, ForecastResponse, Units, WeatherCondition, model::unix_to_utc};

const HOURS_SHOWN: usize = 12;

fn temp_unit(units: Units) -> &'static str {
    match units {
        Units::Standard => "K",
        Units::Metric => "°C",
        Units::Imperial => "°F",
    }
}

fn speed_unit(units: Units) -> &'static str {
    match units {
        Units::Imperial => "mph",
        Units::Standard | Units::Metric => "m/s",
    }
}

fn local_time(ts: i64, offset: FixedOffset, fmt: &str) -> String {
    unix_to_utc(ts)
        .map(|dt| dt.with_timezone(&offset).format(fmt).to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn percent(pop: Decimal) -> Decimal {
    (pop * Decimal::ONE_HUNDRED).round()
}

fn describe(weather: &[WeatherCondition]) -> &str {
    weather.first().map(|w| w.description.as_str()).unwrap_or("Unknown")
}

pub fn render(resp: &ForecastResponse, units: Units) -> String {
    let offset = resp.utc_offset().unwrap_or_else(|| Utc.fix());
    let t = temp_unit(units);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Forecast for {}, {} ({}, UTC{})",
        resp.lat, resp.lon, resp.timezone, offset
    );

    let c = &resp.current;
    let _ = writeln!(
        out,
        "\nNow ({}): {} {t}, feels like {} {t}, {}",
        local_time(c.dt, offset, "%Y-%m-%d %H:%M"),
        c.temp,
        c.feels_like,
        describe(&c.weather),
    );
    let _ = writeln!(
        out,
        "  Humidity {}%  Pressure {} hPa  Wind {} {} @ {}°  UV {}",
        c.humidity,
        c.pressure,
        c.wind_speed,
        speed_unit(units),
        c.wind_deg,
        c.uvi,
    );
    if let Some(gust) = c.wind_gust {
        let _ = writeln!(out, "  Gusts {gust} {}", speed_unit(units));
    }
    if let Some(rain) = c.rain_last_hour() {
        let _ = writeln!(out, "  Rain (1h): {rain} mm");
    }

    if !resp.hourly.is_empty() {
        let _ = writeln!(out, "\nNext hours:");
        for h in resp.hourly.iter().take(HOURS_SHOWN) {
            let _ = writeln!(
                out,
                "  {}  {} {t}  {}  pop {}%",
                local_time(h.dt, offset, "%H:%M"),
                h.temp,
                describe(&h.weather),
                percent(h.pop),
            );
        }
    }

    if !resp.daily.is_empty() {
        let _ = writeln!(out, "\nDaily:");
        for d in &resp.daily {
            let _ = write!(
                out,
                "  {}  min {} {t}  max {} {t}  {}  pop {}%",
                local_time(d.dt, offset, "%a %d %b"),
                d.temp.min,
                d.temp.max,
                describe(&d.weather),
                percent(d.pop),
            );
            if let Some(rain) = d.rain {
                let _ = write!(out, "  rain {rain} mm");
            }
            out.push('\n');
        }
    }

    if resp.has_alerts() {
        let _ = writeln!(out, "\nAlerts:");
        for a in &resp.alerts {
            let _ = writeln!(
                out,
                "  {} ({}) {} to {}",
                a.event,
                a.sender_name,
                local_time(a.start, offset, "%Y-%m-%d %H:%M"),
                local_time(a.end, offset, "%Y-%m-%d %H:%M"),
            );
            for line in a.description.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    out
}
