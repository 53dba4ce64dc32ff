use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use onecall_core::{
    Config, Decimal, OneCallClient, OptionalParameter, Units, build_url, decode, exclude_sections,
    language, units,
};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "onecall", version, about = "OpenWeatherMap One Call forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the App ID and default request options.
    Configure {
        /// App ID to store; prompted for when absent.
        #[arg(long)]
        app_id: Option<String>,
    },

    /// Fetch and print the forecast for a location.
    Forecast {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        options: RequestOptions,

        /// Print the decoded response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the request URL without sending it.
    Url {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        options: RequestOptions,

        /// Show the configured App ID instead of a placeholder.
        #[arg(long)]
        reveal: bool,
    },
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Decimal,

    /// Longitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Decimal,
}

#[derive(Debug, Args)]
pub struct RequestOptions {
    /// Sections to leave out, e.g. `minutely,alerts`.
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// standard, metric or imperial; overrides the configured default.
    #[arg(long)]
    pub units: Option<Units>,

    /// Language code; overrides the configured default.
    #[arg(long)]
    pub lang: Option<String>,
}

impl RequestOptions {
    /// Excludes first, then units and language, falling back to `config`.
    pub fn parameters(&self, config: &Config) -> Vec<OptionalParameter> {
        let mut params = Vec::new();

        if !self.exclude.is_empty() {
            params.push(exclude_sections(&self.exclude));
        }
        if let Some(u) = self.units.or(config.units) {
            params.push(units(u));
        }
        if let Some(lang) = self.lang.as_deref().or(config.language.as_deref()) {
            params.push(language(lang));
        }

        params
    }

    fn effective_units(&self, config: &Config) -> Units {
        self.units.or(config.units).unwrap_or_default()
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { app_id } => configure(app_id)?,
            Command::Forecast { location, options, json } => {
                let config = Config::load()?;
                let app_id = config.app_id()?;
                let params = options.parameters(&config);
                debug!(?params, "forecast options");

                let client = OneCallClient::from_config(&config)?;
                let resp = client
                    .fetch_forecast(location.lat, location.lon, app_id, &params)
                    .map_err(|e| {
                        let msg = e.user_message();
                        anyhow::Error::new(e).context(msg)
                    })?;

                if json {
                    println!(
                        "{}",
                        decode::to_string_pretty(&resp).context("Failed to encode forecast as JSON")?
                    );
                } else {
                    print!("{}", output::render(&resp, options.effective_units(&config)));
                }
            }
            Command::Url { location, options, reveal } => {
                let config = Config::load()?;
                let app_id = if reveal { config.app_id()? } else { "APP_ID" };
                let params = options.parameters(&config);

                println!("{}", build_url(config.base_url(), location.lat, location.lon, app_id, &params));
            }
        }

        Ok(())
    }
}

fn configure(app_id: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let app_id = match app_id {
        Some(id) => id,
        None => Password::new("OpenWeatherMap App ID:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read App ID")?,
    };
    let app_id = app_id.trim().to_string();
    if app_id.is_empty() {
        anyhow::bail!("App ID must not be empty");
    }
    config.set_app_id(app_id);

    let units = Select::new("Default units:", Units::all().to_vec())
        .prompt()
        .context("Failed to read units")?;
    config.units = Some(units);

    let lang = Text::new("Default language (leave empty for the service default):")
        .prompt()
        .context("Failed to read language")?;
    let lang = lang.trim();
    config.language = (!lang.is_empty()).then(|| lang.to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
