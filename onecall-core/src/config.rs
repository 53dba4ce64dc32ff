use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::request::{self, DEFAULT_BASE_URL, OptionalParameter, Units};
use crate::transport::http::DEFAULT_TIMEOUT;

/// Settings stored on disk for the `onecall` tool.
///
/// Example TOML:
/// ```toml
/// app_id = "..."
/// units = "metric"
/// language = "en"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// OpenWeatherMap App ID sent as `appid`.
    pub app_id: Option<String>,

    /// Units requested when none are given explicitly.
    pub units: Option<Units>,

    /// Language requested when none is given explicitly.
    pub language: Option<String>,

    /// Override for the endpoint, e.g. a proxy.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Returns the configured App ID, or an error with a hint to configure one.
    pub fn app_id(&self) -> Result<&str> {
        self.app_id.as_deref().filter(|id| !id.is_empty()).ok_or_else(|| {
            anyhow!(
                "No App ID configured.\n\
                 Hint: run `onecall configure` and enter your OpenWeatherMap App ID."
            )
        })
    }

    pub fn set_app_id(&mut self, app_id: String) {
        self.app_id = Some(app_id);
    }

    pub fn is_configured(&self) -> bool {
        self.app_id().is_ok()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Configured units and language as request parameters, units first.
    pub fn default_parameters(&self) -> Vec<OptionalParameter> {
        let mut params = Vec::new();

        if let Some(units) = self.units {
            params.push(request::units(units));
        }
        if let Some(lang) = self.language.as_deref().filter(|l| !l.is_empty()) {
            params.push(request::language(lang));
        }

        params
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "onecall", "onecall")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.app_id().unwrap_err();

        assert!(err.to_string().contains("No App ID configured"));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn empty_app_id_counts_as_missing() {
        let cfg = Config { app_id: Some(String::new()), ..Config::default() };
        assert!(cfg.app_id().is_err());
    }

    #[test]
    fn set_app_id() {
        let mut cfg = Config::default();
        cfg.set_app_id("OPEN_KEY".into());

        assert_eq!(cfg.app_id().ok(), Some("OPEN_KEY"));
        assert!(cfg.is_configured());
    }

    #[test]
    fn defaults_without_overrides() {
        let cfg = Config::default();

        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
        assert!(cfg.default_parameters().is_empty());
    }

    #[test]
    fn default_parameters_units_then_language() {
        let cfg = Config {
            units: Some(Units::Imperial),
            language: Some("de".into()),
            ..Config::default()
        };

        let params = cfg.default_parameters();
        assert_eq!(params, vec![request::imperial_units(), request::language("de")]);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            app_id: Some("KEY".into()),
            units: Some(Units::Metric),
            language: Some("en".into()),
            base_url: None,
            timeout_secs: Some(3),
        };
        cfg.save_to(&path).expect("save");

        let contents = fs::read_to_string(&path).expect("written");
        assert!(contents.contains("units = \"metric\""));
        assert!(!contents.contains("base_url"));

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn load_missing_file_gives_default() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = \"kelvin\"").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
