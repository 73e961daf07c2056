//! Configuration for the dcim exporter.
//!
//! A single TOML file layered under `DCIM_`-prefixed environment
//! variables. Nested keys use a double underscore, e.g.
//! `DCIM_READINGS__STREAM_INTERVAL_SECS=10`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dcim_core::power::MockInterval;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Global output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Download naming and placement.
    #[serde(default)]
    pub export: ExportSettings,

    /// Power-reading simulation.
    #[serde(default)]
    pub readings: ReadingsSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportSettings {
    /// Leading component of generated file names (`<prefix>-racks-<date>.xlsx`).
    #[serde(default = "default_prefix")]
    pub filename_prefix: String,

    /// Where generated files land when no explicit path is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename_prefix: default_prefix(),
            output_dir: None,
        }
    }
}

fn default_prefix() -> String {
    "dcim".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReadingsSettings {
    /// Seconds between streamed frames.
    #[serde(default = "default_stream_interval")]
    pub stream_interval_secs: u64,

    /// Default look-back window for mock series.
    #[serde(default = "default_window")]
    pub window_minutes: u64,

    /// Default step for mock series: `5m`, `1h` or `1d`.
    #[serde(default = "default_mock_interval")]
    pub mock_interval: String,
}

impl Default for ReadingsSettings {
    fn default() -> Self {
        Self {
            stream_interval_secs: default_stream_interval(),
            window_minutes: default_window(),
            mock_interval: default_mock_interval(),
        }
    }
}

fn default_stream_interval() -> u64 {
    5
}
fn default_window() -> u64 {
    60
}
fn default_mock_interval() -> String {
    "5m".into()
}

const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
const COLOR_MODES: &[&str] = &["auto", "always", "never"];
/// One year.
const MAX_WINDOW_MINUTES: u64 = 525_600;

impl Config {
    /// Reject values that would only fail later, mid-export.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: String| ConfigError::Validation {
            field: field.into(),
            reason,
        };

        if !OUTPUT_FORMATS.contains(&self.defaults.output.as_str()) {
            return Err(invalid(
                "defaults.output",
                format!("expected one of {}, got '{}'", OUTPUT_FORMATS.join(", "), self.defaults.output),
            ));
        }
        if !COLOR_MODES.contains(&self.defaults.color.as_str()) {
            return Err(invalid(
                "defaults.color",
                format!("expected one of {}, got '{}'", COLOR_MODES.join(", "), self.defaults.color),
            ));
        }

        let prefix = &self.export.filename_prefix;
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(invalid(
                "export.filename_prefix",
                format!("must be a non-empty file name component, got '{prefix}'"),
            ));
        }

        if self.readings.stream_interval_secs == 0 {
            return Err(invalid(
                "readings.stream_interval_secs",
                "must be greater than zero".into(),
            ));
        }
        let window = self.readings.window_minutes;
        if window == 0 || window > MAX_WINDOW_MINUTES {
            return Err(invalid(
                "readings.window_minutes",
                format!("must be between 1 and {MAX_WINDOW_MINUTES}, got {window}"),
            ));
        }
        if self.readings.mock_interval.parse::<MockInterval>().is_err() {
            return Err(invalid(
                "readings.mock_interval",
                format!("expected 5m, 1h or 1d, got '{}'", self.readings.mock_interval),
            ));
        }
        Ok(())
    }

    /// The configured mock step.
    pub fn mock_interval(&self) -> MockInterval {
        MockInterval::lenient(&self.readings.mock_interval)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "dcim", "dcim").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dcim");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load and validate config from `path` + environment.
///
/// A missing file is not an error: defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DCIM_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    fn load(path: &str) -> Result<Config, figment::Error> {
        load_config_from(Path::new(path)).map_err(|e| figment::Error::from(e.to_string()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = load("absent.toml")?;
            assert_eq!(config, Config::default());
            assert_eq!(config.readings.stream_interval_secs, 5);
            assert_eq!(config.export.filename_prefix, "dcim");
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults_and_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [defaults]
                output = "json"

                [readings]
                stream_interval_secs = 10
                mock_interval = "1h"
                "#,
            )?;
            jail.set_env("DCIM_READINGS__STREAM_INTERVAL_SECS", "2");
            jail.set_env("DCIM_EXPORT__FILENAME_PREFIX", "acme");

            let config = load("config.toml")?;
            assert_eq!(config.defaults.output, "json");
            assert_eq!(config.defaults.color, "auto");
            assert_eq!(config.readings.stream_interval_secs, 2);
            assert_eq!(config.readings.window_minutes, 60);
            assert_eq!(config.mock_interval(), MockInterval::Hour);
            assert_eq!(config.export.filename_prefix, "acme");
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[readings]\nstream_interval_secs = 0\n")?;
            let err = load("config.toml").unwrap_err();
            assert!(err.to_string().contains("readings.stream_interval_secs"));
            Ok(())
        });
    }

    #[test]
    fn validate_checks_enumerated_fields() {
        let mut config = Config::default();
        config.defaults.output = "csv".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "defaults.output"
        ));

        let mut config = Config::default();
        config.readings.mock_interval = "15m".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.export.filename_prefix = "a/b".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn window_minutes_is_bounded() {
        Jail::expect_with(|jail| {
            jail.set_env("DCIM_READINGS__WINDOW_MINUTES", "1000000000000");
            let err = load("absent.toml").unwrap_err();
            assert!(err.to_string().contains("readings.window_minutes"));
            Ok(())
        });

        let mut config = Config::default();
        config.readings.window_minutes = MAX_WINDOW_MINUTES;
        assert!(config.validate().is_ok());
        config.readings.window_minutes = MAX_WINDOW_MINUTES + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "readings.window_minutes"
        ));
    }

    #[test]
    fn save_then_load_preserves_values() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            let mut config = Config::default();
            config.export.output_dir = Some(PathBuf::from("/srv/exports"));
            config.readings.window_minutes = 15;
            save_config_to(&config, &path).map_err(|e| e.to_string())?;

            let loaded = load(path.to_str().unwrap())?;
            assert_eq!(loaded, config);
            Ok(())
        });
    }
}
