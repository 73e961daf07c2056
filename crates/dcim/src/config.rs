//! CLI configuration — thin wrapper around `dcim_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--config, --output, --color).

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use dcim_config::{Config, ConfigError, load_config_from, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// The config file in effect: `--config` / `DCIM_CONFIG`, else the
/// platform location.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(dcim_config::config_path)
}

/// Load and validate the config in effect. A missing file yields defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = active_path(global);
    tracing::debug!(path = %path.display(), "loading config");
    load_config_from(&path).map_err(|err| match err {
        ConfigError::Validation { field, reason } => CliError::ConfigInvalid {
            field,
            reason,
            path: path.display().to_string(),
        },
        other => other.into(),
    })
}

/// Output format: flag > config default.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Color mode: flag > config default.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global.color.unwrap_or_else(|| {
        ColorMode::from_str(&config.defaults.color, true).unwrap_or(ColorMode::Auto)
    })
}
