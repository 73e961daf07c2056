//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use dcim_config::ConfigError;
use dcim_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    /// The input dump could not be decoded.
    pub const DATA: i32 = 65;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────

    #[error("Could not read row {row} of the input dump: {source}")]
    #[diagnostic(
        code(dcim::row_read),
        help(
            "Rows must be a JSON array of objects or newline-delimited JSON objects\n\
             whose keys match the query column names. Nothing was exported."
        )
    )]
    RowRead {
        row: usize,
        #[source]
        source: dcim_core::SourceError,
    },

    #[error("Input file not found: {path}")]
    #[diagnostic(code(dcim::input_not_found), help("Pass --input PATH, or pipe the dump on stdin."))]
    InputNotFound { path: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dcim::validation))]
    Validation { field: String, reason: String },

    // ── Output ───────────────────────────────────────────────────────

    #[error("Failed to emit {format} document: {message}")]
    #[diagnostic(code(dcim::emit))]
    Emit { format: String, message: String },

    #[error("Failed to write workbook {path}")]
    #[diagnostic(
        code(dcim::xlsx),
        help("Check that the target directory exists and the file is not open elsewhere.")
    )]
    Workbook {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(dcim::config_exists),
        help(
            "Use --force to overwrite it.\n\
             Location: {path}"
        )
    )]
    ConfigExists { path: String },

    #[error("Invalid configuration: {field}: {reason}")]
    #[diagnostic(code(dcim::config_invalid), help("Fix the value in {path} or the matching DCIM_ variable."))]
    ConfigInvalid {
        field: String,
        reason: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(dcim::config))]
    Config(Box<figment::Error>),

    #[error("Failed to serialize config: {0}")]
    #[diagnostic(code(dcim::config))]
    ConfigSerialize(#[from] toml::ser::Error),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(dcim::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dcim::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(dcim::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RowRead { .. } | Self::Json(_) => exit_code::DATA,
            Self::InputNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ConfigInvalid { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RowRead { row, source } => CliError::RowRead { row, source },

            CoreError::Emit { format, message } => CliError::Emit { format, message },

            CoreError::Serialization(e) => CliError::Json(e),

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid {
                field,
                reason,
                path: dcim_config::config_path().display().to_string(),
            },
            ConfigError::Serialization(e) => CliError::ConfigSerialize(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
