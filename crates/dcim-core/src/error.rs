// ── Core error types ──
//
// Errors raised while materializing rows into trees or emitting documents.
// Malformed rows are NOT errors: they are truncated and reported as
// `RowAnomaly` values on the build result.

use thiserror::Error;

/// Boxed error produced by an external row source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Build errors ─────────────────────────────────────────────────
    /// The row source failed; the partially built tree is discarded.
    #[error("Failed to read row {row}: {source}")]
    RowRead {
        row: usize,
        #[source]
        source: SourceError,
    },

    // ── Emission errors ──────────────────────────────────────────────
    #[error("Failed to emit {format} document: {message}")]
    Emit { format: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Emit {
            format: "xml".into(),
            message: err.to_string(),
        }
    }
}
