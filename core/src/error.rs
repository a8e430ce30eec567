//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`; the path-carrying variants must be
/// built explicitly so the offending file is always named.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A file could not be read.
    #[from(ignore)]
    #[display("Failed to read {path:?}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// YAML content could not be parsed.
    #[from(ignore)]
    #[display("YAML parse error in {path:?}: {source}")]
    Yaml {
        /// File that failed.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// JSON content could not be parsed or serialized.
    #[from(ignore)]
    #[display("JSON error in {path:?}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// An output file could not be written.
    #[from(ignore)]
    #[display("Failed to write {path:?}: {source}")]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A document parsed but has an unusable shape (e.g. a base file that is a list).
    #[from(ignore)]
    #[display("Invalid document {path:?}: {reason}")]
    InvalidDocument {
        /// File that failed.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Read { source, .. } | AppError::Write { source, .. } => Some(source),
            AppError::Yaml { source, .. } => Some(source),
            AppError::Json { source, .. } => Some(source),
            AppError::InvalidDocument { .. } | AppError::General(_) => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
