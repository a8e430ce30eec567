#![deny(missing_docs)]

//! # Document Output
//!
//! Serializes an assembled document as pretty JSON (2-space indent, keys in
//! merge order, non-ASCII text written as-is) and replaces the target file in
//! one step.

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Renders the document exactly as it is written to disk.
pub fn serialize_document(path: &Path, document: &Map<String, Value>) -> AppResult<String> {
    serde_json::to_string_pretty(document).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "openapi.json".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Writes the document to `path`.
///
/// The full text goes to a sibling staging file which is then renamed over
/// `path`, so an interrupted write never leaves a truncated document behind.
pub fn write_document(path: &Path, document: &Map<String, Value>) -> AppResult<()> {
    let text = serialize_document(path, document)?;
    let staging = staging_path(path);

    let result = fs::write(&staging, text).and_then(|()| fs::rename(&staging, path));
    if let Err(source) = result {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&staging);
        return Err(AppError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    log::debug!("wrote {}", path.display());
    Ok(())
}
