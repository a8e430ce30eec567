#![deny(missing_docs)]

//! # Fragment Loading
//!
//! Reads YAML base documents and JSON fragments into `serde_json::Value`.
//!
//! Fragment files are often hand-edited and carry literal newlines or tabs
//! inside description strings. Strict JSON rejects those, so string literals
//! are re-escaped before parsing.

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn read_file(path: &Path) -> AppResult<String> {
    log::debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Empty and `null` documents load as an empty mapping.
fn empty_if_null(value: Value) -> Value {
    match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

/// Loads a YAML file using safe (data-only) parsing.
///
/// `<<` merge keys are resolved. An empty file, or one containing only
/// comments, yields `{}`.
pub fn load_yaml(path: &Path) -> AppResult<Value> {
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let yaml_error = |source| AppError::Yaml {
        path: path.to_path_buf(),
        source,
    };
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(&content).map_err(yaml_error)?;
    yaml.apply_merge().map_err(yaml_error)?;
    let value = serde_json::to_value(yaml).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(empty_if_null(value))
}

/// Loads a YAML file if it exists; a missing file is not an error.
pub fn load_optional_yaml(path: &Path) -> AppResult<Option<Value>> {
    if !path.exists() {
        log::debug!("optional file {} not present", path.display());
        return Ok(None);
    }
    load_yaml(path).map(Some)
}

/// Loads a JSON fragment, tolerating raw control characters inside strings.
pub fn load_json(path: &Path) -> AppResult<Value> {
    let content = read_file(path)?;
    let sanitized = escape_control_characters(&content);
    let value: Value = serde_json::from_str(&sanitized).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(empty_if_null(value))
}

/// Rewrites control characters (U+0000..U+001F) found inside JSON string
/// literals as escape sequences. Text outside string literals is untouched.
///
/// Returns the input unchanged (borrowed) when nothing needed escaping.
pub fn escape_control_characters(input: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in input.char_indices() {
        if in_string && !escaped && (ch as u32) < 0x20 {
            let buf = out.get_or_insert_with(|| {
                let mut s = String::with_capacity(input.len() + 16);
                s.push_str(&input[..idx]);
                s
            });
            push_escape(buf, ch);
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        }

        if let Some(buf) = out.as_mut() {
            buf.push(ch);
        }
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(input),
    }
}

fn push_escape(buf: &mut String, ch: char) {
    match ch {
        '\n' => buf.push_str("\\n"),
        '\r' => buf.push_str("\\r"),
        '\t' => buf.push_str("\\t"),
        '\u{08}' => buf.push_str("\\b"),
        '\u{0c}' => buf.push_str("\\f"),
        other => {
            // Writing to a String cannot fail.
            let _ = write!(buf, "\\u{:04x}", other as u32);
        }
    }
}
