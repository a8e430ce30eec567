#![deny(missing_docs)]

//! # Fragment Merging
//!
//! Shallow union of a fragment into the accumulator document at four
//! recognized locations:
//!
//! - `paths`
//! - `definitions` (Swagger 2.0)
//! - `components.schemas` (OpenAPI 3.x)
//! - `x-webhooks`
//!
//! Within each location the later fragment wins per inner key. Nothing is
//! merged recursively and every other fragment key is ignored.

use serde_json::{Map, Value};

/// Recognized locations in merge order: `(top-level key, nested key)`.
pub const MERGE_SECTIONS: [(&str, Option<&str>); 4] = [
    ("paths", None),
    ("definitions", None),
    ("components", Some("schemas")),
    ("x-webhooks", None),
];

/// Merges the recognized sections of `fragment` into `target`.
///
/// Overwritten keys keep their position; new keys are appended.
pub fn merge_fragment(target: &mut Map<String, Value>, fragment: &Value) {
    let Some(fragment) = fragment.as_object() else {
        log::debug!("ignoring non-mapping fragment");
        return;
    };

    for (key, nested) in MERGE_SECTIONS {
        match nested {
            None => {
                if let Some(entries) = non_empty_mapping(fragment, key) {
                    with_mapping(target, key, |slot| union_into(slot, entries));
                }
            }
            Some(inner) => {
                if let Some(entries) = fragment
                    .get(key)
                    .and_then(Value::as_object)
                    .and_then(|parent| non_empty_mapping(parent, inner))
                {
                    with_mapping(target, key, |parent| {
                        with_mapping(parent, inner, |slot| union_into(slot, entries));
                    });
                }
            }
        }
    }
}

/// Ensures `paths` and `definitions` are present mappings, turning `null`
/// (or any non-mapping value) into `{}`.
pub fn normalize_document(document: &mut Map<String, Value>) {
    for key in ["paths", "definitions"] {
        with_mapping(document, key, |_| {});
    }
}

/// Number of entries under `paths`.
pub fn path_count(document: &Map<String, Value>) -> usize {
    document
        .get("paths")
        .and_then(Value::as_object)
        .map_or(0, Map::len)
}

fn non_empty_mapping<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    match map.get(key)? {
        Value::Object(entries) if !entries.is_empty() => Some(entries),
        Value::Object(_) | Value::Null => None,
        other => {
            log::debug!("ignoring `{key}`: expected a mapping, found {}", kind(other));
            None
        }
    }
}

/// Runs `f` on the mapping stored at `key`, creating it (or replacing a
/// non-mapping value with an empty one) first.
fn with_mapping(map: &mut Map<String, Value>, key: &str, f: impl FnOnce(&mut Map<String, Value>)) {
    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(inner) = slot {
        f(inner);
    }
}

fn union_into(target: &mut Map<String, Value>, entries: &Map<String, Value>) {
    for (key, value) in entries {
        target.insert(key.clone(), value.clone());
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
