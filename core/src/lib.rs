#![deny(missing_docs)]

//! # apispec core
//!
//! Assembles modular OpenAPI fragments (YAML bases plus per-module JSON
//! files) into a public and an internal document.

/// Shared error types.
pub mod error;

/// Input and output locations.
pub mod layout;

/// YAML / JSON file loading.
pub mod loader;

/// Fragment merging rules.
pub mod merge;

/// Module and fragment discovery.
pub mod discovery;

/// Public / internal document builders.
pub mod assemble;

/// Document serialization.
pub mod writer;

pub use assemble::{
    build, build_internal, build_public, BuildEvent, BuildOutcome, FragmentOrigin, ProgressSink,
    SubmoduleRegistry,
};
pub use discovery::{list_fragments, list_modules, submodule_name, FragmentFile, ModuleDir};
pub use error::{AppError, AppResult};
pub use layout::{ProjectLayout, Variant};
pub use loader::{escape_control_characters, load_json, load_optional_yaml, load_yaml};
pub use merge::{merge_fragment, normalize_document};
pub use writer::{serialize_document, write_document};
