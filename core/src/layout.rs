#![deny(missing_docs)]

//! # Project Layout
//!
//! Resolves every input and output location relative to a project root.
//!
//! ```text
//! <root>/
//!   api-specs/
//!     base/initial.yaml            public base (optional)
//!     base/initial_internal.yaml   internal base (optional)
//!     base/params.yaml             shared parameters (optional)
//!     public/<module>/*.json
//!     internal/<module>/*.json
//!     Models/*.json
//!   openapi-public.json            (generated)
//!   openapi-internal.json          (generated)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

const API_SPECS_DIR: &str = "api-specs";
const BASE_DIR: &str = "base";
const PUBLIC_DIR: &str = "public";
const INTERNAL_DIR: &str = "internal";
const MODELS_DIR: &str = "Models";

const PUBLIC_BASE_FILE: &str = "initial.yaml";
const INTERNAL_BASE_FILE: &str = "initial_internal.yaml";
const PARAMS_FILE: &str = "params.yaml";

/// The two documents the assembler produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Public modules plus shared models.
    Public,
    /// Internal modules, public modules not overridden by them, shared models.
    Internal,
}

impl Variant {
    /// File name of the generated document, relative to the project root.
    pub fn output_file_name(self) -> &'static str {
        match self {
            Variant::Public => "openapi-public.json",
            Variant::Internal => "openapi-internal.json",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Public => f.write_str("public"),
            Variant::Internal => f.write_str("internal"),
        }
    }
}

/// Resolved paths for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    specs: PathBuf,
}

impl ProjectLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let specs = root.join(API_SPECS_DIR);
        Self { root, specs }
    }

    /// The project root; generated documents land here.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn base_dir(&self) -> PathBuf {
        self.specs.join(BASE_DIR)
    }

    /// Base document for the public build.
    pub fn public_base(&self) -> PathBuf {
        self.base_dir().join(PUBLIC_BASE_FILE)
    }

    /// Preferred base document for the internal build.
    pub fn internal_base(&self) -> PathBuf {
        self.base_dir().join(INTERNAL_BASE_FILE)
    }

    /// Shared parameter definitions, attached under `parameters`.
    pub fn params(&self) -> PathBuf {
        self.base_dir().join(PARAMS_FILE)
    }

    /// Root holding one directory per public module.
    pub fn public_root(&self) -> PathBuf {
        self.specs.join(PUBLIC_DIR)
    }

    /// Root holding one directory per internal module.
    pub fn internal_root(&self) -> PathBuf {
        self.specs.join(INTERNAL_DIR)
    }

    /// Directory of shared model fragments.
    pub fn models_root(&self) -> PathBuf {
        self.specs.join(MODELS_DIR)
    }

    /// Where the document for `variant` is written.
    pub fn output_path(&self, variant: Variant) -> PathBuf {
        self.root.join(variant.output_file_name())
    }
}
