#![deny(missing_docs)]

//! # Fragment Discovery
//!
//! Lists module directories and their JSON fragments in the order they are
//! merged. Ordering is lexicographic by file name bytes and decides which
//! fragment wins a key collision, so callers must not reorder the results.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const FRAGMENT_EXTENSION: &str = ".json";

/// A fragment file found under a module (or the models) directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// File name, e.g. `1_Invoice.json`.
    pub file_name: String,
}

impl FragmentFile {
    /// Submodule identity of this fragment (ordering prefix stripped).
    pub fn submodule(&self) -> &str {
        submodule_name(&self.file_name)
    }
}

/// A module directory and its fragments, both in merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDir {
    /// Directory name; identifies the module.
    pub name: String,
    /// Directory path.
    pub path: PathBuf,
    /// `*.json` fragments, sorted by file name.
    pub fragments: Vec<FragmentFile>,
}

/// Strips an optional leading `<digits>_` ordering prefix.
///
/// `1_Task.json` becomes `Task.json`; `Task.json`, `_Task.json` and
/// `v1_Task.json` are returned unchanged.
pub fn submodule_name(file_name: &str) -> &str {
    match file_name.split_once('_') {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) => {
            rest
        }
        _ => file_name,
    }
}

/// Sorted directory entries one level below `dir`. A missing `dir` yields nothing.
fn sorted_children(dir: &Path) -> AppResult<Vec<walkdir::DirEntry>> {
    if !dir.is_dir() {
        log::debug!("{} not present, nothing to list", dir.display());
        return Ok(Vec::new());
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.map_err(|e| walk_error(dir, e)))
        .collect()
}

fn walk_error(dir: &Path, err: walkdir::Error) -> AppError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    match err.into_io_error() {
        Some(source) => AppError::Read { path, source },
        None => AppError::General(format!("Failed to list {:?}", path)),
    }
}

fn entry_name(entry: &walkdir::DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Lists `*.json` fragment files directly inside `dir`, sorted by name.
///
/// Hidden files (leading `.`) and anything that is not a regular file are skipped.
pub fn list_fragments(dir: &Path) -> AppResult<Vec<FragmentFile>> {
    let fragments = sorted_children(dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let file_name = entry_name(&entry);
            let visible = !file_name.starts_with('.');
            (visible && file_name.ends_with(FRAGMENT_EXTENSION)).then(|| FragmentFile {
                path: entry.into_path(),
                file_name,
            })
        })
        .collect();
    Ok(fragments)
}

/// Lists every module directory under `root` with its fragments, sorted by name.
pub fn list_modules(root: &Path) -> AppResult<Vec<ModuleDir>> {
    let mut modules = Vec::new();
    for entry in sorted_children(root)? {
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry_name(&entry);
        let path = entry.into_path();
        let fragments = list_fragments(&path)?;
        log::debug!("module {name}: {} fragment(s)", fragments.len());
        modules.push(ModuleDir {
            name,
            path,
            fragments,
        });
    }
    Ok(modules)
}
