#![deny(missing_docs)]

//! # Document Assembly
//!
//! Builds the public and internal documents from a [`ProjectLayout`].
//!
//! 1. **Base**: load the variant's base YAML, normalize `paths` /
//!    `definitions`, attach `params.yaml` under `parameters`.
//! 2. **Modules**: fold module fragments into the document. The internal
//!    build merges internal modules first and records each
//!    `(module, submodule)` pair; public fragments for a recorded pair are
//!    skipped without being read.
//! 3. **Models**: fold every shared model fragment, for both variants.
//!
//! Progress is reported through a [`ProgressSink`] supplied by the caller.

use crate::discovery::{list_fragments, list_modules, FragmentFile};
use crate::error::{AppError, AppResult};
use crate::layout::{ProjectLayout, Variant};
use crate::loader::{load_json, load_optional_yaml};
use crate::merge::{merge_fragment, normalize_document, path_count};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// Directory label used in progress output for shared models.
pub const MODELS_LABEL: &str = "Models";

/// Which fragment root a merged file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentOrigin {
    /// `api-specs/public/<module>/`.
    Public,
    /// `api-specs/internal/<module>/`.
    Internal,
    /// `api-specs/Models/`.
    Models,
}

/// A progress record emitted while a document is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A build for the variant is starting.
    Started(Variant),
    /// A fragment was merged into the document.
    Merged {
        /// The document being built.
        variant: Variant,
        /// Root the fragment was found under.
        origin: FragmentOrigin,
        /// Module directory name (`Models` for shared models).
        module: String,
        /// Fragment file name.
        file_name: String,
    },
    /// A public fragment was skipped because an internal one covers it.
    Skipped {
        /// Module directory name.
        module: String,
        /// Fragment file name.
        file_name: String,
    },
}

impl fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildEvent::Started(Variant::Public) => write!(f, "\n📦 Building PUBLIC API..."),
            BuildEvent::Started(Variant::Internal) => write!(f, "\n🔒 Building INTERNAL API..."),
            BuildEvent::Merged {
                origin: FragmentOrigin::Models,
                module,
                file_name,
                ..
            }
            | BuildEvent::Merged {
                variant: Variant::Public,
                module,
                file_name,
                ..
            } => write!(f, "  + {module}/{file_name}"),
            BuildEvent::Merged {
                origin,
                module,
                file_name,
                ..
            } => {
                let tag = match origin {
                    FragmentOrigin::Internal => "internal",
                    _ => "public",
                };
                write!(f, "  + ({tag}) {module}/{file_name}")
            }
            BuildEvent::Skipped { module, file_name } => {
                write!(f, "  - (skip) {module}/{file_name}")
            }
        }
    }
}

/// Receives progress events in merge order.
pub trait ProgressSink {
    /// Called once per event.
    fn report(&mut self, event: BuildEvent);
}

impl ProgressSink for Vec<BuildEvent> {
    fn report(&mut self, event: BuildEvent) {
        self.push(event);
    }
}

/// `(module, submodule)` pairs already merged from the internal root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmoduleRegistry {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl SubmoduleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pair. Returns `false` if it was already present.
    pub fn register(&mut self, module: &str, submodule: &str) -> bool {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(submodule.to_string())
    }

    /// Whether the pair has been recorded.
    pub fn contains(&self, module: &str, submodule: &str) -> bool {
        self.modules
            .get(module)
            .is_some_and(|subs| subs.contains(submodule))
    }

    /// Total number of recorded pairs.
    pub fn len(&self) -> usize {
        self.modules.values().map(BTreeSet::len).sum()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished document.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Which document this is.
    pub variant: Variant,
    /// The assembled document, keys in merge order.
    pub document: Map<String, Value>,
}

impl BuildOutcome {
    /// Number of entries under `paths`.
    pub fn path_count(&self) -> usize {
        path_count(&self.document)
    }
}

/// Builds the document for `variant`.
pub fn build(
    variant: Variant,
    layout: &ProjectLayout,
    progress: &mut impl ProgressSink,
) -> AppResult<BuildOutcome> {
    match variant {
        Variant::Public => build_public(layout, progress),
        Variant::Internal => build_internal(layout, progress),
    }
}

/// Public document: base + public modules + models. Never reads the internal root.
pub fn build_public(
    layout: &ProjectLayout,
    progress: &mut impl ProgressSink,
) -> AppResult<BuildOutcome> {
    let variant = Variant::Public;
    progress.report(BuildEvent::Started(variant));

    let base = layout.public_base();
    let mut document = initial_document(&base, layout)?;
    merge_public_modules(&mut document, layout, variant, None, progress)?;
    merge_models(&mut document, layout, variant, progress)?;

    Ok(BuildOutcome { variant, document })
}

/// Internal document: base + internal modules + uncovered public modules + models.
pub fn build_internal(
    layout: &ProjectLayout,
    progress: &mut impl ProgressSink,
) -> AppResult<BuildOutcome> {
    let variant = Variant::Internal;
    progress.report(BuildEvent::Started(variant));

    let mut base = layout.internal_base();
    if !base.exists() {
        base = layout.public_base();
    }
    let mut document = initial_document(&base, layout)?;
    let registry = merge_internal_modules(&mut document, layout, progress)?;
    log::debug!("{} internal submodule(s) registered", registry.len());
    merge_public_modules(&mut document, layout, variant, Some(&registry), progress)?;
    merge_models(&mut document, layout, variant, progress)?;

    Ok(BuildOutcome { variant, document })
}

/// Loads the base (if present), normalizes it and attaches shared parameters.
fn initial_document(base: &Path, layout: &ProjectLayout) -> AppResult<Map<String, Value>> {
    let mut document = match load_optional_yaml(base)? {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(AppError::InvalidDocument {
                path: base.to_path_buf(),
                reason: "base document must be a mapping".into(),
            })
        }
    };
    normalize_document(&mut document);

    if let Some(params) = load_optional_yaml(&layout.params())? {
        document.insert("parameters".to_string(), params);
    }
    Ok(document)
}

fn merge_file(document: &mut Map<String, Value>, fragment: &FragmentFile) -> AppResult<()> {
    let value = load_json(&fragment.path)?;
    merge_fragment(document, &value);
    Ok(())
}

fn merge_internal_modules(
    document: &mut Map<String, Value>,
    layout: &ProjectLayout,
    progress: &mut impl ProgressSink,
) -> AppResult<SubmoduleRegistry> {
    let mut registry = SubmoduleRegistry::new();
    for module in list_modules(&layout.internal_root())? {
        for fragment in &module.fragments {
            merge_file(document, fragment)?;
            registry.register(&module.name, fragment.submodule());
            progress.report(BuildEvent::Merged {
                variant: Variant::Internal,
                origin: FragmentOrigin::Internal,
                module: module.name.clone(),
                file_name: fragment.file_name.clone(),
            });
        }
    }
    Ok(registry)
}

fn merge_public_modules(
    document: &mut Map<String, Value>,
    layout: &ProjectLayout,
    variant: Variant,
    registry: Option<&SubmoduleRegistry>,
    progress: &mut impl ProgressSink,
) -> AppResult<()> {
    for module in list_modules(&layout.public_root())? {
        for fragment in &module.fragments {
            if registry.is_some_and(|r| r.contains(&module.name, fragment.submodule())) {
                progress.report(BuildEvent::Skipped {
                    module: module.name.clone(),
                    file_name: fragment.file_name.clone(),
                });
                continue;
            }
            merge_file(document, fragment)?;
            progress.report(BuildEvent::Merged {
                variant,
                origin: FragmentOrigin::Public,
                module: module.name.clone(),
                file_name: fragment.file_name.clone(),
            });
        }
    }
    Ok(())
}

fn merge_models(
    document: &mut Map<String, Value>,
    layout: &ProjectLayout,
    variant: Variant,
    progress: &mut impl ProgressSink,
) -> AppResult<()> {
    for fragment in list_fragments(&layout.models_root())? {
        merge_file(document, &fragment)?;
        progress.report(BuildEvent::Merged {
            variant,
            origin: FragmentOrigin::Models,
            module: MODELS_LABEL.to_string(),
            file_name: fragment.file_name,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join("api-specs").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_registry() {
        let mut registry = SubmoduleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("task", "Task.json"));
        assert!(!registry.register("task", "Task.json"));
        assert!(registry.contains("task", "Task.json"));
        assert!(!registry.contains("task", "Bulk.json"));
        assert!(!registry.contains("billing", "Task.json"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_event_display() {
        let merged = |variant, origin, module: &str| BuildEvent::Merged {
            variant,
            origin,
            module: module.to_string(),
            file_name: "1_Task.json".to_string(),
        };
        assert_eq!(
            merged(Variant::Public, FragmentOrigin::Public, "task").to_string(),
            "  + task/1_Task.json"
        );
        assert_eq!(
            merged(Variant::Internal, FragmentOrigin::Internal, "task").to_string(),
            "  + (internal) task/1_Task.json"
        );
        assert_eq!(
            merged(Variant::Internal, FragmentOrigin::Public, "task").to_string(),
            "  + (public) task/1_Task.json"
        );
        assert_eq!(
            merged(Variant::Internal, FragmentOrigin::Models, MODELS_LABEL).to_string(),
            "  + Models/1_Task.json"
        );
        let skipped = BuildEvent::Skipped {
            module: "task".into(),
            file_name: "2_Task.json".into(),
        };
        assert_eq!(skipped.to_string(), "  - (skip) task/2_Task.json");
    }

    #[test]
    fn test_empty_project_yields_normalized_documents() {
        let dir = tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let mut events: Vec<BuildEvent> = Vec::new();

        let public = build_public(&layout, &mut events).unwrap();
        assert_eq!(
            Value::Object(public.document),
            json!({"paths": {}, "definitions": {}})
        );
        let internal = build_internal(&layout, &mut events).unwrap();
        assert_eq!(
            Value::Object(internal.document),
            json!({"paths": {}, "definitions": {}})
        );
        assert_eq!(
            events,
            vec![
                BuildEvent::Started(Variant::Public),
                BuildEvent::Started(Variant::Internal)
            ]
        );
    }

    #[test]
    fn test_base_and_params() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "base/initial.yaml",
            "swagger: '2.0'\ninfo:\n  title: Public\npaths:\ndefinitions: {}\n",
        );
        write(dir.path(), "base/params.yaml", "limit:\n  name: limit\n  in: query\n");
        let layout = ProjectLayout::new(dir.path());

        let public = build_public(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(
            Value::Object(public.document),
            json!({
                "swagger": "2.0",
                "info": {"title": "Public"},
                "paths": {},
                "definitions": {},
                "parameters": {"limit": {"name": "limit", "in": "query"}}
            })
        );
    }

    #[test]
    fn test_internal_base_fallback_and_preference() {
        let dir = tempdir().unwrap();
        write(dir.path(), "base/initial.yaml", "info:\n  title: Public\n");
        let layout = ProjectLayout::new(dir.path());

        let internal = build_internal(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(internal.document["info"], json!({"title": "Public"}));

        write(dir.path(), "base/initial_internal.yaml", "info:\n  title: Internal\n");
        let internal = build_internal(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(internal.document["info"], json!({"title": "Internal"}));
        let public = build_public(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(public.document["info"], json!({"title": "Public"}));
    }

    #[test]
    fn test_base_must_be_mapping() {
        let dir = tempdir().unwrap();
        write(dir.path(), "base/initial.yaml", "- a\n- b\n");
        let layout = ProjectLayout::new(dir.path());
        let err = build_public(&layout, &mut Vec::<BuildEvent>::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument { .. }));
    }

    #[test]
    fn test_public_build_never_reads_internal() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "public/billing/1_Invoice.json",
            r#"{"paths": {"/invoices": {"get": {}}}}"#,
        );
        // Unparseable on purpose: reading it would fail the build.
        write(dir.path(), "internal/billing/1_Invoice.json", "{ not json");
        let layout = ProjectLayout::new(dir.path());

        let public = build_public(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(public.document["paths"], json!({"/invoices": {"get": {}}}));
        assert_eq!(public.path_count(), 1);
    }

    #[test]
    fn test_internal_overrides_public_submodule() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "internal/billing/1_Invoice.json",
            r#"{"paths": {"/invoices/{id}": {"get": {}}}}"#,
        );
        write(
            dir.path(),
            "public/billing/2_Invoice.json",
            r#"{"paths": {"/invoices": {"get": {}}}, "definitions": {"PublicOnly": {}}}"#,
        );
        write(
            dir.path(),
            "public/billing/3_Payment.json",
            r#"{"paths": {"/payments": {"get": {}}}}"#,
        );
        write(
            dir.path(),
            "Models/Invoice.json",
            r#"{"definitions": {"Invoice": {"type": "object"}}}"#,
        );
        let layout = ProjectLayout::new(dir.path());
        let mut events: Vec<BuildEvent> = Vec::new();

        let internal = build_internal(&layout, &mut events).unwrap();
        assert_eq!(
            Value::Object(internal.document),
            json!({
                "paths": {"/invoices/{id}": {"get": {}}, "/payments": {"get": {}}},
                "definitions": {"Invoice": {"type": "object"}}
            })
        );

        let lines: Vec<String> = events.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "\n🔒 Building INTERNAL API...",
                "  + (internal) billing/1_Invoice.json",
                "  - (skip) billing/2_Invoice.json",
                "  + (public) billing/3_Payment.json",
                "  + Models/Invoice.json",
            ]
        );
    }

    #[test]
    fn test_same_submodule_in_other_module_is_not_skipped() {
        let dir = tempdir().unwrap();
        write(dir.path(), "internal/billing/1_Export.json", r#"{"paths": {"/a": {}}}"#);
        write(dir.path(), "public/task/1_Export.json", r#"{"paths": {"/b": {}}}"#);
        write(dir.path(), "public/empty/.keep", "");
        fs::create_dir_all(dir.path().join("api-specs/internal/task")).unwrap();
        let layout = ProjectLayout::new(dir.path());

        let internal = build_internal(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(internal.document["paths"], json!({"/a": {}, "/b": {}}));
    }

    #[test]
    fn test_models_applied_after_modules() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "public/task/1_Task.json",
            r#"{"definitions": {"Task": {"title": "module"}}}"#,
        );
        write(
            dir.path(),
            "Models/Task.json",
            r#"{"definitions": {"Task": {"title": "model"}}, "components": {"schemas": {"Task": {}}}}"#,
        );
        let layout = ProjectLayout::new(dir.path());

        let public = build_public(&layout, &mut Vec::<BuildEvent>::new()).unwrap();
        assert_eq!(public.document["definitions"]["Task"]["title"], json!("model"));
        assert_eq!(public.document["components"], json!({"schemas": {"Task": {}}}));
    }

    #[test]
    fn test_malformed_fragment_aborts_with_path() {
        let dir = tempdir().unwrap();
        write(dir.path(), "public/task/1_Task.json", "{\"paths\": [}");
        let layout = ProjectLayout::new(dir.path());

        let err = build(Variant::Public, &layout, &mut Vec::<BuildEvent>::new()).unwrap_err();
        assert!(err.to_string().contains("1_Task.json"));
    }
}
