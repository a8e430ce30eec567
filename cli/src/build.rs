#![deny(missing_docs)]

//! # Build Command
//!
//! Runs the public and/or internal assembly and writes each document to the
//! project root, narrating progress on stdout.

use apispec_core::{
    build, write_document, AppResult, BuildEvent, ProgressSink, ProjectLayout, Variant,
};
use clap::ValueEnum;
use std::path::PathBuf;

const RULE: &str = "==================================================";

/// Which documents to build.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Public, then internal.
    #[default]
    All,
    /// `openapi-public.json` only.
    Public,
    /// `openapi-internal.json` only.
    Internal,
}

impl Target {
    /// Variants to build, in order.
    pub fn variants(self) -> &'static [Variant] {
        match self {
            Target::All => &[Variant::Public, Variant::Internal],
            Target::Public => &[Variant::Public],
            Target::Internal => &[Variant::Internal],
        }
    }
}

/// Arguments for the build.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Documents to build.
    #[clap(value_enum, default_value_t = Target::All)]
    pub target: Target,

    /// Project root containing `api-specs/`; outputs are written here.
    #[clap(long, env = "APISPEC_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,
}

/// Prints each build event as one console line.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, event: BuildEvent) {
        println!("{event}");
    }
}

/// Executes the build.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `progress` - Receives merge/skip events as fragments are processed.
///
/// Returns the paths written, in build order.
pub fn execute(args: &BuildArgs, progress: &mut impl ProgressSink) -> AppResult<Vec<PathBuf>> {
    println!("{RULE}");
    println!("OpenAPI Build");
    println!("{RULE}");

    let layout = ProjectLayout::new(&args.project_root);
    log::info!("project root: {}", layout.root().display());

    let mut written = Vec::new();
    for &variant in args.target.variants() {
        let outcome = build(variant, &layout, progress)?;
        let output = layout.output_path(variant);
        write_document(&output, &outcome.document)?;
        println!("✓ Generated: {}", output.display());
        println!("  Paths: {}", outcome.path_count());
        written.push(output);
    }

    println!("\n✅ Build complete!");
    Ok(written)
}
