#![deny(missing_docs)]

//! # apispec-build
//!
//! Merges `api-specs/` fragments into `openapi-public.json` and
//! `openapi-internal.json`.
//!
//! ```text
//! apispec-build            # both documents
//! apispec-build public     # public only
//! apispec-build internal   # internal only
//! ```

use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

use crate::build::{BuildArgs, ConsoleProgress};

mod build;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Assemble modular OpenAPI fragments into public and internal documents"
)]
struct Cli {
    #[clap(flatten)]
    build: BuildArgs,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match build::execute(&cli.build, &mut ConsoleProgress) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Build failed: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Target;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_target_defaults_to_all() {
        let cli = Cli::try_parse_from(["apispec-build"]).unwrap();
        assert_eq!(cli.build.target, Target::All);
    }

    #[test]
    fn test_target_parsing() {
        let cli = Cli::try_parse_from(["apispec-build", "internal"]).unwrap();
        assert_eq!(cli.build.target, Target::Internal);
        assert!(Cli::try_parse_from(["apispec-build", "everything"]).is_err());
    }
}
