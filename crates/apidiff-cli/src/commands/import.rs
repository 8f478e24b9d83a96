//! Import command
//!
//! Usage: apidiff import <FILE> [--dry-run]

use super::StoreArgs;
use apidiff_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to a JSON or YAML definition file
    pub path: PathBuf,

    /// Validate the file and print its digest without writing
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Execute import
pub fn execute(args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = args.store.open()?;

    println!("Importing {}...", args.path.display());
    let cmd = EngineCommand::ImportApiFile {
        path: args.path,
        workspace: args.store.workspace.clone(),
        dry_run: args.dry_run,
    };

    match apply_engine_command(cmd, &mut conn)? {
        EngineCommandResult::Imported { outcome, dry_run } => {
            if dry_run {
                println!("Dry run (nothing written):");
            } else {
                println!("✓ Imported {} {}", outcome.api.slug, outcome.version);
            }
            println!("  name: {}", outcome.name);
            println!("  version: {}", outcome.version);
            println!("  endpoints: {}", outcome.endpoint_count);
            println!("  digest: {}", outcome.definition_digest);
            Ok(())
        }
        other => Err(format!("unexpected engine result: {:?}", other).into()),
    }
}
