//! Version commands
//!
//! Usage:
//!   apidiff version create --api <SLUG> --new-version <LABEL> [--from <LABEL>]
//!   apidiff versions --api <SLUG> [--json]

use super::StoreArgs;
use apidiff_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use apidiff_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Clone a version under a new label and make it latest
    Create(CreateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// API slug
    #[arg(long)]
    pub api: String,

    /// Label for the new version
    #[arg(long)]
    pub new_version: String,

    /// Version to clone (default: the latest version)
    #[arg(long)]
    pub from: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// API slug
    #[arg(long)]
    pub api: String,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Execute version command
pub fn execute(args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        VersionCommand::Create(create_args) => execute_create(create_args),
    }
}

fn execute_create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = args.store.open()?;
    let cmd = EngineCommand::CreateVersion {
        api: args.store.api(&args.api),
        new_version: args.new_version,
        source: args.from,
    };

    match apply_engine_command(cmd, &mut conn)? {
        EngineCommandResult::VersionCreated(summary) => {
            println!("Version created:");
            println!("  version: {}", summary.version);
            println!("  endpoints: {}", summary.endpoint_count);
            println!("  latest: {}", summary.is_latest);
            Ok(())
        }
        other => Err(format!("unexpected engine result: {:?}", other).into()),
    }
}

/// Execute versions listing
pub fn execute_list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = args.store.open_existing()?;
    let query = EngineQuery::ListVersions {
        api: args.store.api(&args.api),
    };

    let EngineQueryResult::VersionList(list) = apply_engine_query(query, &conn)? else {
        return Err("unexpected engine result".into());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{} ({} versions)", list.api.slug, list.total);
    for v in &list.versions {
        let marker = if v.is_latest { " (latest)" } else { "" };
        println!(
            "  {}{}  {} endpoints  {}",
            v.version,
            marker,
            v.endpoint_count,
            v.created_at.to_rfc3339()
        );
    }
    Ok(())
}
