//! Compare commands
//!
//! Usage:
//!   apidiff compare --api <SLUG> --from <LABEL> --to <LABEL> [--json]
//!   apidiff compare-latest --api <SLUG> --version <LABEL> [--json]

use super::StoreArgs;
use apidiff_engine::commands::engine_query::{
    apply_engine_query, ComparisonResult, EngineQuery, EngineQueryResult,
};
use clap::Args;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// API slug
    #[arg(long)]
    pub api: String,

    /// Baseline version
    #[arg(long)]
    pub from: String,

    /// Candidate version
    #[arg(long)]
    pub to: String,

    /// Print the structured result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Debug, Args)]
pub struct CompareLatestArgs {
    /// API slug
    #[arg(long)]
    pub api: String,

    /// Version to compare against the latest
    #[arg(long)]
    pub version: String,

    /// Print the structured result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Execute compare
pub fn execute(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = args.store.open_existing()?;
    let query = EngineQuery::CompareVersions {
        api: args.store.api(&args.api),
        from: args.from,
        to: args.to,
    };
    print_comparison(apply_engine_query(query, &conn)?, args.json)
}

/// Execute compare-latest
pub fn execute_latest(args: CompareLatestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = args.store.open_existing()?;
    let query = EngineQuery::CompareWithLatest {
        api: args.store.api(&args.api),
        version: args.version,
    };
    print_comparison(apply_engine_query(query, &conn)?, args.json)
}

fn print_comparison(
    result: EngineQueryResult,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let EngineQueryResult::Comparison(cmp) = result else {
        return Err("unexpected engine result".into());
    };
    let cmp: ComparisonResult = *cmp;

    if json {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
    } else {
        print!("{}", cmp.human_summary);
        println!();
        println!("{}", cmp.message);
    }
    Ok(())
}
