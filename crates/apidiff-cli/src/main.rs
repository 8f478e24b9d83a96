//! apidiff CLI
//!
//! Command-line interface for importing API definitions and comparing versions

use apidiff_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "apidiff")]
#[command(about = "apidiff - Versioned mock API definitions and breaking-change detection", long_about = None)]
struct Cli {
    /// Emit operation logs to stderr in the given format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import a definition file as the latest version of its API
    Import(commands::import::ImportArgs),
    /// Version management
    Version(commands::version::VersionArgs),
    /// List the versions of an API
    Versions(commands::version::ListArgs),
    /// Compare two versions of an API
    Compare(commands::compare::CompareArgs),
    /// Compare a version against the latest version
    CompareLatest(commands::compare::CompareLatestArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Pretty) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let result = match cli.command {
        Commands::Import(args) => commands::import::execute(args),
        Commands::Version(args) => commands::version::execute(args),
        Commands::Versions(args) => commands::version::execute_list(args),
        Commands::Compare(args) => commands::compare::execute(args),
        Commands::CompareLatest(args) => commands::compare::execute_latest(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
