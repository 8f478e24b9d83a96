//! Subcommand implementations

pub mod compare;
pub mod import;
pub mod version;

use clap::Args;
use std::path::PathBuf;

/// Store location and workspace, shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// SQLite store path
    #[arg(long, default_value = ".apidiff/store.db")]
    pub db: PathBuf,

    /// Workspace that owns the APIs
    #[arg(long, default_value = "default")]
    pub workspace: String,
}

impl StoreArgs {
    /// Open (and migrate) the store, creating it if absent
    pub fn open(&self) -> apidiff_store::Result<rusqlite::Connection> {
        apidiff_store::db::open_store(&self.db)
    }

    /// Open a store that must already exist; read-only subcommands use this
    pub fn open_existing(&self) -> apidiff_store::Result<rusqlite::Connection> {
        apidiff_store::db::open_existing_store(&self.db)
    }

    pub fn api(&self, slug: &str) -> apidiff_core::model::ApiIdentity {
        apidiff_core::model::ApiIdentity::new(self.workspace.clone(), slug)
    }
}
