//! SQLite implementation of the core registry traits

#![allow(clippy::result_large_err)]

use apidiff_core::errors::ExError;
use apidiff_core::model::{ApiIdentity, VersionSnapshot, VersionSummary};
use apidiff_core::registry::{SnapshotLoader, VersionRegistry};
use rusqlite::Connection;

use crate::repo::hydration::{list_version_rows, load_snapshot};

/// Read-only registry over a borrowed connection
pub struct SqliteRegistry<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRegistry<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl VersionRegistry for SqliteRegistry<'_> {
    fn list_versions(&self, api: &ApiIdentity) -> Result<Vec<VersionSummary>, ExError> {
        Ok(list_version_rows(self.conn, api)?
            .iter()
            .map(|row| row.to_summary())
            .collect())
    }
}

impl SnapshotLoader for SqliteRegistry<'_> {
    fn load_snapshot(
        &self,
        api: &ApiIdentity,
        version: &str,
    ) -> Result<Option<VersionSnapshot>, ExError> {
        load_snapshot(self.conn, api, version)
    }
}
