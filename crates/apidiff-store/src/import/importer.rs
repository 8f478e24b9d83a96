//! Importer orchestration
//!
//! Stores a validated definition file as the new latest version of
//! `(workspace, api.slug)` and records the import in `import_log`.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::import::digest::compute_definition_digest;
use crate::import::format::ApiDefinitionFile;
use crate::import::parser::parse_api_file;
use crate::repo::SqliteRepo;
use apidiff_core::model::{ApiIdentity, VersionSnapshot};
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// What an import wrote
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub api: ApiIdentity,
    pub name: String,
    pub version: String,
    pub endpoint_count: usize,
    pub definition_digest: String,
}

/// Import a definition file into `workspace`
///
/// 1. Parses and validates the file (JSON by `.json` extension, else YAML)
/// 2. Computes the definition digest
/// 3. Persists the endpoints as a new latest version, within a transaction
/// 4. Records the import in `import_log`
///
/// # Errors
///
/// - `Io` if the file cannot be read
/// - `InvalidInput` if the file fails validation
/// - `AlreadyExists` if the version label is taken
/// - `Persistence` on SQLite failure
pub fn import_api_file(path: &Path, workspace: &str, conn: &mut Connection) -> Result<ImportOutcome> {
    let file = parse_api_file(path)?;
    import_definition(&file, workspace, Some(&path.display().to_string()), conn)
}

/// Import an already parsed definition
///
/// # Errors
///
/// See [`import_api_file`].
pub fn import_definition(
    file: &ApiDefinitionFile,
    workspace: &str,
    source: Option<&str>,
    conn: &mut Connection,
) -> Result<ImportOutcome> {
    let digest = compute_definition_digest(file);
    let api = ApiIdentity::new(workspace, file.api.slug.clone());
    let version = file.api.version_or_default().to_string();
    let snapshot = VersionSnapshot::new(version.clone(), Utc::now(), file.endpoints.clone());
    let meta = file.api.to_version_meta();

    let tx = conn.transaction().map_err(from_rusqlite)?;

    let version_id = SqliteRepo::insert_version_tx(&tx, &api, &meta, &snapshot, true, None)
        .map_err(|e| e.with_op("import_api_file"))?;

    tx.execute(
        "INSERT INTO import_log (api_version_id, definition_digest, source, imported_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![version_id, digest, source, Utc::now().timestamp_millis()],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        workspace = %api.workspace,
        api_slug = %api.slug,
        version = %version,
        endpoints = snapshot.endpoint_count(),
        digest = %digest,
        "definition imported"
    );

    Ok(ImportOutcome {
        api,
        name: meta.name,
        version,
        endpoint_count: snapshot.endpoint_count(),
        definition_digest: digest,
    })
}
