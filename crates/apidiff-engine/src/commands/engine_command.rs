//! Engine-level commands that write to the store.

#![allow(clippy::result_large_err)]

use apidiff_core::model::{ApiIdentity, VersionSummary};
use apidiff_core::{log_op_end, log_op_error, log_op_start};
use apidiff_store::errors::Result;
use apidiff_store::import::{
    compute_definition_digest, import_api_file, parse_api_file, ImportOutcome,
};
use apidiff_store::SqliteRepo;
use rusqlite::Connection;
use std::path::PathBuf;

use super::context::RequestContext;

/// Engine-level commands that require database writes.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Import a definition file as the new latest version of its API.
    ImportApiFile {
        path: PathBuf,
        workspace: String,
        /// Validate and digest the file without writing anything.
        dry_run: bool,
    },
    /// Clone a version under a new label and make the clone latest.
    CreateVersion {
        api: ApiIdentity,
        new_version: String,
        /// Version to clone; None clones the current latest.
        source: Option<String>,
    },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    /// The file was imported, or validated when `dry_run` was set.
    Imported { outcome: ImportOutcome, dry_run: bool },
    /// A version was created.
    VersionCreated(VersionSummary),
}

/// Apply an engine command under a fresh [`RequestContext`].
///
/// # Errors
///
/// - `Io` if an import file cannot be read
/// - `InvalidInput` if an import file fails validation
/// - `AlreadyExists` if the target version label is taken
/// - `NotFound` if the API or source version of `CreateVersion` is missing
pub fn apply_engine_command(cmd: EngineCommand, conn: &mut Connection) -> Result<EngineCommandResult> {
    apply_engine_command_in(cmd, conn, &RequestContext::new())
}

/// Apply an engine command, tagging log events and errors with `ctx`.
///
/// # Errors
///
/// See [`apply_engine_command`].
pub fn apply_engine_command_in(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::ImportApiFile {
            path,
            workspace,
            dry_run,
        } => {
            log_op_start!(
                "import",
                request_id = %ctx.request_id,
                trace_id = ctx.trace_str(),
                path = %path.display(),
                dry_run = dry_run
            );
            let start = std::time::Instant::now();

            let outcome = if dry_run {
                validate_api_file(&path, &workspace)
            } else {
                import_api_file(&path, &workspace, conn)
            };
            let result = outcome
                .map(|outcome| EngineCommandResult::Imported { outcome, dry_run })
                .map_err(|e| ctx.tag(e));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => {
                    log_op_end!(
                        "import",
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    )
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!(
                        "import",
                        e_clone,
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    );
                }
            }
            result
        }

        EngineCommand::CreateVersion {
            api,
            new_version,
            source,
        } => {
            log_op_start!(
                "version_create",
                request_id = %ctx.request_id,
                trace_id = ctx.trace_str(),
                slug = %api.slug,
                new_version = %new_version
            );
            let start = std::time::Instant::now();

            let result = SqliteRepo::create_version(conn, &api, &new_version, source.as_deref())
                .map(EngineCommandResult::VersionCreated)
                .map_err(|e| ctx.tag(e));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => {
                    log_op_end!(
                        "version_create",
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    )
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!(
                        "version_create",
                        e_clone,
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    );
                }
            }
            result
        }
    }
}

/// What an import of `path` would write, without touching the store
fn validate_api_file(path: &std::path::Path, workspace: &str) -> Result<ImportOutcome> {
    let file = parse_api_file(path)?;
    Ok(ImportOutcome {
        api: ApiIdentity::new(workspace, file.api.slug.clone()),
        name: file.api.name.clone(),
        version: file.api.version_or_default().to_string(),
        endpoint_count: file.endpoints.len(),
        definition_digest: compute_definition_digest(&file),
    })
}
