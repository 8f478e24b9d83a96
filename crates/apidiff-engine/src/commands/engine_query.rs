//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for version listings and
//! comparisons. It takes a shared connection and never writes.

#![allow(clippy::result_large_err)]

use apidiff_core::diff::model::ApiDiffResult;
use apidiff_core::model::{ApiIdentity, VersionSummary};
use apidiff_core::{compare_versions, compare_with_latest, get_versions, render_human_summary};
use apidiff_core::{log_op_end, log_op_error, log_op_start};
use apidiff_store::errors::Result;
use apidiff_store::SqliteRegistry;

use super::context::RequestContext;
use rusqlite::Connection;
use serde::Serialize;

// ---------------------------------------------------------------------------
// EngineQuery
// ---------------------------------------------------------------------------

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// List every version of an API, most recent first.
    ListVersions { api: ApiIdentity },
    /// Diff two named versions of the same API.
    CompareVersions {
        api: ApiIdentity,
        from: String,
        to: String,
    },
    /// Diff a named version against the API's latest version.
    CompareWithLatest { api: ApiIdentity, version: String },
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Result of a `ListVersions` query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionListResult {
    pub api: ApiIdentity,
    pub versions: Vec<VersionSummary>,
    pub total: usize,
}

/// Result of a comparison query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Machine-readable structured diff
    pub diff: ApiDiffResult,
    pub has_breaking_changes: bool,
    /// One-line verdict
    pub message: String,
    /// Label of the version compared against, for `CompareWithLatest`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    /// Human-readable Markdown summary
    #[serde(skip)]
    pub human_summary: String,
}

impl ComparisonResult {
    fn from_diff(diff: ApiDiffResult, latest_version: Option<String>) -> Self {
        let human_summary = render_human_summary(&diff);
        ComparisonResult {
            has_breaking_changes: diff.has_breaking_changes(),
            message: breaking_message(diff.breaking_changes_count),
            latest_version,
            human_summary,
            diff,
        }
    }
}

/// All possible results from `apply_engine_query`.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    VersionList(VersionListResult),
    Comparison(Box<ComparisonResult>),
}

/// Verdict line for a comparison with `count` breaking changes.
pub fn breaking_message(count: usize) -> String {
    if count > 0 {
        format!("Found {} breaking change(s)", count)
    } else {
        "No breaking changes detected".to_string()
    }
}

// ---------------------------------------------------------------------------
// apply_engine_query
// ---------------------------------------------------------------------------

/// Apply a read-only engine query under a fresh [`RequestContext`].
///
/// # Errors
///
/// - `NotFound` if the API, a named version, or a latest version is missing
/// - `Persistence` or `Serialization` if the store cannot be read
pub fn apply_engine_query(query: EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    apply_engine_query_in(query, conn, &RequestContext::new())
}

/// Apply a read-only engine query, tagging log events and errors with `ctx`.
///
/// # Errors
///
/// See [`apply_engine_query`].
pub fn apply_engine_query_in(
    query: EngineQuery,
    conn: &Connection,
    ctx: &RequestContext,
) -> Result<EngineQueryResult> {
    let registry = SqliteRegistry::new(conn);

    match query {
        // ── ListVersions ──────────────────────────────────────────────────────
        EngineQuery::ListVersions { api } => {
            log_op_start!(
                "list_versions",
                request_id = %ctx.request_id,
                trace_id = ctx.trace_str(),
                workspace = %api.workspace,
                slug = %api.slug
            );
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let versions = get_versions(&registry, &api)?;
                Ok(EngineQueryResult::VersionList(VersionListResult {
                    total: versions.len(),
                    api: api.clone(),
                    versions,
                }))
            })()
            .map_err(|e| ctx.tag(e));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => {
                    log_op_end!(
                        "list_versions",
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    )
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!(
                        "list_versions",
                        e_clone,
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    );
                }
            }
            result
        }

        // ── CompareVersions ───────────────────────────────────────────────────
        EngineQuery::CompareVersions { api, from, to } => {
            log_op_start!(
                "compare",
                request_id = %ctx.request_id,
                trace_id = ctx.trace_str(),
                slug = %api.slug,
                from_version = %from,
                to_version = %to
            );
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let diff = compare_versions(&registry, &api, &from, &to)?;
                Ok(EngineQueryResult::Comparison(Box::new(
                    ComparisonResult::from_diff(diff, None),
                )))
            })()
            .map_err(|e| ctx.tag(e));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => {
                    log_op_end!(
                        "compare",
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    )
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!(
                        "compare",
                        e_clone,
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    );
                }
            }
            result
        }

        // ── CompareWithLatest ─────────────────────────────────────────────────
        EngineQuery::CompareWithLatest { api, version } => {
            log_op_start!(
                "compare_latest",
                request_id = %ctx.request_id,
                trace_id = ctx.trace_str(),
                slug = %api.slug,
                version = %version
            );
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let cmp = compare_with_latest(&registry, &api, &version)?;
                Ok(EngineQueryResult::Comparison(Box::new(
                    ComparisonResult::from_diff(cmp.diff, Some(cmp.latest_version)),
                )))
            })()
            .map_err(|e| ctx.tag(e));

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => {
                    log_op_end!(
                        "compare_latest",
                        duration_ms = elapsed,
                        request_id = %ctx.request_id
                    )
                }
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!(
                        "compare_latest",
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
