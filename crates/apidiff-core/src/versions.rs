//! Caller-facing version operations.
//!
//! Each operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

#![allow(clippy::result_large_err)]

use serde::{Deserialize, Serialize};

use crate::diff::engine::compute_diff;
use crate::diff::model::ApiDiffResult;
use crate::errors::{ApiDiffError, ExError};
use crate::model::{ApiIdentity, VersionSnapshot, VersionSummary};
use crate::registry::{SnapshotLoader, VersionRegistry};
use crate::{log_op_end, log_op_error, log_op_start};

/// A diff against whichever version is currently flagged latest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestComparison {
    pub latest_version: String,
    pub diff: ApiDiffResult,
}

/// Diff two versions of one logical API.
///
/// Comparing a version with itself succeeds and reports every endpoint as
/// unchanged.
///
/// # Errors
///
/// - `NotFound` if the API has no versions, or either version does not exist
/// - any error surfaced by the registry
pub fn compare_versions<R>(
    registry: &R,
    api: &ApiIdentity,
    from_version: &str,
    to_version: &str,
) -> Result<ApiDiffResult, ExError>
where
    R: VersionRegistry + SnapshotLoader + ?Sized,
{
    log_op_start!(
        "compare_versions",
        workspace = %api.workspace,
        api_slug = %api.slug,
        from_version = from_version,
        to_version = to_version
    );
    let start = std::time::Instant::now();

    let result = compare_versions_impl(registry, api, from_version, to_version)
        .map_err(|e| e.with_op("compare_versions"));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(diff) => log_op_end!(
            "compare_versions",
            duration_ms = elapsed,
            total_changes = diff.summary.total_changes,
            breaking_changes = diff.breaking_changes_count
        ),
        Err(e) => log_op_error!("compare_versions", e.clone(), duration_ms = elapsed),
    }
    result
}

fn compare_versions_impl<R>(
    registry: &R,
    api: &ApiIdentity,
    from_version: &str,
    to_version: &str,
) -> Result<ApiDiffResult, ExError>
where
    R: VersionRegistry + SnapshotLoader + ?Sized,
{
    ensure_api_exists(registry, api)?;
    let from = load_required(registry, api, from_version)?;
    let to = load_required(registry, api, to_version)?;
    Ok(compute_diff(&from, &to))
}

/// List the versions of a logical API, most recent first.
///
/// # Errors
///
/// - `NotFound` if the API has no versions
/// - any error surfaced by the registry
pub fn get_versions<R>(registry: &R, api: &ApiIdentity) -> Result<Vec<VersionSummary>, ExError>
where
    R: VersionRegistry + ?Sized,
{
    log_op_start!("get_versions", workspace = %api.workspace, api_slug = %api.slug);
    let start = std::time::Instant::now();

    let result = ensure_api_exists(registry, api).map_err(|e| e.with_op("get_versions"));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(versions) => log_op_end!("get_versions", duration_ms = elapsed, count = versions.len()),
        Err(e) => log_op_error!("get_versions", e.clone(), duration_ms = elapsed),
    }
    result
}

/// Diff `version` against the version currently flagged latest.
///
/// If the store flags more than one version as latest, the first one in
/// listing order wins.
///
/// # Errors
///
/// - `NotFound` if the API has no versions, none is flagged latest, or
///   `version` does not exist
/// - any error surfaced by the registry
pub fn compare_with_latest<R>(
    registry: &R,
    api: &ApiIdentity,
    version: &str,
) -> Result<LatestComparison, ExError>
where
    R: VersionRegistry + SnapshotLoader + ?Sized,
{
    log_op_start!(
        "compare_with_latest",
        workspace = %api.workspace,
        api_slug = %api.slug,
        from_version = version
    );
    let start = std::time::Instant::now();

    let result = (|| -> Result<LatestComparison, ExError> {
        let versions = ensure_api_exists(registry, api)?;
        let latest = versions
            .iter()
            .find(|v| v.is_latest)
            .map(|v| v.version.clone())
            .ok_or_else(|| {
                ExError::from(ApiDiffError::NoLatestVersion {
                    workspace: api.workspace.clone(),
                    slug: api.slug.clone(),
                })
            })?;

        let from = load_required(registry, api, version)?;
        let to = load_required(registry, api, &latest)?;
        Ok(LatestComparison {
            latest_version: latest,
            diff: compute_diff(&from, &to),
        })
    })()
    .map_err(|e| e.with_op("compare_with_latest"));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(cmp) => log_op_end!(
            "compare_with_latest",
            duration_ms = elapsed,
            to_version = %cmp.latest_version,
            breaking_changes = cmp.diff.breaking_changes_count
        ),
        Err(e) => log_op_error!("compare_with_latest", e.clone(), duration_ms = elapsed),
    }
    result
}

fn ensure_api_exists<R>(registry: &R, api: &ApiIdentity) -> Result<Vec<VersionSummary>, ExError>
where
    R: VersionRegistry + ?Sized,
{
    let versions = registry.list_versions(api)?;
    if versions.is_empty() {
        return Err(ApiDiffError::ApiNotFound {
            workspace: api.workspace.clone(),
            slug: api.slug.clone(),
        }
        .into());
    }
    Ok(versions)
}

fn load_required<R>(registry: &R, api: &ApiIdentity, version: &str) -> Result<VersionSnapshot, ExError>
where
    R: SnapshotLoader + ?Sized,
{
    registry.load_snapshot(api, version)?.ok_or_else(|| {
        ApiDiffError::VersionNotFound {
            workspace: api.workspace.clone(),
            slug: api.slug.clone(),
            version: version.to_string(),
        }
        .into()
    })
}
