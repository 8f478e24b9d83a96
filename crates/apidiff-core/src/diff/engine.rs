//! Diff aggregation.
//!
//! [`compute_diff`] drives the reconciler, comparator and classifier over two
//! snapshots and assembles the [`ApiDiffResult`]. [`compute_diff_bytes`] is
//! the byte-level entry point for snapshots that arrive as raw JSON.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::classify::{classify, ComparisonContext};
use crate::compare::compare_endpoints;
use crate::diff::model::{
    AddedEndpoint, ApiDiffResult, DiffSummary, ModifiedEndpoint, RemovedEndpoint,
};
use crate::errors::{ApiDiffError, ExError, ExErrorKind};
use crate::model::{EndpointDefinition, VersionSnapshot};
use crate::reconcile::reconcile;

/// Compute the structured diff from `from` to `to`.
///
/// Every identity key of the union lands in exactly one bucket: added,
/// removed, modified, or unchanged. A common endpoint is unchanged only when
/// it has neither field changes nor breaking changes.
pub fn compute_diff(from: &VersionSnapshot, to: &VersionSnapshot) -> ApiDiffResult {
    let rec = reconcile(&from.endpoints, &to.endpoints);

    let added_endpoints: Vec<AddedEndpoint> = rec
        .added_keys
        .iter()
        .filter_map(|key| rec.to.get(key))
        .map(|ep| AddedEndpoint {
            method: ep.method.clone(),
            path: ep.path.clone(),
            summary: ep.summary.clone(),
        })
        .collect();

    let removed_endpoints: Vec<RemovedEndpoint> = rec
        .removed_keys
        .iter()
        .filter_map(|key| rec.from.get(key))
        .map(|ep| RemovedEndpoint {
            method: ep.method.clone(),
            path: ep.path.clone(),
            summary: ep.summary.clone(),
            breaking_changes: classify(&ComparisonContext::removed(ep)),
        })
        .collect();

    let mut modified_endpoints = Vec::new();
    let mut unchanged_count = 0;
    for key in &rec.common_keys {
        let (Some(old), Some(new)) = (rec.from.get(key), rec.to.get(key)) else {
            continue;
        };
        let changes = compare_endpoints(old, new);
        let breaking_changes = classify(&ComparisonContext::common(old, new));
        if changes.is_empty() && breaking_changes.is_empty() {
            unchanged_count += 1;
        } else {
            modified_endpoints.push(ModifiedEndpoint {
                method: old.method.clone(),
                path: old.path.clone(),
                changes,
                breaking_changes,
            });
        }
    }

    let breaking_changes_count = removed_endpoints
        .iter()
        .map(|e| e.breaking_changes.len())
        .chain(modified_endpoints.iter().map(|e| e.breaking_changes.len()))
        .sum();

    let summary = DiffSummary {
        total_changes: added_endpoints.len() + removed_endpoints.len() + modified_endpoints.len(),
        additions: added_endpoints.len(),
        deletions: removed_endpoints.len(),
        modifications: modified_endpoints.len(),
        breaking_changes: breaking_changes_count,
    };

    tracing::info!(
        component = module_path!(),
        op = "compute_diff",
        from_version = %from.version,
        to_version = %to.version,
        total_changes = summary.total_changes,
        breaking_changes = breaking_changes_count,
        "diff computed"
    );

    ApiDiffResult {
        from_version: from.version.clone(),
        to_version: to.version.clone(),
        added_endpoints,
        removed_endpoints,
        modified_endpoints,
        unchanged_count,
        breaking_changes_count,
        summary,
    }
}

/// Compute a diff where either snapshot may be absent.
///
/// # Errors
///
/// - `InvalidInput` if `from` or `to` is `None`
pub fn diff_snapshots(
    from: Option<&VersionSnapshot>,
    to: Option<&VersionSnapshot>,
) -> Result<ApiDiffResult, ExError> {
    let from = from.ok_or_else(|| missing("from"))?;
    let to = to.ok_or_else(|| missing("to"))?;
    Ok(compute_diff(from, to))
}

fn missing(side: &str) -> ExError {
    ApiDiffError::MissingSnapshot {
        side: side.to_string(),
    }
    .into()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    #[serde(default)]
    version: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    endpoints: Vec<EndpointDefinition>,
}

/// Parse a raw JSON snapshot: `{"version", "createdAt"?, "endpoints": [..]}`.
///
/// # Errors
///
/// - `InvalidInput` if bytes are not UTF-8, not JSON, not an object, or the
///   `endpoints` key is absent, `null`, or malformed
pub fn parse_snapshot_bytes(bytes: &[u8]) -> Result<VersionSnapshot, ExError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| invalid(format!("snapshot is not valid UTF-8: {}", e)))?;

    let raw: Value = serde_json::from_str(text)
        .map_err(|e| invalid(format!("snapshot is not valid JSON: {}", e)))?;

    let obj = raw
        .as_object()
        .ok_or_else(|| invalid("snapshot JSON root must be an object"))?;

    match obj.get("endpoints") {
        None => return Err(invalid("required field `endpoints` is absent")),
        Some(Value::Null) => return Err(invalid("field `endpoints` is null")),
        Some(_) => {}
    }

    let wire: WireSnapshot = serde_json::from_value(raw)
        .map_err(|e| invalid(format!("failed to deserialize snapshot: {}", e)))?;

    Ok(VersionSnapshot::new(
        wire.version,
        wire.created_at.unwrap_or_default(),
        wire.endpoints,
    ))
}

fn invalid(reason: impl Into<String>) -> ExError {
    ExError::from(ApiDiffError::InvalidSnapshot {
        reason: reason.into(),
    })
    .with_op("parse_snapshot_bytes")
}

/// Compute a diff between two raw JSON snapshots.
///
/// # Errors
///
/// - `InvalidInput` if either snapshot fails [`parse_snapshot_bytes`]
/// - `DeterminismViolation` if the diff fails its serialize/parse round-trip
pub fn compute_diff_bytes(from_bytes: &[u8], to_bytes: &[u8]) -> Result<ApiDiffResult, ExError> {
    let from = parse_snapshot_bytes(from_bytes)?;
    let to = parse_snapshot_bytes(to_bytes)?;
    let diff = compute_diff(&from, &to);

    let serialized = serde_json::to_string(&diff).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff_bytes")
            .with_message(format!("failed to serialize diff: {}", e))
    })?;
    let reparsed: ApiDiffResult = serde_json::from_str(&serialized).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff_bytes")
            .with_message(format!("failed to re-parse diff: {}", e))
    })?;
    if reparsed != diff {
        return Err(ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff_bytes")
            .with_message("round-trip produced a different diff"));
    }

    Ok(diff)
}
