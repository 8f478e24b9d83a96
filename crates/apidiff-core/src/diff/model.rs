//! API diff output types.
//!
//! All types serialize to the camelCase JSON shape consumed downstream.
//! Endpoint lists keep the order in which the reconciler produced them.

use serde::{Deserialize, Serialize};

use crate::model::SchemaValue;

/// Ordinal severity of a breaking change: `Critical > Major > Minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reserved; no rule currently assigns it
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }
}

/// Which rule produced a breaking change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakingChangeKind {
    EndpointRemoved,
    EndpointDisabled,
    ResponseStatusRemoved,
    RequiredParamAdded,
}

impl BreakingChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakingChangeKind::EndpointRemoved => "endpoint_removed",
            BreakingChangeKind::EndpointDisabled => "endpoint_disabled",
            BreakingChangeKind::ResponseStatusRemoved => "response_status_removed",
            BreakingChangeKind::RequiredParamAdded => "required_param_added",
        }
    }
}

/// A classified backward-incompatible difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakingChange {
    #[serde(rename = "type")]
    pub kind: BreakingChangeKind,
    pub description: String,
    pub severity: Severity,
}

/// Endpoint attribute compared by the field comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndpointField {
    Summary,
    Enabled,
    Responses,
    RequestSchema,
}

impl EndpointField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointField::Summary => "summary",
            EndpointField::Enabled => "enabled",
            EndpointField::Responses => "responses",
            EndpointField::RequestSchema => "requestSchema",
        }
    }
}

/// Kind of a field-level change record.
///
/// Field changes are always modifications; additions and removals happen at
/// the endpoint level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    #[default]
    Modified,
}

/// One differing attribute of an endpoint present in both snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: EndpointField,
    pub old_value: SchemaValue,
    pub new_value: SchemaValue,
    #[serde(skip_serializing, default)]
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedEndpoint {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedEndpoint {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub breaking_changes: Vec<BreakingChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedEndpoint {
    pub method: String,
    pub path: String,
    pub changes: Vec<FieldChange>,
    pub breaking_changes: Vec<BreakingChange>,
}

/// Aggregate counts; `total_changes` excludes unchanged endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total_changes: usize,
    pub additions: usize,
    pub deletions: usize,
    pub modifications: usize,
    pub breaking_changes: usize,
}

/// The structured diff between two versions of one logical API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiffResult {
    pub from_version: String,
    pub to_version: String,
    pub added_endpoints: Vec<AddedEndpoint>,
    pub removed_endpoints: Vec<RemovedEndpoint>,
    pub modified_endpoints: Vec<ModifiedEndpoint>,
    pub unchanged_count: usize,
    pub breaking_changes_count: usize,
    pub summary: DiffSummary,
}

impl ApiDiffResult {
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_changes_count > 0
    }

    /// All breaking changes, removed endpoints first
    pub fn breaking_changes(&self) -> impl Iterator<Item = &BreakingChange> {
        self.removed_endpoints
            .iter()
            .flat_map(|e| e.breaking_changes.iter())
            .chain(
                self.modified_endpoints
                    .iter()
                    .flat_map(|e| e.breaking_changes.iter()),
            )
    }

    /// Highest severity among all breaking changes, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.breaking_changes().map(|b| b.severity).max()
    }
}
