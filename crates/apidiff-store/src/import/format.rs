//! `mock-api-definition` file format, schema version 1.0

use crate::repo::VersionMeta;
use apidiff_core::model::EndpointDefinition;
use serde::{Deserialize, Serialize};

/// Value required in the `type` field
pub const DEFINITION_FILE_TYPE: &str = "mock-api-definition";

/// The only accepted `schemaVersion`
pub const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

/// Version label used when `api.version` is absent
pub const DEFAULT_API_VERSION: &str = "1.0.0";

/// Top-level definition file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDefinitionFile {
    #[serde(rename = "type")]
    pub file_type: String,

    pub schema_version: String,

    pub api: ApiMeta,

    #[serde(default)]
    pub endpoints: Vec<EndpointDefinition>,
}

/// API metadata block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    pub name: String,

    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL prefix the mock server mounts the endpoints under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Absent means active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ApiMeta {
    /// The declared version, or [`DEFAULT_API_VERSION`]
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Stored metadata for a version imported from this block
    pub fn to_version_meta(&self) -> VersionMeta {
        VersionMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            base_path: self.base_path.clone(),
            tags: self.tags.clone(),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}
