use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::endpoint::EndpointDefinition;

/// Identity of a logical API: every version shares the same workspace and slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiIdentity {
    pub workspace: String,
    pub slug: String,
}

impl ApiIdentity {
    pub fn new(workspace: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            slug: slug.into(),
        }
    }
}

impl std::fmt::Display for ApiIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.workspace, self.slug)
    }
}

/// An immutable, versioned set of endpoint definitions for one logical API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub endpoints: Vec<EndpointDefinition>,
}

impl VersionSnapshot {
    pub fn new(
        version: impl Into<String>,
        created_at: DateTime<Utc>,
        endpoints: Vec<EndpointDefinition>,
    ) -> Self {
        Self {
            version: version.into(),
            created_at,
            endpoints,
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

/// One row of a version listing, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version: String,
    pub is_latest: bool,
    pub created_at: DateTime<Utc>,
    pub endpoint_count: usize,
}
