//! In-memory version registry for library callers and tests.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;

use crate::errors::{ApiDiffError, ExError};
use crate::model::{ApiIdentity, VersionSnapshot, VersionSummary};
use crate::registry::{SnapshotLoader, VersionRegistry};

#[derive(Debug, Clone)]
struct StoredVersion {
    snapshot: VersionSnapshot,
    is_latest: bool,
}

/// Versions held in memory, grouped by logical API.
///
/// Listing orders by `created_at` descending, newest insertion first on ties.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    apis: HashMap<ApiIdentity, Vec<StoredVersion>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot. When `is_latest` is set every other version of the
    /// API loses its latest flag.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::AlreadyExists` if the version label is taken.
    pub fn insert(
        &mut self,
        api: &ApiIdentity,
        snapshot: VersionSnapshot,
        is_latest: bool,
    ) -> Result<(), ExError> {
        let versions = self.apis.entry(api.clone()).or_default();
        if versions
            .iter()
            .any(|v| v.snapshot.version == snapshot.version)
        {
            return Err(ExError::from(ApiDiffError::VersionAlreadyExists {
                workspace: api.workspace.clone(),
                slug: api.slug.clone(),
                version: snapshot.version,
            })
            .with_op("insert_version"));
        }
        if is_latest {
            versions.iter_mut().for_each(|v| v.is_latest = false);
        }
        versions.push(StoredVersion {
            snapshot,
            is_latest,
        });
        Ok(())
    }

    /// Store a version without touching latest flags, even if several end
    /// up flagged.
    pub fn insert_raw(&mut self, api: &ApiIdentity, snapshot: VersionSnapshot, is_latest: bool) {
        self.apis.entry(api.clone()).or_default().push(StoredVersion {
            snapshot,
            is_latest,
        });
    }
}

impl VersionRegistry for InMemoryRegistry {
    fn list_versions(&self, api: &ApiIdentity) -> Result<Vec<VersionSummary>, ExError> {
        let Some(versions) = self.apis.get(api) else {
            return Ok(Vec::new());
        };

        let mut indexed: Vec<(usize, &StoredVersion)> = versions.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            b.snapshot
                .created_at
                .cmp(&a.snapshot.created_at)
                .then(ib.cmp(ia))
        });

        Ok(indexed
            .into_iter()
            .map(|(_, v)| VersionSummary {
                version: v.snapshot.version.clone(),
                is_latest: v.is_latest,
                created_at: v.snapshot.created_at,
                endpoint_count: v.snapshot.endpoint_count(),
            })
            .collect())
    }
}

impl SnapshotLoader for InMemoryRegistry {
    fn load_snapshot(
        &self,
        api: &ApiIdentity,
        version: &str,
    ) -> Result<Option<VersionSnapshot>, ExError> {
        Ok(self.apis.get(api).and_then(|versions| {
            versions
                .iter()
                .find(|v| v.snapshot.version == version)
                .map(|v| v.snapshot.clone())
        }))
    }
}
