//! Read interfaces onto versioned API storage.
//!
//! The diff operations only read through these traits. Writes, and the
//! at-most-one-latest invariant, belong to the implementing store.

#![allow(clippy::result_large_err)]

use crate::errors::ExError;
use crate::model::{ApiIdentity, VersionSnapshot, VersionSummary};

/// Lists the versions of a logical API
pub trait VersionRegistry {
    /// Versions of `api`, most recent first. Empty when the API is unknown.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the backing store fails.
    fn list_versions(&self, api: &ApiIdentity) -> Result<Vec<VersionSummary>, ExError>;
}

/// Resolves one version of a logical API to its endpoint set
pub trait SnapshotLoader {
    /// The snapshot labelled `version`, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the backing store fails, or
    /// `ExErrorKind::Serialization` if a stored endpoint cannot be decoded.
    fn load_snapshot(
        &self,
        api: &ApiIdentity,
        version: &str,
    ) -> Result<Option<VersionSnapshot>, ExError>;
}
