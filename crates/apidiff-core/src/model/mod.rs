//! Domain model: endpoint definitions and version snapshots

pub mod endpoint;
pub mod snapshot;

pub use endpoint::{EndpointDefinition, ResponseDefinition, SchemaValue};
pub use snapshot::{ApiIdentity, VersionSnapshot, VersionSummary};
