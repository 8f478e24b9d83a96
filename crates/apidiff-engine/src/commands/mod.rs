//! Command orchestration layer.
//!
//! Read-only queries and writing commands over a store connection.

pub mod context;
pub mod engine_command;
pub mod engine_query;

pub use context::RequestContext;
