//! Core types shared across the apidiff crates
//!
//! - **Correlation types**: RequestId, TraceId
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestId, TraceId};
