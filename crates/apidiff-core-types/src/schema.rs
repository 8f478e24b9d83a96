//! Canonical schema constants for structured logging and events
//!
//! The logging macros in `apidiff-core` and the engine layer emit these keys,
//! so log consumers can rely on them across crates.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_WORKSPACE: &str = "workspace";
pub const FIELD_API_SLUG: &str = "api_slug";
pub const FIELD_FROM_VERSION: &str = "from_version";
pub const FIELD_TO_VERSION: &str = "to_version";

// Diff counters
pub const FIELD_TOTAL_CHANGES: &str = "total_changes";
pub const FIELD_BREAKING_CHANGES: &str = "breaking_changes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
