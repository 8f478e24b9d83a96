//! Correlation ids for one engine call.

use apidiff_core::core_types::{RequestId, TraceId};
use apidiff_core::errors::ExError;

/// Ids attached to every log event and returned error of one engine call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Caller-side trace this call belongs to, if any
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    /// A context with a freshly generated request id and no trace
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach this context's ids to `err`
    pub fn tag(&self, err: ExError) -> ExError {
        let err = err.with_request_id(self.request_id.clone());
        match &self.trace_id {
            Some(trace_id) => err.with_trace_id(trace_id.clone()),
            None => err,
        }
    }

    pub(crate) fn trace_str(&self) -> &str {
        self.trace_id.as_ref().map_or("", TraceId::as_str)
    }
}
