use apidiff_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using ApiDiffError
pub type Result<T> = std::result::Result<T, ApiDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests, and transport mapping (`NotFound` → 404, `InvalidInput` → 400).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller-facing
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Diff
    /// A diff failed its serialize/parse round-trip check
    DeterminismViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context for
/// debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (an API identity or `api@version` reference)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while resolving and comparing API versions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiDiffError {
    /// No version of the logical API exists
    #[error("API not found: {workspace}/{slug}")]
    ApiNotFound { workspace: String, slug: String },

    /// The logical API exists but the requested version does not
    #[error("Version {version} not found for API {workspace}/{slug}")]
    VersionNotFound {
        workspace: String,
        slug: String,
        version: String,
    },

    /// No version of the logical API is flagged as latest
    #[error("No latest version found for API {workspace}/{slug}")]
    NoLatestVersion { workspace: String, slug: String },

    /// A snapshot handed to the aggregator was absent
    #[error("Snapshot missing for side '{side}'")]
    MissingSnapshot { side: String },

    /// A snapshot could not be interpreted (bad bytes, null endpoint list, ...)
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// A version label is already taken for this API
    #[error("Version {version} already exists for API {workspace}/{slug}")]
    VersionAlreadyExists {
        workspace: String,
        slug: String,
        version: String,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<ApiDiffError> for ExError {
    fn from(err: ApiDiffError) -> Self {
        match err {
            ApiDiffError::ApiNotFound { workspace, slug } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("{}/{}", workspace, slug))
                .with_message("API not found"),

            ApiDiffError::VersionNotFound {
                workspace,
                slug,
                version,
            } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("{}/{}@{}", workspace, slug, version))
                .with_message(format!("version {} not found", version)),

            ApiDiffError::NoLatestVersion { workspace, slug } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(format!("{}/{}", workspace, slug))
                    .with_message("No latest version found")
            }

            ApiDiffError::MissingSnapshot { side } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("diff_snapshots")
                .with_message(format!("{} snapshot is absent", side)),

            ApiDiffError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            ApiDiffError::VersionAlreadyExists {
                workspace,
                slug,
                version,
            } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(format!("{}/{}@{}", workspace, slug, version))
                .with_message(format!("version {} already exists", version)),

            ApiDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiDiffError {
    fn from(err: serde_json::Error) -> Self {
        ApiDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
