//! Engine error taxonomy, shared by the callable operation and the handlers.

use crate::store::StoreError;

/// Errors surfaced by engine operations.
///
/// Synchronous callers receive these directly; event-triggered handlers swallow
/// most of them (logged) because there is no caller to report to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// A required input was missing or malformed.
    InvalidArgument(String),
    /// The operation requires an authenticated caller.
    Unauthenticated,
    /// A referenced document does not exist.
    NotFound(String),
    /// The caller is not allowed to perform this operation.
    PermissionDenied(String),
    /// The system is not in a state that allows the operation.
    FailedPrecondition(String),
    /// Persistence or other unexpected failure.
    Internal(String),
}

impl EngineError {
    /// Machine-readable error kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidArgument(_) => "invalid-argument",
            EngineError::Unauthenticated => "unauthenticated",
            EngineError::NotFound(_) => "not-found",
            EngineError::PermissionDenied(_) => "permission-denied",
            EngineError::FailedPrecondition(_) => "failed-precondition",
            EngineError::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            EngineError::Unauthenticated => {
                write!(f, "The operation must be called while authenticated")
            }
            EngineError::NotFound(what) => write!(f, "{} not found", what),
            EngineError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            EngineError::FailedPrecondition(msg) => write!(f, "Failed precondition: {}", msg),
            EngineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(path) => EngineError::NotFound(format!("Document {}", path)),
            StoreError::Data(msg) => EngineError::Internal(msg),
        }
    }
}
