//! Audit pipeline error types.

/// Errors that can occur in the audit pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// Malformed producer input, e.g. an empty event type. Never retried.
    #[error("Invalid audit event: {0}")]
    Validation(String),

    /// Event serialization failed.
    #[error("Audit event serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A consumed message body could not be interpreted.
    #[error("Malformed audit event body: {0}")]
    MalformedEvent(String),

    /// The channel send failed. Surfaced to the caller, not retried here.
    #[error("Audit event publish error: {0}")]
    Publish(String),

    /// The audit record write failed.
    #[error("Audit record persistence error: {0}")]
    Persistence(String),
}

impl AuditError {
    /// Create a new `Publish` error.
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }

    /// Create a new `Persistence` error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }
}

/// Convenience result type for audit operations.
pub type AuditResult<T> = std::result::Result<T, AuditError>;
