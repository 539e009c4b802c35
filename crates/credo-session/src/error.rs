//! Session error types.

use credo_config::ConfigError;

/// Errors that can occur during session operations.
///
/// `NotFound` and the expiry variants are terminal, user-visible
/// conditions; `Persistence` is transient and retry is the caller's
/// responsibility (the store never retries internally).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Malformed caller input. Never retried.
    #[error("Invalid session request: {0}")]
    Validation(String),

    /// No session record exists for the id. Terminal.
    #[error("Could not find session with id: {0}")]
    NotFound(String),

    /// Missing or unfetchable configuration. Fatal to the invocation.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Transient storage-layer failure.
    #[error("Session persistence error: {0}")]
    Persistence(String),

    /// The session's own TTL has passed.
    #[error("Session expired")]
    Expired,

    /// The authorization code attached to the session has expired.
    #[error("Authorization code expired")]
    AuthorizationCodeExpired,

    /// The presented authorization code does not match exactly one session.
    #[error("Invalid authorization code")]
    InvalidAuthorizationCode,
}

impl SessionError {
    /// Create a new `Persistence` error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a new `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Terminal errors are surfaced to the caller and must not be retried.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

/// Convenience result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
