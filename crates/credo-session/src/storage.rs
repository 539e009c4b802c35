//! Session storage trait.
//!
//! # Implementation Notes
//!
//! Implementations should:
//!
//! - Key records by `session_id`
//! - Apply TTL deletion based on `expiry_date` (expiry is a storage-layer
//!   side effect, not a modeled state transition)
//! - Make `assign_authorization_code` an atomic guarded update, e.g.
//!
//! ```sql
//! UPDATE sessions
//! SET authorization_code = $2, authorization_code_expiry_date = $3
//! WHERE session_id = $1 AND authorization_code IS NULL
//! RETURNING *
//! ```
//!
//! # Security Considerations
//!
//! - Never log authorization codes
//! - The guarded update is what keeps issuance idempotent under
//!   concurrent callers; an unconditional overwrite would silently mint a
//!   second live code

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::session::Session;

/// Outcome of a conditional authorization-code assignment.
#[derive(Debug, Clone)]
pub enum CodeAssignment {
    /// The code was written; the updated session is returned.
    Assigned(Session),
    /// The session already held a code; the stored session is returned
    /// untouched.
    AlreadyIssued(Session),
}

/// Storage trait for session records.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persists a new session unconditionally (no merge with an existing
    /// record).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Persistence` on storage-layer write failure.
    async fn put(&self, session: &Session) -> SessionResult<()>;

    /// Fetches a session by id.
    ///
    /// Returns `Ok(None)` when no record exists; the service layer maps
    /// that to the terminal not-found condition.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Persistence` on storage-layer read failure.
    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>>;

    /// Assigns an authorization code to a session, guarded on no code
    /// being present yet.
    ///
    /// The update is scoped to the session's key and touches exactly the
    /// two code fields; it must be atomic with respect to concurrent
    /// assignment attempts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` when the session does not exist,
    /// `SessionError::Persistence` on storage-layer failure.
    async fn assign_authorization_code(
        &self,
        session_id: &str,
        code: &str,
        expiry_date_ms: i64,
    ) -> SessionResult<CodeAssignment>;

    /// Finds the session holding an authorization code.
    ///
    /// Returns `Ok(None)` unless exactly one session carries the code.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Persistence` on storage-layer failure.
    async fn find_by_authorization_code(&self, code: &str) -> SessionResult<Option<Session>>;
}
