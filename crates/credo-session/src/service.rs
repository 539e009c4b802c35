//! Session service.
//!
//! Owns the session lifecycle: creation, lookup, and authorization-code
//! issuance. The service never retries storage failures; it surfaces the
//! first error to the caller, whose retry policy lives outside this crate.

use std::sync::Arc;

use credo_config::IssuerConfig;
use credo_core::{generate_id, now_epoch_ms};

use crate::error::{SessionError, SessionResult};
use crate::session::{Session, SessionRequest};
use crate::storage::{CodeAssignment, SessionStorage};

/// Service for the session lifecycle.
///
/// Stateless apart from the injected storage backend and the startup
/// configuration; safe to share across concurrent invocations.
pub struct SessionService {
    storage: Arc<dyn SessionStorage>,
    config: Arc<IssuerConfig>,
}

impl SessionService {
    /// Creates a session service over the given storage backend.
    pub fn new(storage: Arc<dyn SessionStorage>, config: Arc<IssuerConfig>) -> Self {
        Self { storage, config }
    }

    /// Creates a new session from an inbound request and returns its id.
    ///
    /// Allocates a fresh unique id, stamps `created_date` with the current
    /// wall clock and `expiry_date` with the configured session TTL, copies
    /// the request fields and initializes `attempt_count` to 0. The write
    /// is unconditional.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Persistence`] on storage-layer write
    /// failure.
    pub async fn create(&self, request: &SessionRequest) -> SessionResult<String> {
        let now_ms = now_epoch_ms();
        let session = Session {
            session_id: generate_id(),
            client_id: request.client_id.clone(),
            client_session_id: request.client_session_id.clone(),
            subject: request.subject.clone(),
            persistent_session_id: request.persistent_session_id.clone(),
            redirect_uri: request.redirect_uri.clone(),
            state: request.state.clone(),
            client_ip_address: request.client_ip_address.clone(),
            created_date: now_ms,
            expiry_date: now_ms + self.config.session_ttl_s * 1000,
            authorization_code: None,
            authorization_code_expiry_date: None,
            attempt_count: 0,
        };
        self.storage.put(&session).await?;
        tracing::info!(
            session_id = %session.session_id,
            client_id = %session.client_id,
            "Session created"
        );
        Ok(session.session_id)
    }

    /// Fetches a session by id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when no record exists for the
    /// id; callers treat this as terminal and user-visible, never retried.
    pub async fn get(&self, session_id: &str) -> SessionResult<Session> {
        if session_id.is_empty() {
            return Err(SessionError::validation("session id must not be empty"));
        }
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Issues an authorization code for the session.
    ///
    /// Generates a new random code and persists it together with its
    /// expiry (`now + authorization-code TTL`) via a conditional update
    /// guarded on no code being present. Issuance is idempotent: when the
    /// session already holds a code, whether observed on the snapshot or
    /// discovered when the conditional update loses a race, the stored
    /// session is returned unchanged and no second code ever becomes live.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] when the session no longer
    /// exists, [`SessionError::Persistence`] on storage-layer failure.
    pub async fn issue_authorization_code(&self, session: &Session) -> SessionResult<Session> {
        if session.has_authorization_code() {
            return Ok(session.clone());
        }

        let code = Session::generate_authorization_code();
        let expiry_date_ms = now_epoch_ms() + self.config.authorization_code_ttl_s * 1000;

        match self
            .storage
            .assign_authorization_code(&session.session_id, &code, expiry_date_ms)
            .await?
        {
            CodeAssignment::Assigned(updated) => {
                tracing::info!(session_id = %updated.session_id, "Authorization code issued");
                Ok(updated)
            }
            CodeAssignment::AlreadyIssued(existing) => {
                tracing::warn!(
                    session_id = %existing.session_id,
                    "Authorization code already issued, returning existing session"
                );
                Ok(existing)
            }
        }
    }

    /// Looks a session up by its authorization code.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidAuthorizationCode`] when the code
    /// does not match exactly one session, [`SessionError::Expired`] when
    /// the session TTL has passed, and
    /// [`SessionError::AuthorizationCodeExpired`] when the code TTL has
    /// passed.
    pub async fn get_by_authorization_code(&self, code: &str) -> SessionResult<Session> {
        let session = self
            .storage
            .find_by_authorization_code(code)
            .await?
            .ok_or(SessionError::InvalidAuthorizationCode)?;

        let now_ms = now_epoch_ms();
        if session.is_expired_at(now_ms) {
            return Err(SessionError::Expired);
        }
        if session.is_authorization_code_expired_at(now_ms) {
            return Err(SessionError::AuthorizationCodeExpired);
        }
        Ok(session)
    }
}
