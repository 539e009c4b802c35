//! In-memory session storage backend.

use async_trait::async_trait;
use dashmap::DashMap;

use credo_session::{CodeAssignment, Session, SessionError, SessionResult, SessionStorage};

/// In-memory session table keyed by session id.
///
/// The conditional code assignment happens under the entry's shard lock,
/// which gives it the same atomicity a guarded database update provides.
#[derive(Debug, Default)]
pub struct InMemorySessionStorage {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStorage {
    /// Creates an empty session table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` when no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn put(&self, session: &Session) -> SessionResult<()> {
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>> {
        Ok(self.sessions.get(session_id).map(|s| s.clone()))
    }

    async fn assign_authorization_code(
        &self,
        session_id: &str,
        code: &str,
        expiry_date_ms: i64,
    ) -> SessionResult<CodeAssignment> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        if entry.authorization_code.is_some() {
            return Ok(CodeAssignment::AlreadyIssued(entry.clone()));
        }
        entry.authorization_code = Some(code.to_string());
        entry.authorization_code_expiry_date = Some(expiry_date_ms);
        Ok(CodeAssignment::Assigned(entry.clone()))
    }

    async fn find_by_authorization_code(&self, code: &str) -> SessionResult<Option<Session>> {
        let mut matched: Option<Session> = None;
        for entry in self.sessions.iter() {
            if entry.authorization_code.as_deref() == Some(code) {
                if matched.is_some() {
                    // More than one match is indistinguishable from an
                    // invalid code to the caller.
                    return Ok(None);
                }
                matched = Some(entry.clone());
            }
        }
        Ok(matched)
    }
}
