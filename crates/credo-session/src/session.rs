//! Session entity and creation request.
//!
//! A session is the server-side record of one in-progress authorization
//! flow for a relying party. All timestamps are epoch milliseconds; the
//! storage layer applies TTL deletion based on `expiry_date`.
//!
//! # Security
//!
//! - Authorization codes are cryptographically random (256 bits)
//! - A session holds at most one live authorization code; the code is
//!   never overwritten once set

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Session record persisted for one relying-party interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque unique identifier, generated at creation, never reused.
    pub session_id: String,

    /// Relying-party client identifier.
    pub client_id: String,

    /// Journey identifier supplied by the client.
    pub client_session_id: String,

    /// Pairwise subject identifier for the user.
    pub subject: String,

    /// Cross-journey persistent session identifier.
    pub persistent_session_id: String,

    /// Redirect URI from the authorization request.
    pub redirect_uri: String,

    /// Client-supplied CSRF/state token.
    pub state: String,

    /// IP address the initiating request arrived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip_address: Option<String>,

    /// Creation time, epoch milliseconds.
    pub created_date: i64,

    /// Storage-layer TTL, epoch milliseconds.
    pub expiry_date: i64,

    /// Authorization code, absent until issued. Once set it is never
    /// overwritten by a later issuance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,

    /// Authorization-code expiry, epoch milliseconds; absent until issued.
    /// Always strictly greater than the time the code was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code_expiry_date: Option<i64>,

    /// Verification attempt counter, initialized to 0.
    pub attempt_count: u32,
}

impl Session {
    /// Generates a new cryptographically secure authorization code.
    ///
    /// 256 bits of entropy, base64url-encoded without padding
    /// (43 characters).
    #[must_use]
    pub fn generate_authorization_code() -> String {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the session's own TTL has passed at `now_ms`.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expiry_date < now_ms
    }

    /// Returns `true` if an authorization code has been issued.
    #[must_use]
    pub fn has_authorization_code(&self) -> bool {
        self.authorization_code.is_some()
    }

    /// Returns `true` if the issued code's TTL has passed at `now_ms`.
    ///
    /// A session with no code has nothing to expire.
    #[must_use]
    pub fn is_authorization_code_expired_at(&self, now_ms: i64) -> bool {
        self.authorization_code_expiry_date
            .is_some_and(|expiry| expiry < now_ms)
    }
}

/// Inbound session-initiation request.
///
/// Field values are copied verbatim onto the created [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Client-supplied CSRF/state token.
    pub state: String,
    /// Relying-party client identifier.
    pub client_id: String,
    /// Redirect URI from the authorization request.
    pub redirect_uri: String,
    /// Pairwise subject identifier.
    pub subject: String,
    /// Cross-journey persistent session identifier.
    pub persistent_session_id: String,
    /// Journey identifier supplied by the client.
    pub client_session_id: String,
    /// Originating IP address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            session_id: "sess-1".to_string(),
            client_id: "client-1".to_string(),
            client_session_id: "journey-1".to_string(),
            subject: "urn:fdc:subject-1".to_string(),
            persistent_session_id: "persistent-1".to_string(),
            redirect_uri: "https://rp.example/cb".to_string(),
            state: "state-1".to_string(),
            client_ip_address: None,
            created_date: 1_000,
            expiry_date: 2_000,
            authorization_code: None,
            authorization_code_expiry_date: None,
            attempt_count: 0,
        }
    }

    #[test]
    fn test_generate_authorization_code_length() {
        // 32 bytes = 256 bits, base64url without padding = 43 characters
        let code = Session::generate_authorization_code();
        assert_eq!(code.len(), 43);
    }

    #[test]
    fn test_generate_authorization_code_is_base64url() {
        let code = Session::generate_authorization_code();
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_authorization_code_uniqueness() {
        let codes: Vec<String> = (0..100)
            .map(|_| Session::generate_authorization_code())
            .collect();
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(codes.len(), deduped.len());
    }

    #[test]
    fn test_expiry_predicates() {
        let session = sample_session();
        assert!(!session.is_expired_at(1_500));
        assert!(session.is_expired_at(2_500));
        assert!(!session.is_authorization_code_expired_at(2_500));

        let mut issued = session;
        issued.authorization_code = Some(Session::generate_authorization_code());
        issued.authorization_code_expiry_date = Some(3_000);
        assert!(issued.has_authorization_code());
        assert!(!issued.is_authorization_code_expired_at(2_500));
        assert!(issued.is_authorization_code_expired_at(3_500));
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let session = sample_session();
        let json = serde_json::to_value(&session).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("authorizationCode"));
        assert!(!object.contains_key("authorizationCodeExpiryDate"));
        assert!(!object.contains_key("clientIpAddress"));
        assert_eq!(object["sessionId"], "sess-1");
        assert_eq!(object["attemptCount"], 0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut session = sample_session();
        session.authorization_code = Some("code".to_string());
        session.authorization_code_expiry_date = Some(9_000);

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, session.session_id);
        assert_eq!(back.authorization_code, session.authorization_code);
        assert_eq!(
            back.authorization_code_expiry_date,
            session.authorization_code_expiry_date
        );
    }
}
