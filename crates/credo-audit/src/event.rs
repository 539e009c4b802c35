//! Audit event wire types.
//!
//! The serialized shape is an external compliance contract: field names
//! are snake_case, and absent optional values are omitted from the JSON
//! entirely, never emitted as null or substituted with empty strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use credo_session::Session;

/// Well-known lifecycle event types.
///
/// The builder accepts any non-empty string, so issuer-specific events
/// outside this set remain possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    /// Before a session is written to the session table.
    Start,
    /// A non-common request has been received.
    RequestReceived,
    /// A third-party call is started.
    RequestSent,
    /// The final verifiable credential is created.
    VcIssued,
    /// Third-party requests have ended.
    ThirdPartyRequestEnded,
    /// Credentials are being returned; final event.
    End,
}

impl AuditEventType {
    /// The wire name of this event type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::RequestReceived => "REQUEST_RECEIVED",
            Self::RequestSent => "REQUEST_SENT",
            Self::VcIssued => "VC_ISSUED",
            Self::ThirdPartyRequestEnded => "THIRD_PARTY_REQUEST_ENDED",
            Self::End => "END",
        }
    }
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User sub-object of an audit event. Every field is optional; absent
/// fields are omitted from the serialized event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub govuk_signin_journey_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// A structured audit event, produced at the moment of a domain action and
/// discarded by the producer once published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Issuer identity of the emitting service.
    pub component_id: String,
    /// Namespaced event name, `<prefix>_<type>`.
    pub event_name: String,
    /// Build-time wall clock, epoch milliseconds.
    pub timestamp: i64,
    /// Duplicate millisecond timestamp carried by the wire format.
    pub event_timestamp_ms: i64,
    /// User context, populated only from present source values.
    pub user: AuditEventUser,
    /// Free-form personal-data payload, passed through opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restricted: Option<Value>,
    /// Free-form event-specific payload, passed through opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Context captured at the emission site: a session snapshot (or partial
/// session data) plus request details.
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub session_id: Option<String>,
    pub subject: Option<String>,
    pub persistent_session_id: Option<String>,
    pub client_session_id: Option<String>,
    pub client_ip_address: Option<String>,
    pub restricted: Option<Value>,
    pub extensions: Option<Value>,
}

impl AuditContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the originating IP address.
    #[must_use]
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.client_ip_address = Some(ip_address.into());
        self
    }

    /// Attaches a restricted (personal data) payload.
    #[must_use]
    pub fn with_restricted(mut self, restricted: Value) -> Self {
        self.restricted = Some(restricted);
        self
    }

    /// Attaches an event-specific extensions payload.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Value) -> Self {
        self.extensions = Some(extensions);
        self
    }
}

impl From<&Session> for AuditContext {
    fn from(session: &Session) -> Self {
        Self {
            session_id: Some(session.session_id.clone()),
            subject: Some(session.subject.clone()),
            persistent_session_id: Some(session.persistent_session_id.clone()),
            client_session_id: Some(session.client_session_id.clone()),
            client_ip_address: session.client_ip_address.clone(),
            restricted: None,
            extensions: None,
        }
    }
}
