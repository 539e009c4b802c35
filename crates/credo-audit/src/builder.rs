//! Audit event builder.

use credo_config::IssuerConfig;
use credo_core::now_epoch_ms;

use crate::error::{AuditError, AuditResult};
use crate::event::{AuditContext, AuditEvent, AuditEventUser};

/// Builds canonical [`AuditEvent`]s from a domain action and its context.
///
/// Side-effect-free: the issuer identity and event-name prefix are
/// captured from the startup configuration at construction, so `build`
/// performs no I/O.
#[derive(Debug, Clone)]
pub struct AuditEventBuilder {
    component_id: String,
    event_name_prefix: String,
}

impl AuditEventBuilder {
    /// Creates a builder from the resolved issuer configuration.
    #[must_use]
    pub fn new(config: &IssuerConfig) -> Self {
        Self {
            component_id: config.issuer.clone(),
            event_name_prefix: config.audit_event_prefix.clone(),
        }
    }

    /// Builds an event of the given type from `context`.
    ///
    /// The event name is `<prefix>_<event_type>`; the timestamp is the
    /// build-time wall clock in epoch milliseconds. `user` fields are
    /// populated only from context values that are present.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Validation`] when `event_type` is empty.
    pub fn build(&self, event_type: &str, context: &AuditContext) -> AuditResult<AuditEvent> {
        if event_type.is_empty() {
            return Err(AuditError::Validation(
                "audit event type not specified".to_string(),
            ));
        }
        let now_ms = now_epoch_ms();
        Ok(AuditEvent {
            component_id: self.component_id.clone(),
            event_name: format!("{}_{}", self.event_name_prefix, event_type),
            timestamp: now_ms,
            event_timestamp_ms: now_ms,
            user: AuditEventUser {
                session_id: context.session_id.clone(),
                user_id: context.subject.clone(),
                govuk_signin_journey_id: context.client_session_id.clone(),
                persistent_session_id: context.persistent_session_id.clone(),
                ip_address: context.client_ip_address.clone(),
            },
            restricted: context.restricted.clone(),
            extensions: context.extensions.clone(),
        })
    }
}
