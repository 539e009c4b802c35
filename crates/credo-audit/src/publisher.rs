//! Audit event publisher.

use std::sync::Arc;

use credo_config::IssuerConfig;

use crate::builder::AuditEventBuilder;
use crate::channel::EventChannel;
use crate::error::AuditResult;
use crate::event::AuditContext;

/// Publishes audit events to the durable channel.
///
/// Builds, serializes, sends. A failed send is surfaced to the caller as
/// [`crate::AuditError::Publish`] and is not retried internally; retry
/// policy belongs to the caller.
pub struct AuditPublisher {
    builder: AuditEventBuilder,
    channel: Arc<dyn EventChannel>,
}

impl AuditPublisher {
    /// Creates a publisher over the given channel.
    pub fn new(config: &IssuerConfig, channel: Arc<dyn EventChannel>) -> Self {
        Self {
            builder: AuditEventBuilder::new(config),
            channel,
        }
    }

    /// Builds and publishes one audit event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuditError::Validation`] for an empty event type,
    /// [`crate::AuditError::Json`] when serialization fails, and
    /// [`crate::AuditError::Publish`] when the channel send fails.
    pub async fn publish(&self, event_type: &str, context: &AuditContext) -> AuditResult<()> {
        let event = self.builder.build(event_type, context)?;
        let body = serde_json::to_string(&event)?;
        self.channel.send(body).await?;
        tracing::debug!(event_name = %event.event_name, "Audit event published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use std::sync::Mutex;

    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl EventChannel for RecordingChannel {
        async fn send(&self, body: String) -> AuditResult<()> {
            if self.fail {
                return Err(AuditError::publish("channel unavailable"));
            }
            self.sent.lock().unwrap().push(body);
            Ok(())
        }
    }

    fn test_config() -> IssuerConfig {
        IssuerConfig {
            session_table: "session-table".to_string(),
            audit_event_table: "audit-table".to_string(),
            session_ttl_s: 7200,
            authorization_code_ttl_s: 600,
            audit_event_prefix: "IPV_CRI".to_string(),
            issuer: "https://issuer.example".to_string(),
        }
    }

    #[tokio::test]
    async fn test_publish_sends_serialized_event() {
        let channel = Arc::new(RecordingChannel::default());
        let publisher = AuditPublisher::new(&test_config(), Arc::clone(&channel) as _);

        let context = AuditContext {
            session_id: Some("sess-1".to_string()),
            ..AuditContext::default()
        };
        publisher.publish("START", &context).await.unwrap();

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let body: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(body["event_name"], "IPV_CRI_START");
        assert_eq!(body["user"]["session_id"], "sess-1");
        // Absent user fields are omitted from the wire shape.
        assert!(body["user"].as_object().unwrap().len() == 1);
    }

    #[tokio::test]
    async fn test_publish_surfaces_channel_failure() {
        let channel = Arc::new(RecordingChannel {
            fail: true,
            ..RecordingChannel::default()
        });
        let publisher = AuditPublisher::new(&test_config(), channel);

        let err = publisher
            .publish("START", &AuditContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Publish(_)));
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_event_type_before_sending() {
        let channel = Arc::new(RecordingChannel::default());
        let publisher = AuditPublisher::new(&test_config(), Arc::clone(&channel) as _);

        let err = publisher
            .publish("", &AuditContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
        assert!(channel.sent.lock().unwrap().is_empty());
    }
}
