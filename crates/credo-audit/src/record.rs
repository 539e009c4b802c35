//! Consumer-side persisted audit record.
//!
//! The key layout is a durable contract other systems query against:
//! partition key `SESSION#<sessionId>`, sort key
//! `TXMA#<eventName>#<timestamp>#<messageId>`. Field order and separators
//! are frozen; changing either is a breaking change.

use async_trait::async_trait;
use serde::Deserialize;

use crate::channel::ChannelMessage;
use crate::error::{AuditError, AuditResult};

/// Retention window applied at ingestion, in seconds.
pub const AUDIT_RETENTION_S: i64 = 360;

/// The subset of the event body the consumer extracts for key
/// construction. The consumer is a sink, not a validator; everything else
/// in the body passes through opaquely.
#[derive(Debug, Deserialize)]
struct ExtractedEvent {
    event_name: String,
    timestamp: i64,
    user: ExtractedUser,
}

#[derive(Debug, Deserialize)]
struct ExtractedUser {
    session_id: String,
}

/// One audit event persisted as an individually-addressable, time-ordered
/// record. Created once per successfully processed batch item, never
/// updated, removed by storage-layer TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAuditRecord {
    /// `SESSION#<sessionId>`.
    pub partition_key: String,
    /// `TXMA#<eventName>#<timestamp>#<messageId>`. The channel message id
    /// keeps the key collision-free when events share a timestamp, and
    /// stable across redeliveries of the same logical message.
    pub sort_key: String,
    /// Raw serialized event payload, stored as received.
    pub event: String,
    /// Retention TTL, epoch seconds (`ingestion time + AUDIT_RETENTION_S`).
    pub expiry_date: i64,
}

impl PersistedAuditRecord {
    /// Builds a record from a delivered message.
    ///
    /// Redelivery of the same logical message recomputes the identical
    /// keys, which is what converges at-least-once delivery to
    /// exactly-once storage.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MalformedEvent`] when the body is not JSON or
    /// lacks `event_name`, `timestamp` or `user.session_id`.
    pub fn from_message(message: &ChannelMessage, ingested_at_s: i64) -> AuditResult<Self> {
        let extracted: ExtractedEvent = serde_json::from_str(&message.body)
            .map_err(|e| AuditError::MalformedEvent(e.to_string()))?;
        Ok(Self {
            partition_key: format!("SESSION#{}", extracted.user.session_id),
            sort_key: format!(
                "TXMA#{}#{}#{}",
                extracted.event_name, extracted.timestamp, message.message_id
            ),
            event: message.body.clone(),
            expiry_date: ingested_at_s + AUDIT_RETENTION_S,
        })
    }
}

/// Storage trait for persisted audit records.
#[async_trait]
pub trait AuditRecordStorage: Send + Sync {
    /// Writes a record unconditionally.
    ///
    /// Writes are keyed by content stable across redelivery, so a repeat
    /// write for the same logical message is an idempotent overwrite, not
    /// a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Persistence`] on storage-layer failure.
    async fn put(&self, record: &PersistedAuditRecord) -> AuditResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(id: &str, body: serde_json::Value) -> ChannelMessage {
        ChannelMessage {
            message_id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_key_composition() {
        let msg = message(
            "msg-1",
            json!({
                "event_name": "IPV_CRI_START",
                "timestamp": 1_700_000_000_000_i64,
                "user": {"session_id": "sess-1"},
                "component_id": "https://issuer.example"
            }),
        );
        let record = PersistedAuditRecord::from_message(&msg, 1_700_000_100).unwrap();
        assert_eq!(record.partition_key, "SESSION#sess-1");
        assert_eq!(record.sort_key, "TXMA#IPV_CRI_START#1700000000000#msg-1");
        assert_eq!(record.expiry_date, 1_700_000_100 + AUDIT_RETENTION_S);
        assert_eq!(record.event, msg.body);
    }

    #[test]
    fn test_same_timestamp_different_message_ids_do_not_collide() {
        let body = json!({
            "event_name": "IPV_CRI_END",
            "timestamp": 42,
            "user": {"session_id": "sess-1"}
        });
        let a = PersistedAuditRecord::from_message(&message("msg-a", body.clone()), 0).unwrap();
        let b = PersistedAuditRecord::from_message(&message("msg-b", body), 0).unwrap();
        assert_eq!(a.partition_key, b.partition_key);
        assert_ne!(a.sort_key, b.sort_key);
    }

    #[test]
    fn test_redelivery_recomputes_identical_keys() {
        let body = json!({
            "event_name": "IPV_CRI_END",
            "timestamp": 42,
            "user": {"session_id": "sess-1"}
        });
        let first = PersistedAuditRecord::from_message(&message("msg-a", body.clone()), 10).unwrap();
        let redelivered =
            PersistedAuditRecord::from_message(&message("msg-a", body), 99).unwrap();
        assert_eq!(first.partition_key, redelivered.partition_key);
        assert_eq!(first.sort_key, redelivered.sort_key);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        let msg = ChannelMessage {
            message_id: "msg-1".to_string(),
            body: "not json".to_string(),
        };
        assert!(matches!(
            PersistedAuditRecord::from_message(&msg, 0).unwrap_err(),
            AuditError::MalformedEvent(_)
        ));

        let missing_user = message("msg-2", json!({"event_name": "X", "timestamp": 1}));
        assert!(PersistedAuditRecord::from_message(&missing_user, 0).is_err());
    }

    #[test]
    fn test_extra_fields_pass_through_opaquely() {
        let msg = message(
            "msg-1",
            json!({
                "event_name": "IPV_CRI_VC_ISSUED",
                "timestamp": 7,
                "user": {"session_id": "sess-1", "user_id": "user-1"},
                "restricted": {"name": "x"},
                "extensions": {"evidence": []}
            }),
        );
        let record = PersistedAuditRecord::from_message(&msg, 0).unwrap();
        // The stored payload is the body verbatim, extras included.
        let stored: serde_json::Value = serde_json::from_str(&record.event).unwrap();
        assert_eq!(stored["restricted"]["name"], "x");
        assert_eq!(stored["user"]["user_id"], "user-1");
    }
}
