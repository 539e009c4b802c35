//! At-least-once event channel boundary.
//!
//! The pipeline is decoupled from the channel technology: any transport
//! that can deliver a message at least once, tag each logical message with
//! a stable id, and redeliver a reported subset fits behind these types.

use async_trait::async_trait;

use crate::error::AuditResult;

/// Producer-side handle to the durable channel.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Sends one serialized audit event.
    ///
    /// Delivery is at-least-once; the channel may hand the message to the
    /// consumer more than once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuditError::Publish`] when the send fails. The
    /// publisher surfaces this to its caller without retrying.
    async fn send(&self, body: String) -> AuditResult<()>;
}

/// One delivered message, as handed to the consumer.
///
/// `message_id` is assigned by the channel, unique per logical message and
/// stable across redelivery attempts; the consumer folds it into the
/// persisted record's sort key so redeliveries recompute the same key.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    /// Channel-assigned message id.
    pub message_id: String,
    /// Raw serialized event body.
    pub body: String,
}
