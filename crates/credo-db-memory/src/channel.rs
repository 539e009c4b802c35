//! In-memory at-least-once event channel.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use credo_audit::{AuditResult, BatchResult, ChannelMessage, EventChannel};
use credo_core::generate_id;

/// In-memory at-least-once channel.
///
/// Producers [`send`](EventChannel::send); a consumer loop calls
/// [`receive_batch`](Self::receive_batch) and reports the outcome with
/// [`resolve`](Self::resolve): acknowledged messages are dropped, failed
/// ones are re-queued for redelivery under the same message id. Message
/// ids are assigned once per logical message, so every redelivery of a
/// message recomputes the same persisted-record key downstream.
#[derive(Debug, Default)]
pub struct InMemoryEventChannel {
    pending: Mutex<VecDeque<ChannelMessage>>,
    in_flight: Mutex<HashMap<String, ChannelMessage>>,
    delivery_counts: Mutex<HashMap<String, u32>>,
}

impl InMemoryEventChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages awaiting delivery.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Number of delivered-but-unresolved messages.
    #[must_use]
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }

    /// How many times a message has been delivered so far.
    #[must_use]
    pub fn delivery_count(&self, message_id: &str) -> u32 {
        self.delivery_counts
            .lock()
            .unwrap()
            .get(message_id)
            .copied()
            .unwrap_or(0)
    }

    /// Delivers up to `max` pending messages, moving them in flight.
    pub fn receive_batch(&self, max: usize) -> Vec<ChannelMessage> {
        let mut pending = self.pending.lock().unwrap();
        let mut in_flight = self.in_flight.lock().unwrap();
        let mut delivery_counts = self.delivery_counts.lock().unwrap();

        let mut batch = Vec::new();
        while batch.len() < max {
            let Some(message) = pending.pop_front() else {
                break;
            };
            *delivery_counts
                .entry(message.message_id.clone())
                .or_insert(0) += 1;
            in_flight.insert(message.message_id.clone(), message.clone());
            batch.push(message);
        }
        batch
    }

    /// Applies a batch outcome: failed messages return to the queue for
    /// redelivery, everything else in flight from that batch is
    /// acknowledged and dropped.
    pub fn resolve(&self, batch: &[ChannelMessage], result: &BatchResult) {
        let mut pending = self.pending.lock().unwrap();
        let mut in_flight = self.in_flight.lock().unwrap();

        for message in batch {
            let Some(message) = in_flight.remove(&message.message_id) else {
                continue;
            };
            if result
                .failed_message_ids
                .contains(&message.message_id)
            {
                tracing::debug!(message_id = %message.message_id, "Re-queuing failed message");
                pending.push_back(message);
            }
        }
    }
}

#[async_trait]
impl EventChannel for InMemoryEventChannel {
    async fn send(&self, body: String) -> AuditResult<()> {
        let message = ChannelMessage {
            message_id: generate_id(),
            body,
        };
        self.pending.lock().unwrap().push_back(message);
        Ok(())
    }
}
