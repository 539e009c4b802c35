//! Audit event batch consumer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use credo_core::now_epoch_s;

use crate::channel::ChannelMessage;
use crate::error::AuditResult;
use crate::record::{AuditRecordStorage, PersistedAuditRecord};

/// Per-batch processing outcome: the ids of messages that failed.
///
/// The channel runtime redelivers exactly this subset; successfully
/// persisted messages stay acknowledged. Returned as a value, never an
/// error: a partial failure is not a batch failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Ids of messages whose processing failed, in batch order.
    pub failed_message_ids: Vec<String>,
}

impl BatchResult {
    /// Returns `true` when every message in the batch was persisted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_message_ids.is_empty()
    }
}

/// Drains the audit channel in batches into the record store.
///
/// Failure isolation is the load-bearing property here: each message is
/// processed independently, a failure (parse or write) is caught and
/// recorded against that message's id, and siblings keep processing.
pub struct AuditConsumer {
    storage: Arc<dyn AuditRecordStorage>,
}

impl AuditConsumer {
    /// Creates a consumer over the given record store.
    pub fn new(storage: Arc<dyn AuditRecordStorage>) -> Self {
        Self { storage }
    }

    /// Processes one delivered batch.
    ///
    /// Messages are independent; processing order carries no meaning
    /// (time ordering lives in the record's sort key, not in the loop).
    pub async fn process_batch(&self, messages: &[ChannelMessage]) -> BatchResult {
        let mut failed_message_ids = Vec::new();
        for message in messages {
            if let Err(error) = self.process_message(message).await {
                tracing::error!(
                    message_id = %message.message_id,
                    %error,
                    "Error writing audit event to record store"
                );
                failed_message_ids.push(message.message_id.clone());
            }
        }
        BatchResult { failed_message_ids }
    }

    async fn process_message(&self, message: &ChannelMessage) -> AuditResult<()> {
        let record = PersistedAuditRecord::from_message(message, now_epoch_s())?;
        self.storage.put(&record).await?;
        tracing::info!(
            partition_key = %record.partition_key,
            sort_key = %record.sort_key,
            "Audit event saved to record store"
        );
        Ok(())
    }
}
