//! In-memory audit record storage backend.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use credo_audit::{AuditError, AuditRecordStorage, AuditResult, PersistedAuditRecord};

/// In-memory audit-record table keyed by (partition key, sort key).
///
/// Individual partitions can be poisoned to reject writes, which is how
/// tests exercise the consumer's partial-batch failure isolation; it plays
/// the role a fault-injecting database mock plays elsewhere.
#[derive(Debug, Default)]
pub struct InMemoryAuditStorage {
    records: DashMap<(String, String), PersistedAuditRecord>,
    poisoned_partitions: DashSet<String>,
}

impl InMemoryAuditStorage {
    /// Creates an empty audit-record table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write to `partition_key` fail until
    /// [`heal_partition`](Self::heal_partition) is called.
    pub fn poison_partition(&self, partition_key: impl Into<String>) {
        self.poisoned_partitions.insert(partition_key.into());
    }

    /// Clears a poisoned partition.
    pub fn heal_partition(&self, partition_key: &str) {
        self.poisoned_partitions.remove(partition_key);
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fetches one record by its composite key.
    #[must_use]
    pub fn get(&self, partition_key: &str, sort_key: &str) -> Option<PersistedAuditRecord> {
        self.records
            .get(&(partition_key.to_string(), sort_key.to_string()))
            .map(|r| r.clone())
    }

    /// All records for one session, ordered by sort key (time-ordered per
    /// the key layout).
    #[must_use]
    pub fn records_for_session(&self, session_id: &str) -> Vec<PersistedAuditRecord> {
        let partition_key = format!("SESSION#{session_id}");
        let mut records: Vec<PersistedAuditRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == partition_key)
            .map(|entry| entry.clone())
            .collect();
        records.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
        records
    }
}

#[async_trait]
impl AuditRecordStorage for InMemoryAuditStorage {
    async fn put(&self, record: &PersistedAuditRecord) -> AuditResult<()> {
        if self.poisoned_partitions.contains(&record.partition_key) {
            return Err(AuditError::persistence(format!(
                "write rejected for {}",
                record.partition_key
            )));
        }
        // Unconditional insert: a redelivered message overwrites its own
        // earlier record under the identical key.
        self.records.insert(
            (record.partition_key.clone(), record.sort_key.clone()),
            record.clone(),
        );
        Ok(())
    }
}
