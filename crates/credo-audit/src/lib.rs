//! # credo-audit
//!
//! At-least-once audit event pipeline for the credential issuer.
//!
//! Producer side: [`AuditEventBuilder`] turns a domain action plus context
//! into a canonical [`AuditEvent`]; [`AuditPublisher`] serializes it and
//! hands it to a durable [`EventChannel`].
//!
//! Consumer side: [`AuditConsumer`] drains the channel in batches,
//! persists each event as an individually-addressable, time-ordered
//! [`PersistedAuditRecord`], and reports per-message failures in a
//! [`BatchResult`] so the channel redelivers only the failed subset.
//! Unconditional writes under content-stable keys converge redelivery to
//! exactly-once storage.

mod builder;
mod channel;
mod consumer;
mod error;
mod event;
mod publisher;
mod record;

pub use builder::AuditEventBuilder;
pub use channel::{ChannelMessage, EventChannel};
pub use consumer::{AuditConsumer, BatchResult};
pub use error::{AuditError, AuditResult};
pub use event::{AuditContext, AuditEvent, AuditEventType, AuditEventUser};
pub use publisher::AuditPublisher;
pub use record::{AUDIT_RETENTION_S, AuditRecordStorage, PersistedAuditRecord};
