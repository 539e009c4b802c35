//! # credo-db-memory
//!
//! In-memory backends for the credential issuer: a session table, an
//! audit-record table, and an at-least-once event channel with selective
//! redelivery. Used by tests and local runs; real deployments substitute
//! durable backends behind the same traits.

mod audit;
mod channel;
mod session;

pub use audit::InMemoryAuditStorage;
pub use channel::InMemoryEventChannel;
pub use session::InMemorySessionStorage;
