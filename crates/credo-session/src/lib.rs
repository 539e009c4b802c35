//! # credo-session
//!
//! Session lifecycle for the credential issuer: the [`Session`] entity, the
//! [`SessionStorage`] persistence trait, and the [`SessionService`] that
//! owns the two legal lifecycle steps (creation, then authorization-code
//! issuance).
//!
//! # Lifecycle
//!
//! 1. Session created from an inbound session-initiation request
//! 2. Authorization code issued exactly once (conditional write, idempotent)
//! 3. Session removed by storage-layer TTL expiry, never explicitly deleted

mod error;
mod service;
mod session;
mod storage;

pub use error::{SessionError, SessionResult};
pub use service::SessionService;
pub use session::{Session, SessionRequest};
pub use storage::{CodeAssignment, SessionStorage};
