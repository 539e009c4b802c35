//! # credo-core
//!
//! Shared leaf types for the Credo credential issuer: epoch timestamp
//! helpers and identifier generation. Everything here is dependency-light
//! so every other crate in the workspace can use it.

pub mod id;
pub mod time;

pub use id::generate_id;
pub use time::{now_epoch_ms, now_epoch_s};
