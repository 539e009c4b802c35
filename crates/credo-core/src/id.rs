//! Identifier generation.

/// Generates a new opaque unique identifier (UUID v4).
///
/// Used for session ids and channel message ids. Ids are never reused.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
