//! Domain records exchanged with the catalog backend.
//!
//! # Responsibility
//! - Define the typed shapes of backend payloads and request bodies.
//! - Keep wire naming (`_id`, backend field names) out of the Rust field names.
//!
//! # Invariants
//! - Every backend-produced record carries a string identity (`_id`).
//! - Client-only derived state is never serialized back to the backend.

pub mod auth;
pub mod movie;
pub mod user;
