//! Storage abstractions for Vyzier.
//!
//! Defines the key-value persistence port used by the message store, and an
//! in-memory implementation for tests and ephemeral sessions.

pub mod memory;
pub mod persistence;
