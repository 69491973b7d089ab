//! Shared domain types for Vyzier.
//!
//! This crate contains the domain types used across the chat session
//! subsystem: messages, conversations, session state, events, the remote
//! wire format, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod wire;
