//! Conversation storage and the send lifecycle.
//!
//! `MessageStore` owns conversation persistence, `state_machine` holds the
//! pure lifecycle transitions, and `SessionController` drives an exchange
//! from user input to assistant reply.

pub mod controller;
pub mod state_machine;
pub mod store;
