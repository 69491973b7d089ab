//! Session logic and port definitions for Vyzier.
//!
//! This crate defines the "ports" (storage and resolver traits) that the
//! infrastructure layer implements, plus the message store, the local rule
//! resolver, and the session controller. It depends only on `vyzier-types`
//! -- never on `vyzier-infra` or any database/HTTP crate.

pub mod chat;
pub mod event;
pub mod resolver;
pub mod storage;
