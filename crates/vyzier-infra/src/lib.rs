//! Infrastructure layer for Vyzier.
//!
//! Implementations of the ports defined in `vyzier-core`: SQLite-backed
//! persistence, the HTTP resolver for the remote chat backend, and the
//! `config.toml` loader.

pub mod config;
pub mod remote;
pub mod sqlite;
