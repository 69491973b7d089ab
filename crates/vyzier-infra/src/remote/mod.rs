//! Remote chat backend.

pub mod client;
