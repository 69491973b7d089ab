//! Interactive CLI chat for Vyzier.
//!
//! Markdown rendering of replies, a typing spinner while a reply is pending,
//! a welcome banner, and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
