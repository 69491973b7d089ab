//! ResponseResolver trait definition.
//!
//! The single capability every reply strategy offers: turn a user message
//! plus recent history into an assistant message, or fail with a structured
//! `NetworkError` the caller can recover from.

use vyzier_types::error::NetworkError;
use vyzier_types::message::Message;

/// Trait for reply strategies (local rules, remote endpoint).
///
/// `history` holds the turns preceding `user_text`, oldest first. The returned
/// message must have the assistant role.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Wrap in
/// [`super::box_resolver::BoxResolver`] when the strategy is chosen at runtime.
pub trait ResponseResolver: Send + Sync {
    /// Human-readable strategy name (e.g., "local", "remote").
    fn name(&self) -> &str;

    /// Produce a reply to `user_text`.
    fn resolve(
        &self,
        user_text: &str,
        history: &[Message],
    ) -> impl std::future::Future<Output = Result<Message, NetworkError>> + Send;
}
