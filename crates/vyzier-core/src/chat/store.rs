//! Message store owning the conversation and its durable persistence.
//!
//! `MessageStore` turns the key-value `PersistenceAdapter` into a
//! conversation store: the full message list lives under one key as a JSON
//! array, and a companion key holds the message count for lightweight
//! analytics. Storage problems never escape this type; they are logged and
//! the caller carries on with the in-memory conversation.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use vyzier_types::chat::Conversation;
use vyzier_types::config::ChatConfig;
use vyzier_types::message::{Message, MessageRole};

use crate::storage::persistence::PersistenceAdapter;

pub const DEFAULT_HISTORY_KEY: &str = "vyzier_chat_history";
pub const DEFAULT_COUNT_KEY: &str = "vyzier_message_count";

/// Generic over `PersistenceAdapter` so core never depends on infra.
pub struct MessageStore<P: PersistenceAdapter> {
    adapter: P,
    history_key: String,
    count_key: String,
}

impl<P: PersistenceAdapter> MessageStore<P> {
    /// Create a store using the default storage keys.
    pub fn new(adapter: P) -> Self {
        Self::with_keys(adapter, DEFAULT_HISTORY_KEY, DEFAULT_COUNT_KEY)
    }

    pub fn with_keys(adapter: P, history_key: &str, count_key: &str) -> Self {
        Self {
            adapter,
            history_key: history_key.to_string(),
            count_key: count_key.to_string(),
        }
    }

    /// Create a store using the keys named in the configuration.
    pub fn from_config(adapter: P, config: &ChatConfig) -> Self {
        Self::with_keys(adapter, &config.history_key, &config.count_key)
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    /// Restore the conversation from storage.
    ///
    /// Missing, unreadable, or malformed data yields a conversation seeded with
    /// the welcome message. Malformed data is discarded, not surfaced.
    pub async fn load(&self) -> Conversation {
        let raw = match self.adapter.load_raw(&self.history_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.history_key, "No stored conversation, seeding welcome message");
                return Conversation::seeded();
            }
            Err(e) => {
                warn!(error = %e, key = %self.history_key, "Failed to read stored conversation");
                return Conversation::seeded();
            }
        };

        let messages: Vec<Message> = match serde_json::from_value(raw) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, key = %self.history_key, "Discarding malformed stored conversation");
                return Conversation::seeded();
            }
        };

        if let Err(reason) = check_restored(&messages) {
            warn!(reason, key = %self.history_key, "Discarding inconsistent stored conversation");
            return Conversation::seeded();
        }

        info!(count = messages.len(), "Restored conversation");
        Conversation::from_messages(messages)
    }

    /// Return a new conversation with `message` appended.
    ///
    /// Never mutates `conversation`; callers treat every snapshot as immutable.
    pub fn append(&self, conversation: &Conversation, message: Message) -> Conversation {
        conversation.append(message)
    }

    /// Write the full message list, then the message count.
    ///
    /// Returns whether the history write succeeded. Failures are logged and
    /// swallowed; the count record is best-effort.
    pub async fn persist(&self, conversation: &Conversation) -> bool {
        let value = match serde_json::to_value(conversation) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to serialize conversation");
                return false;
            }
        };

        if let Err(e) = self.adapter.save(&self.history_key, &value).await {
            warn!(error = %e, key = %self.history_key, "Failed to persist conversation");
            return false;
        }

        let count = serde_json::Value::from(conversation.len() as u64);
        if let Err(e) = self.adapter.save(&self.count_key, &count).await {
            debug!(error = %e, key = %self.count_key, "Failed to persist message count");
        }

        debug!(count = conversation.len(), "Conversation persisted");
        true
    }

    /// Remove the stored conversation and return a freshly seeded one.
    pub async fn clear(&self) -> Conversation {
        for key in [&self.history_key, &self.count_key] {
            if let Err(e) = self.adapter.remove(key).await {
                warn!(error = %e, key = %key, "Failed to remove stored record");
            }
        }
        info!("Conversation cleared");
        Conversation::seeded()
    }

    /// Stored message count, if one was recorded.
    ///
    /// Analytics only; the history record is authoritative.
    pub async fn message_count(&self) -> Option<u64> {
        match self.adapter.load_raw(&self.count_key).await {
            Ok(value) => value.and_then(|v| v.as_u64()),
            Err(e) => {
                debug!(error = %e, key = %self.count_key, "Failed to read message count");
                None
            }
        }
    }
}

/// Reject restored data that breaks the conversation invariants.
fn check_restored(messages: &[Message]) -> Result<(), &'static str> {
    if messages.is_empty() {
        return Err("empty message list");
    }

    let mut seen = HashSet::with_capacity(messages.len());
    for message in messages {
        if !seen.insert(message.id) {
            return Err("duplicate message id");
        }
        if message.role == MessageRole::User && message.content.trim().is_empty() {
            return Err("empty user message");
        }
    }

    if messages
        .windows(2)
        .any(|pair| pair[1].created_at < pair[0].created_at)
    {
        return Err("timestamps out of order");
    }

    Ok(())
}
