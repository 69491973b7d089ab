//! Wire format of the remote chat endpoint.
//!
//! Request: `{"message": "...", "history": [{"role": "user", "content": "..."}]}`.
//! Response: `{"response": "..."}`.

use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageRole};

/// One prior turn as sent to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

impl ChatRequest {
    /// Build a request from the user text and the trailing `limit` history entries.
    pub fn new(message: &str, history: &[Message], limit: usize) -> Self {
        let start = history.len().saturating_sub(limit);
        Self {
            message: message.to_string(),
            history: history[start..]
                .iter()
                .filter(|m| !m.pending)
                .map(HistoryEntry::from)
                .collect(),
        }
    }
}

/// Body of a successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
