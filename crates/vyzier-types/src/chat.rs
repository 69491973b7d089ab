//! Conversation and session state types for Vyzier.
//!
//! A [`Conversation`] is an immutable snapshot: appending produces a new value
//! and never touches snapshots handed out earlier. [`SessionState`] is the
//! transient lifecycle state of the session controller.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::message::{Message, MessageId};

/// Greeting seeded into a conversation when nothing usable was restored.
pub const WELCOME_MESSAGE: &str = "👋 Hi! I'm Vyzier, your AI marketing specialist. I can help you create content strategies, analyze competitors, optimize for different platforms, and much more. What marketing challenge can I help you solve today?";

/// Reply appended in place of a real answer when resolution fails.
pub const FALLBACK_MESSAGE: &str = "⚠️ Our servers are busy. Please try again in a moment.";

/// Starter prompts offered to a user facing an empty conversation.
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Plan a TikTok series for my eco-fashion brand",
    "My Instagram engagement is dropping, help!",
    "Create a LinkedIn content strategy for B2B SaaS",
    "Analyze my competitor's social media strategy",
];

/// Ordered sequence of messages for one chat session.
///
/// Insertion order is the transcript order and the order of the history
/// handed to resolvers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation holding only the assistant welcome message.
    pub fn seeded() -> Self {
        Self {
            messages: vec![Message::assistant(WELCOME_MESSAGE)],
        }
    }

    /// Wrap already-ordered messages (e.g. restored from storage).
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn contains_id(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// The last `limit` messages, oldest first.
    pub fn recent(&self, limit: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(limit);
        &self.messages[start..]
    }

    /// Return a new conversation with `message` appended.
    ///
    /// Keeps the sequence invariants intact: the pending flag is dropped, a
    /// colliding id is replaced, and a timestamp earlier than the current tail
    /// is raised to the tail's timestamp.
    pub fn append(&self, message: Message) -> Conversation {
        self.append_returning(message).0
    }

    /// Like [`Conversation::append`], also returning the message as stored.
    pub fn append_returning(&self, mut message: Message) -> (Conversation, Message) {
        message.pending = false;

        if self.contains_id(&message.id) {
            message.id = MessageId::new();
        }

        if let Some(last) = self.messages.last() {
            if message.created_at < last.created_at {
                message.created_at = last.created_at;
            }
        }

        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(message.clone());
        (Conversation { messages }, message)
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Lifecycle state of the session controller.
///
/// Never persisted; every process starts in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
    AwaitingResponse,
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Sending => write!(f, "sending"),
            SessionState::AwaitingResponse => write!(f, "awaiting_response"),
            SessionState::Error => write!(f, "error"),
        }
    }
}

impl FromStr for SessionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(SessionState::Idle),
            "sending" => Ok(SessionState::Sending),
            "awaiting_response" => Ok(SessionState::AwaitingResponse),
            "error" => Ok(SessionState::Error),
            other => Err(format!("invalid session state: '{other}'")),
        }
    }
}

/// Point-in-time view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub conversation: Conversation,
    /// Typing placeholder, present only while a reply is in flight.
    pub pending: Option<Message>,
    /// Current draft input.
    pub input: String,
}

impl SessionSnapshot {
    /// Messages to display: the conversation followed by the placeholder, if any.
    pub fn transcript(&self) -> Vec<Message> {
        let mut messages = self.conversation.messages().to_vec();
        if let Some(ref pending) = self.pending {
            messages.push(pending.clone());
        }
        messages
    }
}
