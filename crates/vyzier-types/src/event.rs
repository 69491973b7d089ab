//! Event types for the session event bus.
//!
//! `SessionEvent` is broadcast by the session controller on every observable
//! change so a presentation layer can re-render from the new state instead of
//! polling. All variants are Clone + Send + Sync for tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::chat::SessionState;
use crate::message::Message;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The controller moved between lifecycle states.
    StateChanged {
        from: SessionState,
        to: SessionState,
    },

    /// A message was appended to the conversation.
    MessageAppended { message: Message },

    /// The typing placeholder became visible.
    PendingStarted { placeholder: Message },

    /// The typing placeholder was removed.
    PendingCleared,

    /// The draft input was cleared after a submit.
    InputCleared,

    /// The conversation was wiped and reseeded.
    ConversationCleared,
}
