//! Pure lifecycle transitions for a chat session.
//!
//! ```text
//! Idle --Submit--> Sending --Dispatch--> AwaitingResponse --Resolved--> Idle
//!                                        AwaitingResponse --Failed--> Error --Recover--> Idle
//! ```
//!
//! No I/O and no clock: the controller feeds inputs and applies the result.

use vyzier_types::chat::SessionState;

/// Input driving a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// A non-empty message was accepted.
    Submit,
    /// The user message is appended and the resolver is about to run.
    Dispatch,
    /// The resolver produced a reply.
    Resolved,
    /// The resolver failed.
    Failed,
    /// The fallback message has been appended.
    Recover,
}

/// Next state for `input` in `state`, or `None` if the pair is not allowed.
pub fn transition(state: SessionState, input: SessionInput) -> Option<SessionState> {
    use SessionInput::*;
    use SessionState::*;

    match (state, input) {
        (Idle, Submit) => Some(Sending),
        (Sending, Dispatch) => Some(AwaitingResponse),
        (AwaitingResponse, Resolved) => Some(Idle),
        (AwaitingResponse, Failed) => Some(Error),
        (Error, Recover) => Some(Idle),
        _ => None,
    }
}

/// Whether a new message may be submitted in `state`.
pub fn accepts_submit(state: SessionState) -> bool {
    transition(state, SessionInput::Submit).is_some()
}
