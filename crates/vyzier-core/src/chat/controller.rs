//! Session controller driving the send lifecycle.
//!
//! One `send` call runs a whole exchange: validate, append the user message,
//! show the typing placeholder, resolve, append the reply (or the fallback
//! message), persist, and return to `Idle`. At most one exchange is in
//! flight; a `send` issued while one is running is dropped, not queued.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`, so the controller can be shared by `&self` between futures on a
//! single-threaded runtime.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use vyzier_types::chat::{Conversation, FALLBACK_MESSAGE, SessionSnapshot, SessionState};
use vyzier_types::config::ChatConfig;
use vyzier_types::error::ValidationError;
use vyzier_types::event::SessionEvent;
use vyzier_types::message::Message;

use crate::chat::state_machine::{SessionInput, accepts_submit, transition};
use crate::chat::store::MessageStore;
use crate::event::bus::EventBus;
use crate::resolver::provider::ResponseResolver;
use crate::storage::persistence::PersistenceAdapter;

/// Number of prior messages handed to the resolver by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 6;

/// Result of a `send` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The resolver answered; the reply was appended.
    Replied(Message),
    /// The resolver failed; the fallback message was appended.
    Fallback(Message),
    /// The input was rejected before any state change.
    Rejected(ValidationError),
    /// Another exchange was in flight; the input was discarded.
    Busy,
}

impl SendOutcome {
    /// Whether the message was accepted into the conversation.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Replied(_) | SendOutcome::Fallback(_))
    }

    /// The assistant message appended by this exchange, if any.
    pub fn reply(&self) -> Option<&Message> {
        match self {
            SendOutcome::Replied(message) | SendOutcome::Fallback(message) => Some(message),
            SendOutcome::Rejected(_) | SendOutcome::Busy => None,
        }
    }
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    conversation: Conversation,
    pending: Option<Message>,
    input: String,
    /// Set while `clear` is wiping storage; sends are refused until it settles.
    clearing: bool,
}

/// Orchestrates one conversation.
///
/// Generic over `PersistenceAdapter` and `ResponseResolver`; the resolver
/// strategy is injected, never chosen here.
pub struct SessionController<P: PersistenceAdapter, R: ResponseResolver> {
    store: MessageStore<P>,
    resolver: R,
    history_limit: usize,
    inner: Mutex<SessionInner>,
    events: EventBus,
}

impl<P: PersistenceAdapter, R: ResponseResolver> SessionController<P, R> {
    /// Create a controller around an already-loaded conversation.
    pub fn new(store: MessageStore<P>, resolver: R, conversation: Conversation) -> Self {
        Self {
            store,
            resolver,
            history_limit: DEFAULT_HISTORY_LIMIT,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                conversation,
                pending: None,
                input: String::new(),
                clearing: false,
            }),
            events: EventBus::default(),
        }
    }

    /// Restore the conversation from the store and start in `Idle`.
    pub async fn start(store: MessageStore<P>, resolver: R) -> Self {
        let conversation = store.load().await;
        info!(
            resolver = resolver.name(),
            messages = conversation.len(),
            "Session started"
        );
        Self::new(store, resolver, conversation)
    }

    /// Number of prior messages passed to the resolver.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Apply the tunables from configuration.
    pub fn with_config(self, config: &ChatConfig) -> Self {
        self.with_history_limit(config.history_limit)
    }

    pub fn store(&self) -> &MessageStore<P> {
        &self.store
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Current conversation snapshot.
    pub fn conversation(&self) -> Conversation {
        self.lock().conversation.clone()
    }

    /// Everything a presentation layer needs to render, in one consistent view.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            state: inner.state,
            conversation: inner.conversation.clone(),
            pending: inner.pending.clone(),
            input: inner.input.clone(),
        }
    }

    /// Receive every future session event.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Replace the draft input.
    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    /// Send the current draft input.
    pub async fn submit(&self) -> SendOutcome {
        let text = self.input();
        self.send(&text).await
    }

    /// Run one exchange for `text`.
    ///
    /// Empty or whitespace-only text is rejected and a call made while another
    /// exchange is in flight is dropped; neither touches the conversation.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            debug!("Ignoring empty message");
            return SendOutcome::Rejected(ValidationError::EmptyInput);
        }

        // Guard, append, and leave Idle in one critical section so a second
        // send can never observe Idle after this one was accepted.
        let (history, with_user) = {
            let mut inner = self.lock();
            if !accepts_submit(inner.state) || inner.clearing {
                debug!(state = %inner.state, clearing = inner.clearing, "Dropping message while the session is busy");
                return SendOutcome::Busy;
            }

            let history = inner.conversation.recent(self.history_limit).to_vec();
            self.append_locked(&mut inner, Message::user(content));
            self.advance(&mut inner, SessionInput::Submit);

            inner.input.clear();
            self.events.publish(SessionEvent::InputCleared);

            self.advance(&mut inner, SessionInput::Dispatch);
            let placeholder = Message::placeholder();
            inner.pending = Some(placeholder.clone());
            self.events.publish(SessionEvent::PendingStarted { placeholder });

            (history, inner.conversation.clone())
        };

        // The user turn is durable even if the assistant turn fails.
        self.store.persist(&with_user).await;

        let result = self.resolver.resolve(content, &history).await;

        let (outcome, finished) = {
            let mut inner = self.lock();
            inner.pending = None;
            self.events.publish(SessionEvent::PendingCleared);

            let outcome = match result {
                Ok(reply) => {
                    let reply = self.append_locked(&mut inner, reply);
                    SendOutcome::Replied(reply)
                }
                Err(e) => {
                    warn!(error = %e, resolver = self.resolver.name(), "Resolver failed, using fallback message");
                    self.advance(&mut inner, SessionInput::Failed);
                    let fallback = self.append_locked(&mut inner, Message::assistant(FALLBACK_MESSAGE));
                    SendOutcome::Fallback(fallback)
                }
            };

            (outcome, inner.conversation.clone())
        };

        self.store.persist(&finished).await;

        {
            let mut inner = self.lock();
            let input = match inner.state {
                SessionState::Error => SessionInput::Recover,
                _ => SessionInput::Resolved,
            };
            self.advance(&mut inner, input);
        }

        outcome
    }

    /// Wipe the stored conversation and reseed it.
    ///
    /// Returns `None` without touching anything while an exchange or another
    /// clear is in flight. Sends made before the wipe settles get `Busy`.
    pub async fn clear(&self) -> Option<Conversation> {
        {
            let mut inner = self.lock();
            if inner.state != SessionState::Idle || inner.clearing {
                debug!(state = %inner.state, "Refusing to clear while the session is busy");
                return None;
            }
            inner.clearing = true;
        }

        let fresh = self.store.clear().await;
        {
            let mut inner = self.lock();
            inner.conversation = fresh.clone();
            inner.clearing = false;
        }
        self.events.publish(SessionEvent::ConversationCleared);
        Some(fresh)
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append to the guarded conversation and announce the stored message.
    fn append_locked(&self, inner: &mut SessionInner, message: Message) -> Message {
        let (conversation, appended) = inner.conversation.append_returning(message);
        inner.conversation = conversation;
        self.events.publish(SessionEvent::MessageAppended {
            message: appended.clone(),
        });
        appended
    }

    fn advance(&self, inner: &mut SessionInner, input: SessionInput) {
        let from = inner.state;
        match transition(from, input) {
            Some(to) => {
                inner.state = to;
                debug!(%from, %to, "Session state changed");
                self.events.publish(SessionEvent::StateChanged { from, to });
            }
            None => warn!(state = %from, ?input, "Ignoring invalid session transition"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use vyzier_types::chat::WELCOME_MESSAGE;
    use vyzier_types::error::{NetworkError, PersistenceError};
    use vyzier_types::message::MessageRole;

    use crate::resolver::latency::FixedLatency;
    use crate::resolver::local::{CAPTION_TEMPLATE, LocalRuleResolver};
    use crate::storage::memory::InMemoryPersistence;

    struct FailingResolver;

    impl ResponseResolver for FailingResolver {
        fn name(&self) -> &str {
            "failing"
        }

        async fn resolve(&self, _: &str, _: &[Message]) -> Result<Message, NetworkError> {
            Err(NetworkError::Transport("connection refused".to_string()))
        }
    }

    /// Records the history it was handed.
    #[derive(Default)]
    struct RecordingResolver {
        calls: AtomicUsize,
        last_history: Mutex<Vec<Message>>,
    }

    impl ResponseResolver for RecordingResolver {
        fn name(&self) -> &str {
            "recording"
        }

        async fn resolve(&self, user_text: &str, history: &[Message]) -> Result<Message, NetworkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_history.lock().unwrap() = history.to_vec();
            Ok(Message::assistant(format!("echo: {user_text}")))
        }
    }

    /// Shared in-memory store whose `remove` takes a while.
    #[derive(Clone, Default)]
    struct SlowRemovePersistence {
        inner: InMemoryPersistence,
    }

    impl PersistenceAdapter for SlowRemovePersistence {
        async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError> {
            self.inner.save(key, value).await
        }

        async fn load_raw(&self, key: &str) -> Result<Option<serde_json::Value>, PersistenceError> {
            self.inner.load_raw(key).await
        }

        async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.inner.remove(key).await
        }
    }

    type LocalController = SessionController<InMemoryPersistence, LocalRuleResolver<FixedLatency>>;

    async fn local_controller(latency: Duration) -> (LocalController, InMemoryPersistence) {
        let adapter = InMemoryPersistence::new();
        let store = MessageStore::new(adapter.clone());
        let resolver = LocalRuleResolver::new(FixedLatency(latency));
        (SessionController::start(store, resolver).await, adapter)
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let (controller, _) = local_controller(Duration::ZERO).await;

        let outcome = controller.send("Write me a caption").await;
        assert!(outcome.is_accepted());
        assert_eq!(outcome.reply().unwrap().content, CAPTION_TEMPLATE);

        let conversation = controller.conversation();
        let messages = conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, WELCOME_MESSAGE);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, "Write me a caption");
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert!(messages[2].created_at >= messages[1].created_at);
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_send_trims_user_text() {
        let (controller, _) = local_controller(Duration::ZERO).await;
        controller.send("  plan my week  ").await;
        assert_eq!(controller.conversation().messages()[1].content, "plan my week");
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_without_changes() {
        let (controller, adapter) = local_controller(Duration::ZERO).await;
        let before = controller.conversation();
        let mut rx = controller.subscribe();

        for text in ["", "   ", "\n\t"] {
            assert_eq!(
                controller.send(text).await,
                SendOutcome::Rejected(ValidationError::EmptyInput)
            );
        }

        assert_eq!(controller.conversation(), before);
        assert_eq!(controller.state(), SessionState::Idle);
        assert_eq!(adapter.write_count(), 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_second_send_while_in_flight_is_dropped() {
        let (controller, _) = local_controller(Duration::from_millis(50)).await;

        let first = controller.send("Write me a caption");
        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(controller.state(), SessionState::AwaitingResponse);
            controller.send("hashtag ideas").await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.is_accepted());
        assert_eq!(second, SendOutcome::Busy);

        let conversation = controller.conversation();
        assert_eq!(conversation.len(), 3);
        assert!(conversation.messages().iter().all(|m| m.content != "hashtag ideas"));
    }

    #[tokio::test]
    async fn test_resolver_failure_appends_fallback_and_returns_to_idle() {
        let adapter = InMemoryPersistence::new();
        let store = MessageStore::new(adapter.clone());
        let controller = SessionController::start(store, FailingResolver).await;
        let mut rx = controller.subscribe();

        let outcome = controller.send("hello").await;
        assert!(matches!(outcome, SendOutcome::Fallback(_)));

        let conversation = controller.conversation();
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.messages()[1].content, "hello");
        assert_eq!(conversation.last().unwrap().content, FALLBACK_MESSAGE);
        assert_eq!(controller.state(), SessionState::Idle);

        let states: Vec<SessionState> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::StateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(
            states,
            vec![
                SessionState::Sending,
                SessionState::AwaitingResponse,
                SessionState::Error,
                SessionState::Idle
            ]
        );

        // The user turn reached storage.
        let restored = MessageStore::new(adapter).load().await;
        assert_eq!(restored.messages()[1].content, "hello");
    }

    #[tokio::test]
    async fn test_controller_accepts_sends_after_failure() {
        let controller =
            SessionController::start(MessageStore::new(InMemoryPersistence::new()), FailingResolver).await;
        controller.send("one").await;
        assert!(controller.send("two").await.is_accepted());
        assert_eq!(controller.conversation().len(), 5);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_block_exchange() {
        let adapter = InMemoryPersistence::new();
        adapter.fail_writes(true);
        let store = MessageStore::new(adapter.clone());
        let controller =
            SessionController::start(store, LocalRuleResolver::new(FixedLatency::none())).await;

        let outcome = controller.send("analytics help").await;
        assert!(matches!(outcome, SendOutcome::Replied(_)));
        assert_eq!(controller.conversation().len(), 3);
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_persisted_conversation_survives_restart() {
        let (controller, adapter) = local_controller(Duration::ZERO).await;
        controller.send("Write me a caption").await;
        let expected = controller.conversation();

        let restarted = SessionController::start(
            MessageStore::new(adapter),
            LocalRuleResolver::new(FixedLatency::none()),
        )
        .await;
        assert_eq!(restarted.conversation(), expected);
        assert_eq!(restarted.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_resolver_receives_history_before_user_message() {
        let store = MessageStore::new(InMemoryPersistence::new());
        let controller = SessionController::start(store, RecordingResolver::default())
            .await
            .with_history_limit(2);

        controller.send("first").await;
        controller.send("second").await;

        let history = controller.resolver().last_history.lock().unwrap().clone();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "echo: first"]);
        assert_eq!(controller.resolver().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_event_sequence_for_successful_exchange() {
        let (controller, _) = local_controller(Duration::ZERO).await;
        let mut rx = controller.subscribe();

        controller.send("plan").await;

        let events = drain(&mut rx);
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                SessionEvent::StateChanged { .. } => "state",
                SessionEvent::MessageAppended { .. } => "message",
                SessionEvent::PendingStarted { .. } => "pending",
                SessionEvent::PendingCleared => "pending_cleared",
                SessionEvent::InputCleared => "input_cleared",
                SessionEvent::ConversationCleared => "cleared",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "message",
                "state",
                "input_cleared",
                "state",
                "pending",
                "pending_cleared",
                "message",
                "state"
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_shows_pending_placeholder_while_awaiting() {
        let (controller, _) = local_controller(Duration::from_millis(30)).await;

        let send = controller.send("caption");
        let observe = async {
            tokio::task::yield_now().await;
            controller.snapshot()
        };
        let (_, snapshot) = tokio::join!(send, observe);

        assert_eq!(snapshot.state, SessionState::AwaitingResponse);
        assert!(snapshot.pending.as_ref().is_some_and(|m| m.pending));
        assert_eq!(snapshot.transcript().len(), 3);
        assert!(controller.snapshot().pending.is_none());
    }

    #[tokio::test]
    async fn test_submit_sends_and_clears_draft() {
        let (controller, _) = local_controller(Duration::ZERO).await;
        controller.set_input("hashtag help");
        assert_eq!(controller.input(), "hashtag help");

        assert!(controller.submit().await.is_accepted());
        assert_eq!(controller.input(), "");
        assert_eq!(controller.conversation().messages()[1].content, "hashtag help");
    }

    #[tokio::test]
    async fn test_clear_reseeds_and_wipes_storage() {
        let (controller, adapter) = local_controller(Duration::ZERO).await;
        controller.send("plan").await;

        let fresh = controller.clear().await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(controller.conversation(), fresh);
        assert!(adapter.get_raw("vyzier_chat_history").is_none());
    }

    #[tokio::test]
    async fn test_send_during_clear_is_refused_and_not_wiped() {
        let adapter = SlowRemovePersistence::default();
        let controller = SessionController::start(
            MessageStore::new(adapter.clone()),
            LocalRuleResolver::new(FixedLatency::none()),
        )
        .await;
        controller.send("plan").await;

        let (cleared, outcome) = tokio::join!(controller.clear(), async {
            tokio::task::yield_now().await;
            controller.send("Write me a caption").await
        });

        assert_eq!(cleared.map(|c| c.len()), Some(1));
        assert_eq!(outcome, SendOutcome::Busy);
        assert_eq!(controller.conversation().len(), 1);
        assert!(adapter.inner.get_raw("vyzier_chat_history").is_none());

        // Once the wipe settles, sends go through and reach storage.
        assert!(controller.send("Write me a caption").await.is_accepted());
        let restored = MessageStore::new(adapter).load().await;
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.messages()[1].content, "Write me a caption");
    }

    #[tokio::test]
    async fn test_clear_during_exchange_leaves_storage_alone() {
        let (controller, adapter) = local_controller(Duration::from_millis(30)).await;

        let (outcome, cleared) = tokio::join!(controller.send("Write me a caption"), async {
            tokio::task::yield_now().await;
            controller.clear().await
        });

        assert!(outcome.is_accepted());
        assert!(cleared.is_none());
        assert_eq!(controller.conversation().len(), 3);
        let restored = MessageStore::new(adapter).load().await;
        assert_eq!(restored, controller.conversation());
    }

    #[tokio::test]
    async fn test_appended_event_carries_stored_message() {
        let (controller, _) = local_controller(Duration::ZERO).await;
        let mut rx = controller.subscribe();

        let outcome = controller.send("plan").await;

        let appended: Vec<Message> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::MessageAppended { message } => Some(message),
                _ => None,
            })
            .collect();
        let conversation = controller.conversation();
        assert_eq!(appended.as_slice(), &conversation.messages()[1..]);
        assert_eq!(outcome.reply(), conversation.last());
    }

    #[tokio::test]
    async fn test_with_config_sets_history_limit() {
        let config = ChatConfig {
            history_limit: 1,
            ..ChatConfig::default()
        };
        let store = MessageStore::from_config(InMemoryPersistence::new(), &config);
        let controller = SessionController::start(store, RecordingResolver::default())
            .await
            .with_config(&config);

        controller.send("first").await;
        controller.send("second").await;

        let history = controller.resolver().last_history.lock().unwrap().clone();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "echo: first");
    }
}
