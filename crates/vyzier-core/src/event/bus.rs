//! Broadcast event bus for distributing `SessionEvent` to subscribers.
//!
//! Built on `tokio::sync::broadcast`: any number of presentation layers can
//! subscribe. Publishing with no active subscribers is a no-op.

use tokio::sync::broadcast;

use vyzier_types::event::SessionEvent;

/// Default channel capacity; a single exchange emits fewer than ten events.
pub const DEFAULT_CAPACITY: usize = 64;

/// Multi-consumer bus for session events.
///
/// Cloning the bus clones the sender, so clones publish to the same
/// subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_subscribe_delivers_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::InputCleared);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::InputCleared);
    }

    #[tokio::test]
    async fn multiple_subscribers_each_receive_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(SessionEvent::PendingCleared);

        assert_eq!(rx1.recv().await.unwrap(), SessionEvent::PendingCleared);
        assert_eq!(rx2.recv().await.unwrap(), SessionEvent::PendingCleared);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(SessionEvent::ConversationCleared);
    }

    #[test]
    fn clone_shares_channel() {
        let bus = EventBus::default();
        let bus2 = bus.clone();
        let mut rx = bus.subscribe();

        bus2.publish(SessionEvent::InputCleared);

        assert!(rx.try_recv().is_ok());
    }
}
