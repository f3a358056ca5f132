//! Event dispatcher: transport callbacks to registry updates and
//! broadcasts.
//!
//! The dispatcher is the only writer of the [`SessionRegistry`] and the
//! only component that fans events out. Three handlers mirror the three
//! transport callbacks:
//!
//! - [`handle_connect`](Dispatcher::handle_connect) registers the
//!   session;
//! - [`handle_disconnect`](Dispatcher::handle_disconnect) removes it
//!   (tolerating ids that were never registered);
//! - [`handle_chat_message`](Dispatcher::handle_chat_message) tags the
//!   payload with the sender's id and sends it to every registered
//!   session, the sender included.
//!
//! Fan-out is best-effort and per-target independent: a session whose
//! channel is already closed is skipped and the remaining targets still
//! receive the event.

use std::sync::Arc;

use parley_types::{ChatBroadcast, ChatPayload, ClientEvent, ServerEvent, SessionId};
use tracing::{debug, info};

use crate::error::RelayError;
use crate::registry::{SessionRegistry, SessionSender};

/// Decode a raw text frame into a [`ClientEvent`].
///
/// Invalid JSON, an unknown event name, and a `chat_message` payload
/// missing `name` or `message` all map to
/// [`RelayError::MalformedPayload`]. The error is scoped to the one
/// frame; callers log it and drop the frame without touching the
/// session.
pub fn decode_client_event(text: &str) -> Result<ClientEvent, RelayError> {
    serde_json::from_str(text).map_err(|e| RelayError::MalformedPayload(e.to_string()))
}

/// Bridges transport lifecycle and inbound chat events to registry
/// updates and outbound broadcasts.
///
/// Cheap to clone; all clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this dispatcher operates on.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Transport accepted a connection: register the session.
    ///
    /// No response is sent to the client.
    pub async fn handle_connect(&self, id: SessionId, sender: SessionSender) {
        info!(%id, "client connected");
        self.registry.register(id, sender).await;
    }

    /// Transport closed a connection: remove the session.
    ///
    /// The transport hands back the channel it was given at connect
    /// time, so a stale teardown (the session was replaced by a
    /// duplicate registration) cannot evict the replacement's entry.
    /// Ids that were never registered or were already removed are
    /// tolerated; the registry removal is a no-op in those cases.
    pub async fn handle_disconnect(&self, id: SessionId, sender: &SessionSender) {
        info!(%id, "client disconnected");
        self.registry.unregister_matching(id, sender).await;
    }

    /// Relay a chat message from session `id` to every registered
    /// session, including the sender.
    ///
    /// The payload passes through unchanged apart from the attached
    /// `sid`. A target whose channel is closed (mid-teardown) is
    /// skipped; the failure never aborts delivery to the remaining
    /// targets and never propagates to the sender. Returns the number
    /// of sessions the event was handed to.
    pub async fn handle_chat_message(&self, id: SessionId, payload: ChatPayload) -> usize {
        debug!(%id, name = %payload.name, message = %payload.message, "chat message received");

        let event = ServerEvent::ChatMessage(ChatBroadcast::tag(id, payload));
        let targets = self.registry.snapshot().await;

        let mut delivered = 0_usize;
        for (target, sender) in targets {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(%target, "send failed, target channel closed");
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unreachable)]

    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn payload(name: &str, message: &str) -> ChatPayload {
        ChatPayload {
            name: String::from(name),
            message: String::from(message),
        }
    }

    /// Register a fresh session and return its id, sender, and
    /// receiving end.
    async fn connect(
        dispatcher: &Dispatcher,
    ) -> (SessionId, SessionSender, UnboundedReceiver<ServerEvent>) {
        let id = SessionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        dispatcher.handle_connect(id, tx.clone()).await;
        (id, tx, rx)
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(SessionRegistry::new()))
    }

    fn expect_chat(event: Option<ServerEvent>) -> ChatBroadcast {
        match event {
            Some(ServerEvent::ChatMessage(broadcast)) => broadcast,
            None => unreachable!("expected a chat_message event, channel was empty"),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_every_session_including_sender() {
        let dispatcher = dispatcher();
        let (s, _tx_s, mut rx_s) = connect(&dispatcher).await;
        let (_t, _tx_t, mut rx_t) = connect(&dispatcher).await;
        let (_u, _tx_u, mut rx_u) = connect(&dispatcher).await;

        let delivered = dispatcher
            .handle_chat_message(s, payload("Hamza", "Hello!"))
            .await;
        assert_eq!(delivered, 3);

        for rx in [&mut rx_s, &mut rx_t, &mut rx_u] {
            let broadcast = expect_chat(rx.try_recv().ok());
            assert_eq!(broadcast.sid, s);
            assert_eq!(broadcast.name, "Hamza");
            assert_eq!(broadcast.message, "Hello!");
            // Exactly one copy per target.
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn lone_sender_receives_its_own_echo() {
        let dispatcher = dispatcher();
        let (s, _tx_s, mut rx_s) = connect(&dispatcher).await;

        let delivered = dispatcher.handle_chat_message(s, payload("Ana", "hi")).await;
        assert_eq!(delivered, 1);

        let broadcast = expect_chat(rx_s.try_recv().ok());
        assert_eq!(broadcast.sid, s);
    }

    #[tokio::test]
    async fn concurrent_messages_each_reach_all_targets() {
        let dispatcher = dispatcher();
        let (a, _tx_a, mut rx_a) = connect(&dispatcher).await;
        let (b, _tx_b, mut rx_b) = connect(&dispatcher).await;

        let (sent_a, sent_b) = tokio::join!(
            dispatcher.handle_chat_message(a, payload("A", "from a")),
            dispatcher.handle_chat_message(b, payload("B", "from b")),
        );
        assert_eq!(sent_a, 2);
        assert_eq!(sent_b, 2);

        // Each receiver sees both messages exactly once, in some order.
        for rx in [&mut rx_a, &mut rx_b] {
            let first = expect_chat(rx.try_recv().ok());
            let second = expect_chat(rx.try_recv().ok());
            let mut sids = [first.sid, second.sid];
            sids.sort_unstable();
            let mut expected = [a, b];
            expected.sort_unstable();
            assert_eq!(sids, expected);
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn disconnected_session_no_longer_receives() {
        let dispatcher = dispatcher();
        let (s, tx_s, mut rx_s) = connect(&dispatcher).await;
        let (t, _tx_t, mut rx_t) = connect(&dispatcher).await;

        dispatcher.handle_disconnect(s, &tx_s).await;
        assert!(!dispatcher.registry().contains(s).await);

        let delivered = dispatcher.handle_chat_message(t, payload("T", "still here")).await;
        assert_eq!(delivered, 1);
        assert!(rx_s.try_recv().is_err());
        assert!(rx_t.try_recv().is_ok());
    }

    #[tokio::test]
    async fn dead_target_does_not_block_live_ones() {
        let dispatcher = dispatcher();
        let (s, _tx_s, mut rx_s) = connect(&dispatcher).await;
        let (_t, _tx_t, rx_t) = connect(&dispatcher).await;

        // Simulate a target mid-teardown: receiver gone, registry entry
        // not yet removed.
        drop(rx_t);

        let delivered = dispatcher.handle_chat_message(s, payload("S", "hello?")).await;
        assert_eq!(delivered, 1);
        assert!(rx_s.try_recv().is_ok());
    }

    #[tokio::test]
    async fn malformed_frame_does_not_poison_later_messages() {
        let dispatcher = dispatcher();
        let (s, _tx_s, mut rx_s) = connect(&dispatcher).await;
        let (t, _tx_t, mut rx_t) = connect(&dispatcher).await;

        let bad = decode_client_event(r#"{"event":"chat_message","data":{"name":"NoBody"}}"#);
        assert!(matches!(bad, Err(RelayError::MalformedPayload(_))));

        let frame = r#"{"event":"chat_message","data":{"name":"T","message":"fine"}}"#;
        let event = decode_client_event(frame).ok();
        let Some(ClientEvent::ChatMessage(payload)) = event else {
            unreachable!("well-formed frame must decode");
        };
        let delivered = dispatcher.handle_chat_message(t, payload).await;
        assert_eq!(delivered, 2);
        assert_eq!(expect_chat(rx_s.try_recv().ok()).message, "fine");
        assert_eq!(expect_chat(rx_t.try_recv().ok()).sid, t);
    }

    #[tokio::test]
    async fn registry_size_tracks_connects_minus_disconnects() {
        let dispatcher = dispatcher();
        let mut live = Vec::new();
        for _ in 0..5 {
            let (id, tx, rx) = connect(&dispatcher).await;
            live.push((id, tx, rx));
        }
        assert_eq!(dispatcher.registry().len().await, 5);

        for (id, tx, _) in live.drain(..3) {
            dispatcher.handle_disconnect(id, &tx).await;
        }
        assert_eq!(dispatcher.registry().len().await, 2);

        // Disconnecting an id twice must not go negative or remove others.
        if let Some((id, tx, _)) = live.first() {
            let (id, tx) = (*id, tx.clone());
            dispatcher.handle_disconnect(id, &tx).await;
            dispatcher.handle_disconnect(id, &tx).await;
        }
        assert_eq!(dispatcher.registry().len().await, 1);
    }

    #[tokio::test]
    async fn stale_teardown_does_not_evict_replacement_session() {
        let dispatcher = dispatcher();
        let id = SessionId::new();

        let (old_tx, _old_rx) = mpsc::unbounded_channel();
        dispatcher.handle_connect(id, old_tx.clone()).await;

        // Duplicate registration: the newer channel wins.
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();
        dispatcher.handle_connect(id, new_tx.clone()).await;

        // The replaced connection tears down; the winner must survive.
        dispatcher.handle_disconnect(id, &old_tx).await;
        assert!(dispatcher.registry().contains(id).await);

        let delivered = dispatcher
            .handle_chat_message(id, payload("X", "still here"))
            .await;
        assert_eq!(delivered, 1);
        assert_eq!(expect_chat(new_rx.try_recv().ok()).sid, id);

        // The winner's own teardown still removes the entry.
        dispatcher.handle_disconnect(id, &new_tx).await;
        assert!(!dispatcher.registry().contains(id).await);
    }
}
