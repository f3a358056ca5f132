//! Connection registry: the authoritative set of connected sessions.
//!
//! Each entry pairs a [`SessionId`] with the session's outbound event
//! channel. The map is guarded by an async [`RwLock`]; broadcast reads
//! take a copy-on-read [`snapshot`](SessionRegistry::snapshot) so
//! concurrent registrations and removals can never corrupt an
//! in-progress fan-out.
//!
//! Membership is driven purely by transport lifecycle events: no
//! eviction, no capacity limit, no expiry.

use std::collections::BTreeMap;

use parley_types::{ServerEvent, SessionId};
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tracing::warn;

/// Outbound handle for one connected session.
///
/// Events pushed here are drained by the session's `WebSocket` writer
/// task. The channel is unbounded: the relay applies no backpressure.
pub type SessionSender = mpsc::UnboundedSender<ServerEvent>;

/// Authoritative map of currently connected sessions.
///
/// Constructed once at process start and shared (via `Arc`) between the
/// dispatcher and the transport layer. All methods take `&self`;
/// interior mutability lives behind the lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<BTreeMap<SessionId, SessionSender>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add a session to the active set.
    ///
    /// The transport layer guarantees ids are unique among live
    /// connections, so a duplicate here is an invariant violation. It
    /// is logged and the newer sender wins; the replaced session stops
    /// receiving broadcasts and its teardown is a no-op against the
    /// winner's entry (see
    /// [`unregister_matching`](Self::unregister_matching)).
    pub async fn register(&self, id: SessionId, sender: SessionSender) {
        let mut sessions = self.sessions.write().await;
        if sessions.insert(id, sender).is_some() {
            warn!(%id, "session id registered twice, replacing previous entry");
        }
    }

    /// Remove a session from the active set.
    ///
    /// An absent id (never registered, or already removed by an earlier
    /// disconnect) is a true no-op.
    pub async fn unregister(&self, id: SessionId) {
        self.sessions.write().await.remove(&id);
    }

    /// Remove a session only if `sender` is still the registered
    /// channel for `id`.
    ///
    /// A session replaced by a duplicate registration finds someone
    /// else's channel under its id; its teardown must not evict the
    /// winner. Absent ids and mismatched channels are no-ops. This is
    /// the removal the transport layer uses on disconnect.
    pub async fn unregister_matching(&self, id: SessionId, sender: &SessionSender) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&id)
            .is_some_and(|current| current.same_channel(sender))
        {
            sessions.remove(&id);
        }
    }

    /// Copy-on-read snapshot of the active sessions.
    ///
    /// Reflects every registration and removal completed before the
    /// call. Mutations that happen while the caller iterates the
    /// returned list do not affect it.
    pub async fn snapshot(&self) -> Vec<(SessionId, SessionSender)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, sender)| (*id, sender.clone()))
            .collect()
    }

    /// Whether the given session is currently registered.
    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// Number of currently registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
