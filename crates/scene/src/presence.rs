//! Scene-wide player presence events.
//!
//! The host fires one event source for the whole scene; every billboard adds
//! its own listeners. Listeners are keyed by subscription id so an instance
//! can take exactly its own handlers back out on teardown.

use crate::lock;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

/// Which presence change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceKind {
    /// A player entered the scene.
    Enter,
    /// A player left the scene.
    Leave,
}

/// The player a presence event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPresence {
    /// Host user id of the player.
    pub user_id: String,
}

impl PlayerPresence {
    /// Presence of the player with `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Listener for presence events.
pub type PresenceCallback = Arc<dyn Fn(&PlayerPresence) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    enter: BTreeMap<u64, PresenceCallback>,
    leave: BTreeMap<u64, PresenceCallback>,
}

impl Listeners {
    fn of_kind(&mut self, kind: PresenceKind) -> &mut BTreeMap<u64, PresenceCallback> {
        match kind {
            PresenceKind::Enter => &mut self.enter,
            PresenceKind::Leave => &mut self.leave,
        }
    }
}

/// Shared enter/leave event source.
///
/// Cloning yields another handle to the same listener list.
#[derive(Clone, Default)]
pub struct PresenceHub {
    listeners: Arc<Mutex<Listeners>>,
}

impl PresenceHub {
    /// Hub with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it stays registered until its [`Subscription`] is
    /// unsubscribed.
    pub fn subscribe(&self, kind: PresenceKind, callback: PresenceCallback) -> Subscription {
        let mut listeners = lock(&self.listeners);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.of_kind(kind).insert(id, callback);
        Subscription {
            id,
            kind,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Deliver an event to every listener of `kind`, in subscription order.
    /// Returns how many listeners were called.
    pub fn emit(&self, kind: PresenceKind, player: &PlayerPresence) -> usize {
        // Listeners may subscribe or unsubscribe while running.
        let callbacks: Vec<PresenceCallback> =
            lock(&self.listeners).of_kind(kind).values().cloned().collect();
        trace!(?kind, user_id = %player.user_id, listeners = callbacks.len(), "presence event");
        for callback in &callbacks {
            callback(player);
        }
        callbacks.len()
    }

    /// Listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: PresenceKind) -> usize {
        lock(&self.listeners).of_kind(kind).len()
    }
}

/// Handle to one registered presence listener.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    kind: PresenceKind,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Event kind the listener receives.
    pub fn kind(&self) -> PresenceKind {
        self.kind
    }

    /// Remove the listener. Returns `false` if the hub is gone or the
    /// listener was already removed.
    pub fn unsubscribe(self) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => lock(&listeners).of_kind(self.kind).remove(&self.id).is_some(),
            None => false,
        }
    }
}
