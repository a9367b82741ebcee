// events.rs
// Synchronous publish/subscribe notifications consumed by the UI

use crate::errors::SimError;
use crate::simulation::Mode;

/// Stable identity of a subscriber, chosen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// Ordered set of callbacks for one event type.
pub struct Publisher<T> {
    subscribers: Vec<(SubscriberId, Callback<T>)>,
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self { subscribers: Vec::new() }
    }
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `id`. Subscribing an id twice keeps the first callback.
    pub fn subscribe(&mut self, id: SubscriberId, callback: impl FnMut(&T) + Send + 'static) {
        if self.is_subscribed(id) {
            return;
        }
        self.subscribers.push((id, Box::new(callback)));
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> Result<(), SimError> {
        match self.subscribers.iter().position(|(sid, _)| *sid == id) {
            Some(idx) => {
                self.subscribers.remove(idx);
                Ok(())
            }
            None => Err(SimError::NotRegistered(id)),
        }
    }

    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.subscribers.iter().any(|(sid, _)| *sid == id)
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn publish(&mut self, event: &T) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// The notifications a host can listen to.
#[derive(Default)]
pub struct EventBus {
    pub group_created: Publisher<String>,
    pub mouse_mode_changed: Publisher<Mode>,
    pub pause_toggled: Publisher<bool>,
}
