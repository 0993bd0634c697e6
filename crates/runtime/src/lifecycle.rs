//! One-shot host readiness notification.
//!
//! Work requested before the host finished starting subscribes here. Firing
//! hands every pending listener back exactly once and leaves the notifier
//! fired, so later subscriptions are refused and run immediately instead.

use tracing::debug;

/// Handle returned by [`ReadyNotifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug)]
pub struct ReadyNotifier<T> {
    listeners: Vec<(ListenerId, T)>,
    next_id: u64,
    fired: bool,
}

impl<T> Default for ReadyNotifier<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            fired: false,
        }
    }
}

impl<T> ReadyNotifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn pending(&self) -> usize {
        self.listeners.len()
    }

    /// Queues `listener` until [`fire`](Self::fire).
    ///
    /// Once fired, the listener is handed back as `Err` for the caller to
    /// run directly.
    pub fn subscribe(&mut self, listener: T) -> Result<ListenerId, T> {
        if self.fired {
            return Err(listener);
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        debug!(target: "runtime::lifecycle", listener = id.0, "waiting for host start");
        Ok(id)
    }

    /// Removes a listener that has not fired yet.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<T> {
        let index = self.listeners.iter().position(|(l, _)| *l == id)?;
        Some(self.listeners.remove(index).1)
    }

    /// Marks the host ready and drains listeners in subscription order.
    ///
    /// Only the first call returns anything.
    pub fn fire(&mut self) -> Vec<T> {
        if self.fired {
            return Vec::new();
        }
        self.fired = true;
        debug!(target: "runtime::lifecycle", listeners = self.listeners.len(), "host ready");
        self.listeners.drain(..).map(|(_, listener)| listener).collect()
    }
}
