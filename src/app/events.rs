//! Outbound alert notifications.
//!
//! The controller raises a single event kind, "alert", with no payload.
//! [`AlertBus`] holds a bounded set of [`AlertListener`]s; delivery is
//! synchronous and fire-and-forget. With no listener registered the alert
//! is dropped: nothing is queued or replayed.

use log::debug;

use super::ports::AlertListener;
use crate::error::{Error, Result};

/// Maximum number of simultaneously registered listeners.
pub const MAX_LISTENERS: usize = 4;

/// Token returned by [`AlertBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u32);

/// Fixed-capacity observer registry for the alert event.
pub struct AlertBus {
    listeners: heapless::Vec<(Subscription, Box<dyn AlertListener>), MAX_LISTENERS>,
    next_id: u32,
}

impl AlertBus {
    pub fn new() -> Self {
        Self {
            listeners: heapless::Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener. Fails with [`Error::ListenersFull`] once every
    /// slot is taken.
    pub fn subscribe(&mut self, listener: impl AlertListener + 'static) -> Result<Subscription> {
        let id = Subscription(self.next_id);
        let listener: Box<dyn AlertListener> = Box::new(listener);
        self.listeners
            .push((id, listener))
            .map_err(|_| Error::ListenersFull)?;
        self.next_id = self.next_id.wrapping_add(1);
        debug!("AlertBus: listener {} subscribed", id.0);
        Ok(id)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        before != self.listeners.len()
    }

    /// Notify every listener in subscription order. Returns how many
    /// were notified.
    pub fn emit(&mut self) -> usize {
        if self.listeners.is_empty() {
            debug!("AlertBus: alert dropped, no listeners");
            return 0;
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_alert();
        }
        self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}
