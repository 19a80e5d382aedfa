//! Synchronous publish/subscribe for change batches.

use crate::client::ConfigurationChangedEvent;
use parking_lot::RwLock;
use std::sync::Arc;

/// Callback receiving change batches.
pub type ChangeCallback = Arc<dyn Fn(&ConfigurationChangedEvent) + Send + Sync>;

/// Handle for a subscription; dropping it unsubscribes.
pub struct SubscriptionHandle {
    id: usize,
    bus: Arc<RwLock<EventBusInner>>,
}

impl SubscriptionHandle {
    /// Identifier of this subscription within its bus.
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let id = self.id;
        // The callback is released after the lock so its captures may drop handles.
        let removed = {
            let mut inner = self.bus.write();
            inner
                .subscribers
                .iter()
                .position(|(sub_id, _)| *sub_id == id)
                .map(|index| inner.subscribers.remove(index))
        };
        drop(removed);
    }
}

struct EventBusInner {
    subscribers: Vec<(usize, ChangeCallback)>,
    next_id: usize,
}

/// Delivers change batches to explicitly registered callbacks.
///
/// Publishing runs every callback on the caller's thread, in subscription
/// order. Callbacks are invoked outside the bus lock, so they may subscribe
/// or drop handles themselves.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::client::{ConfigurationChangedEvent, EventBus};
/// use std::sync::Arc;
///
/// let bus = EventBus::new();
/// let handle = bus.subscribe(Arc::new(|event: &ConfigurationChangedEvent| {
///     println!("{} keys changed", event.len());
/// }));
///
/// bus.publish(&ConfigurationChangedEvent::default());
/// drop(handle);
/// assert_eq!(bus.subscriber_count(), 0);
/// ```
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<RwLock<EventBusInner>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(EventBusInner {
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register `callback`; it stays registered while the handle lives.
    pub fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, callback));

        SubscriptionHandle {
            id,
            bus: Arc::clone(&self.inner),
        }
    }

    /// Deliver `event` to every subscriber. Returns the number notified.
    pub fn publish(&self, event: &ConfigurationChangedEvent) -> usize {
        let callbacks: Vec<ChangeCallback> = self
            .inner
            .read()
            .subscribers
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().subscribers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> ChangeCallback {
        let counter = Arc::clone(counter);
        Arc::new(move |_: &ConfigurationChangedEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_subscribe_and_publish() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _handle = bus.subscribe(counting(&counter));

        assert_eq!(bus.publish(&ConfigurationChangedEvent::default()), 1);
        bus.publish(&ConfigurationChangedEvent::default());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_unsubscribes_immediately() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = bus.subscribe(counting(&counter));
        let _other = bus.subscribe(counting(&counter));
        assert_eq!(bus.subscriber_count(), 2);

        drop(handle);
        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(&ConfigurationChangedEvent::default());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clone_shares_subscribers() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let counter = Arc::new(AtomicUsize::new(0));
        let _handle = bus.subscribe(counting(&counter));

        clone.publish(&ConfigurationChangedEvent::default());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_may_subscribe_while_publishing() {
        let bus = EventBus::new();
        let inner_bus = bus.clone();
        let handles = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&handles);
        let _handle = bus.subscribe(Arc::new(move |_: &ConfigurationChangedEvent| {
            sink.lock().push(inner_bus.subscribe(Arc::new(|_: &ConfigurationChangedEvent| {})));
        }));

        bus.publish(&ConfigurationChangedEvent::default());
        assert_eq!(bus.subscriber_count(), 2);
    }
}
