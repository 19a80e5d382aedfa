//! Per-key change listeners and the registry that dispatches to them.

use crate::core::ConfigurationChangeEvent;
use dashmap::DashMap;
use std::sync::Arc;

/// Callback invoked when a configuration key changes.
///
/// Any `Fn(&ConfigurationChangeEvent) + Send + Sync` closure is a listener.
pub trait ConfigurationChangeListener: Send + Sync {
    /// Handle a change event. Runs synchronously on the dispatching thread.
    fn on_change_event(&self, event: &ConfigurationChangeEvent);
}

impl<F> ConfigurationChangeListener for F
where
    F: Fn(&ConfigurationChangeEvent) + Send + Sync,
{
    fn on_change_event(&self, event: &ConfigurationChangeEvent) {
        self(event)
    }
}

/// Shared handle to a registered listener. Identity is the `Arc` allocation.
pub type ListenerRef = Arc<dyn ConfigurationChangeListener>;

fn listener_id(listener: &ListenerRef) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

/// Concurrent mapping from key to the set of listeners registered for it.
///
/// A listener may be registered under several keys and a key may hold several
/// listeners. Registering the same `Arc` twice for one key is a harmless
/// overwrite. Key entries are created on first registration and are never
/// pruned, so a key may remain with an empty listener set.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::core::{ChangeType, ConfigurationChangeEvent, ListenerRef, ListenerRegistry};
/// use std::sync::Arc;
///
/// let registry = ListenerRegistry::new();
/// let listener: ListenerRef = Arc::new(|event: &ConfigurationChangeEvent| {
///     println!("{} -> {:?}", event.data_id(), event.new_value());
/// });
/// registry.add("service.timeout", listener);
///
/// let event = ConfigurationChangeEvent::new("service.timeout", Some("30".into()), ChangeType::Modify);
/// assert_eq!(registry.dispatch(&event), 1);
/// ```
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: DashMap<String, DashMap<usize, ListenerRef>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: DashMap::new(),
        }
    }

    /// Register `listener` under `data_id`.
    pub fn add(&self, data_id: &str, listener: ListenerRef) {
        self.listeners
            .entry(data_id.to_string())
            .or_default()
            .insert(listener_id(&listener), listener);
    }

    /// Remove `listener` from `data_id`. Returns whether it was registered.
    pub fn remove(&self, data_id: &str, listener: &ListenerRef) -> bool {
        match self.listeners.get(data_id) {
            Some(set) => set.remove(&listener_id(listener)).is_some(),
            None => false,
        }
    }

    /// Listeners registered under `data_id`, or `None` if there are none.
    pub fn get(&self, data_id: &str) -> Option<Vec<ListenerRef>> {
        let set = self.listeners.get(data_id)?;
        if set.is_empty() {
            return None;
        }
        Some(set.iter().map(|entry| Arc::clone(entry.value())).collect())
    }

    /// Whether an entry exists for `data_id`, even with no listeners left.
    pub fn contains_key(&self, data_id: &str) -> bool {
        self.listeners.contains_key(data_id)
    }

    /// Total number of registrations across all keys.
    pub fn len(&self) -> usize {
        self.listeners.iter().map(|set| set.len()).sum()
    }

    /// Whether no listener is registered under any key.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke every listener registered for the event's key.
    ///
    /// Listeners are collected before invocation, so a callback may register
    /// or remove listeners without deadlocking. Returns the number of
    /// listeners notified.
    pub fn dispatch(&self, event: &ConfigurationChangeEvent) -> usize {
        let Some(listeners) = self.get(event.data_id()) else {
            return 0;
        };
        for listener in &listeners {
            listener.on_change_event(event);
        }
        listeners.len()
    }
}
