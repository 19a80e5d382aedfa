//! In-process configuration-center client.

use crate::client::{
    ChangeCallback, ConfigCenterClient, ConfigurationChangedEvent, EventBus, SubscriptionHandle,
};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A client whose "remote" snapshot lives in memory.
///
/// Useful for embedding a fixed configuration, for bridging another change
/// feed, and for tests. [`refresh`](Self::refresh) diffs a new snapshot
/// against the current one and publishes the resulting batch.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::client::{ConfigCenterClient, MemoryConfigClient};
/// use std::collections::HashMap;
///
/// let client = MemoryConfigClient::new(HashMap::new());
/// let changed = client.refresh(HashMap::from([
///     ("service.timeout".to_string(), config::Value::from("30s")),
/// ]));
/// assert!(changed);
/// assert_eq!(client.current_data().len(), 1);
/// ```
pub struct MemoryConfigClient {
    data: ArcSwap<HashMap<String, config::Value>>,
    refresh_lock: Mutex<()>,
    bus: EventBus,
}

impl MemoryConfigClient {
    /// Create a client holding `initial`.
    pub fn new(initial: HashMap<String, config::Value>) -> Self {
        Self {
            data: ArcSwap::from_pointee(initial),
            refresh_lock: Mutex::new(()),
            bus: EventBus::new(),
        }
    }

    /// Replace the snapshot and publish the difference.
    ///
    /// Returns `false` without publishing when nothing changed.
    pub fn refresh(&self, latest: HashMap<String, config::Value>) -> bool {
        let event = {
            let _guard = self.refresh_lock.lock();
            let last = self.data.load_full();
            let event = ConfigurationChangedEvent::create_incremental(&latest, &last);
            self.data.store(Arc::new(latest));
            event
        };

        if event.is_empty() {
            return false;
        }
        debug!(
            added = event.added().len(),
            updated = event.updated().len(),
            deleted = event.deleted().len(),
            "memory client publishing change batch"
        );
        self.bus.publish(&event);
        true
    }

    /// Publish a raw batch without touching the snapshot.
    pub fn publish(&self, event: &ConfigurationChangedEvent) -> usize {
        self.bus.publish(event)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }
}

impl Default for MemoryConfigClient {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl ConfigCenterClient for MemoryConfigClient {
    fn current_data(&self) -> HashMap<String, config::Value> {
        HashMap::clone(&self.data.load())
    }

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle {
        self.bus.subscribe(callback)
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: &str) -> config::Value {
        config::Value::from(v)
    }

    #[test]
    fn test_refresh_publishes_diff() {
        let client = MemoryConfigClient::new(HashMap::from([
            ("a".to_string(), value("1")),
            ("b".to_string(), value("1")),
        ]));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _handle = client.subscribe(Arc::new(move |event: &ConfigurationChangedEvent| {
            sink.lock().push(event.clone());
        }));

        assert!(client.refresh(HashMap::from([
            ("a".to_string(), value("2")),
            ("c".to_string(), value("1")),
        ])));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].updated().contains_key("a"));
        assert!(seen[0].added().contains_key("c"));
        assert!(seen[0].deleted().contains_key("b"));
    }

    #[test]
    fn test_unchanged_refresh_is_silent() {
        let client = MemoryConfigClient::new(HashMap::from([("a".to_string(), value("1"))]));
        let _handle = client.subscribe(Arc::new(|_: &ConfigurationChangedEvent| {
            panic!("no batch expected");
        }));
        assert!(!client.refresh(HashMap::from([("a".to_string(), value("1"))])));
    }

    #[test]
    fn test_publish_leaves_snapshot_alone() {
        let client = MemoryConfigClient::default();
        let event = ConfigurationChangedEvent::new(
            HashMap::from([("a".to_string(), value("1"))]),
            HashMap::new(),
            HashMap::new(),
        );
        assert_eq!(client.publish(&event), 0);
        assert!(client.current_data().is_empty());
        assert_eq!(client.name(), "memory");
    }
}
