//! In-memory, writable configuration.

use crate::core::{
    ChangeType, Configuration, ConfigurationChangeEvent, ListenerRef, ListenerRegistry,
};
use crate::error::Result;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A writable key-value configuration held in memory.
///
/// Reads are lock-free; writes are serialized and notify listeners of the
/// affected key.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::core::{Configuration, MapConfiguration};
///
/// let config = MapConfiguration::new("memory");
/// config.put_config("service.timeout", "30s", Default::default()).unwrap();
/// assert_eq!(config.get_config("service.timeout").as_deref(), Some("30s"));
/// ```
pub struct MapConfiguration {
    type_name: String,
    values: ArcSwap<HashMap<String, String>>,
    write_lock: Mutex<()>,
    listeners: ListenerRegistry,
}

impl MapConfiguration {
    /// Create an empty configuration reporting `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::from_map(type_name, HashMap::new())
    }

    /// Create a configuration pre-populated with `values`.
    pub fn from_map(type_name: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            type_name: type_name.into(),
            values: ArcSwap::from_pointee(values),
            write_lock: Mutex::new(()),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Snapshot of every key and value.
    pub fn snapshot(&self) -> Arc<HashMap<String, String>> {
        self.values.load_full()
    }

    /// Replace all values, notifying listeners of each changed key.
    ///
    /// Returns the number of keys that were added, modified, or removed.
    pub fn replace(&self, values: HashMap<String, String>) -> usize {
        let guard = self.write_lock.lock();
        let previous = self.values.load_full();
        self.values.store(Arc::new(values.clone()));

        let mut events = Vec::new();
        for (key, value) in &values {
            match previous.get(key) {
                None => events.push(ConfigurationChangeEvent::new(
                    key.clone(),
                    Some(value.clone()),
                    ChangeType::Add,
                )),
                Some(old) if old != value => events.push(ConfigurationChangeEvent::new(
                    key.clone(),
                    Some(value.clone()),
                    ChangeType::Modify,
                )),
                Some(_) => {}
            }
        }
        for key in previous.keys().filter(|k| !values.contains_key(*k)) {
            events.push(ConfigurationChangeEvent::new(key.clone(), None, ChangeType::Delete));
        }
        drop(guard);

        for event in &events {
            self.listeners.dispatch(event);
        }
        events.len()
    }

    fn write(&self, data_id: &str, content: &str, only_if_absent: bool) -> bool {
        let guard = self.write_lock.lock();
        let current = self.values.load_full();
        let change_type = match current.get(data_id) {
            Some(_) if only_if_absent => return false,
            Some(old) if old == content => return true,
            Some(_) => ChangeType::Modify,
            None => ChangeType::Add,
        };

        let mut next = HashMap::clone(&current);
        next.insert(data_id.to_string(), content.to_string());
        self.values.store(Arc::new(next));
        drop(guard);

        self.listeners.dispatch(&ConfigurationChangeEvent::new(
            data_id,
            Some(content.to_string()),
            change_type,
        ));
        true
    }
}

impl Configuration for MapConfiguration {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_latest_config(
        &self,
        data_id: &str,
        default_value: Option<&str>,
        _timeout: Duration,
    ) -> Option<String> {
        self.values
            .load()
            .get(data_id)
            .cloned()
            .or_else(|| default_value.map(str::to_string))
    }

    fn put_config(&self, data_id: &str, content: &str, _timeout: Duration) -> Result<bool> {
        Ok(self.write(data_id, content, false))
    }

    fn put_config_if_absent(
        &self,
        data_id: &str,
        content: &str,
        _timeout: Duration,
    ) -> Result<bool> {
        Ok(self.write(data_id, content, true))
    }

    fn remove_config(&self, data_id: &str, _timeout: Duration) -> Result<bool> {
        let guard = self.write_lock.lock();
        let current = self.values.load_full();
        if !current.contains_key(data_id) {
            return Ok(true);
        }
        let mut next = HashMap::clone(&current);
        next.remove(data_id);
        self.values.store(Arc::new(next));
        drop(guard);

        self.listeners
            .dispatch(&ConfigurationChangeEvent::new(data_id, None, ChangeType::Delete));
        Ok(true)
    }

    fn add_config_listener(&self, data_id: &str, listener: ListenerRef) {
        if data_id.trim().is_empty() {
            return;
        }
        self.listeners.add(data_id, listener);
        debug!(data_id = %data_id, config_type = %self.type_name, "added config listener");
    }

    fn remove_config_listener(&self, data_id: &str, listener: &ListenerRef) {
        if data_id.trim().is_empty() {
            return;
        }
        self.listeners.remove(data_id, listener);
    }

    fn get_config_listeners(&self, data_id: &str) -> Option<Vec<ListenerRef>> {
        self.listeners.get(data_id)
    }
}
