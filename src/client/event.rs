//! Change batches published by configuration-center clients.

use std::collections::HashMap;

/// One change notification, partitioned into added, updated and deleted keys.
///
/// Deleted entries carry the last known value of each removed key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationChangedEvent {
    added: HashMap<String, config::Value>,
    updated: HashMap<String, config::Value>,
    deleted: HashMap<String, config::Value>,
}

impl ConfigurationChangedEvent {
    /// Build a batch from explicit partitions.
    pub fn new(
        added: HashMap<String, config::Value>,
        updated: HashMap<String, config::Value>,
        deleted: HashMap<String, config::Value>,
    ) -> Self {
        Self {
            added,
            updated,
            deleted,
        }
    }

    /// Compute the batch that turns `last` into `latest`.
    ///
    /// Keys only in `latest` are added, keys only in `last` are deleted, and
    /// keys in both whose values differ are updated. Value origins are ignored.
    pub fn create_incremental(
        latest: &HashMap<String, config::Value>,
        last: &HashMap<String, config::Value>,
    ) -> Self {
        let mut event = Self::default();
        for (key, value) in latest {
            match last.get(key) {
                None => {
                    event.added.insert(key.clone(), value.clone());
                }
                Some(previous) if previous.kind != value.kind => {
                    event.updated.insert(key.clone(), value.clone());
                }
                Some(_) => {}
            }
        }
        for (key, value) in last {
            if !latest.contains_key(key) {
                event.deleted.insert(key.clone(), value.clone());
            }
        }
        event
    }

    /// Keys that appeared.
    pub fn added(&self) -> &HashMap<String, config::Value> {
        &self.added
    }

    /// Keys whose value changed.
    pub fn updated(&self) -> &HashMap<String, config::Value> {
        &self.updated
    }

    /// Keys that disappeared.
    pub fn deleted(&self) -> &HashMap<String, config::Value> {
        &self.deleted
    }

    /// Whether the batch carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Total entries across the three partitions.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.deleted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, config::Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), config::Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_create_incremental() {
        let last = map(&[("same", "1"), ("changed", "1"), ("gone", "1")]);
        let latest = map(&[("same", "1"), ("changed", "2"), ("new", "1")]);

        let event = ConfigurationChangedEvent::create_incremental(&latest, &last);
        assert_eq!(event.added().keys().collect::<Vec<_>>(), vec!["new"]);
        assert_eq!(event.updated().keys().collect::<Vec<_>>(), vec!["changed"]);
        assert_eq!(event.deleted().keys().collect::<Vec<_>>(), vec!["gone"]);
        assert_eq!(event.len(), 3);
    }

    #[test]
    fn test_identical_snapshots_are_empty() {
        let snapshot = map(&[("a", "1")]);
        let event = ConfigurationChangedEvent::create_incremental(&snapshot, &snapshot);
        assert!(event.is_empty());
    }
}
