//! Merges bootstrap sources into one flat key space.

use crate::core::value::flatten_into;
use crate::error::{ConfigError, Result};
use crate::sources::ConfigSource;
use std::collections::HashMap;

/// Loads and merges bootstrap settings from multiple sources.
///
/// Sources are applied from lowest to highest priority. Merging happens per
/// leaf key, so a higher-priority source overriding `a.b` keeps `a.c` from a
/// lower-priority one.
pub struct ConfigLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigLoader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Load every source and merge into dotted keys with string values.
    ///
    /// # Errors
    ///
    /// Returns an error if no source was added or any source fails to load.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        if self.sources.is_empty() {
            return Err(ConfigError::LoadError(
                "No configuration sources specified".to_string(),
            ));
        }

        let mut merged = HashMap::new();
        for source in self.sorted() {
            let values = source.load().map_err(|e| {
                ConfigError::LoadError(format!("Failed to load source '{}': {}", source.name(), e))
            })?;
            for (key, value) in &values {
                flatten_into(key, value, &mut merged);
            }
        }
        Ok(merged)
    }

    /// Source names in merge order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted().iter().map(|s| s.name()).collect()
    }

    fn sorted(&self) -> Vec<&dyn ConfigSource> {
        let mut sorted: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
