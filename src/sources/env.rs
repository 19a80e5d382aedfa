//! Environment variable bootstrap source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use config::Environment;
use std::collections::HashMap;

/// Reads settings from prefixed environment variables.
///
/// With prefix `SEATA` and separator `__`, `SEATA__SERVICECOMB__CONFIG__ADDRESS`
/// becomes `servicecomb.config.address`. Keys are lower-cased, so camel-case
/// keys such as `servicecomb.ssl.authPeer` cannot be overridden this way.
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvSource {
    /// Create a source for variables starting with `prefix`, nesting on `separator`.
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300,
        }
    }

    /// Override the merge priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let environment = Environment::with_prefix(&self.prefix)
            .separator(&self.separator)
            .try_parsing(true);

        config::Config::builder()
            .add_source(environment)
            .build()
            .map_err(|e| {
                ConfigError::LoadError(format!("Failed to load environment variables: {}", e))
            })?
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ConfigError::DeserializationError(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
