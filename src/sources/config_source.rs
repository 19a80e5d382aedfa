//! Bootstrap configuration source trait.

use crate::error::Result;
use std::collections::HashMap;

/// A provider of raw bootstrap settings, such as a file or the environment.
///
/// Sources are merged by [`FileConfigurationBuilder`] in priority order; the
/// nested tables they return are flattened to dotted keys.
///
/// [`FileConfigurationBuilder`]: crate::core::FileConfigurationBuilder
pub trait ConfigSource: Send + Sync {
    /// Load the source as a (possibly nested) key-value map.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Human-readable name used in logs and error messages.
    fn name(&self) -> String;

    /// Merge priority; higher values override lower ones.
    ///
    /// Files default to 100, environment overrides to 300.
    fn priority(&self) -> i32 {
        100
    }
}
