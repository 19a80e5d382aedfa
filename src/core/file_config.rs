//! Local bootstrap configuration assembled from files and the environment.

use crate::core::{ConfigLoader, Configuration, ListenerRef, MapConfiguration};
use crate::error::Result;
use crate::sources::{ConfigSource, EnvSource, FileSource};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

const FILE_CONFIG_TYPE: &str = "file";

/// Configuration read from local files and environment overrides.
///
/// This holds the adapter's own settings (server address, project, TLS keys).
/// Values may be changed in memory, and [`reload`](Self::reload) re-reads all
/// sources and notifies listeners of every key that changed.
///
/// # Examples
///
/// ```rust,no_run
/// use servicecomb_config::core::{Configuration, FileConfiguration};
///
/// # fn example() -> servicecomb_config::error::Result<()> {
/// let config = FileConfiguration::builder()
///     .with_file("conf/registry.yaml")
///     .with_env_overrides("SEATA", "__")
///     .build()?;
///
/// let address = config.get_config_or("servicecomb.config.address", "http://127.0.0.1:30110");
/// # Ok(())
/// # }
/// ```
pub struct FileConfiguration {
    store: MapConfiguration,
    loader: ConfigLoader,
}

impl FileConfiguration {
    /// Create a new builder.
    pub fn builder() -> FileConfigurationBuilder {
        FileConfigurationBuilder::new()
    }

    /// Re-read every source, replacing in-memory values.
    ///
    /// Returns the number of keys that changed.
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to load; current values are kept.
    pub fn reload(&self) -> Result<usize> {
        let values = self.loader.load()?;
        let changed = self.store.replace(values);
        info!(changed, sources = ?self.loader.source_names(), "reloaded file configuration");
        Ok(changed)
    }
}

impl Configuration for FileConfiguration {
    fn type_name(&self) -> &str {
        FILE_CONFIG_TYPE
    }

    fn get_latest_config(
        &self,
        data_id: &str,
        default_value: Option<&str>,
        timeout: Duration,
    ) -> Option<String> {
        self.store.get_latest_config(data_id, default_value, timeout)
    }

    fn put_config(&self, data_id: &str, content: &str, timeout: Duration) -> Result<bool> {
        self.store.put_config(data_id, content, timeout)
    }

    fn put_config_if_absent(
        &self,
        data_id: &str,
        content: &str,
        timeout: Duration,
    ) -> Result<bool> {
        self.store.put_config_if_absent(data_id, content, timeout)
    }

    fn remove_config(&self, data_id: &str, timeout: Duration) -> Result<bool> {
        self.store.remove_config(data_id, timeout)
    }

    fn add_config_listener(&self, data_id: &str, listener: ListenerRef) {
        self.store.add_config_listener(data_id, listener)
    }

    fn remove_config_listener(&self, data_id: &str, listener: &ListenerRef) {
        self.store.remove_config_listener(data_id, listener)
    }

    fn get_config_listeners(&self, data_id: &str) -> Option<Vec<ListenerRef>> {
        self.store.get_config_listeners(data_id)
    }
}

/// Builder for [`FileConfiguration`].
///
/// Files are merged in the order given, later files overriding earlier ones;
/// environment overrides take precedence over every file.
pub struct FileConfigurationBuilder {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
}

impl FileConfigurationBuilder {
    /// Create a builder with no sources.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
        }
    }

    /// Add a YAML, TOML, or JSON file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Add environment variable overrides, e.g. `("SEATA", "__")`.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom source with its own priority.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Load every source and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no source was given or any source fails to load.
    pub fn build(self) -> Result<FileConfiguration> {
        let mut loader = ConfigLoader::new();

        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10);
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }
        for source in self.custom_sources {
            loader.add_source(source);
        }
        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix, separator)));
        }

        let values = loader.load()?;
        info!(keys = values.len(), sources = ?loader.source_names(), "loaded file configuration");

        Ok(FileConfiguration {
            store: MapConfiguration::from_map(FILE_CONFIG_TYPE, values),
            loader,
        })
    }
}

impl Default for FileConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
