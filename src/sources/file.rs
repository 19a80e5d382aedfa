//! File-based bootstrap source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use config::{File, FileFormat};
use std::collections::HashMap;
use std::path::PathBuf;

/// Reads settings from a YAML, TOML, or JSON file.
///
/// The format follows the file extension.
///
/// # Examples
///
/// ```rust,no_run
/// use servicecomb_config::sources::FileSource;
///
/// let source = FileSource::new("conf/registry.yaml").with_priority(150);
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    /// Create a source for `path` with the default file priority (100).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Override the merge priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn format(&self) -> Result<FileFormat> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        match extension {
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "toml" => Ok(FileFormat::Toml),
            "json" => Ok(FileFormat::Json),
            other => Err(ConfigError::LoadError(format!(
                "Unsupported file extension '{}' for {}. Supported: .yaml, .yml, .toml, .json",
                other,
                self.path.display()
            ))),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        let format = self.format()?;
        if !self.path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        config::Config::builder()
            .add_source(File::from(self.path.clone()).format(format).required(true))
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to load file: {}", e)))?
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| ConfigError::DeserializationError(format!("Failed to parse file: {}", e)))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert!(matches!(FileSource::new("a.yml").format(), Ok(FileFormat::Yaml)));
        assert!(matches!(FileSource::new("a.toml").format(), Ok(FileFormat::Toml)));
        assert!(matches!(FileSource::new("a.json").format(), Ok(FileFormat::Json)));
        assert!(FileSource::new("a.conf").format().is_err());
        assert!(FileSource::new("noext").format().is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.toml");
        fs::write(&path, "[servicecomb.config]\naddress = \"http://kie:30110\"\n").unwrap();

        let values = FileSource::new(&path).load().unwrap();
        assert!(values.contains_key("servicecomb"));
    }

    #[test]
    fn test_missing_file() {
        assert!(FileSource::new("/nonexistent/registry.yaml").load().is_err());
    }

    #[test]
    fn test_name_and_priority() {
        let source = FileSource::new("registry.yaml").with_priority(120);
        assert_eq!(source.name(), "file:registry.yaml");
        assert_eq!(source.priority(), 120);
    }
}
