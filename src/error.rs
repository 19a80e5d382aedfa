//! Error types for servicecomb-config.

/// Result type alias for servicecomb-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration source does not support the requested operation.
    ///
    /// Write-style operations against a read-only source always fail this way.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// Failed to load configuration from a source.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to deserialize configuration.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// A configuration value could not be parsed into the requested type.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// The remote configuration center returned an error.
    #[error("Remote configuration error: {0}")]
    RemoteError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Returns `true` if this error is a permanent capability restriction.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = ConfigError::Unsupported("putConfig");
        assert_eq!(err.to_string(), "Operation not supported: putConfig");
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::IoError(_)));
        assert!(!err.is_unsupported());
    }
}
