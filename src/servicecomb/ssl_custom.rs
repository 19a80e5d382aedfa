//! Pluggable hooks for decoding store passwords and resolving store paths.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::warn;

/// Customization hooks applied when TLS material is loaded.
pub trait SslCustom: Send + Sync {
    /// Decode an encrypted store password.
    fn decode(&self, encrypted: &str) -> String;

    /// Resolve a store file name to the path it should be read from.
    fn full_path(&self, filename: &str) -> String;
}

/// Passwords and file names are used verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSslCustom;

impl SslCustom for DefaultSslCustom {
    fn decode(&self, encrypted: &str) -> String {
        encrypted.to_string()
    }

    fn full_path(&self, filename: &str) -> String {
        filename.to_string()
    }
}

/// Factory producing a named [`SslCustom`].
pub type SslCustomFactory = fn() -> Arc<dyn SslCustom>;

static SSL_CUSTOM_FACTORIES: Lazy<DashMap<String, SslCustomFactory>> = Lazy::new(DashMap::new);

/// Register `factory` under `name` so `servicecomb.ssl.sslCustomClass` can select it.
///
/// Registering an existing name replaces the previous factory.
pub fn register_ssl_custom(name: impl Into<String>, factory: SslCustomFactory) {
    SSL_CUSTOM_FACTORIES.insert(name.into(), factory);
}

/// Resolve the customization named `name`.
///
/// An empty name selects [`DefaultSslCustom`]; an unknown name logs a warning
/// and falls back to it.
pub fn create_ssl_custom(name: &str) -> Arc<dyn SslCustom> {
    let name = name.trim();
    if name.is_empty() {
        return Arc::new(DefaultSslCustom);
    }
    match SSL_CUSTOM_FACTORIES.get(name) {
        Some(factory) => (*factory)(),
        None => {
            warn!(ssl_custom = %name, "unknown SSL customization, using the default");
            Arc::new(DefaultSslCustom)
        }
    }
}
