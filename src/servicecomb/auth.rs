//! TLS options and authentication headers for the configuration-center HTTP client.

use crate::core::{Configuration, parse_bool};
use crate::servicecomb::keys::*;
use crate::servicecomb::ssl_custom::{SslCustom, create_ssl_custom};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::form_urlencoded;

/// TLS settings for outbound connections.
///
/// Every field is read independently from configuration with its own literal
/// default; see [`create_ssl_properties`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SslOption {
    /// TLS engine identifier, e.g. `jdk` or `openssl`.
    pub engine: String,
    /// Comma-separated protocol list.
    pub protocols: String,
    /// Comma-separated cipher suite list.
    pub ciphers: String,
    /// Require the peer to present a certificate.
    pub auth_peer: bool,
    /// Verify the peer host name against its certificate CN.
    pub check_cn_host: bool,
    /// Verify the peer CN against a white list.
    pub check_cn_white: bool,
    /// File holding the CN white list.
    pub check_cn_white_file: String,
    /// Allow TLS renegotiation.
    pub allow_renegotiate: bool,
    /// Directory holding the stores; `internal` means the built-in location.
    pub store_path: String,
    /// Key store file.
    pub key_store: String,
    /// Key store format.
    pub key_store_type: String,
    /// Key store password (possibly encoded).
    pub key_store_value: String,
    /// Trust store file.
    pub trust_store: String,
    /// Trust store format.
    pub trust_store_type: String,
    /// Trust store password (possibly encoded).
    pub trust_store_value: String,
    /// Certificate revocation list file.
    pub crl: String,
}

impl SslOption {
    /// Protocols as a list, blanks removed.
    pub fn protocol_list(&self) -> Vec<&str> {
        split_list(&self.protocols)
    }

    /// Cipher suites as a list, blanks removed.
    pub fn cipher_list(&self) -> Vec<&str> {
        split_list(&self.ciphers)
    }

    /// Location of the trust store, if one is configured.
    ///
    /// Relative names are resolved against `store_path` unless it is empty or
    /// `internal`, then passed through the customization hook.
    pub fn trust_store_path(&self, custom: &dyn SslCustom) -> Option<String> {
        if self.trust_store.is_empty() {
            return None;
        }
        let path = if self.store_path.is_empty()
            || self.store_path == INTERNAL
            || Path::new(&self.trust_store).is_absolute()
        {
            self.trust_store.clone()
        } else {
            Path::new(&self.store_path)
                .join(&self.trust_store)
                .to_string_lossy()
                .into_owned()
        };
        Some(custom.full_path(&path))
    }
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// TLS switch plus the options and customization used when it is on.
///
/// When TLS is disabled, `ssl_option` and `ssl_custom` stay `None`.
#[derive(Clone, Default)]
pub struct SslProperties {
    /// Whether TLS is enabled.
    pub enabled: bool,
    /// TLS options, present only when enabled.
    pub ssl_option: Option<SslOption>,
    /// Customization hook, present only when enabled.
    pub ssl_custom: Option<Arc<dyn SslCustom>>,
}

impl fmt::Debug for SslProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SslProperties")
            .field("enabled", &self.enabled)
            .field("ssl_option", &self.ssl_option)
            .field("ssl_custom", &self.ssl_custom.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Build TLS properties from configuration.
///
/// Reads `servicecomb.ssl.enabled` first. If it is not `true`, returns
/// disabled properties without reading any other key. Otherwise each option
/// is read with its literal default and the customization named by
/// `servicecomb.ssl.sslCustomClass` is resolved.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::core::MapConfiguration;
/// use servicecomb_config::servicecomb::auth::create_ssl_properties;
///
/// let config = MapConfiguration::new("memory");
/// let ssl = create_ssl_properties(&config);
/// assert!(!ssl.enabled);
/// assert!(ssl.ssl_option.is_none());
/// ```
pub fn create_ssl_properties(config: &dyn Configuration) -> SslProperties {
    let enabled = parse_bool(&config.get_config_or(KEY_SSL_ENABLED, FALSE));
    if !enabled {
        return SslProperties::default();
    }

    let read = |key: &str, default: &str| config.get_config_or(key, default);
    let flag = |key: &str| parse_bool(&config.get_config_or(key, FALSE));

    let option = SslOption {
        engine: read(KEY_SSL_ENGINE, JDK),
        protocols: read(KEY_SSL_PROTOCOLS, TLS),
        ciphers: read(KEY_SSL_CIPHERS, DEFAULT_CIPHERS),
        auth_peer: flag(KEY_SSL_AUTH_PEER),
        check_cn_host: flag(KEY_SSL_CHECKCN_HOST),
        check_cn_white: flag(KEY_SSL_CHECKCN_WHITE),
        check_cn_white_file: read(KEY_SSL_CHECKCN_WHITE_FILE, EMPTY),
        allow_renegotiate: flag(KEY_SSL_ALLOW_RENEGOTIATE),
        store_path: read(KEY_SSL_STORE_PATH, INTERNAL),
        key_store: read(KEY_SSL_KEYSTORE, EMPTY),
        key_store_type: read(KEY_SSL_KEYSTORE_TYPE, PKCS12),
        key_store_value: read(KEY_SSL_KEYSTORE_VALUE, EMPTY),
        trust_store: read(KEY_SSL_TRUST_STORE, EMPTY),
        trust_store_type: read(KEY_SSL_TRUST_STORE_TYPE, EMPTY),
        trust_store_value: read(KEY_SSL_TRUST_STORE_VALUE, EMPTY),
        crl: read(KEY_SSL_CRL, EMPTY),
    };
    let ssl_custom = create_ssl_custom(&read(KEY_SSL_SSL_CUSTOM_CLASS, EMPTY));

    SslProperties {
        enabled: true,
        ssl_option: Some(option),
        ssl_custom: Some(ssl_custom),
    }
}

/// A source of authentication headers, e.g. a token holder.
pub trait AuthHeaderProvider: Send + Sync {
    /// Headers to attach to the next request.
    fn auth_headers(&self) -> HashMap<String, String>;
}

impl<F> AuthHeaderProvider for F
where
    F: Fn() -> HashMap<String, String> + Send + Sync,
{
    fn auth_headers(&self) -> HashMap<String, String> {
        self()
    }
}

/// Description of an outgoing request handed to header providers.
#[derive(Debug, Clone, Default)]
pub struct SignRequest {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub endpoint: String,
    /// Headers already set on the request.
    pub headers: HashMap<String, String>,
    /// Request body, if any.
    pub content: Option<Vec<u8>>,
}

/// Produces the authentication headers for one request.
pub type RequestAuthHeaderProvider =
    Arc<dyn Fn(&SignRequest) -> HashMap<String, String> + Send + Sync>;

/// Combine `providers` into a single request provider.
///
/// Header maps are merged in list order; on a name collision the later
/// provider wins.
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::servicecomb::auth::{
///     AuthHeaderProvider, SignRequest, request_auth_header_provider,
/// };
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let first: Arc<dyn AuthHeaderProvider> =
///     Arc::new(|| HashMap::from([("X-Token".to_string(), "a".to_string())]));
/// let second: Arc<dyn AuthHeaderProvider> =
///     Arc::new(|| HashMap::from([("X-Token".to_string(), "b".to_string())]));
///
/// let provider = request_auth_header_provider(vec![first, second]);
/// let headers = provider(&SignRequest::default());
/// assert_eq!(headers["X-Token"], "b");
/// ```
pub fn request_auth_header_provider(
    providers: Vec<Arc<dyn AuthHeaderProvider>>,
) -> RequestAuthHeaderProvider {
    Arc::new(move |_request: &SignRequest| {
        let mut headers = HashMap::new();
        for provider in &providers {
            headers.extend(provider.auth_headers());
        }
        headers
    })
}

/// The request provider derived from configuration.
///
/// No header provider is configuration-driven yet, so the result adds no
/// headers.
// TODO: build an RBAC token provider from `servicecomb.credentials.*` once
// token refresh against the Kie auth endpoint is implemented.
pub fn request_auth_header_provider_from(_config: &dyn Configuration) -> RequestAuthHeaderProvider {
    request_auth_header_provider(Vec::new())
}

/// Form-urlencode a project name for use in a request path.
///
/// An empty name is returned unchanged.
pub fn safe_get_project(project: &str) -> String {
    if project.is_empty() {
        return project.to_string();
    }
    form_urlencoded::byte_serialize(project.as_bytes()).collect()
}
