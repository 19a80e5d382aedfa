//! Polling client for the ServiceComb Kie key-value API.

use crate::client::{
    ChangeCallback, ConfigCenterClient, ConfigurationChangedEvent, EventBus, RefreshableClient,
    SubscriptionHandle,
};
use crate::error::{ConfigError, Result};
use crate::servicecomb::auth::{
    RequestAuthHeaderProvider, SignRequest, SslOption, SslProperties, request_auth_header_provider,
};
use crate::servicecomb::{ConfigCenterSettings, HttpConfiguration};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use reqwest::{Certificate, Client, tls};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct KvResponse {
    #[serde(default)]
    data: Vec<KvEntry>,
}

#[derive(Debug, Deserialize)]
struct KvEntry {
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    status: Option<String>,
}

/// Parse a Kie list response into a snapshot, keeping enabled entries only.
pub(crate) fn parse_kv_response(body: &str) -> Result<HashMap<String, config::Value>> {
    let response: KvResponse = serde_json::from_str(body).map_err(|e| {
        ConfigError::DeserializationError(format!("Invalid Kie response: {}", e))
    })?;

    Ok(response
        .data
        .into_iter()
        .filter(|entry| entry.status.as_deref().is_none_or(|s| s == "enabled"))
        .map(|entry| (entry.key, config::Value::from(entry.value)))
        .collect())
}

/// Client for a ServiceComb Kie server.
///
/// Each [`refresh`](RefreshableClient::refresh) lists the keys matching the
/// configured labels, diffs them against the last snapshot and publishes the
/// batch. Addresses are tried in order until one answers.
///
/// # Examples
///
/// ```rust,no_run
/// use servicecomb_config::client::{KieClient, RefreshableClient};
///
/// # async fn example() -> servicecomb_config::error::Result<()> {
/// let client = KieClient::builder()
///     .with_address("http://127.0.0.1:30110")
///     .with_label("app", "seata")
///     .build()?;
/// client.refresh().await?;
/// # Ok(())
/// # }
/// ```
pub struct KieClient {
    http: Client,
    addresses: Vec<String>,
    project: String,
    labels: Vec<(String, String)>,
    auth: RequestAuthHeaderProvider,
    data: ArcSwap<HashMap<String, config::Value>>,
    refresh_lock: tokio::sync::Mutex<()>,
    bus: EventBus,
}

impl KieClient {
    /// Create a builder.
    pub fn builder() -> KieClientBuilder {
        KieClientBuilder::new()
    }

    /// Build a client from bootstrap settings.
    ///
    /// # Errors
    ///
    /// See [`KieClientBuilder::build`].
    pub fn from_settings(settings: &ConfigCenterSettings) -> Result<Self> {
        let mut builder = KieClientBuilder::new()
            .with_project(settings.project.clone())
            .with_http_configuration(settings.http.clone());
        for address in &settings.addresses {
            builder = builder.with_address(address.clone());
        }
        for (key, value) in settings.labels() {
            builder = builder.with_label(key, value);
        }
        builder.build()
    }

    fn list_url(&self, address: &str) -> String {
        format!("{}/v1/{}/kie/kv", address, self.project)
    }

    fn query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .labels
            .iter()
            .map(|(key, value)| ("label".to_string(), format!("{}:{}", key, value)))
            .collect();
        query.push(("match".to_string(), "exact".to_string()));
        query
    }

    async fn fetch_from(&self, address: &str) -> Result<HashMap<String, config::Value>> {
        let url = self.list_url(address);
        let sign = SignRequest {
            method: "GET".to_string(),
            endpoint: url.clone(),
            ..Default::default()
        };

        let mut request = self.http.get(&url).query(&self.query());
        for (name, value) in (self.auth)(&sign) {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConfigError::RemoteError(format!("Kie request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::RemoteError(format!(
                "Kie request to {} failed with status {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConfigError::RemoteError(format!("Failed to read Kie response: {}", e)))?;
        parse_kv_response(&body)
    }

    async fn fetch(&self) -> Result<HashMap<String, config::Value>> {
        let mut last_error = None;
        for address in &self.addresses {
            match self.fetch_from(address).await {
                Ok(data) => return Ok(data),
                Err(e) => {
                    warn!(address = %address, error = %e, "Kie address unavailable");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| ConfigError::RemoteError("no Kie address configured".to_string())))
    }
}

#[async_trait]
impl RefreshableClient for KieClient {
    async fn refresh(&self) -> Result<bool> {
        let _guard = self.refresh_lock.lock().await;
        let latest = self.fetch().await?;

        let last = self.data.load_full();
        let event = ConfigurationChangedEvent::create_incremental(&latest, &last);
        self.data.store(Arc::new(latest));

        if event.is_empty() {
            return Ok(false);
        }
        debug!(
            added = event.added().len(),
            updated = event.updated().len(),
            deleted = event.deleted().len(),
            "Kie client publishing change batch"
        );
        self.bus.publish(&event);
        Ok(true)
    }
}

impl ConfigCenterClient for KieClient {
    fn current_data(&self) -> HashMap<String, config::Value> {
        HashMap::clone(&self.data.load())
    }

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle {
        self.bus.subscribe(callback)
    }

    fn name(&self) -> String {
        format!("kie:{}", self.addresses.join(","))
    }
}

/// Builder for [`KieClient`].
pub struct KieClientBuilder {
    addresses: Vec<String>,
    project: String,
    labels: Vec<(String, String)>,
    timeout: Duration,
    http: Option<HttpConfiguration>,
}

impl KieClientBuilder {
    /// Create a builder for the `default` project with a 10 second timeout.
    pub fn new() -> Self {
        Self {
            addresses: Vec::new(),
            project: "default".to_string(),
            labels: Vec::new(),
            timeout: Duration::from_secs(10),
            http: None,
        }
    }

    /// Add a server address. Trailing slashes are ignored.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.addresses.push(address.trim_end_matches('/').to_string());
        self
    }

    /// Set the project, already encoded for use in a path.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Add a label selector.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set TLS and authentication options.
    pub fn with_http_configuration(mut self, http: HttpConfiguration) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No address is provided
    /// - The trust store cannot be read or parsed
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<KieClient> {
        if self.addresses.is_empty() {
            return Err(ConfigError::LoadError(
                "at least one address is required for KieClient".to_string(),
            ));
        }

        let mut builder = Client::builder().timeout(self.timeout);
        let auth = match self.http {
            Some(http) => {
                builder = apply_tls(builder, &http.ssl_properties)?;
                http.auth_provider
            }
            None => request_auth_header_provider(Vec::new()),
        };

        let http = builder
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(KieClient {
            http,
            addresses: self.addresses,
            project: self.project,
            labels: self.labels,
            auth,
            data: ArcSwap::from_pointee(HashMap::new()),
            refresh_lock: tokio::sync::Mutex::new(()),
            bus: EventBus::new(),
        })
    }
}

impl Default for KieClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_tls(
    mut builder: reqwest::ClientBuilder,
    ssl: &SslProperties,
) -> Result<reqwest::ClientBuilder> {
    if !ssl.enabled {
        return Ok(builder);
    }
    builder = builder.https_only(true);

    let (Some(option), Some(custom)) = (&ssl.ssl_option, &ssl.ssl_custom) else {
        return Ok(builder);
    };
    if let Some(version) = min_tls_version(option) {
        builder = builder.min_tls_version(version);
    }
    if let Some(path) = option.trust_store_path(custom.as_ref()) {
        let bytes = std::fs::read(&path)?;
        let certificate = match option.trust_store_type.to_ascii_uppercase().as_str() {
            "" | "PEM" => Certificate::from_pem(&bytes),
            "DER" | "CER" | "CRT" => Certificate::from_der(&bytes),
            other => {
                return Err(ConfigError::LoadError(format!(
                    "Unsupported trust store type {} for {}",
                    other, path
                )));
            }
        }
        .map_err(|e| ConfigError::LoadError(format!("Invalid trust store {}: {}", path, e)))?;
        builder = builder.add_root_certificate(certificate);
    }
    Ok(builder)
}

fn tls_rank(protocol: &str) -> Option<u8> {
    match protocol {
        "TLSv1" | "TLSv1.0" => Some(0),
        "TLSv1.1" => Some(1),
        "TLSv1.2" => Some(2),
        "TLSv1.3" => Some(3),
        _ => None,
    }
}

/// Lowest TLS version among the configured protocols.
fn min_tls_version(option: &SslOption) -> Option<tls::Version> {
    let rank = option.protocol_list().into_iter().filter_map(tls_rank).min()?;
    Some(match rank {
        0 => tls::Version::TLS_1_0,
        1 => tls::Version::TLS_1_1,
        2 => tls::Version::TLS_1_2,
        _ => tls::Version::TLS_1_3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChangeType, Configuration, ConfigurationChangeEvent};
    use crate::servicecomb::ServicecombConfiguration;
    use crate::servicecomb::auth::AuthHeaderProvider;
    use parking_lot::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn test_parse_keeps_enabled_entries() {
        let body = r#"{
            "data": [
                {"key": "service.vgroupMapping.tx", "value": "default", "status": "enabled"},
                {"key": "transport.type", "value": "TCP"},
                {"key": "old.key", "value": "x", "status": "disabled"}
            ],
            "total": 3
        }"#;

        let data = parse_kv_response(body).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(
            data["transport.type"].clone().into_string().unwrap(),
            "TCP"
        );
        assert!(!data.contains_key("old.key"));
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert!(parse_kv_response("{}").unwrap().is_empty());
        assert!(matches!(
            parse_kv_response("not json"),
            Err(ConfigError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_builder_requires_address() {
        assert!(KieClient::builder().build().is_err());
    }

    #[test]
    fn test_url_and_query() {
        let client = KieClient::builder()
            .with_address("http://kie:30110/")
            .with_project("tx+project")
            .with_label("app", "seata")
            .with_label("service", "seata-server")
            .build()
            .unwrap();

        assert_eq!(
            client.list_url(&client.addresses[0]),
            "http://kie:30110/v1/tx+project/kie/kv"
        );
        assert_eq!(
            client.query(),
            vec![
                ("label".to_string(), "app:seata".to_string()),
                ("label".to_string(), "service:seata-server".to_string()),
                ("match".to_string(), "exact".to_string()),
            ]
        );
        assert_eq!(client.name(), "kie:http://kie:30110");
        assert!(client.current_data().is_empty());
    }

    #[test]
    fn test_min_tls_version() {
        let option = SslOption {
            protocols: "TLSv1.3, TLSv1.2".to_string(),
            ..Default::default()
        };
        assert_eq!(min_tls_version(&option), Some(tls::Version::TLS_1_2));

        let option = SslOption {
            protocols: "SSLv3".to_string(),
            ..Default::default()
        };
        assert_eq!(min_tls_version(&option), None);
    }

    /// Answers every request with the current `body`, recording each request head.
    async fn serve_kie(
        listener: tokio::net::TcpListener,
        body: Arc<Mutex<String>>,
        requests: Arc<Mutex<Vec<String>>>,
    ) {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut head = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&chunk[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            requests.lock().push(String::from_utf8_lossy(&head).to_lowercase());

            let body = body.lock().clone();
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_refresh_publishes_diffs_to_adapter() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let body = Arc::new(Mutex::new(
            r#"{"data": [
                {"key": "transport.type", "value": "TCP", "status": "enabled"},
                {"key": "client.rm.lock.retryTimes", "value": "30"},
                {"key": "store.mode", "value": "db", "status": "disabled"}
            ]}"#
            .to_string(),
        ));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let server = tokio::spawn(serve_kie(listener, Arc::clone(&body), Arc::clone(&requests)));

        let token: Arc<dyn AuthHeaderProvider> =
            Arc::new(|| HashMap::from([("X-Auth-Token".to_string(), "secret".to_string())]));
        let client = Arc::new(
            KieClient::builder()
                .with_address(address)
                .with_project("seata")
                .with_label("app", "seata")
                .with_http_configuration(HttpConfiguration {
                    ssl_properties: SslProperties::default(),
                    auth_provider: request_auth_header_provider(vec![token]),
                })
                .build()
                .unwrap(),
        );

        let configuration = ServicecombConfiguration::new(client.clone());
        let log = Arc::new(Mutex::new(Vec::new()));
        for key in ["transport.type", "client.rm.lock.retryTimes", "store.mode"] {
            let log = Arc::clone(&log);
            configuration.add_config_listener(
                key,
                Arc::new(move |event: &ConfigurationChangeEvent| {
                    log.lock().push((
                        event.data_id().to_string(),
                        event.new_value().map(str::to_string),
                        event.change_type(),
                    ));
                }),
            );
        }

        assert!(client.refresh().await.unwrap());
        assert_eq!(client.current_data().len(), 2);
        {
            let mut first = log.lock().clone();
            first.sort_by(|a, b| a.0.cmp(&b.0));
            assert_eq!(
                first,
                vec![
                    ("client.rm.lock.retryTimes".to_string(), Some("30".to_string()), ChangeType::Add),
                    ("transport.type".to_string(), Some("TCP".to_string()), ChangeType::Add),
                ]
            );
            log.lock().clear();
        }

        *body.lock() = r#"{"data": [
            {"key": "transport.type", "value": "UDP", "status": "enabled"}
        ]}"#
        .to_string();
        assert!(client.refresh().await.unwrap());
        assert_eq!(
            *log.lock(),
            vec![
                ("transport.type".to_string(), Some("UDP".to_string()), ChangeType::Modify),
                ("client.rm.lock.retryTimes".to_string(), None, ChangeType::Delete),
            ]
        );

        assert!(!client.refresh().await.unwrap());
        assert_eq!(log.lock().len(), 2);

        let requests = requests.lock().clone();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            assert!(request.starts_with("get /v1/seata/kie/kv?"), "{}", request);
            assert!(request.contains("label=app%3aseata"), "{}", request);
            assert!(request.contains("match=exact"), "{}", request);
            assert!(request.contains("x-auth-token: secret"), "{}", request);
        }
        server.abort();
    }

    #[tokio::test]
    async fn test_refresh_fails_on_unreachable_server() {
        let client = KieClient::builder()
            .with_address("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        assert!(matches!(client.refresh().await, Err(ConfigError::RemoteError(_))));
        assert!(client.current_data().is_empty());
    }
}
