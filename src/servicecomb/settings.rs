//! Settings for reaching the configuration center, read from the bootstrap configuration.

use crate::core::{Configuration, parse_duration};
use crate::error::{ConfigError, Result};
use crate::servicecomb::auth::{
    RequestAuthHeaderProvider, SslProperties, create_ssl_properties,
    request_auth_header_provider_from, safe_get_project,
};
use crate::servicecomb::keys::*;
use std::fmt;
use std::time::Duration;

/// HTTP client options: TLS plus request authentication.
#[derive(Clone)]
pub struct HttpConfiguration {
    /// TLS switch and options.
    pub ssl_properties: SslProperties,
    /// Produces authentication headers per request.
    pub auth_provider: RequestAuthHeaderProvider,
}

impl HttpConfiguration {
    /// Build TLS options and the auth provider from `config`.
    pub fn from_configuration(config: &dyn Configuration) -> Self {
        Self {
            ssl_properties: create_ssl_properties(config),
            auth_provider: request_auth_header_provider_from(config),
        }
    }
}

impl fmt::Debug for HttpConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConfiguration")
            .field("ssl_properties", &self.ssl_properties)
            .finish_non_exhaustive()
    }
}

/// Everything needed to connect to and select keys from the configuration center.
#[derive(Debug, Clone)]
pub struct ConfigCenterSettings {
    /// Server addresses, tried in order.
    pub addresses: Vec<String>,
    /// Project, already form-urlencoded for use in a path.
    pub project: String,
    /// Application label.
    pub application: String,
    /// Service label.
    pub service_name: String,
    /// Environment label; empty means unlabelled.
    pub environment: String,
    /// Interval between polls.
    pub refresh_interval: Duration,
    /// Whether a failed first pull aborts start-up.
    pub first_pull_required: bool,
    /// Whether the adapter writes added and updated keys to its snapshot.
    pub write_through: bool,
    /// TLS and authentication.
    pub http: HttpConfiguration,
}

impl ConfigCenterSettings {
    /// Read settings from the bootstrap configuration, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the refresh interval is
    /// malformed or zero.
    pub fn from_configuration(config: &dyn Configuration) -> Result<Self> {
        let addresses = config
            .get_config_or(KEY_CONFIG_ADDRESS, DEFAULT_CONFIG_ADDRESS)
            .split(',')
            .map(|address| address.trim().trim_end_matches('/').to_string())
            .filter(|address| !address.is_empty())
            .collect();

        let refresh_interval = parse_duration(
            &config.get_config_or(KEY_CONFIG_REFRESH_INTERVAL, DEFAULT_REFRESH_INTERVAL),
        )?;
        if refresh_interval.is_zero() {
            return Err(ConfigError::ParseError(format!(
                "'{}' must be greater than zero",
                KEY_CONFIG_REFRESH_INTERVAL
            )));
        }

        Ok(Self {
            addresses,
            project: safe_get_project(&config.get_config_or(KEY_SERVICE_PROJECT, DEFAULT_PROJECT)),
            application: config.get_config_or(KEY_SERVICE_APPLICATION, DEFAULT_APPLICATION),
            service_name: config.get_config_or(KEY_SERVICE_NAME, DEFAULT_SERVICE_NAME),
            environment: config.get_config_or(KEY_SERVICE_ENVIRONMENT, EMPTY),
            refresh_interval,
            first_pull_required: config.get_bool(KEY_CONFIG_FIRST_PULL_REQUIRED, true),
            write_through: config.get_bool(KEY_CONFIG_WRITE_THROUGH, false),
            http: HttpConfiguration::from_configuration(config),
        })
    }

    /// Label selectors identifying this service's keys.
    pub fn labels(&self) -> Vec<(String, String)> {
        let mut labels = vec![
            ("app".to_string(), self.application.clone()),
            ("service".to_string(), self.service_name.clone()),
        ];
        if !self.environment.is_empty() {
            labels.push(("environment".to_string(), self.environment.clone()));
        }
        labels
    }
}
