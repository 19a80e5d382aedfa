//! Integration tests for bootstrap loading, connection settings and TLS options.

#![allow(unsafe_code)] // For env var manipulation in tests

use servicecomb_config::prelude::*;
use servicecomb_config::servicecomb::auth::{SslOption, create_ssl_properties};
use servicecomb_config::servicecomb::keys::*;
use servicecomb_config::servicecomb::{ConfigCenterSettings, SslCustom, register_ssl_custom};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_yaml_bootstrap_to_settings() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        "registry.yaml",
        r#"
servicecomb:
  config:
    address: "https://kie-1:30110,https://kie-2:30110"
  service:
    project: seata
    application: trade
    name: tc
"#,
    );

    let bootstrap = FileConfiguration::builder().with_file(&path).build().unwrap();
    let settings = ConfigCenterSettings::from_configuration(&bootstrap).unwrap();

    assert_eq!(settings.addresses.len(), 2);
    assert_eq!(settings.project, "seata");
    assert_eq!(settings.refresh_interval, Duration::from_secs(15));
    assert!(settings.first_pull_required);
    assert_eq!(
        settings.labels(),
        vec![
            ("app".to_string(), "trade".to_string()),
            ("service".to_string(), "tc".to_string()),
        ]
    );
}

#[test]
fn test_later_file_overrides_earlier() {
    let temp_dir = TempDir::new().unwrap();
    let base = write_file(&temp_dir, "base.toml", "[servicecomb.ssl]\nenabled = false\n");
    let local = write_file(
        &temp_dir,
        "local.json",
        r#"{"servicecomb": {"ssl": {"enabled": true, "protocols": "TLSv1.3"}}}"#,
    );

    let bootstrap = FileConfiguration::builder()
        .with_file(&base)
        .with_file(&local)
        .build()
        .unwrap();

    let properties = create_ssl_properties(&bootstrap);
    assert!(properties.enabled);
    assert_eq!(properties.ssl_option.unwrap().protocols, "TLSv1.3");
}

#[test]
fn test_env_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        &temp_dir,
        "registry.yaml",
        "servicecomb:\n  service:\n    name: from-file\n",
    );

    unsafe {
        std::env::set_var("SCBTEST__SERVICECOMB__SERVICE__NAME", "from-env");
    }
    let bootstrap = FileConfiguration::builder()
        .with_file(&path)
        .with_env_overrides("SCBTEST", "__")
        .build()
        .unwrap();
    unsafe {
        std::env::remove_var("SCBTEST__SERVICECOMB__SERVICE__NAME");
    }

    assert_eq!(bootstrap.get_config(KEY_SERVICE_NAME).as_deref(), Some("from-env"));
}

#[test]
fn test_disabled_tls_has_no_options() {
    let bootstrap = MapConfiguration::new("memory");
    let properties = create_ssl_properties(&bootstrap);
    assert!(!properties.enabled);
    assert!(properties.ssl_option.is_none());
    assert!(properties.ssl_custom.is_none());
}

#[test]
fn test_enabled_tls_uses_literal_defaults() {
    let bootstrap = MapConfiguration::new("memory");
    bootstrap.put_config(KEY_SSL_ENABLED, "TRUE", Duration::ZERO).unwrap();

    let properties = create_ssl_properties(&bootstrap);
    assert!(properties.enabled);
    assert_eq!(
        properties.ssl_option,
        Some(SslOption {
            engine: JDK.to_string(),
            protocols: TLS.to_string(),
            ciphers: DEFAULT_CIPHERS.to_string(),
            auth_peer: false,
            check_cn_host: false,
            check_cn_white: false,
            check_cn_white_file: String::new(),
            allow_renegotiate: false,
            store_path: INTERNAL.to_string(),
            key_store: String::new(),
            key_store_type: PKCS12.to_string(),
            key_store_value: String::new(),
            trust_store: String::new(),
            trust_store_type: String::new(),
            trust_store_value: String::new(),
            crl: String::new(),
        })
    );
}

struct Vaulted;

impl SslCustom for Vaulted {
    fn decode(&self, encrypted: &str) -> String {
        encrypted.trim_start_matches("enc:").to_string()
    }

    fn full_path(&self, filename: &str) -> String {
        format!("/vault/{}", filename)
    }
}

#[test]
fn test_named_ssl_custom_resolves_trust_store() {
    register_ssl_custom("tests.Vaulted", || Arc::new(Vaulted));

    let bootstrap = MapConfiguration::new("memory");
    for (key, value) in [
        (KEY_SSL_ENABLED, "true"),
        (KEY_SSL_SSL_CUSTOM_CLASS, "tests.Vaulted"),
        (KEY_SSL_STORE_PATH, "certs"),
        (KEY_SSL_TRUST_STORE, "trust.pem"),
        (KEY_SSL_TRUST_STORE_VALUE, "enc:changeit"),
    ] {
        bootstrap.put_config(key, value, Duration::ZERO).unwrap();
    }

    let properties = create_ssl_properties(&bootstrap);
    let option = properties.ssl_option.unwrap();
    let custom = properties.ssl_custom.unwrap();
    assert_eq!(custom.decode(&option.trust_store_value), "changeit");
    assert_eq!(
        option.trust_store_path(custom.as_ref()).as_deref(),
        Some("/vault/certs/trust.pem")
    );
}
