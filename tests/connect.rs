//! Connecting the process-wide adapter to a Kie server.

#![cfg(feature = "remote")]

use servicecomb_config::prelude::*;
use servicecomb_config::servicecomb::keys::*;
use std::sync::Arc;
use std::time::Duration;

fn bootstrap(first_pull_required: &str) -> MapConfiguration {
    let bootstrap = MapConfiguration::new("file");
    for (key, value) in [
        (KEY_CONFIG_ADDRESS, "http://127.0.0.1:9"),
        (KEY_CONFIG_FIRST_PULL_REQUIRED, first_pull_required),
        (KEY_CONFIG_REFRESH_INTERVAL, "1h"),
    ] {
        bootstrap.put_config(key, value, Duration::ZERO).unwrap();
    }
    bootstrap
}

#[tokio::test]
async fn test_first_pull_policy() {
    let required = ServicecombConfiguration::connect(&bootstrap("true")).await;
    assert!(matches!(required, Err(ConfigError::RemoteError(_))));
    assert!(ServicecombConfiguration::instance().is_none());

    let configuration = ServicecombConfiguration::connect(&bootstrap("false"))
        .await
        .unwrap();
    assert!(configuration.snapshot().is_empty());
    assert!(configuration.client().name().starts_with("kie:"));
    assert_eq!(configuration.get_config_or("transport.type", "TCP"), "TCP");

    let again = ServicecombConfiguration::connect(&bootstrap("true")).await.unwrap();
    assert!(Arc::ptr_eq(&configuration, &again));
}
