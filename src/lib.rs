//! # servicecomb-config
//!
//! ServiceComb configuration-center support for Seata's configuration layer.
//!
//! ## Overview
//!
//! `servicecomb-config` provides:
//! - A [`Configuration`](core::Configuration) contract with typed accessors and
//!   per-key change listeners
//! - A file/environment-backed bootstrap configuration
//! - A read-only adapter mirroring a configuration-center client, with
//!   lock-free reads using `arc-swap`
//! - TLS and request-authentication options built from bootstrap keys
//! - A polling client for the ServiceComb Kie API (`remote` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use servicecomb_config::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> servicecomb_config::error::Result<()> {
//! // Bootstrap keys such as servicecomb.config.address come from files and env
//! let bootstrap = FileConfiguration::builder()
//!     .with_file("config/registry.yaml")
//!     .with_env_overrides("SEATA", "__")
//!     .build()?;
//!
//! // Pull once, install the process-wide adapter and keep polling
//! let configuration = ServicecombConfiguration::connect(&bootstrap).await?;
//! println!("timeout: {:?}", configuration.get_config("service.timeout"));
//!
//! configuration.add_config_listener(
//!     "service.timeout",
//!     Arc::new(|event: &ConfigurationChangeEvent| {
//!         println!("{} {:?}", event.change_type(), event.new_value());
//!     }),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `remote` (default): the Kie HTTP client and background polling
//! - `metrics`: OpenTelemetry instruments for change-batch dispatch

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod client;
pub mod core;
pub mod error;
pub mod servicecomb;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::client::{ConfigCenterClient, MemoryConfigClient};
    pub use crate::core::{
        ChangeType, Configuration, ConfigurationChangeEvent, ConfigurationChangeListener,
        FileConfiguration, MapConfiguration,
    };
    pub use crate::error::{ConfigError, Result};
    pub use crate::servicecomb::{AdapterOptions, ServicecombConfiguration};

    #[cfg(feature = "remote")]
    pub use crate::client::{KieClient, RefreshableClient};
}
