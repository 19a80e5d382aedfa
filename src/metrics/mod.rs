//! OpenTelemetry metrics for the ServiceComb adapter.
//!
//! Tracks:
//! - Change batches applied and keys they carried
//! - Listener notifications delivered
//! - Batch dispatch duration
//! - Registered listener count
//!
//! # Examples
//!
//! ```rust,no_run
//! use servicecomb_config::client::MemoryConfigClient;
//! use servicecomb_config::metrics::AdapterMetrics;
//! use servicecomb_config::servicecomb::{AdapterOptions, ServicecombConfiguration};
//! use opentelemetry::global;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let options = AdapterOptions {
//!     metrics: Some(AdapterMetrics::new(global::meter("seata"))),
//!     ..Default::default()
//! };
//! let client = Arc::new(MemoryConfigClient::new(HashMap::new()));
//! let configuration = ServicecombConfiguration::with_options(client, options);
//! ```

mod adapter_metrics;

pub use adapter_metrics::AdapterMetrics;
