//! Configuration-center clients and the change batches they publish.
//!
//! A client exposes the current remote snapshot and delivers change batches
//! to explicitly registered callbacks. [`MemoryConfigClient`] keeps its
//! snapshot in process; with the `remote` feature, [`KieClient`] polls a
//! ServiceComb Kie server.

mod event;
mod event_bus;
mod memory;

#[cfg(feature = "remote")]
mod kie;
#[cfg(feature = "remote")]
mod polling;

pub use event::ConfigurationChangedEvent;
pub use event_bus::{ChangeCallback, EventBus, SubscriptionHandle};
pub use memory::MemoryConfigClient;

#[cfg(feature = "remote")]
pub use kie::{KieClient, KieClientBuilder};
#[cfg(feature = "remote")]
pub use polling::{MIN_POLL_INTERVAL, RefreshableClient, spawn_polling};

use std::collections::HashMap;

/// A source of remote configuration: a current snapshot plus change batches.
pub trait ConfigCenterClient: Send + Sync {
    /// The full current snapshot.
    fn current_data(&self) -> HashMap<String, config::Value>;

    /// Register `callback` for change batches until the handle is dropped.
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionHandle;

    /// Human-readable name used in logs.
    fn name(&self) -> String;
}
