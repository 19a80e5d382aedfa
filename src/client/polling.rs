//! Background refresh of polling clients.

use crate::client::ConfigCenterClient;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// A client that pulls its snapshot on demand.
#[async_trait]
pub trait RefreshableClient: ConfigCenterClient + 'static {
    /// Pull the latest snapshot and publish the difference.
    ///
    /// Returns whether a batch was published.
    async fn refresh(&self) -> Result<bool>;
}

/// Shortest interval [`spawn_polling`] will poll at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Refresh `client` every `interval` on the current tokio runtime.
///
/// The first refresh happens one interval after the call. Failures are logged
/// and the previous snapshot is kept. Intervals below [`MIN_POLL_INTERVAL`]
/// are raised to it. Abort the returned handle to stop.
pub fn spawn_polling<C>(client: Arc<C>, interval: Duration) -> JoinHandle<()>
where
    C: RefreshableClient + ?Sized,
{
    let interval = if interval < MIN_POLL_INTERVAL {
        warn!(
            client = %client.name(),
            requested = ?interval,
            used = ?MIN_POLL_INTERVAL,
            "poll interval too short, using the minimum"
        );
        MIN_POLL_INTERVAL
    } else {
        interval
    };

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match client.refresh().await {
                Ok(true) => debug!(client = %client.name(), "configuration refreshed"),
                Ok(false) => {}
                Err(e) => warn!(client = %client.name(), error = %e, "configuration refresh failed"),
            }
        }
    })
}
