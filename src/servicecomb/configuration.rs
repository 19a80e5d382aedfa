//! Configuration backed by a ServiceComb configuration-center client.

use crate::client::{ConfigCenterClient, ConfigurationChangedEvent, SubscriptionHandle};
use crate::core::value::value_to_string;
use crate::core::{
    ChangeType, Configuration, ConfigurationChangeEvent, ListenerRef, ListenerRegistry,
};
use crate::error::{ConfigError, Result};
use crate::servicecomb::keys::CONFIG_TYPE;
use arc_swap::ArcSwap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[cfg(feature = "metrics")]
use crate::metrics::AdapterMetrics;

static INSTANCE: OnceCell<Arc<ServicecombConfiguration>> = OnceCell::new();

/// Behaviour switches for [`ServicecombConfiguration`].
#[derive(Clone, Default)]
pub struct AdapterOptions {
    /// Write added and updated values into the local snapshot before
    /// notifying listeners. Off by default: only deletions reach the snapshot.
    pub write_through: bool,
    /// Metrics sink for change batches and listener counts.
    #[cfg(feature = "metrics")]
    pub metrics: Option<AdapterMetrics>,
}

/// A read-only [`Configuration`] mirroring a configuration-center client.
///
/// The adapter takes the client's current snapshot once at construction and
/// subscribes to its change batches. Each batch is applied in a fixed order:
///
/// 1. deleted keys are removed from the snapshot;
/// 2. listeners of every added key are notified with its new value;
/// 3. listeners of every updated key are notified with its new value;
/// 4. listeners of every deleted key are notified with no value.
///
/// A key present in several partitions of one batch is therefore notified
/// once per partition. Listeners run synchronously on the publishing thread;
/// a slow listener delays every later notification of the batch.
///
/// Write operations always fail with [`ConfigError::Unsupported`].
///
/// # Examples
///
/// ```rust
/// use servicecomb_config::client::MemoryConfigClient;
/// use servicecomb_config::core::{Configuration, ConfigurationChangeEvent};
/// use servicecomb_config::servicecomb::ServicecombConfiguration;
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let client = Arc::new(MemoryConfigClient::new(HashMap::from([
///     ("service.timeout".to_string(), config::Value::from("30s")),
/// ])));
/// let configuration = ServicecombConfiguration::new(client.clone());
/// assert_eq!(configuration.get_config("service.timeout").as_deref(), Some("30s"));
///
/// configuration.add_config_listener(
///     "service.timeout",
///     Arc::new(|event: &ConfigurationChangeEvent| {
///         println!("timeout is now {:?}", event.new_value());
///     }),
/// );
/// client.refresh(HashMap::from([
///     ("service.timeout".to_string(), config::Value::from("45s")),
/// ]));
/// ```
pub struct ServicecombConfiguration {
    client: Arc<dyn ConfigCenterClient>,
    snapshot: ArcSwap<HashMap<String, config::Value>>,
    listeners: ListenerRegistry,
    options: AdapterOptions,
    _subscription: SubscriptionHandle,
}

impl ServicecombConfiguration {
    /// Mirror `client` with default options.
    pub fn new(client: Arc<dyn ConfigCenterClient>) -> Arc<Self> {
        Self::with_options(client, AdapterOptions::default())
    }

    /// Mirror `client`.
    ///
    /// The subscription holds only a weak reference; dropping the last handle
    /// to the adapter unsubscribes it.
    ///
    /// The adapter subscribes before reading the client's snapshot. Batches
    /// delivered until construction completes are queued and applied, in
    /// order, before this returns.
    pub fn with_options(client: Arc<dyn ConfigCenterClient>, options: AdapterOptions) -> Arc<Self> {
        let pending: Arc<Mutex<Option<Vec<ConfigurationChangedEvent>>>> =
            Arc::new(Mutex::new(Some(Vec::new())));

        let configuration = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let queue = Arc::clone(&pending);
            let subscription = client.subscribe(Arc::new(move |event: &ConfigurationChangedEvent| {
                if let Some(queued) = queue.lock().as_mut() {
                    queued.push(event.clone());
                    return;
                }
                if let Some(configuration) = weak.upgrade() {
                    configuration.on_configuration_changed(event);
                }
            }));

            let current = client.current_data();
            info!(client = %client.name(), keys = current.len(), "servicecomb configuration initialized");

            Self {
                client,
                snapshot: ArcSwap::from_pointee(current),
                listeners: ListenerRegistry::new(),
                options,
                _subscription: subscription,
            }
        });

        // Held while replaying so live batches wait behind queued ones.
        let mut queue = pending.lock();
        if let Some(queued) = queue.take() {
            if !queued.is_empty() {
                debug!(batches = queued.len(), "replaying batches received during construction");
            }
            for event in &queued {
                configuration.on_configuration_changed(event);
            }
        }
        drop(queue);
        configuration
    }

    /// The process-wide instance, building it with `init` on first use.
    ///
    /// Exactly one instance is ever built; later calls return it and never
    /// run `init`. If `init` fails, nothing is installed and the next call
    /// tries again.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `init`.
    pub fn get_or_init<F>(init: F) -> Result<Arc<Self>>
    where
        F: FnOnce() -> Result<(Arc<dyn ConfigCenterClient>, AdapterOptions)>,
    {
        INSTANCE
            .get_or_try_init(|| -> Result<Arc<Self>> {
                let (client, options) = init()?;
                Ok(Self::with_options(client, options))
            })
            .map(Arc::clone)
    }

    /// The process-wide instance, if it has been built.
    pub fn instance() -> Option<Arc<Self>> {
        INSTANCE.get().cloned()
    }

    /// Connect to the Kie server described by `file_config` and install the
    /// process-wide instance.
    ///
    /// Performs the first pull before installing; its failure is fatal only
    /// when `servicecomb.config.firstPullRequired` is true. Polling starts in
    /// the background of the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are malformed, the HTTP client cannot
    /// be built, or a required first pull fails.
    #[cfg(feature = "remote")]
    pub async fn connect(file_config: &dyn Configuration) -> Result<Arc<Self>> {
        use crate::client::{KieClient, RefreshableClient, spawn_polling};
        use crate::servicecomb::ConfigCenterSettings;
        use tracing::warn;

        if let Some(instance) = Self::instance() {
            return Ok(instance);
        }

        let settings = ConfigCenterSettings::from_configuration(file_config)?;
        let client = Arc::new(KieClient::from_settings(&settings)?);
        if let Err(e) = client.refresh().await {
            if settings.first_pull_required {
                return Err(e);
            }
            warn!(error = %e, "first pull from configuration center failed, starting empty");
        }

        let options = AdapterOptions {
            write_through: settings.write_through,
            ..Default::default()
        };
        let mut installed = false;
        let shared: Arc<dyn ConfigCenterClient> = client.clone();
        let instance = Self::get_or_init(|| {
            installed = true;
            Ok((shared, options))
        })?;

        if installed {
            spawn_polling(client, settings.refresh_interval);
        }
        Ok(instance)
    }

    /// The client this adapter mirrors.
    pub fn client(&self) -> &Arc<dyn ConfigCenterClient> {
        &self.client
    }

    /// The local snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<String, config::Value>> {
        self.snapshot.load_full()
    }

    /// Apply a change batch and notify listeners.
    ///
    /// Called by the client subscription; exposed for clients that deliver
    /// batches by other means.
    pub fn on_configuration_changed(&self, event: &ConfigurationChangedEvent) {
        let started = Instant::now();
        debug!(
            added = event.added().len(),
            updated = event.updated().len(),
            deleted = event.deleted().len(),
            "applying configuration change batch"
        );

        if !event.deleted().is_empty() {
            self.snapshot.rcu(|current| {
                let mut next = HashMap::clone(current);
                for key in event.deleted().keys() {
                    next.remove(key);
                }
                next
            });
        }

        let mut notified = self.dispatch(event.added(), ChangeType::Add);
        notified += self.dispatch(event.updated(), ChangeType::Modify);
        notified += self.dispatch(event.deleted(), ChangeType::Delete);

        debug!(notified, elapsed = ?started.elapsed(), "configuration change batch applied");
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.options.metrics {
            metrics.record_batch(started, event.len() as u64, notified as u64);
        }
    }

    fn dispatch(&self, entries: &HashMap<String, config::Value>, change_type: ChangeType) -> usize {
        if entries.is_empty() {
            return 0;
        }
        let remove = change_type == ChangeType::Delete;
        if !remove && self.options.write_through {
            self.snapshot.rcu(|current| {
                let mut next = HashMap::clone(current);
                next.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
                next
            });
        }

        let mut notified = 0;
        for (key, value) in entries {
            let new_value = if remove { None } else { value_to_string(value) };
            let event = ConfigurationChangeEvent::new(key.clone(), new_value, change_type);
            notified += self.listeners.dispatch(&event);
        }
        notified
    }

    #[cfg(feature = "metrics")]
    fn report_listener_count(&self) {
        if let Some(metrics) = &self.options.metrics {
            metrics.update_listener_count(self.listeners.len() as i64);
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn report_listener_count(&self) {}
}

impl Configuration for ServicecombConfiguration {
    fn type_name(&self) -> &str {
        CONFIG_TYPE
    }

    fn get_latest_config(
        &self,
        data_id: &str,
        default_value: Option<&str>,
        _timeout: Duration,
    ) -> Option<String> {
        self.snapshot
            .load()
            .get(data_id)
            .and_then(value_to_string)
            .or_else(|| default_value.map(str::to_string))
    }

    fn put_config(&self, _data_id: &str, _content: &str, _timeout: Duration) -> Result<bool> {
        Err(ConfigError::Unsupported("putConfig"))
    }

    fn put_config_if_absent(
        &self,
        _data_id: &str,
        _content: &str,
        _timeout: Duration,
    ) -> Result<bool> {
        Err(ConfigError::Unsupported("putConfigIfAbsent"))
    }

    fn remove_config(&self, _data_id: &str, _timeout: Duration) -> Result<bool> {
        Err(ConfigError::Unsupported("removeConfig"))
    }

    fn add_config_listener(&self, data_id: &str, listener: ListenerRef) {
        if data_id.trim().is_empty() {
            return;
        }
        self.listeners.add(data_id, listener);
        debug!(data_id = %data_id, "added servicecomb listener");
        self.report_listener_count();
    }

    fn remove_config_listener(&self, data_id: &str, listener: &ListenerRef) {
        if data_id.trim().is_empty() {
            return;
        }
        if self.listeners.remove(data_id, listener) {
            debug!(data_id = %data_id, "removed servicecomb listener");
            self.report_listener_count();
        }
    }

    fn get_config_listeners(&self, data_id: &str) -> Option<Vec<ListenerRef>> {
        self.listeners.get(data_id)
    }
}
