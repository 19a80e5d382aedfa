//! Adapter metrics using OpenTelemetry.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for change-batch dispatch.
///
/// # Examples
///
/// ```rust,no_run
/// use servicecomb_config::metrics::AdapterMetrics;
/// use opentelemetry::global;
/// use std::time::Instant;
///
/// let metrics = AdapterMetrics::new(global::meter("servicecomb-config"));
/// let started = Instant::now();
/// // ... dispatch a batch ...
/// metrics.record_batch(started, 3, 2);
/// ```
#[derive(Clone)]
pub struct AdapterMetrics {
    batches: Counter<u64>,
    changed_keys: Counter<u64>,
    notifications: Counter<u64>,
    dispatch_duration: Histogram<f64>,
    listeners: Gauge<i64>,
}

impl AdapterMetrics {
    /// Create a collector registering its instruments on `meter`.
    pub fn new(meter: Meter) -> Self {
        let batches = meter
            .u64_counter("servicecomb_config.batches")
            .with_description("Number of change batches applied")
            .build();

        let changed_keys = meter
            .u64_counter("servicecomb_config.changed_keys")
            .with_description("Keys carried by applied change batches")
            .build();

        let notifications = meter
            .u64_counter("servicecomb_config.notifications")
            .with_description("Listener notifications delivered")
            .build();

        let dispatch_duration = meter
            .f64_histogram("servicecomb_config.dispatch.duration")
            .with_description("Time to apply a change batch in seconds")
            .with_unit("s")
            .build();

        let listeners = meter
            .i64_gauge("servicecomb_config.listeners")
            .with_description("Registered configuration listeners")
            .build();

        Self {
            batches,
            changed_keys,
            notifications,
            dispatch_duration,
            listeners,
        }
    }

    /// Record a batch that started at `start`, carried `keys` entries and
    /// produced `notified` listener invocations.
    pub fn record_batch(&self, start: Instant, keys: u64, notified: u64) {
        self.batches.add(1, &[]);
        self.changed_keys.add(keys, &[]);
        self.notifications.add(notified, &[]);
        self.dispatch_duration.record(start.elapsed().as_secs_f64(), &[]);
    }

    /// Update the number of registered listeners.
    pub fn update_listener_count(&self, count: i64) {
        self.listeners.record(count, &[]);
    }
}
