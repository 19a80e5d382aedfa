//! Benchmarks for adapter reads and change-batch dispatch.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use servicecomb_config::client::ConfigurationChangedEvent;
use servicecomb_config::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn snapshot(size: usize) -> HashMap<String, config::Value> {
    (0..size)
        .map(|i| (format!("key.{}", i), config::Value::from(format!("value-{}", i))))
        .collect()
}

/// Benchmark a single read from the snapshot
fn benchmark_read(c: &mut Criterion) {
    let configuration =
        ServicecombConfiguration::new(Arc::new(MemoryConfigClient::new(snapshot(1_000))));

    let mut group = c.benchmark_group("read");
    group.bench_function("hit", |b| {
        b.iter(|| black_box(configuration.get_config(black_box("key.500"))));
    });
    group.bench_function("miss_with_default", |b| {
        b.iter(|| black_box(configuration.get_config_or(black_box("absent"), "default")));
    });
    group.finish();
}

/// Benchmark dispatching a batch of updates to one listener per key
fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    for size in [10usize, 100, 1_000] {
        let client = Arc::new(MemoryConfigClient::new(snapshot(size)));
        let configuration = ServicecombConfiguration::new(client.clone());
        let notified = Arc::new(AtomicUsize::new(0));
        for i in 0..size {
            let notified = Arc::clone(&notified);
            configuration.add_config_listener(
                &format!("key.{}", i),
                Arc::new(move |_: &ConfigurationChangeEvent| {
                    notified.fetch_add(1, Ordering::Relaxed);
                }),
            );
        }
        let event = ConfigurationChangedEvent::new(HashMap::new(), snapshot(size), HashMap::new());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &event, |b, event| {
            b.iter(|| client.publish(black_box(event)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_read, benchmark_dispatch);
criterion_main!(benches);
