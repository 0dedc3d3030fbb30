//! Criterion benchmarks for the argument checkers.
//!
//! Run with: cargo bench
//! Results saved to: target/criterion/

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use jobcheck::{
    check_insert_args, check_send_args, check_work_args, get_config, CallArg, Defaults, Warnings,
};

type Handler = fn(&[Value]);

fn handler(_jobs: &[Value]) {}

/// Send options touching every family the send checker owns.
fn send_options() -> Value {
    json!({
        "priority": 5,
        "retryLimit": 3,
        "retryBackoff": true,
        "expireInMinutes": 15,
        "retentionDays": 2,
        "singletonMinutes": 1,
        "startAfter": "2030-01-01T00:00:00Z",
        "singletonKey": "bench"
    })
}

/// Benchmark config normalization from both input shapes.
fn bench_get_config(c: &mut Criterion) {
    let warnings = Warnings::default();
    let object = json!({
        "connectionString": "postgres://localhost/bench",
        "schema": "bench",
        "maintenanceIntervalMinutes": 2,
        "archiveCompletedAfterSeconds": 3600,
        "deleteAfterDays": 3,
        "pollingIntervalSeconds": 1.5,
        "expireInHours": 1,
        "retentionDays": 7
    });
    let url = json!("postgres://localhost/bench");

    let mut group = c.benchmark_group("get_config");
    group.throughput(Throughput::Elements(1));

    group.bench_function("connection_string", |b| {
        b.iter(|| get_config(&url, &warnings).unwrap())
    });
    group.bench_function("options_object", |b| {
        b.iter(|| get_config(&object, &warnings).unwrap())
    });

    group.finish();
}

/// Benchmark send normalization, positional and object form.
fn bench_send(c: &mut Criterion) {
    let warnings = Warnings::default();
    let defaults = Defaults {
        archive_seconds: Some(3600),
        expire_in: Some(600),
        retry_delay: Some(30),
        ..Default::default()
    };

    let mut group = c.benchmark_group("check_send_args");
    group.throughput(Throughput::Elements(1));

    group.bench_function("positional", |b| {
        b.iter(|| {
            let args: Vec<CallArg<Handler>> = vec![
                CallArg::Value(json!("bench-send")),
                CallArg::Value(json!({"task": "benchmark", "value": 42})),
                CallArg::Value(send_options()),
            ];
            check_send_args(args, &defaults, &warnings).unwrap()
        })
    });

    group.bench_function("object", |b| {
        b.iter(|| {
            let args: Vec<CallArg<Handler>> = vec![CallArg::Value(json!({
                "name": "bench-send",
                "data": {"task": "benchmark"},
                "options": send_options()
            }))];
            check_send_args(args, &defaults, &warnings).unwrap()
        })
    });

    group.finish();
}

/// Benchmark consumer option normalization.
fn bench_work(c: &mut Criterion) {
    let defaults = Defaults::default();

    let mut group = c.benchmark_group("check_work_args");
    group.throughput(Throughput::Elements(1));

    group.bench_function("with_options", |b| {
        b.iter(|| {
            let args = vec![
                CallArg::Value(json!({"pollingIntervalSeconds": 2, "batchSize": 10})),
                CallArg::Function(handler as Handler),
            ];
            check_work_args("bench-work", args, &defaults).unwrap()
        })
    });

    group.finish();
}

/// Benchmark bulk insert shape checks.
fn bench_insert_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_insert_args");

    for batch_size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64));

        let jobs = Value::Array(
            (0..*batch_size)
                .map(|i| json!({"name": "bench-insert", "data": {"i": i}}))
                .collect(),
        );

        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &jobs, |b, jobs| {
            b.iter(|| check_insert_args(jobs).unwrap().len())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_get_config,
    bench_send,
    bench_work,
    bench_insert_batch,
);
criterion_main!(benches);
