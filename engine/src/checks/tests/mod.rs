//! Checker scenario tests.


use std::sync::Arc;

pub(super) use crate::checks::{
    check_fetch_args, check_queue_args, check_send_args, check_work_args, get_config,
    options_from_lookup, start_after_date,
};
pub(super) use crate::protocol::{CallArg, Defaults, RawOptions};
pub(super) use crate::warnings::{MemorySink, Warnings};
pub(super) use serde_json::{json, Value};

/// Handler type used wherever a callback is needed.
pub(super) type Handler = fn(&[Value]);

pub(super) fn handler(_jobs: &[Value]) {}

/// Fresh warning registry recording into memory.
pub(super) fn setup() -> (Warnings, Arc<MemorySink>) {
    let sink = MemorySink::new();
    (Warnings::with_sink(sink.clone()), sink)
}

pub(super) fn opts(value: Value) -> RawOptions {
    value.as_object().cloned().unwrap_or_default()
}

/// Positional send arguments.
pub(super) fn args(values: Vec<Value>) -> Vec<CallArg<Handler>> {
    values.into_iter().map(CallArg::Value).collect()
}

pub(super) fn archive_defaults(archive_seconds: u64) -> Defaults {
    Defaults {
        archive_seconds: Some(archive_seconds),
        ..Default::default()
    }
}
