//! Normalized option objects returned by the checkers.
//!
//! Each struct holds exactly one canonical field per unit family plus an
//! `extra` map with the caller fields this crate does not own. `to_raw()`
//! renders the wire-named map handed to the execution engine; `Serialize`
//! goes through it.

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::types::{Deferred, Defaults, QueueName, RawOptions};

fn serialize_raw<S: Serializer>(raw: RawOptions, serializer: S) -> Result<S::Ok, S::Error> {
    raw.serialize(serializer)
}

fn put(map: &mut RawOptions, key: &str, value: impl Into<Value>) {
    map.insert(key.to_string(), value.into());
}

fn put_opt<T: Into<Value>>(map: &mut RawOptions, key: &str, value: Option<T>) {
    map.insert(key.to_string(), value.map_or(Value::Null, Into::into));
}

/// Retry settings with their queue-level fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Deferred<u64>,
    pub limit: Deferred<u64>,
    pub backoff: Deferred<bool>,
}

impl RetryPolicy {
    fn write_to(&self, map: &mut RawOptions) {
        // Retry fields are pass-through: only write what was given.
        if let Some(delay) = self.delay.value {
            put(map, "retryDelay", delay);
        }
        if let Some(limit) = self.limit.value {
            put(map, "retryLimit", limit);
        }
        if let Some(backoff) = self.backoff.value {
            put(map, "retryBackoff", backoff);
        }
        if let Some(delay) = self.delay.fallback {
            put(map, "retryDelayDefault", delay);
        }
        if let Some(limit) = self.limit.fallback {
            put(map, "retryLimitDefault", limit);
        }
        if let Some(backoff) = self.backoff.fallback {
            put(map, "retryBackoffDefault", backoff);
        }
    }
}

/// Fully normalized connection/runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub schema: String,
    pub schedule: bool,
    pub supervise: bool,
    pub migrate: bool,
    pub maintenance_interval_seconds: u64,
    pub archive_seconds: u64,
    pub archive_failed_seconds: u64,
    /// Duration string, e.g. "7 days".
    pub delete_after: String,
    /// `None` disables state monitoring.
    pub monitor_state_interval_seconds: Option<u64>,
    pub clock_monitor_interval_seconds: u64,
    pub cron_monitor_interval_seconds: u64,
    pub cron_worker_interval_seconds: u64,
    /// Milliseconds.
    pub polling_interval: u64,
    pub expire_in: Option<u64>,
    pub keep_until: Option<String>,
    /// Connection fields (`connectionString`, `host`, `max`, ...) and anything
    /// else passed through untouched.
    pub extra: RawOptions,
}

impl ConnectionConfig {
    pub fn archive_interval(&self) -> String {
        format!("{} seconds", self.archive_seconds)
    }

    pub fn archive_failed_interval(&self) -> String {
        format!("{} seconds", self.archive_failed_seconds)
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.extra.get("connectionString").and_then(Value::as_str)
    }

    pub fn to_raw(&self) -> RawOptions {
        let mut map = self.extra.clone();
        put(&mut map, "schema", self.schema.as_str());
        put(&mut map, "schedule", self.schedule);
        put(&mut map, "supervise", self.supervise);
        put(&mut map, "migrate", self.migrate);
        put(
            &mut map,
            "maintenanceIntervalSeconds",
            self.maintenance_interval_seconds,
        );
        put(&mut map, "archiveSeconds", self.archive_seconds);
        put(&mut map, "archiveInterval", self.archive_interval());
        put(&mut map, "archiveFailedSeconds", self.archive_failed_seconds);
        put(
            &mut map,
            "archiveFailedInterval",
            self.archive_failed_interval(),
        );
        put(&mut map, "deleteAfter", self.delete_after.as_str());
        put_opt(
            &mut map,
            "monitorStateIntervalSeconds",
            self.monitor_state_interval_seconds,
        );
        put(
            &mut map,
            "clockMonitorIntervalSeconds",
            self.clock_monitor_interval_seconds,
        );
        put(
            &mut map,
            "cronMonitorIntervalSeconds",
            self.cron_monitor_interval_seconds,
        );
        put(
            &mut map,
            "cronWorkerIntervalSeconds",
            self.cron_worker_interval_seconds,
        );
        put(&mut map, "pollingInterval", self.polling_interval);
        put_opt(&mut map, "expireIn", self.expire_in);
        put_opt(&mut map, "keepUntil", self.keep_until.clone());
        map
    }
}

impl Serialize for ConnectionConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.to_raw(), serializer)
    }
}

impl From<&ConnectionConfig> for Defaults {
    /// Instance-level fallbacks. Retry settings are not part of the
    /// normalized config, so they are read loosely from the pass-through map.
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            archive_seconds: Some(config.archive_seconds),
            expire_in: config.expire_in,
            keep_until: config.keep_until.clone(),
            retry_delay: config.extra.get("retryDelay").and_then(Value::as_u64),
            retry_limit: config.extra.get("retryLimit").and_then(Value::as_u64),
            retry_backoff: config.extra.get("retryBackoff").and_then(Value::as_bool),
            polling_interval: Some(config.polling_interval),
        }
    }
}

/// Normalized queue definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueOptions {
    pub dead_letter: Option<String>,
    pub retry: RetryPolicy,
    pub expire_in: Deferred<u64>,
    pub keep_until: Deferred<String>,
    pub extra: RawOptions,
}

impl QueueOptions {
    pub fn to_raw(&self) -> RawOptions {
        let mut map = self.extra.clone();
        if let Some(dead_letter) = &self.dead_letter {
            put(&mut map, "deadLetter", dead_letter.as_str());
        }
        self.retry.write_to(&mut map);
        self.expire_in
            .write_to(&mut map, "expireIn", "expireInDefault");
        self.keep_until
            .write_to(&mut map, "keepUntil", "keepUntilDefault");
        map
    }
}

impl Serialize for QueueOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.to_raw(), serializer)
    }
}

/// Normalized per-job send options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub priority: i64,
    pub dead_letter: Option<String>,
    pub retry: RetryPolicy,
    pub expire_in: Deferred<u64>,
    pub keep_until: Deferred<String>,
    /// ISO-8601 timestamp, a positive delay in seconds, or a raw interval string.
    pub start_after: Option<String>,
    /// Throttling window; never longer than the queue's archive interval.
    pub singleton_seconds: Option<u64>,
    /// `singletonKey`, `id`, and other fields owned by the execution engine.
    pub extra: RawOptions,
}

impl SendOptions {
    pub fn to_raw(&self) -> RawOptions {
        let mut map = self.extra.clone();
        put(&mut map, "priority", self.priority);
        if let Some(dead_letter) = &self.dead_letter {
            put(&mut map, "deadLetter", dead_letter.as_str());
        }
        self.retry.write_to(&mut map);
        self.expire_in
            .write_to(&mut map, "expireIn", "expireInDefault");
        self.keep_until
            .write_to(&mut map, "keepUntil", "keepUntilDefault");
        put_opt(&mut map, "startAfter", self.start_after.clone());
        put_opt(&mut map, "singletonSeconds", self.singleton_seconds);
        map
    }
}

impl Serialize for SendOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.to_raw(), serializer)
    }
}

/// Result of `check_send_args`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendRequest {
    pub name: QueueName,
    pub data: Value,
    pub options: SendOptions,
}

/// Normalized consumer options.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOptions {
    /// Milliseconds.
    pub polling_interval: u64,
    pub batch_size: u64,
    pub include_metadata: Option<bool>,
    /// Fetch in priority order (a toggle, unlike send's integer priority).
    pub priority: Option<bool>,
    pub extra: RawOptions,
}

impl WorkOptions {
    pub fn to_raw(&self) -> RawOptions {
        let mut map = self.extra.clone();
        put(&mut map, "pollingInterval", self.polling_interval);
        put(&mut map, "batchSize", self.batch_size);
        if let Some(include_metadata) = self.include_metadata {
            put(&mut map, "includeMetadata", include_metadata);
        }
        if let Some(priority) = self.priority {
            put(&mut map, "priority", priority);
        }
        map
    }
}

impl Serialize for WorkOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.to_raw(), serializer)
    }
}

/// Result of `check_work_args`.
#[derive(Debug, Clone)]
pub struct WorkRequest<F> {
    pub options: WorkOptions,
    pub callback: F,
}

/// Typed view of the fetch options after `check_fetch_args`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOptions {
    pub batch_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_start_after: Option<bool>,
}
