//! Connection/runtime configuration checks.
//!
//! `get_config` accepts a connection string or an options object and returns
//! the fully normalized runtime configuration. `options_from_env` builds the
//! same options object from environment variables.

use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::policy::DEFAULT_SCHEMA;
use crate::protocol::{ConnectionConfig, RawOptions};
use crate::validation::coalesce::{self, POLLING_INTERVAL, POLLING_INTERVAL_SECONDS};
use crate::validation::names::assert_postgres_object_name;
use crate::validation::units::{
    ARCHIVE, ARCHIVE_FAILED, CLOCK_MONITOR, CRON_MONITOR, CRON_WORKER, DELETION, EXPIRATION,
    MAINTENANCE, MONITOR_STATE, RETENTION,
};
use crate::validation::{optional_bool, present, strip};
use crate::warnings::Warnings;

/// Fields owned by `ConnectionConfig` that are not part of a unit family.
const OWNED_FIELDS: &[&str] = &[
    "schema",
    "schedule",
    "supervise",
    "migrate",
    "archiveInterval",
    "archiveFailedInterval",
    "expireInDefault",
    "keepUntilDefault",
    POLLING_INTERVAL,
    POLLING_INTERVAL_SECONDS,
];

fn schema(options: &RawOptions) -> Result<String> {
    match present(options, "schema") {
        None => Ok(DEFAULT_SCHEMA.to_string()),
        Some(Value::String(schema)) if schema.is_empty() => Ok(DEFAULT_SCHEMA.to_string()),
        Some(Value::String(schema)) => {
            assert_postgres_object_name(schema)?;
            Ok(schema.clone())
        }
        Some(_) => Err(Error::invalid("Name must be a string")),
    }
}

/// Normalize a connection string or options object.
///
/// Coalescers run in a fixed order: maintenance, archive, archive-failed,
/// delete, monitoring, polling interval, expiration, retention. The archive
/// pair shares the "already warned" state for `CRON_DISABLED`.
pub fn get_config(value: &Value, warnings: &Warnings) -> Result<ConnectionConfig> {
    let options = match value {
        Value::String(url) if !url.is_empty() => {
            let mut options = RawOptions::new();
            options.insert("connectionString".to_string(), Value::String(url.clone()));
            options
        }
        Value::Object(options) => options.clone(),
        _ => {
            return Err(Error::invalid(
                "configuration assert: string or config object is required to connect to postgres",
            ))
        }
    };

    let schema = schema(&options)?;
    let schedule = optional_bool(&options, "schedule")?.unwrap_or(true);
    let supervise = optional_bool(&options, "supervise")?.unwrap_or(true);
    let migrate = optional_bool(&options, "migrate")?.unwrap_or(true);

    let maintenance_interval_seconds = coalesce::maintenance_interval(&options)?;
    let archive_seconds = coalesce::archive(&options, warnings)?;
    let archive_failed_seconds = coalesce::archive_failed(&options, archive_seconds, warnings)?;
    let delete_after = coalesce::deletion(&options)?;
    let monitor = coalesce::monitoring(&options)?;
    let polling_interval = coalesce::polling_interval(&options, None)?;
    let expire_in = coalesce::expiration(&options, None)?.value;
    let keep_until = coalesce::retention(&options, None)?.value;

    let mut extra = options;
    strip(&mut extra, OWNED_FIELDS.iter().copied());
    for family in [
        MAINTENANCE,
        ARCHIVE,
        ARCHIVE_FAILED,
        DELETION,
        MONITOR_STATE,
        CLOCK_MONITOR,
        CRON_MONITOR,
        CRON_WORKER,
        EXPIRATION,
        RETENTION,
    ] {
        strip(&mut extra, family.owned_fields());
    }

    let config = ConnectionConfig {
        schema,
        schedule,
        supervise,
        migrate,
        maintenance_interval_seconds,
        archive_seconds,
        archive_failed_seconds,
        delete_after,
        monitor_state_interval_seconds: monitor.state,
        clock_monitor_interval_seconds: monitor.clock,
        cron_monitor_interval_seconds: monitor.cron_monitor,
        cron_worker_interval_seconds: monitor.cron_worker,
        polling_interval,
        expire_in,
        keep_until,
        extra,
    };

    debug!(
        schema = %config.schema,
        archive_seconds = config.archive_seconds,
        maintenance_interval_seconds = config.maintenance_interval_seconds,
        "Connection config normalized"
    );

    Ok(config)
}

/// Environment variable -> option name.
///
/// - `DATABASE_URL`: connection string
/// - `JOBCHECK_SCHEMA`: schema name (default: pgboss)
/// - `JOBCHECK_SCHEDULE` / `JOBCHECK_SUPERVISE` / `JOBCHECK_MIGRATE`: booleans
/// - `JOBCHECK_*` interval knobs, see the table below
pub const ENV_OPTIONS: &[(&str, &str)] = &[
    ("DATABASE_URL", "connectionString"),
    ("JOBCHECK_SCHEMA", "schema"),
    ("JOBCHECK_SCHEDULE", "schedule"),
    ("JOBCHECK_SUPERVISE", "supervise"),
    ("JOBCHECK_MIGRATE", "migrate"),
    (
        "JOBCHECK_ARCHIVE_COMPLETED_AFTER_SECONDS",
        "archiveCompletedAfterSeconds",
    ),
    (
        "JOBCHECK_ARCHIVE_FAILED_AFTER_SECONDS",
        "archiveFailedAfterSeconds",
    ),
    ("JOBCHECK_DELETE_AFTER_DAYS", "deleteAfterDays"),
    (
        "JOBCHECK_MAINTENANCE_INTERVAL_SECONDS",
        "maintenanceIntervalSeconds",
    ),
    (
        "JOBCHECK_MONITOR_STATE_INTERVAL_SECONDS",
        "monitorStateIntervalSeconds",
    ),
    (
        "JOBCHECK_CLOCK_MONITOR_INTERVAL_SECONDS",
        "clockMonitorIntervalSeconds",
    ),
    (
        "JOBCHECK_POLLING_INTERVAL_SECONDS",
        "pollingIntervalSeconds",
    ),
    ("JOBCHECK_EXPIRE_IN_SECONDS", "expireInSeconds"),
    ("JOBCHECK_RETENTION_DAYS", "retentionDays"),
];

/// Booleans and numbers are parsed; everything else stays a string.
fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

/// Build raw options from any variable lookup.
pub fn options_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RawOptions {
    let mut options = RawOptions::new();
    for (var, field) in ENV_OPTIONS {
        if let Some(raw) = lookup(var).filter(|raw| !raw.is_empty()) {
            let value = if *field == "connectionString" || *field == "schema" {
                Value::String(raw)
            } else {
                parse_env_value(&raw)
            };
            options.insert(field.to_string(), value);
        }
    }
    options
}

/// Raw options read from the process environment.
pub fn options_from_env() -> RawOptions {
    options_from_lookup(|var| std::env::var(var).ok())
}

/// `get_config` over `options_from_env()`.
pub fn get_config_from_env(warnings: &Warnings) -> Result<ConnectionConfig> {
    get_config(&Value::Object(options_from_env()), warnings)
}
