//! Per-family coalescers.
//!
//! Each reads the caller's raw fields, asserts them, and returns the single
//! canonical value for its family. Where a `Defaults` is given the relevant
//! fallback is attached, not merged.

use serde_json::Value;

use super::units::{
    UnitFamily, ARCHIVE, ARCHIVE_FAILED, CLOCK_MONITOR, CRON_MONITOR, CRON_WORKER, DELETION,
    EXPIRATION, MAINTENANCE, MONITOR_STATE, RETENTION, SINGLETON,
};
use super::{optional, present, whole_number};
use crate::error::{ensure, Error, Result};
use crate::policy::{
    CRON_MIN_ARCHIVE_SECONDS, DEFAULT_ARCHIVE_SECONDS, DEFAULT_CLOCK_MONITOR_INTERVAL_SECONDS,
    DEFAULT_CRON_MONITOR_INTERVAL_SECONDS, DEFAULT_CRON_WORKER_INTERVAL_SECONDS,
    DEFAULT_DELETE_AFTER, DEFAULT_MAINTENANCE_INTERVAL_SECONDS, DEFAULT_POLLING_INTERVAL_MS,
    MAX_CLOCK_MONITOR_INTERVAL_SECONDS, MAX_CRON_INTERVAL_SECONDS, POLICY,
};
use crate::protocol::{Deferred, Defaults, RawOptions, RetryPolicy};
use crate::warnings::{WarningKind, Warnings};

pub const POLLING_INTERVAL_SECONDS: &str = "pollingIntervalSeconds";
pub const POLLING_INTERVAL: &str = "pollingInterval";

/// `retention*` -> `keepUntil` duration string.
pub fn retention(options: &RawOptions, defaults: Option<&Defaults>) -> Result<Deferred<String>> {
    let keep_until = RETENTION.duration(options)?;
    Ok(Deferred::new(
        keep_until,
        defaults.and_then(|d| d.keep_until.clone()),
    ))
}

/// `expireIn*` -> `expireIn` seconds, strictly below the expiration ceiling.
pub fn expiration(options: &RawOptions, defaults: Option<&Defaults>) -> Result<Deferred<u64>> {
    let expire_in = EXPIRATION.seconds(options)?;
    if let Some(seconds) = expire_in {
        ensure!(
            seconds < POLICY.max_expiration_seconds(),
            "configuration assert: expiration cannot exceed {} hours",
            POLICY.max_expiration_hours
        );
    }
    Ok(Deferred::new(expire_in, defaults.and_then(|d| d.expire_in)))
}

/// `deleteAfter*` -> `deleteAfter` duration string, "7 days" when absent.
pub fn deletion(options: &RawOptions) -> Result<String> {
    Ok(DELETION
        .duration(options)?
        .unwrap_or_else(|| DEFAULT_DELETE_AFTER.to_string()))
}

/// `archiveCompletedAfterSeconds` -> `archiveSeconds`, 12h when absent.
pub fn archive(options: &RawOptions, warnings: &Warnings) -> Result<u64> {
    let seconds = ARCHIVE.seconds(options)?.unwrap_or(DEFAULT_ARCHIVE_SECONDS);
    if seconds < CRON_MIN_ARCHIVE_SECONDS {
        warnings.emit(WarningKind::CronDisabled, None, false);
    }
    Ok(seconds)
}

/// `archiveFailedAfterSeconds` -> `archiveFailedSeconds`, inheriting the
/// completed-job archive interval when absent.
pub fn archive_failed(
    options: &RawOptions,
    archive_seconds: u64,
    warnings: &Warnings,
) -> Result<u64> {
    let seconds = ARCHIVE_FAILED.seconds(options)?.unwrap_or(archive_seconds);
    // The archive family already warned when its own interval was too short.
    if seconds < CRON_MIN_ARCHIVE_SECONDS && archive_seconds >= CRON_MIN_ARCHIVE_SECONDS {
        warnings.emit(WarningKind::CronDisabled, None, false);
    }
    Ok(seconds)
}

/// `retryDelay`, `retryLimit`, `retryBackoff`: validated pass-through.
pub fn retry(options: &RawOptions, defaults: Option<&Defaults>) -> Result<RetryPolicy> {
    let delay = optional(
        options,
        "retryDelay",
        whole_number,
        "retryDelay must be an integer >= 0",
    )?;
    let limit = optional(
        options,
        "retryLimit",
        whole_number,
        "retryLimit must be an integer >= 0",
    )?;
    let backoff = optional(
        options,
        "retryBackoff",
        Value::as_bool,
        "retryBackoff must be either true or false",
    )?;

    Ok(RetryPolicy {
        delay: Deferred::new(delay, defaults.and_then(|d| d.retry_delay)),
        limit: Deferred::new(limit, defaults.and_then(|d| d.retry_limit)),
        backoff: Deferred::new(backoff, defaults.and_then(|d| d.retry_backoff)),
    })
}

/// `pollingIntervalSeconds` -> `pollingInterval` milliseconds.
pub fn polling_interval(options: &RawOptions, defaults: Option<&Defaults>) -> Result<u64> {
    let min_ms = POLICY.min_polling_interval_ms;

    if let Some(value) = present(options, POLLING_INTERVAL_SECONDS) {
        let min_seconds = min_ms as f64 / 1000.0;
        let seconds = value
            .as_f64()
            .filter(|seconds| *seconds >= min_seconds)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "configuration assert: pollingIntervalSeconds must be at least every {}ms",
                    min_ms
                ))
            })?;
        ensure!(
            seconds < POLICY.max_expiration_seconds() as f64,
            "configuration assert: pollingIntervalSeconds cannot exceed {} hours",
            POLICY.max_expiration_hours
        );
        return Ok((seconds * 1000.0).round() as u64);
    }

    if let Some(value) = present(options, POLLING_INTERVAL) {
        return whole_number(value)
            .filter(|ms| *ms >= min_ms)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "configuration assert: pollingInterval must be at least {}ms",
                    min_ms
                ))
            });
    }

    Ok(defaults
        .and_then(|d| d.polling_interval)
        .unwrap_or(DEFAULT_POLLING_INTERVAL_MS))
}

/// `maintenanceInterval*` -> `maintenanceIntervalSeconds`, 120s when absent.
pub fn maintenance_interval(options: &RawOptions) -> Result<u64> {
    let seconds = MAINTENANCE
        .seconds(options)?
        .unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_SECONDS);
    ensure!(
        seconds < POLICY.max_expiration_seconds(),
        "configuration assert: maintenance interval cannot exceed {} hours",
        POLICY.max_expiration_hours
    );
    Ok(seconds)
}

/// Supervisor and cron monitoring cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorIntervals {
    /// `None` leaves queue-state monitoring off.
    pub state: Option<u64>,
    pub clock: u64,
    pub cron_monitor: u64,
    pub cron_worker: u64,
}

fn bounded(
    family: &UnitFamily,
    options: &RawOptions,
    default: u64,
    max: u64,
    message: &str,
) -> Result<u64> {
    let seconds = family.seconds(options)?.unwrap_or(default);
    // Every supplied field is held to the range, not only the winner.
    for unit in family.units {
        if let Some(count) = present(options, unit.field).and_then(whole_number) {
            if !(1..=max).contains(&count.saturating_mul(unit.seconds)) {
                return Err(Error::invalid(format!("configuration assert: {}", message)));
            }
        }
    }
    if (1..=max).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(Error::invalid(format!("configuration assert: {}", message)))
    }
}

pub fn monitoring(options: &RawOptions) -> Result<MonitorIntervals> {
    let state = MONITOR_STATE.seconds(options)?;
    if let Some(seconds) = state {
        ensure!(
            seconds < POLICY.max_expiration_seconds(),
            "configuration assert: state monitoring interval cannot exceed {} hours",
            POLICY.max_expiration_hours
        );
    }

    let clock = bounded(
        &CLOCK_MONITOR,
        options,
        DEFAULT_CLOCK_MONITOR_INTERVAL_SECONDS,
        MAX_CLOCK_MONITOR_INTERVAL_SECONDS,
        "clockMonitorIntervalSeconds must be between 1 second and 10 minutes",
    )?;
    let cron_monitor = bounded(
        &CRON_MONITOR,
        options,
        DEFAULT_CRON_MONITOR_INTERVAL_SECONDS,
        MAX_CRON_INTERVAL_SECONDS,
        "cronMonitorIntervalSeconds must be between 1 and 45 seconds",
    )?;
    let cron_worker = bounded(
        &CRON_WORKER,
        options,
        DEFAULT_CRON_WORKER_INTERVAL_SECONDS,
        MAX_CRON_INTERVAL_SECONDS,
        "cronWorkerIntervalSeconds must be between 1 and 45 seconds",
    )?;

    Ok(MonitorIntervals {
        state,
        clock,
        cron_monitor,
        cron_worker,
    })
}

/// `singleton{Hours,Minutes,Seconds}` -> `singletonSeconds`.
///
/// Unlike the other families, zero or negative counts mean "no throttling"
/// and fractional counts are allowed; the window is rounded up to whole
/// seconds.
pub fn singleton(options: &RawOptions) -> Result<Option<u64>> {
    for unit in SINGLETON.units {
        let Some(value) = present(options, unit.field) else {
            continue;
        };
        let count = value.as_f64().ok_or_else(|| {
            Error::invalid(format!("configuration assert: {} must be a number", unit.field))
        })?;
        if count <= 0.0 {
            continue;
        }
        let seconds = (count * unit.seconds as f64).ceil();
        ensure!(
            seconds < u64::MAX as f64,
            "configuration assert: {} is out of range",
            unit.field
        );
        return Ok(Some(seconds as u64));
    }
    Ok(None)
}
