//! Process-wide limits and family defaults.
//!
//! `POLICY` is shared with the execution engine so that the ceilings enforced
//! here are the ones the scheduler and maintenance loops rely on.
//!
//! ```text
//! MAX_EXPIRATION_HOURS (24)
//!       │
//!       ├─> expireIn                     (must be <)
//!       ├─> maintenanceIntervalSeconds   (must be <)
//!       └─> monitorStateIntervalSeconds  (must be <, when set)
//!
//! MIN_POLLING_INTERVAL_MS (500)
//!       └─> pollingIntervalSeconds       (must be >= 0.5)
//! ```

/// Immutable limits read by every unit coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub max_expiration_hours: u64,
    pub min_polling_interval_ms: u64,
}

impl Policy {
    /// Exclusive ceiling, in seconds, for expiration-like intervals.
    #[inline]
    pub const fn max_expiration_seconds(&self) -> u64 {
        self.max_expiration_hours * HOUR
    }
}

pub const MAX_EXPIRATION_HOURS: u64 = 24;
pub const MIN_POLLING_INTERVAL_MS: u64 = 500;

pub const POLICY: Policy = Policy {
    max_expiration_hours: MAX_EXPIRATION_HOURS,
    min_polling_interval_ms: MIN_POLLING_INTERVAL_MS,
};

/// Schema used when the caller does not name one.
pub const DEFAULT_SCHEMA: &str = "pgboss";

// ============== Unit sizes (seconds) ==============

pub const MINUTE: u64 = 60;
pub const HOUR: u64 = 60 * MINUTE;
pub const DAY: u64 = 24 * HOUR;

// ============== Family defaults ==============

pub const DEFAULT_ARCHIVE_SECONDS: u64 = 12 * HOUR;
/// Archive cadences below this disable cron processing.
pub const CRON_MIN_ARCHIVE_SECONDS: u64 = 60;
pub const DEFAULT_DELETE_AFTER: &str = "7 days";
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_MAINTENANCE_INTERVAL_SECONDS: u64 = 2 * MINUTE;
pub const MAX_CLOCK_MONITOR_INTERVAL_SECONDS: u64 = 10 * MINUTE;
pub const DEFAULT_CLOCK_MONITOR_INTERVAL_SECONDS: u64 = MAX_CLOCK_MONITOR_INTERVAL_SECONDS;
pub const MAX_CRON_INTERVAL_SECONDS: u64 = 45;
pub const DEFAULT_CRON_MONITOR_INTERVAL_SECONDS: u64 = 30;
pub const DEFAULT_CRON_WORKER_INTERVAL_SECONDS: u64 = 5;
pub const DEFAULT_BATCH_SIZE: u64 = 1;
/// Most jobs accepted by one bulk insert.
pub const MAX_INSERT_BATCH: usize = 1000;

/// Longest schema/storage-object identifier accepted.
pub const MAX_OBJECT_NAME_LENGTH: usize = 50;

// Defaults must themselves satisfy the ceilings they are checked against.
const _: () = assert!(DEFAULT_MAINTENANCE_INTERVAL_SECONDS < POLICY.max_expiration_seconds());
const _: () = assert!(DEFAULT_CRON_MONITOR_INTERVAL_SECONDS <= MAX_CRON_INTERVAL_SECONDS);
const _: () = assert!(DEFAULT_CRON_WORKER_INTERVAL_SECONDS <= MAX_CRON_INTERVAL_SECONDS);
const _: () = assert!(DEFAULT_POLLING_INTERVAL_MS >= MIN_POLLING_INTERVAL_MS);
const _: () = assert!(DEFAULT_ARCHIVE_SECONDS >= CRON_MIN_ARCHIVE_SECONDS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_values() {
        assert_eq!(POLICY.max_expiration_hours, 24);
        assert_eq!(POLICY.min_polling_interval_ms, 500);
        assert_eq!(POLICY.max_expiration_seconds(), 86_400);
    }

    #[test]
    fn test_archive_default_is_twelve_hours() {
        assert_eq!(DEFAULT_ARCHIVE_SECONDS, 43_200);
    }
}
