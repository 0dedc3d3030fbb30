//! Unit cascades.
//!
//! A family lists its unit-suffixed input fields largest unit first. The
//! first field present wins, so `retentionDays` beats `retentionHours` no
//! matter the values. When no unit field is present, a canonical value
//! passed back in (e.g. `expireIn` from a previous normalization) is
//! re-validated and kept.

use std::iter;

use serde_json::Value;

use super::{present, whole_number};
use crate::error::{Error, Result};
use crate::policy::{DAY, HOUR, MINUTE};
use crate::protocol::RawOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub field: &'static str,
    /// Unit word used in duration strings ("days", "hours", ...).
    pub label: &'static str,
    /// Seconds per unit.
    pub seconds: u64,
}

const fn unit(field: &'static str, label: &'static str, seconds: u64) -> Unit {
    Unit {
        field,
        label,
        seconds,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UnitFamily {
    pub canonical: &'static str,
    pub units: &'static [Unit],
}

pub const RETENTION: UnitFamily = UnitFamily {
    canonical: "keepUntil",
    units: &[
        unit("retentionDays", "days", DAY),
        unit("retentionHours", "hours", HOUR),
        unit("retentionMinutes", "minutes", MINUTE),
        unit("retentionSeconds", "seconds", 1),
    ],
};

pub const EXPIRATION: UnitFamily = UnitFamily {
    canonical: "expireIn",
    units: &[
        unit("expireInHours", "hours", HOUR),
        unit("expireInMinutes", "minutes", MINUTE),
        unit("expireInSeconds", "seconds", 1),
    ],
};

pub const DELETION: UnitFamily = UnitFamily {
    canonical: "deleteAfter",
    units: &[
        unit("deleteAfterDays", "days", DAY),
        unit("deleteAfterHours", "hours", HOUR),
        unit("deleteAfterMinutes", "minutes", MINUTE),
        unit("deleteAfterSeconds", "seconds", 1),
    ],
};

pub const ARCHIVE: UnitFamily = UnitFamily {
    canonical: "archiveSeconds",
    units: &[unit("archiveCompletedAfterSeconds", "seconds", 1)],
};

pub const ARCHIVE_FAILED: UnitFamily = UnitFamily {
    canonical: "archiveFailedSeconds",
    units: &[unit("archiveFailedAfterSeconds", "seconds", 1)],
};

pub const MAINTENANCE: UnitFamily = UnitFamily {
    canonical: "maintenanceIntervalSeconds",
    units: &[
        unit("maintenanceIntervalMinutes", "minutes", MINUTE),
        unit("maintenanceIntervalSeconds", "seconds", 1),
    ],
};

pub const MONITOR_STATE: UnitFamily = UnitFamily {
    canonical: "monitorStateIntervalSeconds",
    units: &[
        unit("monitorStateIntervalMinutes", "minutes", MINUTE),
        unit("monitorStateIntervalSeconds", "seconds", 1),
    ],
};

pub const CLOCK_MONITOR: UnitFamily = UnitFamily {
    canonical: "clockMonitorIntervalSeconds",
    units: &[
        unit("clockMonitorIntervalMinutes", "minutes", MINUTE),
        unit("clockMonitorIntervalSeconds", "seconds", 1),
    ],
};

pub const CRON_MONITOR: UnitFamily = UnitFamily {
    canonical: "cronMonitorIntervalSeconds",
    units: &[unit("cronMonitorIntervalSeconds", "seconds", 1)],
};

pub const CRON_WORKER: UnitFamily = UnitFamily {
    canonical: "cronWorkerIntervalSeconds",
    units: &[unit("cronWorkerIntervalSeconds", "seconds", 1)],
};

pub const SINGLETON: UnitFamily = UnitFamily {
    canonical: "singletonSeconds",
    units: &[
        unit("singletonHours", "hours", HOUR),
        unit("singletonMinutes", "minutes", MINUTE),
        unit("singletonSeconds", "seconds", 1),
    ],
};

fn at_least_one(field: &str) -> Error {
    Error::invalid(format!(
        "configuration assert: {} must be a whole number of at least 1",
        field
    ))
}

impl UnitFamily {
    /// First unit field present, in precedence order.
    pub fn pick<'a>(&self, options: &'a RawOptions) -> Option<(Unit, &'a Value)> {
        self.units
            .iter()
            .find_map(|unit| present(options, unit.field).map(|value| (*unit, value)))
    }

    /// Every unit field the caller supplied must be >= 1 in its own unit.
    pub fn check_present(&self, options: &RawOptions) -> Result<()> {
        for unit in self.units {
            if let Some(value) = present(options, unit.field) {
                if !whole_number(value).is_some_and(|n| n >= 1) {
                    return Err(at_least_one(unit.field));
                }
            }
        }
        Ok(())
    }

    /// Canonical value in seconds, or `None` when nothing was supplied.
    pub fn seconds(&self, options: &RawOptions) -> Result<Option<u64>> {
        self.check_present(options)?;

        if let Some((unit, value)) = self.pick(options) {
            let count = whole_number(value).unwrap_or_default();
            return count.checked_mul(unit.seconds).map(Some).ok_or_else(|| {
                Error::invalid(format!(
                    "configuration assert: {} is out of range",
                    unit.field
                ))
            });
        }

        match present(options, self.canonical) {
            None => Ok(None),
            Some(value) => whole_number(value)
                .filter(|n| *n >= 1)
                .map(Some)
                .ok_or_else(|| at_least_one(self.canonical)),
        }
    }

    /// Canonical duration string, keeping the winning unit verbatim
    /// (`retentionMinutes: 60` -> `"60 minutes"`).
    pub fn duration(&self, options: &RawOptions) -> Result<Option<String>> {
        self.check_present(options)?;

        if let Some((unit, value)) = self.pick(options) {
            let count = whole_number(value).unwrap_or_default();
            return Ok(Some(format!("{} {}", count, unit.label)));
        }

        match present(options, self.canonical) {
            None => Ok(None),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.clone())),
            Some(_) => Err(Error::invalid(format!(
                "configuration assert: {} must be a duration string",
                self.canonical
            ))),
        }
    }

    /// Input fields plus the canonical field.
    pub fn owned_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units
            .iter()
            .map(|unit| unit.field)
            .chain(iter::once(self.canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts(value: Value) -> RawOptions {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_units_are_listed_largest_first() {
        for family in [
            RETENTION,
            EXPIRATION,
            DELETION,
            MAINTENANCE,
            MONITOR_STATE,
            CLOCK_MONITOR,
            SINGLETON,
        ] {
            let sizes: Vec<u64> = family.units.iter().map(|u| u.seconds).collect();
            let mut sorted = sizes.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            assert_eq!(sizes, sorted, "{}", family.canonical);
        }
    }

    #[test]
    fn test_pick_prefers_larger_unit() {
        let options = opts(json!({"retentionSeconds": 5, "retentionDays": 2}));
        let (unit, value) = RETENTION.pick(&options).unwrap();
        assert_eq!(unit.field, "retentionDays");
        assert_eq!(value, &json!(2));
    }

    #[test]
    fn test_pick_skips_null() {
        let options = opts(json!({"expireInHours": null, "expireInMinutes": 3}));
        let (unit, _) = EXPIRATION.pick(&options).unwrap();
        assert_eq!(unit.field, "expireInMinutes");
    }

    #[test]
    fn test_duration_keeps_winning_unit() {
        let cases = [
            (json!({"retentionHours": 1}), "1 hours"),
            (json!({"retentionMinutes": 60}), "60 minutes"),
            (json!({"retentionSeconds": 3600}), "3600 seconds"),
            (json!({"retentionDays": 30}), "30 days"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                RETENTION.duration(&opts(input)).unwrap().as_deref(),
                Some(expected)
            );
        }
    }

    #[test]
    fn test_seconds_equivalent_across_units() {
        let hours = EXPIRATION.seconds(&opts(json!({"expireInHours": 1}))).unwrap();
        let minutes = EXPIRATION.seconds(&opts(json!({"expireInMinutes": 60}))).unwrap();
        let seconds = EXPIRATION.seconds(&opts(json!({"expireInSeconds": 3600}))).unwrap();
        assert_eq!(hours, Some(3600));
        assert_eq!(hours, minutes);
        assert_eq!(minutes, seconds);
    }

    #[test]
    fn test_absent_is_none() {
        assert_eq!(EXPIRATION.seconds(&RawOptions::new()).unwrap(), None);
        assert_eq!(RETENTION.duration(&RawOptions::new()).unwrap(), None);
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        for input in [
            json!({"retentionSeconds": 0}),
            json!({"retentionMinutes": -1}),
            json!({"retentionHours": 1.5}),
            json!({"retentionDays": "2"}),
        ] {
            let err = RETENTION.duration(&opts(input)).unwrap_err();
            assert!(err.message().contains("at least 1"));
        }
    }

    #[test]
    fn test_smaller_unit_still_validated_when_larger_wins() {
        let options = opts(json!({"expireInHours": 1, "expireInSeconds": 0}));
        let err = EXPIRATION.seconds(&options).unwrap_err();
        assert!(err.message().contains("expireInSeconds"));
    }

    #[test]
    fn test_canonical_passthrough() {
        assert_eq!(
            EXPIRATION.seconds(&opts(json!({"expireIn": 90}))).unwrap(),
            Some(90)
        );
        assert!(EXPIRATION.seconds(&opts(json!({"expireIn": 0}))).is_err());
        assert_eq!(
            RETENTION
                .duration(&opts(json!({"keepUntil": "3 days"})))
                .unwrap()
                .as_deref(),
            Some("3 days")
        );
        assert!(RETENTION.duration(&opts(json!({"keepUntil": 5}))).is_err());
    }

    #[test]
    fn test_unit_field_beats_canonical() {
        let options = opts(json!({"expireIn": 90, "expireInMinutes": 2}));
        assert_eq!(EXPIRATION.seconds(&options).unwrap(), Some(120));
    }

    #[test]
    fn test_overflow_rejected() {
        let options = opts(json!({"expireInHours": u64::MAX}));
        assert!(EXPIRATION.seconds(&options).is_err());
    }

    #[test]
    fn test_owned_fields() {
        let fields: Vec<_> = EXPIRATION.owned_fields().collect();
        assert_eq!(
            fields,
            vec!["expireInHours", "expireInMinutes", "expireInSeconds", "expireIn"]
        );
    }
}
