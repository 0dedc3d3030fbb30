//! Send checks.
//!
//! Accepts `send(name, data?, options?)` or `send({ name, data, options })`,
//! discriminated by `SendArgs::from_args` before anything else is looked at.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use super::queue::{dead_letter, DEFERRED_FIELDS};
use crate::error::{ensure, Error, Result};
use crate::protocol::{
    CallArg, Defaults, QueueName, RawOptions, SendArgs, SendOptions, SendRequest,
};
use crate::validation::coalesce;
use crate::validation::units::{EXPIRATION, RETENTION, SINGLETON};
use crate::validation::{integer, is_truthy, number_string, optional, present, strip};
use crate::warnings::{WarningKind, Warnings};

#[inline]
fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `startAfter` value for a point in time.
pub fn start_after_date(at: DateTime<Utc>) -> Value {
    Value::String(iso(at))
}

/// Strings are kept verbatim (timestamps built by `start_after_date` are
/// already ISO-8601 UTC), a positive number becomes its string form (delay
/// in seconds), anything else is `None`.
fn start_after(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f > 0.0) => Some(number_string(n)),
        _ => None,
    }
}

/// Validate and normalize a send call against the queue's `defaults`.
pub fn check_send_args<F>(
    args: Vec<CallArg<F>>,
    defaults: &Defaults,
    warnings: &Warnings,
) -> Result<SendRequest> {
    let (name, data, options) = match SendArgs::from_args(args)? {
        SendArgs::Positional {
            name,
            data,
            options,
        } => (Value::String(name), data, options),
        SendArgs::Object { mut job } => (
            job.remove("name").unwrap_or(Value::Null),
            job.remove("data").unwrap_or(Value::Null),
            job.remove("options"),
        ),
    };

    let name = match name {
        Value::String(name) if !name.is_empty() => QueueName::from(name),
        _ => return Err(Error::invalid("send() requires a queue name")),
    };

    let mut options = match options {
        None | Some(Value::Null) => RawOptions::new(),
        Some(Value::Object(options)) => options,
        Some(_) => return Err(Error::invalid("options should be an object")),
    };

    let priority = optional(&options, "priority", integer, "priority must be an integer")?
        .unwrap_or(0);
    let dead_letter = dead_letter(&options)?;

    let retry = coalesce::retry(&options, Some(defaults))?;
    let expire_in = coalesce::expiration(&options, Some(defaults))?;
    let keep_until = coalesce::retention(&options, Some(defaults))?;
    let start_after = start_after(present(&options, "startAfter"));

    let singleton_seconds = coalesce::singleton(&options)?;
    if let (Some(seconds), Some(archive_seconds)) = (singleton_seconds, defaults.archive_seconds) {
        ensure!(
            seconds <= archive_seconds,
            "throttling interval {}s cannot exceed archive interval {}s",
            seconds,
            archive_seconds
        );
    }

    if present(&options, "onComplete").is_some_and(is_truthy) {
        warnings.emit(WarningKind::OnCompleteRemoved, None, false);
    }

    strip(&mut options, DEFERRED_FIELDS.iter().copied());
    strip(&mut options, ["priority", "deadLetter", "startAfter"]);
    strip(&mut options, EXPIRATION.owned_fields());
    strip(&mut options, RETENTION.owned_fields());
    strip(&mut options, SINGLETON.owned_fields());

    debug!(queue = %name, priority, "Send options normalized");

    Ok(SendRequest {
        name,
        data,
        options: SendOptions {
            priority,
            dead_letter,
            retry,
            expire_in,
            keep_until,
            start_after,
            singleton_seconds,
            extra: options,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_start_after_rules() {
        assert_eq!(
            start_after(Some(&json!("2024-01-01T00:00:00Z"))).as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        // Offsets are not rewritten to UTC.
        assert_eq!(
            start_after(Some(&json!("2024-01-01T02:00:00+02:00"))).as_deref(),
            Some("2024-01-01T02:00:00+02:00")
        );
        assert_eq!(start_after(Some(&json!(30))).as_deref(), Some("30"));
        assert_eq!(start_after(Some(&json!(1.5))).as_deref(), Some("1.5"));
        assert_eq!(
            start_after(Some(&json!("5 minutes"))).as_deref(),
            Some("5 minutes")
        );
        assert_eq!(start_after(Some(&json!(0))), None);
        assert_eq!(start_after(Some(&json!(-5))), None);
        assert_eq!(start_after(Some(&json!(true))), None);
        assert_eq!(start_after(None), None);
    }

    #[test]
    fn test_start_after_date() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 30, 0).unwrap();
        assert_eq!(start_after_date(at), json!("2030-06-01T12:30:00.000Z"));
    }
}
