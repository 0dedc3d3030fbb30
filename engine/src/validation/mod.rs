//! Field-level assertions shared by the argument checkers.
//!
//! - `names.rs` - schema/object and queue name validators
//! - `units.rs` - unit cascades (largest unit wins)
//! - `coalesce.rs` - one coalescer per option family

pub mod coalesce;
pub mod names;
pub mod units;

use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::protocol::RawOptions;

/// Field lookup where JSON `null` counts as "not supplied".
#[inline]
pub(crate) fn present<'a>(options: &'a RawOptions, key: &str) -> Option<&'a Value> {
    options.get(key).filter(|value| !value.is_null())
}

/// Whole, non-negative number. `60` and `60.0` both count.
pub(crate) fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

pub(crate) fn integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Number rendered without a trailing `.0` for whole floats.
pub(crate) fn number_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Parse an optional field: absent -> `None`, present -> `parse` or fail with `message`.
pub(crate) fn optional<T>(
    options: &RawOptions,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
    message: &str,
) -> Result<Option<T>> {
    match present(options, key) {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| Error::invalid(message)),
    }
}

pub(crate) fn optional_bool(options: &RawOptions, key: &str) -> Result<Option<bool>> {
    optional(
        options,
        key,
        Value::as_bool,
        &format!("{} must be a boolean", key),
    )
}

/// Remove fields the normalized output owns, leaving the pass-through rest.
pub(crate) fn strip<'a>(options: &mut RawOptions, keys: impl IntoIterator<Item = &'a str>) {
    for key in keys {
        options.remove(key);
    }
}
