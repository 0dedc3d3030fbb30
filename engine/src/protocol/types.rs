//! Caller-facing input shapes.
//!
//! Contains RawOptions, the call-shape variants for send/work, Deferred and
//! the per-queue Defaults a call is checked against.

use compact_str::CompactString;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Open-ended field name -> value mapping, exactly as the caller supplied it.
pub type RawOptions = Map<String, Value>;

/// Validated queue name.
pub type QueueName = CompactString;

/// One positional argument of a `send`/`work` call.
///
/// Handlers are opaque to this crate; they are only carried through.
#[derive(Debug, Clone)]
pub enum CallArg<F> {
    Value(Value),
    Function(F),
}

impl<F> From<Value> for CallArg<F> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Call shape of `send`, discriminated before any field is validated.
#[derive(Debug, Clone, PartialEq)]
pub enum SendArgs {
    /// `send(name, data?, options?)`
    Positional {
        name: String,
        data: Value,
        options: Option<Value>,
    },
    /// `send({ name, data, options })`
    Object { job: RawOptions },
}

impl SendArgs {
    pub fn from_args<F>(args: Vec<CallArg<F>>) -> Result<Self> {
        let total = args.len();
        let mut args = args.into_iter();

        match args.next() {
            Some(CallArg::Value(Value::String(name))) => {
                let data = match args.next() {
                    None => Value::Null,
                    Some(CallArg::Value(data)) => data,
                    Some(CallArg::Function(_)) => {
                        return Err(Error::invalid(
                            "send() cannot accept a function as the payload. Did you intend to use work()?",
                        ))
                    }
                };
                let options = match args.next() {
                    None => None,
                    Some(CallArg::Value(options)) => Some(options),
                    Some(CallArg::Function(_)) => {
                        return Err(Error::invalid("options should be an object"))
                    }
                };
                Ok(Self::Positional {
                    name,
                    data,
                    options,
                })
            }
            Some(CallArg::Value(Value::Object(job))) => {
                if total != 1 {
                    return Err(Error::invalid("send object API only accepts 1 argument"));
                }
                Ok(Self::Object { job })
            }
            Some(CallArg::Value(Value::Null)) => {
                if total != 1 {
                    return Err(Error::invalid("send object API only accepts 1 argument"));
                }
                Err(Error::invalid("send() requires a job object"))
            }
            _ => Err(Error::invalid("send() requires a queue name")),
        }
    }
}

/// Call shape of `work`: `(callback)` or `(options, callback)`.
#[derive(Debug, Clone)]
pub enum WorkArgs<F> {
    Callback(F),
    WithOptions(RawOptions, F),
}

impl<F> WorkArgs<F> {
    pub fn from_args(args: Vec<CallArg<F>>) -> Result<Self> {
        let mut args = args.into_iter();

        match (args.next(), args.next()) {
            (Some(CallArg::Function(callback)), None) => Ok(Self::Callback(callback)),
            (Some(options), Some(CallArg::Function(callback))) => {
                let options = match options {
                    CallArg::Value(Value::Object(options)) => options,
                    CallArg::Value(Value::Null) => RawOptions::new(),
                    _ => return Err(Error::invalid("expected config to be an object")),
                };
                Ok(Self::WithOptions(options, callback))
            }
            _ => Err(Error::invalid("expected callback to be a function")),
        }
    }

    pub fn into_parts(self) -> (RawOptions, F) {
        match self {
            Self::Callback(callback) => (RawOptions::new(), callback),
            Self::WithOptions(options, callback) => (options, callback),
        }
    }
}

/// An option value paired with the fallback it inherits from the queue or
/// instance level. The fallback is carried, never merged, by the checkers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<T> {
    pub value: Option<T>,
    pub fallback: Option<T>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self {
            value: None,
            fallback: None,
        }
    }
}

impl<T> Deferred<T> {
    #[inline]
    pub fn new(value: Option<T>, fallback: Option<T>) -> Self {
        Self { value, fallback }
    }

    #[inline]
    pub fn explicit(value: T) -> Self {
        Self {
            value: Some(value),
            fallback: None,
        }
    }

    /// Final value: explicit, else fallback, else `global`.
    pub fn resolve(self, global: T) -> T {
        self.value.or(self.fallback).unwrap_or(global)
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl<T: Clone + Into<Value>> Deferred<T> {
    /// Write `key` (null when unset) and `default_key` (only when a fallback exists).
    pub(crate) fn write_to(&self, map: &mut RawOptions, key: &str, default_key: &str) {
        map.insert(
            key.to_string(),
            self.value.clone().map_or(Value::Null, Into::into),
        );
        if let Some(fallback) = &self.fallback {
            map.insert(default_key.to_string(), fallback.clone().into());
        }
    }
}

/// Queue- or instance-level values a send/work call falls back to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Archive interval; throttling windows may not exceed it.
    pub archive_seconds: Option<u64>,
    pub expire_in: Option<u64>,
    pub keep_until: Option<String>,
    pub retry_delay: Option<u64>,
    pub retry_limit: Option<u64>,
    pub retry_backoff: Option<bool>,
    /// Polling interval in milliseconds.
    pub polling_interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Handler = fn();

    fn noop() {}

    fn values(items: Vec<Value>) -> Vec<CallArg<Handler>> {
        items.into_iter().map(CallArg::Value).collect()
    }

    #[test]
    fn test_send_args_positional() {
        let args = SendArgs::from_args(values(vec![json!("q1"), json!({"x": 1})])).unwrap();
        assert_eq!(
            args,
            SendArgs::Positional {
                name: "q1".to_string(),
                data: json!({"x": 1}),
                options: None,
            }
        );
    }

    #[test]
    fn test_send_args_object() {
        let args = SendArgs::from_args(values(vec![json!({"name": "q1"})])).unwrap();
        assert!(matches!(args, SendArgs::Object { .. }));
    }

    #[test]
    fn test_send_args_object_rejects_extra_argument() {
        let err = SendArgs::from_args(values(vec![json!({"name": "q1"}), json!("extra")]))
            .unwrap_err();
        assert!(err.message().contains("only accepts 1 argument"));
    }

    #[test]
    fn test_send_args_rejects_function_payload() {
        let args: Vec<CallArg<Handler>> =
            vec![CallArg::Value(json!("q1")), CallArg::Function(noop as Handler)];
        let err = SendArgs::from_args(args).unwrap_err();
        assert!(err.message().contains("work()"));
    }

    #[test]
    fn test_send_args_requires_name() {
        assert!(SendArgs::from_args(values(vec![])).is_err());
        assert!(SendArgs::from_args(values(vec![json!(42)])).is_err());
        let err = SendArgs::from_args(values(vec![Value::Null])).unwrap_err();
        assert!(err.message().contains("job object"));
    }

    #[test]
    fn test_work_args_shapes() {
        let only: Vec<CallArg<Handler>> = vec![CallArg::Function(noop as Handler)];
        assert!(matches!(WorkArgs::from_args(only), Ok(WorkArgs::Callback(_))));

        let both: Vec<CallArg<Handler>> = vec![
            CallArg::Value(json!({"batchSize": 2})),
            CallArg::Function(noop as Handler),
        ];
        let (options, _) = WorkArgs::from_args(both).unwrap().into_parts();
        assert_eq!(options.get("batchSize"), Some(&json!(2)));

        let null_options: Vec<CallArg<Handler>> =
            vec![CallArg::Value(Value::Null), CallArg::Function(noop as Handler)];
        let (options, _) = WorkArgs::from_args(null_options).unwrap().into_parts();
        assert!(options.is_empty());
    }

    #[test]
    fn test_work_args_requires_callback() {
        assert!(WorkArgs::<Handler>::from_args(vec![]).is_err());
        assert!(WorkArgs::<Handler>::from_args(values(vec![json!({})])).is_err());
        assert!(WorkArgs::<Handler>::from_args(values(vec![json!({}), json!({})])).is_err());

        let bad_options: Vec<CallArg<Handler>> =
            vec![CallArg::Value(json!("nope")), CallArg::Function(noop as Handler)];
        let err = WorkArgs::from_args(bad_options).unwrap_err();
        assert_eq!(err.message(), "expected config to be an object");
    }

    #[test]
    fn test_deferred_resolve_order() {
        assert_eq!(Deferred::new(Some(1), Some(2)).resolve(3), 1);
        assert_eq!(Deferred::new(None, Some(2)).resolve(3), 2);
        assert_eq!(Deferred::<u64>::default().resolve(3), 3);
        assert!(Deferred::explicit(5).is_set());
    }

    #[test]
    fn test_deferred_write_to() {
        let mut map = RawOptions::new();
        Deferred::new(None, Some(30u64)).write_to(&mut map, "expireIn", "expireInDefault");
        assert_eq!(map.get("expireIn"), Some(&Value::Null));
        assert_eq!(map.get("expireInDefault"), Some(&json!(30)));

        let mut map = RawOptions::new();
        Deferred::explicit("1 days".to_string()).write_to(&mut map, "keepUntil", "keepUntilDefault");
        assert_eq!(map.get("keepUntil"), Some(&json!("1 days")));
        assert!(!map.contains_key("keepUntilDefault"));
    }
}
