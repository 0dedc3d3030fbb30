//! Queue definition checks.

use tracing::debug;

use crate::error::Result;
use crate::protocol::{QueueOptions, RawOptions};
use crate::validation::coalesce;
use crate::validation::names::assert_queue_name;
use crate::validation::units::{EXPIRATION, RETENTION};
use crate::validation::{optional, strip};

/// Retry fields plus every `*Default` annotation the checkers write.
pub(crate) const DEFERRED_FIELDS: &[&str] = &[
    "retryDelay",
    "retryLimit",
    "retryBackoff",
    "retryDelayDefault",
    "retryLimitDefault",
    "retryBackoffDefault",
    "expireInDefault",
    "keepUntilDefault",
];

pub(crate) fn dead_letter(options: &RawOptions) -> Result<Option<String>> {
    optional(
        options,
        "deadLetter",
        |value| value.as_str().map(str::to_string),
        "deadLetter must be a string",
    )
}

/// Normalize the options of a queue definition.
pub fn check_queue_args(name: &str, options: Option<&RawOptions>) -> Result<QueueOptions> {
    assert_queue_name(name)?;

    let mut extra = options.cloned().unwrap_or_default();

    let dead_letter = dead_letter(&extra)?;
    let retry = coalesce::retry(&extra, None)?;
    let expire_in = coalesce::expiration(&extra, None)?;
    let keep_until = coalesce::retention(&extra, None)?;

    strip(&mut extra, DEFERRED_FIELDS.iter().copied());
    strip(&mut extra, ["deadLetter"]);
    strip(&mut extra, EXPIRATION.owned_fields());
    strip(&mut extra, RETENTION.owned_fields());

    debug!(queue = %name, "Queue options normalized");

    Ok(QueueOptions {
        dead_letter,
        retry,
        expire_in,
        keep_until,
        extra,
    })
}
