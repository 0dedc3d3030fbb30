//! Consumer checks for `work` and `fetch`.

use serde_json::Value;
use tracing::debug;

use crate::error::{ensure, Result};
use crate::policy::DEFAULT_BATCH_SIZE;
use crate::protocol::{CallArg, Defaults, FetchOptions, RawOptions, WorkArgs, WorkOptions, WorkRequest};
use crate::validation::coalesce::{self, POLLING_INTERVAL, POLLING_INTERVAL_SECONDS};
use crate::validation::{optional, optional_bool, strip, whole_number};

/// Per-call options shared by work and fetch.
struct ConsumerOptions {
    batch_size: u64,
    include_metadata: Option<bool>,
    priority: Option<bool>,
}

fn consumer_options(options: &RawOptions) -> Result<ConsumerOptions> {
    let batch_size = optional(
        options,
        "batchSize",
        |value| whole_number(value).filter(|n| *n >= 1),
        "batchSize must be an integer > 0",
    )?
    .unwrap_or(DEFAULT_BATCH_SIZE);

    Ok(ConsumerOptions {
        batch_size,
        include_metadata: optional_bool(options, "includeMetadata")?,
        priority: optional_bool(options, "priority")?,
    })
}

/// Validate `work(name, callback)` / `work(name, options, callback)`.
pub fn check_work_args<F>(
    name: &str,
    args: Vec<CallArg<F>>,
    defaults: &Defaults,
) -> Result<WorkRequest<F>> {
    ensure!(!name.is_empty(), "missing job name");

    let (mut options, callback) = WorkArgs::from_args(args)?.into_parts();

    let polling_interval = coalesce::polling_interval(&options, Some(defaults))?;
    let consumer = consumer_options(&options)?;

    strip(
        &mut options,
        [
            POLLING_INTERVAL,
            POLLING_INTERVAL_SECONDS,
            "batchSize",
            "includeMetadata",
            "priority",
        ],
    );

    debug!(
        queue = %name,
        polling_interval,
        batch_size = consumer.batch_size,
        "Work options normalized"
    );

    Ok(WorkRequest {
        options: WorkOptions {
            polling_interval,
            batch_size: consumer.batch_size,
            include_metadata: consumer.include_metadata,
            priority: consumer.priority,
            extra: options,
        },
        callback,
    })
}

/// Validate fetch options in place; `batchSize` is filled in when absent.
pub fn check_fetch_args(name: &str, options: &mut RawOptions) -> Result<FetchOptions> {
    ensure!(!name.is_empty(), "missing queue name");

    let consumer = consumer_options(options)?;
    let ignore_start_after = optional_bool(options, "ignoreStartAfter")?;

    options.insert("batchSize".to_string(), Value::from(consumer.batch_size));

    Ok(FetchOptions {
        batch_size: consumer.batch_size,
        include_metadata: consumer.include_metadata,
        priority: consumer.priority,
        ignore_start_after,
    })
}
