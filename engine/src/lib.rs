//! jobcheck - argument checks and option normalization for a PostgreSQL
//! job-queue client.
//!
//! Options for connecting, defining queues, sending and consuming jobs arrive
//! partially specified, in several shapes and unit granularities. The
//! checkers here validate them against `POLICY`, collapse every family of
//! unit-suffixed fields into one canonical value, attach queue-level
//! fallbacks for later resolution, and fail fast with `Error::InvalidArgument`.

pub mod checks;
pub mod error;
pub mod policy;
pub mod protocol;
pub mod telemetry;
pub mod validation;
pub mod warnings;

pub use checks::{
    check_delete_args, check_fetch_args, check_insert_args, check_queue_args, check_send_args,
    check_work_args, get_config, get_config_from_env, options_from_env, start_after_date,
};
pub use error::{Error, Result};
pub use policy::{Policy, DEFAULT_SCHEMA, POLICY};
pub use protocol::{
    CallArg, ConnectionConfig, Deferred, Defaults, FetchOptions, QueueName, QueueOptions,
    RawOptions, RetryPolicy, SendArgs, SendOptions, SendRequest, WorkArgs, WorkOptions,
    WorkRequest,
};
pub use validation::names::{assert_postgres_object_name, assert_queue_name};
pub use warnings::{MemorySink, TracingSink, WarningKind, WarningSink, Warnings};
