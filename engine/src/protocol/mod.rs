//! Input shapes and normalized outputs exchanged with callers and the
//! execution engine.

mod options;
mod types;

pub use options::{
    ConnectionConfig, FetchOptions, QueueOptions, RetryPolicy, SendOptions, SendRequest,
    WorkOptions, WorkRequest,
};
pub use types::{CallArg, Deferred, Defaults, QueueName, RawOptions, SendArgs, WorkArgs};
