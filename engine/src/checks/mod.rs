//! Argument checkers - the public entry points.
//!
//! ## Module Organization
//!
//! - `config.rs` - `get_config`, environment-backed options
//! - `queue.rs` - `check_queue_args`
//! - `send.rs` - `check_send_args`, `startAfter` normalization
//! - `work.rs` - `check_work_args`, `check_fetch_args`
//! - `jobs.rs` - `check_delete_args`, `check_insert_args`
//!
//! Every checker is a single synchronous pass: the first violated assertion
//! returns `Error::InvalidArgument` and nothing else is evaluated.

mod config;
mod jobs;
mod queue;
mod send;
mod work;

#[cfg(test)]
mod tests;

pub use config::{get_config, get_config_from_env, options_from_env, options_from_lookup, ENV_OPTIONS};
pub use jobs::{check_delete_args, check_insert_args};
pub use queue::check_queue_args;
pub use send::{check_send_args, start_after_date};
pub use work::{check_fetch_args, check_work_args};
