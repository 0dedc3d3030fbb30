//! Structured logging setup.
//!
//! Filter comes from `RUST_LOG` (default: `info`). Safe to call more than
//! once; only the first call installs a subscriber.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
