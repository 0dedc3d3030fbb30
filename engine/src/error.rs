//! Error type for argument and configuration checks.
//!
//! Every check fails fast with `InvalidArgument` on the first violated
//! assertion. There is no partial result and nothing to retry: a failure is
//! a caller bug.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Human-readable diagnostic naming the field and the violated constraint.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(message) => message,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Return `Error::InvalidArgument` with a formatted message unless `$cond` holds.
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::Error::InvalidArgument(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure;
