//! Non-fatal diagnostics.
//!
//! Each warning kind is emitted at most once per `Warnings` instance unless
//! the emission is forced. The instance is owned by the runtime that
//! constructs it, so its lifetime (and the "already warned" state) ends with
//! that runtime rather than with the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    ClockSkew,
    CronDisabled,
    OnCompleteRemoved,
}

impl WarningKind {
    pub const ALL: [Self; 3] = [Self::ClockSkew, Self::CronDisabled, Self::OnCompleteRemoved];

    /// Stable code attached to every emission.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ClockSkew => "pg-boss-w02",
            Self::CronDisabled => "pg-boss-w03",
            Self::OnCompleteRemoved => "pg-boss-w04",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ClockSkew => {
                "Timekeeper detected clock skew between this instance and the database server. \
                 This will not affect scheduling operations, but this warning is shown any time \
                 the skew exceeds 60 seconds."
            }
            Self::CronDisabled => {
                "Archive interval is set less than 60s. Cron processing is disabled."
            }
            Self::OnCompleteRemoved => {
                "'onComplete' option detected. This option has been removed. \
                 Consider deadLetter if needed."
            }
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::ClockSkew => 0,
            Self::CronDisabled => 1,
            Self::OnCompleteRemoved => 2,
        }
    }
}

/// Destination for emitted warnings.
pub trait WarningSink: Send + Sync {
    fn emit(&self, message: &str, code: &str);
}

/// Default sink: structured `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn emit(&self, message: &str, code: &str) {
        warn!(code = %code, "{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedWarning {
    pub code: String,
    pub message: String,
}

/// Sink that records emissions in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<EmittedWarning>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<EmittedWarning> {
        self.entries.lock().clone()
    }

    /// Number of emissions carrying `code`.
    pub fn count(&self, code: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.code == code)
            .count()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl WarningSink for MemorySink {
    fn emit(&self, message: &str, code: &str) {
        self.entries.lock().push(EmittedWarning {
            code: code.to_string(),
            message: message.to_string(),
        });
    }
}

/// Per-kind "already warned" registry plus the sink emissions go to.
///
/// Flags are relaxed atomics: two threads racing on the same kind may both
/// emit, which is harmless for an advisory channel.
pub struct Warnings {
    warned: [AtomicBool; 3],
    sink: Arc<dyn WarningSink>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn WarningSink>) -> Self {
        Self {
            warned: [
                AtomicBool::new(false),
                AtomicBool::new(false),
                AtomicBool::new(false),
            ],
            sink,
        }
    }

    /// Emit `kind` with an optional detail. Returns whether anything was emitted.
    pub fn emit(&self, kind: WarningKind, detail: Option<&str>, force: bool) -> bool {
        let already_warned = self.warned[kind.index()].swap(true, Ordering::Relaxed);
        if already_warned && !force {
            return false;
        }

        let message = match detail {
            Some(detail) if !detail.is_empty() => format!("{} {}", kind.message(), detail),
            _ => kind.message().to_string(),
        };
        self.sink.emit(&message, kind.code());
        true
    }

    pub fn has_warned(&self, kind: WarningKind) -> bool {
        self.warned[kind.index()].load(Ordering::Relaxed)
    }

    /// Clock skew recurs legitimately, so it is always emitted.
    pub fn warn_clock_skew(&self, detail: &str) {
        self.emit(WarningKind::ClockSkew, Some(detail), true);
    }
}

impl Default for Warnings {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Warnings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for kind in WarningKind::ALL {
            list.entry(&kind.code(), &self.has_warned(kind));
        }
        list.finish()
    }
}
