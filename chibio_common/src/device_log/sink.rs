//! Log sinks.
//!
//! A sink receives the finished text line and performs the emission.
//! [`TracingSink`] forwards to `tracing`; [`MemorySink`] keeps lines in
//! memory for tests and diagnostics.

use super::Severity;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::field;

/// `tracing` target used for device log lines.
pub const DEVICE_LOG_TARGET: &str = "chibio::device";

/// Destination for formatted device log lines.
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, text: &str, include_trace: bool);
}

impl<F> LogSink for F
where
    F: Fn(Severity, &str, bool) + Send + Sync,
{
    fn emit(&self, severity: Severity, text: &str, include_trace: bool) {
        self(severity, text, include_trace)
    }
}

// ─── TracingSink ────────────────────────────────────────────────────

/// Sink emitting through the `tracing` macros.
///
/// `Critical` maps to `ERROR` with `fatal = true`. A backtrace is attached
/// only when requested and captured (see `RUST_BACKTRACE`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, text: &str, include_trace: bool) {
        let backtrace = include_trace
            .then(Backtrace::capture)
            .filter(|bt| bt.status() == BacktraceStatus::Captured);
        let backtrace = backtrace.as_ref().map(field::display);

        match severity {
            Severity::Debug => {
                tracing::debug!(target: DEVICE_LOG_TARGET, backtrace, "{text}")
            }
            Severity::Info => {
                tracing::info!(target: DEVICE_LOG_TARGET, backtrace, "{text}")
            }
            Severity::Warning => {
                tracing::warn!(target: DEVICE_LOG_TARGET, backtrace, "{text}")
            }
            Severity::Critical => {
                tracing::error!(target: DEVICE_LOG_TARGET, fatal = true, backtrace, "{text}")
            }
        }
    }
}

// ─── MemorySink ─────────────────────────────────────────────────────

/// One line as received by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedLine {
    pub severity: Severity,
    pub text: String,
    pub include_trace: bool,
}

/// Sink that records every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<EmittedLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded lines.
    pub fn lines(&self) -> Vec<EmittedLine> {
        self.guard().clone()
    }

    /// Drain the recorded lines.
    pub fn take(&self) -> Vec<EmittedLine> {
        std::mem::take(&mut *self.guard())
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> MutexGuard<'_, Vec<EmittedLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn emit(&self, severity: Severity, text: &str, include_trace: bool) {
        self.guard().push(EmittedLine {
            severity,
            text: text.to_string(),
            include_trace,
        });
    }
}
