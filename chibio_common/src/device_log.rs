//! Device-aware log formatting.
//!
//! [`DeviceLogger`] turns a log request about a reactor module into one
//! text line of the form `"{message} on {device_id} ({display_name})"` and
//! hands it to a [`LogSink`](sink::LogSink) at the requested [`Severity`].
//! The display name comes from the shared device table; when it cannot be
//! resolved the line degrades to `"{message} on {device_id}"`.
//!
//! Both dependencies are injected at construction and fixed for the
//! logger's lifetime. The process-wide variant lives in [`global`].

pub mod global;
pub mod sink;

use crate::device::{DeviceLookup, NameLookup, NotFoundReason};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use sink::{LogSink, TracingSink};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the process-wide logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoggingError {
    /// A logging call was made before `init`.
    #[error("device logger used before initialization")]
    NotInitialized,

    /// `init` was called more than once.
    #[error("device logger already initialized")]
    AlreadyInitialized,
}

// ─── Severity ───────────────────────────────────────────────────────

/// Log severity, ordered `Debug < Info < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warning,
    /// Unrecoverable hardware condition.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// `tracing` level a line of this severity is emitted at.
impl From<Severity> for tracing::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Warning => tracing::Level::WARN,
            Severity::Critical => tracing::Level::ERROR,
        }
    }
}

/// Unrecognised severity name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity: {0:?}, expected debug, info, warning or critical")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "critical" | "fatal" => Ok(Self::Critical),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

// ─── CommEvent ──────────────────────────────────────────────────────

/// Common transient communication outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommEvent {
    Success,
    Retry,
    Timeout,
}

impl fmt::Display for CommEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Retry => write!(f, "retry"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

// ─── DeviceLogger ───────────────────────────────────────────────────

/// Formats device log lines and dispatches them to a sink.
///
/// Cheap to clone; every clone shares the same sink and table.
#[derive(Clone)]
pub struct DeviceLogger {
    sink: Arc<dyn LogSink>,
    table: Option<Arc<dyn DeviceLookup>>,
}

impl DeviceLogger {
    /// Bind a logger to a sink and a device table.
    pub fn new(sink: Arc<dyn LogSink>, table: Arc<dyn DeviceLookup>) -> Self {
        Self {
            sink,
            table: Some(table),
        }
    }

    /// Logger with no device table; every line uses the bare identifier.
    pub fn without_table(sink: Arc<dyn LogSink>) -> Self {
        Self { sink, table: None }
    }

    /// Logger emitting through `tracing`.
    pub fn tracing(table: Arc<dyn DeviceLookup>) -> Self {
        Self::new(Arc::new(TracingSink), table)
    }

    /// Resolve the display name for `device_id`.
    pub fn lookup(&self, device_id: &str) -> NameLookup {
        match &self.table {
            Some(table) => table.display_name(device_id),
            None => NameLookup::NotFound(NotFoundReason::NoTable),
        }
    }

    /// Render `message` with the device suffix.
    pub fn format_device_message(&self, device_id: &str, message: &str) -> String {
        match self.lookup(device_id) {
            NameLookup::Found(name) => format!("{message} on {device_id} ({name})"),
            NameLookup::NotFound(_) => format!("{message} on {device_id}"),
        }
    }

    /// Log a device event.
    pub fn log_device_event(&self, level: Severity, device_id: &str, message: &str) {
        self.dispatch(level, device_id, message, false);
    }

    /// Log a device event with backtrace context when available.
    pub fn log_device_event_with_trace(&self, level: Severity, device_id: &str, message: &str) {
        self.dispatch(level, device_id, message, true);
    }

    /// Log a hardware communication failure.
    ///
    /// `Critical` when `fatal`, otherwise `Warning`, whatever `attempts` is.
    pub fn log_hardware_failure(
        &self,
        device_id: &str,
        component: &str,
        attempts: i64,
        fatal: bool,
    ) {
        self.hardware_failure(device_id, component, attempts, fatal, false);
    }

    /// [`log_hardware_failure`](Self::log_hardware_failure) with backtrace context.
    pub fn log_hardware_failure_with_trace(
        &self,
        device_id: &str,
        component: &str,
        attempts: i64,
        fatal: bool,
    ) {
        self.hardware_failure(device_id, component, attempts, fatal, true);
    }

    /// Log a transient communication event such as a success, retry or timeout.
    ///
    /// `details` is appended after a colon only when non-empty.
    pub fn log_comm_event(
        &self,
        device_id: &str,
        component: &str,
        event: impl fmt::Display,
        details: &str,
        level: Severity,
    ) {
        let message = if details.is_empty() {
            format!("{component} {event}")
        } else {
            format!("{component} {event}: {details}")
        };
        self.dispatch(level, device_id, &message, false);
    }

    /// [`log_comm_event`](Self::log_comm_event) at `Debug` with no details.
    pub fn comm_debug(&self, device_id: &str, component: &str, event: impl fmt::Display) {
        self.log_comm_event(device_id, component, event, "", Severity::Debug);
    }

    /// Log a sensor measurement.
    ///
    /// `unit` is separated from the value by one space, and omitted when empty.
    pub fn log_measurement(
        &self,
        device_id: &str,
        sensor: &str,
        value: impl fmt::Display,
        unit: &str,
        level: Severity,
    ) {
        let message = if unit.is_empty() {
            format!("{sensor} measurement: {value}")
        } else {
            format!("{sensor} measurement: {value} {unit}")
        };
        self.dispatch(level, device_id, &message, false);
    }

    /// [`log_measurement`](Self::log_measurement) at `Debug`.
    pub fn measurement_debug(
        &self,
        device_id: &str,
        sensor: &str,
        value: impl fmt::Display,
        unit: &str,
    ) {
        self.log_measurement(device_id, sensor, value, unit, Severity::Debug);
    }

    fn hardware_failure(
        &self,
        device_id: &str,
        component: &str,
        attempts: i64,
        fatal: bool,
        include_trace: bool,
    ) {
        let level = if fatal {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let message = format!("Failed to communicate to {component} {attempts} times");
        self.dispatch(level, device_id, &message, include_trace);
    }

    fn dispatch(&self, level: Severity, device_id: &str, message: &str, include_trace: bool) {
        let text = self.format_device_message(device_id, message);
        self.sink.emit(level, &text, include_trace);
    }
}

impl fmt::Debug for DeviceLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceLogger")
            .field("has_table", &self.table.is_some())
            .finish_non_exhaustive()
    }
}
