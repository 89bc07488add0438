//! Prelude module for common re-exports.
//!
//! This module provides convenient re-exports of commonly used types
//! so that consumers can do `use chibio_common::prelude::*;` and get
//! the most important types without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use chibio_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;
pub use crate::device_log::sink::{LogSink, MemorySink, TracingSink};
pub use crate::device_log::{CommEvent, DeviceLogger, LoggingError, Severity};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LoggerConfig, SharedConfig};

// ─── Devices ────────────────────────────────────────────────────────
pub use crate::device::{DeviceLookup, DeviceRecord, DeviceTable, NameLookup, NotFoundReason};

// ─── Hardware Channels ──────────────────────────────────────────────
pub use crate::channels::{AdcChannel, LedOutput, Pump, SpectralChannel};
