//! Chi.Bio Common Library
//!
//! This crate provides the hardware channel tables and the device-aware
//! logging helpers shared by the Chi.Bio control workspace.
//!
//! # Module Structure
//!
//! - [`channels`] - Named LED, pump and AS7341 sensor channels
//! - [`device`] - Shared device-state table and display-name lookup
//! - [`device_log`] - Device log formatter, sinks and the legacy global logger
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chibio_common::prelude::*;
//!
//! let table = Arc::new(DeviceTable::new());
//! table.set_display_name("M0", "Reactor1");
//!
//! let logger = DeviceLogger::tracing(table);
//! logger.log_device_event(Severity::Info, "M0", "LED calibration completed");
//! logger.log_hardware_failure("M1", "Multiplexer", 5, false);
//! ```

pub mod channels;
pub mod config;
pub mod device;
pub mod device_log;
pub mod prelude;
