//! Process-wide device logger.
//!
//! Legacy entry points for code that cannot thread a [`DeviceLogger`]
//! through its call graph. New code should hold a `DeviceLogger` directly.
//!
//! The global slot is set once by [`init`]; every logging call made before
//! that returns [`LoggingError::NotInitialized`] without touching any sink.

use super::{DeviceLogger, LoggingError, Severity};
use core::fmt;
use std::sync::OnceLock;

/// A write-once holder for a [`DeviceLogger`].
#[derive(Debug, Default)]
pub struct LoggerSlot {
    logger: OnceLock<DeviceLogger>,
}

impl LoggerSlot {
    pub const fn new() -> Self {
        Self {
            logger: OnceLock::new(),
        }
    }

    /// Install the logger.
    ///
    /// # Errors
    /// Returns `LoggingError::AlreadyInitialized` if a logger is already set.
    pub fn init(&self, logger: DeviceLogger) -> Result<(), LoggingError> {
        self.logger
            .set(logger)
            .map_err(|_| LoggingError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.logger.get().is_some()
    }

    /// The installed logger.
    ///
    /// # Errors
    /// Returns `LoggingError::NotInitialized` before [`init`](Self::init).
    pub fn get(&self) -> Result<&DeviceLogger, LoggingError> {
        self.logger.get().ok_or(LoggingError::NotInitialized)
    }

    pub fn log_device_event(
        &self,
        level: Severity,
        device_id: &str,
        message: &str,
        include_trace: bool,
    ) -> Result<(), LoggingError> {
        let logger = self.get()?;
        if include_trace {
            logger.log_device_event_with_trace(level, device_id, message);
        } else {
            logger.log_device_event(level, device_id, message);
        }
        Ok(())
    }

    pub fn log_hardware_failure(
        &self,
        device_id: &str,
        component: &str,
        attempts: i64,
        fatal: bool,
        include_trace: bool,
    ) -> Result<(), LoggingError> {
        let logger = self.get()?;
        if include_trace {
            logger.log_hardware_failure_with_trace(device_id, component, attempts, fatal);
        } else {
            logger.log_hardware_failure(device_id, component, attempts, fatal);
        }
        Ok(())
    }

    pub fn log_comm_event(
        &self,
        device_id: &str,
        component: &str,
        event: impl fmt::Display,
        details: &str,
        level: Severity,
    ) -> Result<(), LoggingError> {
        self.get()?.log_comm_event(device_id, component, event, details, level);
        Ok(())
    }

    pub fn log_measurement(
        &self,
        device_id: &str,
        sensor: &str,
        value: impl fmt::Display,
        unit: &str,
        level: Severity,
    ) -> Result<(), LoggingError> {
        self.get()?.log_measurement(device_id, sensor, value, unit, level);
        Ok(())
    }
}

// ─── Process-wide shims ─────────────────────────────────────────────

static GLOBAL_LOGGER: LoggerSlot = LoggerSlot::new();

/// Install the process-wide logger.
pub fn init(logger: DeviceLogger) -> Result<(), LoggingError> {
    GLOBAL_LOGGER.init(logger)
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.is_initialized()
}

/// See [`DeviceLogger::log_device_event`].
pub fn log_device_event(
    level: Severity,
    device_id: &str,
    message: &str,
    include_trace: bool,
) -> Result<(), LoggingError> {
    GLOBAL_LOGGER.log_device_event(level, device_id, message, include_trace)
}

/// See [`DeviceLogger::log_hardware_failure`].
pub fn log_hardware_failure(
    device_id: &str,
    component: &str,
    attempts: i64,
    fatal: bool,
    include_trace: bool,
) -> Result<(), LoggingError> {
    GLOBAL_LOGGER.log_hardware_failure(device_id, component, attempts, fatal, include_trace)
}

/// See [`DeviceLogger::log_comm_event`].
pub fn log_comm_event(
    device_id: &str,
    component: &str,
    event: impl fmt::Display,
    details: &str,
    level: Severity,
) -> Result<(), LoggingError> {
    GLOBAL_LOGGER.log_comm_event(device_id, component, event, details, level)
}

/// See [`DeviceLogger::log_measurement`].
pub fn log_measurement(
    device_id: &str,
    sensor: &str,
    value: impl fmt::Display,
    unit: &str,
    level: Severity,
) -> Result<(), LoggingError> {
    GLOBAL_LOGGER.log_measurement(device_id, sensor, value, unit, level)
}
