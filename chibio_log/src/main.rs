//! # Chi.Bio device log tool
//!
//! Emits one formatted device log line through `tracing`, resolving display
//! names from a device table loaded from TOML. Useful for checking log
//! routing and filters on a bench setup without the control application.
//!
//! # Usage
//!
//! ```bash
//! # Device event with names from a config file
//! chibio_log --config chibio.toml event --level info --device M0 "LED calibration completed"
//!
//! # Fatal hardware failure, JSON output
//! chibio_log --json failure --device M1 --component Multiplexer --attempts 5 --fatal
//!
//! # Print the hardware channel tables
//! chibio_log channels
//! ```

#![deny(warnings)]

use chibio_common::channels::{
    AS7341_ADCS, AS7341_CHANNELS, AS7341_SPECTRUM_BANDS, LED_OUTPUTS_WITH_LASER, PUMPS,
    PWM_LED_OUTPUTS, VIRTUAL_LED_OUTPUTS,
};
use chibio_common::config::{ConfigLoader, LoggerConfig};
use chibio_common::device_log::sink::DEVICE_LOG_TARGET;
use chibio_common::device_log::{DeviceLogger, Severity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};

/// Chi.Bio device log tool - emit formatted device log lines
#[derive(Parser, Debug)]
#[command(name = "chibio_log")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Emit formatted Chi.Bio device log lines")]
#[command(long_about = None)]
struct Args {
    /// Path to a TOML file with `[shared]` and `[devices.*]` sections.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (overrides the configured level)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log a device event
    Event {
        /// Severity: debug, info, warning or critical
        #[arg(short, long, default_value = "info")]
        level: Severity,
        #[arg(short, long)]
        device: String,
        message: String,
        /// Attach a backtrace when one is available
        #[arg(long)]
        trace: bool,
    },

    /// Log a hardware communication failure
    Failure {
        #[arg(short, long)]
        device: String,
        #[arg(long)]
        component: String,
        #[arg(long, allow_hyphen_values = true)]
        attempts: i64,
        /// Log at critical instead of warning
        #[arg(long)]
        fatal: bool,
        #[arg(long)]
        trace: bool,
    },

    /// Log a communication event (success, retry, timeout, ...)
    Comm {
        #[arg(short, long)]
        device: String,
        #[arg(long)]
        component: String,
        #[arg(long)]
        event: String,
        #[arg(long, default_value = "")]
        details: String,
        #[arg(short, long, default_value = "debug")]
        level: Severity,
    },

    /// Log a sensor measurement
    Measure {
        #[arg(short, long)]
        device: String,
        #[arg(long)]
        sensor: String,
        #[arg(long, allow_hyphen_values = true)]
        value: String,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(short, long, default_value = "debug")]
        level: Severity,
    },

    /// Print the hardware channel tables
    Channels,
}

impl Command {
    /// Severity of the line this command emits, if any.
    fn severity(&self) -> Option<Severity> {
        match self {
            Self::Event { level, .. } => Some(*level),
            Self::Failure { fatal: true, .. } => Some(Severity::Critical),
            Self::Failure { fatal: false, .. } => Some(Severity::Warning),
            Self::Comm { level, .. } | Self::Measure { level, .. } => Some(*level),
            Self::Channels => None,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        eprintln!("chibio_log: {e}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LoggerConfig::load(path)?,
        None => LoggerConfig::default(),
    };
    config.validate()?;

    let base = if args.verbose {
        Level::DEBUG
    } else {
        config.shared.log_level.into()
    };
    let device_level = device_filter_level(base, args.command.severity());
    setup_tracing(base, device_level, args.json)?;
    debug!(
        "{} loaded {} device(s)",
        config.shared.service_name,
        config.devices.len()
    );

    let logger = DeviceLogger::tracing(Arc::new(config.devices));

    match args.command {
        Command::Event {
            level,
            device,
            message,
            trace,
        } => {
            if trace {
                logger.log_device_event_with_trace(level, &device, &message);
            } else {
                logger.log_device_event(level, &device, &message);
            }
        }
        Command::Failure {
            device,
            component,
            attempts,
            fatal,
            trace,
        } => {
            if trace {
                logger.log_hardware_failure_with_trace(&device, &component, attempts, fatal);
            } else {
                logger.log_hardware_failure(&device, &component, attempts, fatal);
            }
        }
        Command::Comm {
            device,
            component,
            event,
            details,
            level,
        } => logger.log_comm_event(&device, &component, &event, &details, level),
        Command::Measure {
            device,
            sensor,
            value,
            unit,
            level,
        } => logger.log_measurement(&device, &sensor, &value, &unit, level),
        Command::Channels => print_channels(),
    }

    Ok(())
}

fn print_channels() {
    let tables: [(&str, &[&str]); 7] = [
        ("LED outputs", LED_OUTPUTS_WITH_LASER),
        ("PWM LEDs", PWM_LED_OUTPUTS),
        ("Virtual LEDs", VIRTUAL_LED_OUTPUTS),
        ("Pumps", PUMPS),
        ("AS7341 channels", AS7341_CHANNELS),
        ("AS7341 spectrum", AS7341_SPECTRUM_BANDS),
        ("AS7341 ADCs", AS7341_ADCS),
    ];
    for (label, names) in tables {
        println!("{label:<16} {}", names.join(" "));
    }
}

/// Filter level for the device log target.
///
/// Never less verbose than the line being emitted, so the requested line
/// always passes the filter.
fn device_filter_level(base: Level, emitted: Option<Severity>) -> Level {
    match emitted {
        // `Level` orders TRACE as the greatest, i.e. most verbose.
        Some(severity) => base.max(severity.into()),
        None => base,
    }
}

/// Directive enabling `level` for device log lines.
fn device_directive(level: Level) -> Result<Directive, ParseError> {
    let level = level.as_str().to_ascii_lowercase();
    format!("{DEVICE_LOG_TARGET}={level}").parse()
}

/// Setup tracing subscriber based on CLI arguments and config.
fn setup_tracing(base: Level, device: Level, json: bool) -> Result<(), ParseError> {
    let filter = EnvFilter::from_default_env()
        .add_directive(base.into())
        .add_directive(device_directive(device)?);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}
