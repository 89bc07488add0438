//! Device logging integration tests.
//!
//! Exercises `DeviceLogger` end to end against a shared `DeviceTable`:
//! the reference scenarios, lookup degradation and concurrent use while
//! the table is being mutated.

use chibio_common::device::{DeviceRecord, DeviceTable};
use chibio_common::device_log::sink::{EmittedLine, MemorySink};
use chibio_common::device_log::{CommEvent, DeviceLogger, Severity};
use std::sync::Arc;
use std::thread;

// ─── Helpers ────────────────────────────────────────────────────────

fn logger(table: Arc<DeviceTable>) -> (DeviceLogger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (DeviceLogger::new(sink.clone(), table), sink)
}

// ─── Scenarios ──────────────────────────────────────────────────────

#[test]
fn calibration_event_names_the_reactor() {
    let table: DeviceTable = [("M0", DeviceRecord::with_display_name("Reactor1"))]
        .into_iter()
        .collect();
    let (logger, sink) = logger(Arc::new(table));

    logger.log_device_event(Severity::Info, "M0", "LED calibration completed");

    assert_eq!(
        sink.take(),
        vec![EmittedLine {
            severity: Severity::Info,
            text: "LED calibration completed on M0 (Reactor1)".to_string(),
            include_trace: false,
        }]
    );
}

#[test]
fn fatal_multiplexer_failure_on_empty_table() {
    let (logger, sink) = logger(Arc::new(DeviceTable::new()));

    logger.log_hardware_failure("M1", "Multiplexer", 5, true);

    let lines = sink.take();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].severity, Severity::Critical);
    assert_eq!(lines[0].text, "Failed to communicate to Multiplexer 5 times on M1");
}

#[test]
fn every_helper_writes_exactly_once() {
    let (logger, sink) = logger(Arc::new(DeviceTable::new()));

    logger.log_device_event(Severity::Debug, "M0", "a");
    logger.log_hardware_failure("M0", "PWM", 1, false);
    logger.log_comm_event("M0", "PWM", CommEvent::Success, "", Severity::Debug);
    logger.log_measurement("M0", "OD", 0.1, "", Severity::Debug);

    assert_eq!(sink.len(), 4);
}

#[test]
fn display_name_follows_table_updates() {
    let table = Arc::new(DeviceTable::new());
    let (logger, sink) = logger(Arc::clone(&table));

    logger.comm_debug("M2", "Thermometer", CommEvent::Timeout);
    table.set_display_name("M2", "Reactor3");
    logger.comm_debug("M2", "Thermometer", CommEvent::Timeout);
    table.remove("M2");
    logger.comm_debug("M2", "Thermometer", CommEvent::Timeout);

    let texts: Vec<_> = sink.take().into_iter().map(|l| l.text).collect();
    assert_eq!(
        texts,
        vec![
            "Thermometer timeout on M2",
            "Thermometer timeout on M2 (Reactor3)",
            "Thermometer timeout on M2",
        ]
    );
}

// ─── Concurrency ────────────────────────────────────────────────────

#[test]
fn concurrent_logging_while_table_mutates() {
    const THREADS: usize = 4;
    const CALLS: usize = 250;

    let table = Arc::new(DeviceTable::new());
    let (logger, sink) = logger(Arc::clone(&table));

    let writer = {
        let table = Arc::clone(&table);
        thread::spawn(move || {
            for i in 0..CALLS {
                if i % 2 == 0 {
                    table.set_display_name("M0", format!("Reactor{i}"));
                } else {
                    table.remove("M0");
                }
            }
        })
    };

    let loggers: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for value in 0..CALLS {
                    logger.measurement_debug("M0", "OD", value, "");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for handle in loggers {
        handle.join().unwrap();
    }

    let lines = sink.take();
    assert_eq!(lines.len(), THREADS * CALLS);
    for line in lines {
        assert!(line.text.starts_with("OD measurement: "));
        let (_, suffix) = line.text.split_once(" on M0").unwrap();
        assert!(suffix.is_empty() || (suffix.starts_with(" (Reactor") && suffix.ends_with(')')));
    }
}
