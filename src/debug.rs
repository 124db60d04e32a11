//! Log output via UART0.
//!
//! [`DebugLogger`] implements [`log::Log`] by formatting records into a
//! shared buffer. [`debug_writer_task`] drains the buffer to the log UART.
//! Output is non-blocking and records are dropped when the buffer is full.

use core::cell::RefCell;
use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};

use crate::config::debug_uart::BUFFER_SIZE;

/// Signal to indicate log output is available
static DEBUG_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Pending log output (protected by critical section mutex)
static DEBUG_BUFFER: Mutex<CriticalSectionRawMutex, RefCell<String<BUFFER_SIZE>>> =
    Mutex::new(RefCell::new(String::new()));

static LOGGER: DebugLogger = DebugLogger;

/// Logger that buffers records for the writer task
pub struct DebugLogger;

impl Log for DebugLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut line: String<BUFFER_SIZE> = String::new();
        // Truncated on overflow
        let _ = write!(line, "[{}] {}\r\n", record.level(), record.args());
        write_debug(&line);
    }

    fn flush(&self) {}
}

/// Install the logger.
///
/// Must be called once during startup; later calls are ignored.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Append a line to the buffer.
///
/// Returns false if the line did not fit and was dropped.
pub fn write_debug(line: &str) -> bool {
    let queued = DEBUG_BUFFER.lock(|cell| cell.borrow_mut().push_str(line).is_ok());
    if queued {
        DEBUG_SIGNAL.signal(());
    }
    queued
}

/// Take everything buffered so far.
///
/// Returns None if the buffer is empty.
pub fn take_debug_output() -> Option<String<BUFFER_SIZE>> {
    DEBUG_BUFFER.lock(|cell| {
        let mut buffer = cell.borrow_mut();
        if buffer.is_empty() {
            None
        } else {
            Some(core::mem::take(&mut *buffer))
        }
    })
}

/// Writer task that sends buffered log output to `port`.
pub async fn debug_writer_task<W: embedded_io_async::Write>(mut port: W) {
    loop {
        DEBUG_SIGNAL.wait().await;

        if let Some(output) = take_debug_output() {
            // Nothing useful to do if the log port fails
            let _ = port.write_all(output.as_bytes()).await;
        }
    }
}
