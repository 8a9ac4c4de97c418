//! Console Log Backend
//!
//! A `log::Log` implementation that writes each record as one line to
//! any `core::fmt::Write` sink (a UART, a ring buffer, ...).
//!
//! # Line format
//! `[LEVEL target] message` followed by `\r\n`. Newlines inside the
//! message are translated to `\r\n` as a serial console expects.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use crate::config::DEFAULT_LOG_LEVEL;

/// Writer adapter that turns `\n` into `\r\n`
struct CrLf<'a, W: Write>(&'a mut W);

impl<W: Write> Write for CrLf<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.0.write_str(first)?;
        }
        for line in lines {
            self.0.write_str("\r\n")?;
            self.0.write_str(line)?;
        }
        Ok(())
    }
}

/// Logger over a spinlock-protected console writer
pub struct ConsoleLogger<W> {
    sink: Mutex<W>,
    level: LevelFilter,
}

impl<W: Write + Send> ConsoleLogger<W> {
    /// Create a logger that passes records at or above `level`
    pub const fn new(sink: W, level: LevelFilter) -> Self {
        Self {
            sink: Mutex::new(sink),
            level,
        }
    }

    /// Create a logger at [`DEFAULT_LOG_LEVEL`]
    pub const fn with_default_level(sink: W) -> Self {
        Self::new(sink, DEFAULT_LOG_LEVEL)
    }

    /// Run `f` with exclusive access to the sink
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.sink.lock())
    }
}

impl<W: Write + Send> Log for ConsoleLogger<W> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut sink = self.sink.lock();
        let mut out = CrLf(&mut *sink);
        // A sink that rejects output has nowhere to report it
        let _ = writeln!(
            out,
            "[{level} {target}] {message}",
            level = record.level(),
            target = record.target(),
            message = record.args(),
        );
    }

    fn flush(&self) {}
}

/// Install `logger` as the global logger.
///
/// Fails if a logger is already installed.
pub fn init_logger<W: Write + Send>(
    logger: &'static ConsoleLogger<W>,
) -> Result<(), SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}
