// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Writes every record to stderr, prefixed with its level.
/// Normal tool output goes to stdout and never through here.
pub struct ConsoleLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Prefix for a record of the given level.
pub fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "Error: ",
    Level::Warn => "Warning: ",
    Level::Info => "Info: ",
    Level::Debug => "Debug: ",
    Level::Trace => "Trace: ",
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      // Nothing sensible to do if stderr is gone
      let _ = writeln!(handle, "{}{}", tag(record.level()), record.args());
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
