//! Minimal stderr logger for `--verbose`.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use owo_colors::OwoColorize;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.target().starts_with("marmot") || metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR".red().to_string(),
            Level::Warn => "WARN ".yellow().to_string(),
            Level::Info => "INFO ".green().to_string(),
            Level::Debug => "DEBUG".blue().to_string(),
            Level::Trace => "TRACE".dimmed().to_string(),
        };
        eprintln!("{level} {} {}", record.target().dimmed(), record.args());
    }

    fn flush(&self) {}
}

/// Install the logger, printing records up to `level`.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
