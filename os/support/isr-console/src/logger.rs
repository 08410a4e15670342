use crate::console_trace;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct ConsoleLogger {
    max_level: LevelFilter,
}

impl ConsoleLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Installs the logger process-wide. Call this once, before any context starts.
    ///
    /// # Errors
    /// Fails if another logger was installed first.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\n", one write per line
        console_trace!(
            "[{:<5}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        // every line is flushed as it is written
    }
}
