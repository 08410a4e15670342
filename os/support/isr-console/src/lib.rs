//! # Console Trace Output
//!
//! Human-readable, line-oriented output for the inversion scenario. Both
//! execution contexts (the interrupt-like driver and the low-priority task)
//! write here, so every line is emitted with a single locked, unbuffered
//! write: lines never interleave, and a line that was printed before the
//! process was torn down is actually on the terminal.
//!
//! ## Components
//!
//! ### Console Logger ([`ConsoleLogger`])
//! A `log::Log` implementation writing to standard output:
//! * **Level Filtering**: Configurable maximum level
//! * **Targets**: The target names the context (`isr`, `app`, `driver`)
//! * **Format**: `[LEVEL] target: message`
//!
//! ### Trace Macro ([`console_trace!`])
//! Direct output bypassing the logging framework, for banners that must
//! appear regardless of the configured level.
//!
//! ## Feature System
//!
//! ### `enabled` Feature (default)
//! Output goes to standard output. Without it, every write is a no-op,
//! which keeps benchmarks and quiet test runs free of I/O.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use isr_console::{ConsoleLogger, console_trace};
//! use log::{LevelFilter, info};
//!
//! ConsoleLogger::new(LevelFilter::Info)
//!     .init()
//!     .expect("logger initialization");
//!
//! console_trace!("--- STARTING ---\n");
//! info!(target: "isr", "HARDWARE INTERRUPT! Packet #1 arrived.");
//! ```

mod logger;

pub use logger::ConsoleLogger;

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod console_fmt {
    use std::fmt;
    use std::io::{self, Write};

    /// Writes `args` to standard output in one locked write, then flushes.
    #[doc(hidden)]
    #[inline]
    pub fn console_write(args: fmt::Arguments) {
        let mut out = io::stdout().lock();
        // Ignore errors; this is best-effort trace output.
        let _ = out.write_fmt(args);
        let _ = out.flush();
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod console_fmt {
    use std::fmt;

    #[doc(hidden)]
    #[inline]
    pub fn console_write(_: fmt::Arguments) {
        // no-op when feature disabled
    }
}

#[macro_export]
macro_rules! console_trace {
    ($($arg:tt)*) => {{
        $crate::console_fmt::console_write(::core::format_args!($($arg)*));
    }};
}
