//! Logger construction helpers, shared by `InterpreterConfig::default()` and
//! the `demos/` driver.

use slog::Logger;
use sloggers::null::NullLoggerBuilder;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// A logger that discards everything. Used when an embedder never calls
/// `InterpreterConfig::logger`.
pub fn null_logger() -> Logger {
    NullLoggerBuilder {}.build().expect("null logger never fails to build")
}

/// A human-readable logger to stderr, for the `demos/` driver.
pub fn terminal_logger(level: Severity) -> Logger {
    TerminalLoggerBuilder::new()
        .destination(Destination::Stderr)
        .level(level)
        .build()
        .expect("terminal logger failed to build")
}
