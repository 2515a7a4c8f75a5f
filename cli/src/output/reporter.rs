//! `TerminalReporter`: console implementation of the `RunLog` port.
//!
//! Lets the pipeline write one stream of events that is teed to the log file
//! and the terminal without depending on any presentation type.

use crate::application::ports::{LogLevel, RunLog};
use crate::output::OutputContext;

/// Terminal run log that wraps an `OutputContext`.
///
/// - `Info` prints `"  → {message}"`
/// - `Success` prints `"  ✓ {message}"`
/// - `Warn` prints `"  ⚠ {message}"`
/// - `Error` prints `"  ✗ {message}"` to stderr, even when quiet
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl RunLog for TerminalReporter<'_> {
    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => self.ctx.step(message),
            LogLevel::Success => self.ctx.success(message),
            LogLevel::Warn => self.ctx.warn(message),
            LogLevel::Error => self.ctx.error(message),
        }
    }
}
