//! The `Log` capability set shared by loggers and line builders

use super::field_value::ErrorValue;
use super::fields::FieldSet;
use super::line::Line;
use super::log_level::LogLevel;
use std::fmt;

/// Chainable enrichment and emission calls.
///
/// Implemented for `&Logger` and `&LineBuilder`, which never change and fork
/// an owned [`Line`] on the first enrichment, and for `Line` itself, which
/// is enriched in place. Every emission delivers synchronously: it returns
/// once all selected outputs were written.
///
/// # Example
///
/// ```
/// use logline::prelude::*;
///
/// let logger = Logger::new();
/// let sink = MemoryWriter::new();
/// logger.add_output("mem", sink.clone(), SimpleFormatter::new()).unwrap();
///
/// logger.with_caller(0).infoln("started");
/// assert!(sink.contents().contains("started"));
/// ```
pub trait Log: Sized {
    /// Record the file and line `skip` frames above the call site.
    fn with_caller(self, skip: usize) -> Line;

    /// Record up to `depth` stack frames starting `skip` frames above the
    /// call site.
    fn with_stack(self, skip: usize, depth: usize) -> Line;

    /// Merge custom fields. Reserved keys in `fields` are ignored.
    fn with_fields(self, fields: &FieldSet) -> Line;

    /// Stamp time, message, level and optional error, then dispatch.
    fn emit(self, level: LogLevel, error: Option<ErrorValue>, message: String);

    fn debugf(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::DEBUG, None, fmt::format(args));
    }

    fn debugln(self, message: impl fmt::Display) {
        self.emit(LogLevel::DEBUG, None, format!("{}\n", message));
    }

    fn infof(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::INFO, None, fmt::format(args));
    }

    fn infoln(self, message: impl fmt::Display) {
        self.emit(LogLevel::INFO, None, format!("{}\n", message));
    }

    fn warningf(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::WARNING, None, fmt::format(args));
    }

    fn warningln(self, message: impl fmt::Display) {
        self.emit(LogLevel::WARNING, None, format!("{}\n", message));
    }

    fn errorf(self, error: impl Into<ErrorValue>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::ERROR, Some(error.into()), fmt::format(args));
    }

    fn errorln(self, error: impl Into<ErrorValue>, message: impl fmt::Display) {
        self.emit(LogLevel::ERROR, Some(error.into()), format!("{}\n", message));
    }

    fn printf(self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.emit(level, None, fmt::format(args));
    }

    fn println(self, level: LogLevel, message: impl fmt::Display) {
        self.emit(level, None, format!("{}\n", message));
    }
}
