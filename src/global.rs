//! Process-wide default logger
//!
//! The default logger is created on first use with no outputs and a `Debug`
//! threshold. Configure it through [`default_logger`]; the free functions
//! here are shorthands for calling [`Log`] methods on it.
//!
//! ```
//! use logline::prelude::*;
//!
//! let sink = MemoryWriter::new();
//! logline::default_logger()
//!     .add_output("doc-global", sink.clone(), SimpleFormatter::new())
//!     .unwrap();
//!
//! logline::infoln("from anywhere");
//! assert!(sink.contents().contains("from anywhere"));
//! # logline::default_logger().remove_output("doc-global");
//! ```

use crate::core::stack::{self, Frame};
use crate::core::{ErrorValue, FieldSet, Line, Log, LogLevel, Logger};
use once_cell::sync::Lazy;
use std::fmt;
use std::panic::Location;

static DEFAULT_LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

/// [`Log::with_caller`] on the default logger.
#[track_caller]
#[inline(never)]
pub fn with_caller(skip: usize) -> Line {
    let site = match skip {
        0 => Some(Frame::from_location(Location::caller())),
        n => stack::capture_frames(n, 1).into_iter().next(),
    };
    default_logger().base().fork().attach_caller(site)
}

/// [`Log::with_stack`] on the default logger.
#[inline(never)]
pub fn with_stack(skip: usize, depth: usize) -> Line {
    let frames = stack::capture_frames(skip, depth);
    default_logger().base().fork().attach_frames(frames)
}

pub fn with_fields(fields: &FieldSet) -> Line {
    default_logger().with_fields(fields)
}

pub fn debugf(args: fmt::Arguments<'_>) {
    default_logger().debugf(args);
}

pub fn debugln(message: impl fmt::Display) {
    default_logger().debugln(message);
}

pub fn infof(args: fmt::Arguments<'_>) {
    default_logger().infof(args);
}

pub fn infoln(message: impl fmt::Display) {
    default_logger().infoln(message);
}

pub fn warningf(args: fmt::Arguments<'_>) {
    default_logger().warningf(args);
}

pub fn warningln(message: impl fmt::Display) {
    default_logger().warningln(message);
}

pub fn errorf(error: impl Into<ErrorValue>, args: fmt::Arguments<'_>) {
    default_logger().errorf(error, args);
}

pub fn errorln(error: impl Into<ErrorValue>, message: impl fmt::Display) {
    default_logger().errorln(error, message);
}

pub fn printf(level: LogLevel, args: fmt::Arguments<'_>) {
    default_logger().printf(level, args);
}

pub fn println(level: LogLevel, message: impl fmt::Display) {
    default_logger().println(level, message);
}
