//! Formatting macros for the `*f` emission calls.
//!
//! Each macro takes anything implementing [`Log`](crate::Log) followed by
//! `format!`-style arguments. The message is used exactly as rendered; no
//! newline is appended.
//!
//! # Examples
//!
//! ```
//! use logline::prelude::*;
//! use logline::{errorf, infof};
//!
//! let logger = Logger::new();
//! let sink = MemoryWriter::new();
//! logger.add_output("mem", sink.clone(), SimpleFormatter::new()).unwrap();
//!
//! let port = 8080;
//! infof!(&logger, "listening on port {}", port);
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "refused");
//! errorf!(logger.with_caller(0), err, "connect to {} failed", "db");
//!
//! let contents = sink.contents();
//! assert!(contents.contains("listening on port 8080"));
//! assert!(contents.contains("refused"));
//! ```

/// Emit at `Debug`.
#[macro_export]
macro_rules! debugf {
    ($log:expr, $($arg:tt)+) => {
        $crate::Log::debugf($log, format_args!($($arg)+))
    };
}

/// Emit at `Info`.
#[macro_export]
macro_rules! infof {
    ($log:expr, $($arg:tt)+) => {
        $crate::Log::infof($log, format_args!($($arg)+))
    };
}

/// Emit at `Warning`.
#[macro_export]
macro_rules! warningf {
    ($log:expr, $($arg:tt)+) => {
        $crate::Log::warningf($log, format_args!($($arg)+))
    };
}

/// Emit at `Error`, attaching an error value.
///
/// ```
/// # use logline::prelude::*;
/// # let logger = Logger::new();
/// use logline::errorf;
/// errorf!(&logger, ErrorValue::msg("timeout"), "request {} failed", 17);
/// ```
#[macro_export]
macro_rules! errorf {
    ($log:expr, $err:expr, $($arg:tt)+) => {
        $crate::Log::errorf($log, $err, format_args!($($arg)+))
    };
}

/// Emit at an explicit level.
///
/// ```
/// # use logline::prelude::*;
/// # let logger = Logger::new();
/// use logline::printf;
/// printf!(&logger, LogLevel::PRINT, "{} jobs queued", 3);
/// ```
#[macro_export]
macro_rules! printf {
    ($log:expr, $level:expr, $($arg:tt)+) => {
        $crate::Log::printf($log, $level, format_args!($($arg)+))
    };
}
