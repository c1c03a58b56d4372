//! # logline
//!
//! Structured, leveled logging with chainable enrichment and synchronous
//! delivery to any number of named outputs.
//!
//! ## Features
//!
//! - **Field sets**: every event is a set of typed key/value fields
//! - **Copy-on-write builders**: enrich a shared base without affecting
//!   other threads
//! - **Multiple outputs**: each with its own writer and formatter,
//!   addressable by name
//! - **Caller and stack capture**: file, line and function of the call site
//!
//! ## Example
//!
//! ```
//! use logline::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level(LogLevel::INFO)
//!     .field("service", "billing")
//!     .output("mem", MemoryWriter::new(), JsonFormatter::new(false))
//!     .build()
//!     .unwrap();
//!
//! let request = FieldSet::new().try_with("request_id", "r-42").unwrap();
//! logger.with_fields(&request).with_caller(0).infoln("charged card");
//! logger.debugln("not delivered at Info");
//! ```

pub mod core;
pub mod formatters;
pub mod global;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        keys, ErrorCallback, ErrorValue, FieldSet, FieldValue, Line, LineBuilder, Log, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, TimestampFormat,
    };
    pub use crate::formatters::{Formatter, JsonFormatter, SimpleFormatter};
    #[cfg(feature = "file")]
    pub use crate::writers::FileWriter;
    pub use crate::writers::{ConsoleWriter, MemoryWriter};
}

pub use crate::core::{
    is_reserved, keys, report_to_stderr, ErrorCallback, ErrorValue, FieldSet, FieldValue,
    FormatConfig, Frame, Line, LineBuilder, Log, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, OutputConfig, OutputTarget, Result, TimestampFormat,
};
pub use formatters::{Formatter, JsonFormatter, SimpleFormatter};
pub use global::{
    debugf, debugln, default_logger, errorf, errorln, infof, infoln, printf, println, warningf,
    warningln, with_caller, with_fields, with_stack,
};
#[cfg(feature = "file")]
pub use writers::FileWriter;
pub use writers::{ConsoleWriter, MemoryWriter};
