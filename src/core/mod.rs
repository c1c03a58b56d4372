//! Core logger types and traits

pub mod config;
pub mod error;
pub mod field_value;
pub mod fields;
pub mod line;
pub mod log;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod stack;
pub mod timestamp;

pub use config::{FormatConfig, LoggerConfig, OutputConfig, OutputTarget};
pub use error::{LoggerError, Result};
pub use field_value::{ErrorValue, FieldValue};
pub use fields::{is_reserved, keys, FieldSet};
pub use line::{Line, LineBuilder};
pub use log::Log;
pub use log_level::LogLevel;
pub use logger::{report_to_stderr, ErrorCallback, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use stack::Frame;
pub use timestamp::TimestampFormat;
