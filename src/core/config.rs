//! Declarative logger configuration
//!
//! `LoggerConfig` is plain serde data. Parse it from whatever document
//! format the application already uses, then call [`LoggerConfig::build`].
//!
//! ```
//! use logline::LoggerConfig;
//!
//! let config: LoggerConfig = serde_json::from_str(r#"{
//!     "level": "Info",
//!     "fields": { "service": "billing", "replica": 2 },
//!     "outputs": [
//!         { "name": "console", "target": { "type": "stderr" }, "format": { "type": "simple" } }
//!     ]
//! }"#).unwrap();
//!
//! let logger = config.build().unwrap();
//! assert!(logger.has_output("console"));
//! ```

#[cfg(not(feature = "file"))]
use super::error::LoggerError;
use super::error::Result;
use super::field_value::FieldValue;
use super::log_level::LogLevel;
use super::logger::{report_to_stderr, Logger};
use super::timestamp::TimestampFormat;
use crate::formatters::{Formatter, JsonFormatter, SimpleFormatter};
use crate::writers::ConsoleWriter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Severity threshold
    pub level: LogLevel,

    /// Install [`report_to_stderr`] as the error callback
    pub report_errors: bool,

    /// Base fields stamped on every event
    pub fields: BTreeMap<String, serde_json::Value>,

    pub outputs: Vec<OutputConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            report_errors: true,
            fields: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Open every output and build the logger.
    ///
    /// Fails if an output cannot be opened, if an output name is empty or
    /// repeated, or if a base field uses a reserved key.
    pub fn build(&self) -> Result<Logger> {
        let mut builder = Logger::builder().level(self.level);

        for (key, value) in &self.fields {
            builder = builder.field(key.clone(), FieldValue::from_json(value.clone()));
        }

        for output in &self.outputs {
            builder = builder.boxed_output(
                output.name.clone(),
                output.target.open()?,
                output.format.formatter(),
            );
        }

        if self.report_errors {
            builder = builder.on_error(report_to_stderr());
        }

        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub name: String,

    #[serde(default)]
    pub target: OutputTarget,

    #[serde(default)]
    pub format: FormatConfig,
}

/// Where an output writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// Append to a file. Requires the `file` feature.
    File { path: PathBuf },
}

impl OutputTarget {
    fn open(&self) -> Result<Box<dyn Write + Send>> {
        match self {
            OutputTarget::Stdout => Ok(Box::new(ConsoleWriter::stdout())),
            OutputTarget::Stderr => Ok(Box::new(ConsoleWriter::stderr())),
            #[cfg(feature = "file")]
            OutputTarget::File { path } => {
                Ok(Box::new(crate::writers::FileWriter::new(path.clone())?))
            }
            #[cfg(not(feature = "file"))]
            OutputTarget::File { path } => Err(LoggerError::config(
                "output",
                format!(
                    "cannot open {}: built without the `file` feature",
                    path.display()
                ),
            )),
        }
    }
}

/// How an output renders events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatConfig {
    Simple {
        #[serde(default)]
        colors: bool,
        #[serde(default)]
        timestamp: TimestampFormat,
    },
    Json {
        #[serde(default)]
        indent: bool,
    },
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig::Simple {
            colors: false,
            timestamp: TimestampFormat::default(),
        }
    }
}

impl FormatConfig {
    fn formatter(&self) -> Box<dyn Formatter> {
        match self {
            FormatConfig::Simple { colors, timestamp } => Box::new(
                SimpleFormatter::new()
                    .with_colors(*colors)
                    .with_timestamp_format(timestamp.clone()),
            ),
            FormatConfig::Json { indent } => Box::new(JsonFormatter::new(*indent)),
        }
    }
}
