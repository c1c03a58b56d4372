//! Main logger implementation
//!
//! A [`Logger`] owns the named output registry, the severity threshold and
//! an optional error callback. Dispatch iterates a snapshot of the registry
//! taken under a read lock, so outputs can be added or removed while other
//! threads are logging.

use super::{
    error::{LoggerError, Result},
    field_value::{ErrorValue, FieldValue},
    fields::FieldSet,
    line::{Line, LineBuilder},
    log::Log,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    stack::{self, Frame},
};
use crate::formatters::{Formatter, SimpleFormatter};
use crate::writers::ConsoleWriter;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Callback invoked with every delivery failure.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// An error callback that reports delivery failures on stderr.
pub fn report_to_stderr() -> ErrorCallback {
    Arc::new(|err: &LoggerError| match err {
        LoggerError::SinkPanicked { .. } => eprintln!(
            "[LOGGER CRITICAL] {}. Other outputs continue to function.",
            err
        ),
        _ => eprintln!("[LOGGER ERROR] {}", err),
    })
}

struct Sink {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: Box<dyn Formatter>,
}

impl Sink {
    fn new(name: String, writer: Box<dyn Write + Send>, formatter: Box<dyn Formatter>) -> Arc<Self> {
        Arc::new(Self {
            name,
            writer: Mutex::new(writer),
            formatter,
        })
    }

    /// Format and write one event with panic isolation.
    fn deliver(&self, fields: &FieldSet) -> Result<()> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let text = self.formatter.format(fields);
            let mut writer = self.writer.lock();
            writer.write_all(text.as_bytes())?;
            writer.flush()
        }));

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(LoggerError::sink_write(&self.name, e)),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(LoggerError::sink_panicked(&self.name, panic_msg))
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::sink_write(&self.name, e))
    }
}

/// State shared between a logger and every builder it hands out.
pub(crate) struct Dispatcher {
    threshold: AtomicU8,
    sinks: RwLock<BTreeMap<String, Arc<Sink>>>,
    on_error: RwLock<Option<ErrorCallback>>,
    metrics: LoggerMetrics,
}

impl Dispatcher {
    fn new(level: LogLevel) -> Self {
        Self {
            threshold: AtomicU8::new(level.as_u8()),
            sinks: RwLock::new(BTreeMap::new()),
            on_error: RwLock::new(None),
            metrics: LoggerMetrics::new(),
        }
    }

    fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Acquire))
    }

    /// Deliver a stamped field set to every selected output.
    ///
    /// `targets` restricts delivery to the named outputs when non-empty;
    /// unknown names are skipped. Failures never reach the caller.
    pub(crate) fn dispatch(&self, fields: &FieldSet, targets: Option<&[String]>) {
        let threshold = self.level();
        if !fields.level().enabled_at(threshold) {
            self.metrics.record_filtered();
            return;
        }

        let sinks: Vec<Arc<Sink>> = {
            let registry = self.sinks.read();
            match targets {
                Some(names) if !names.is_empty() => registry
                    .iter()
                    .filter(|(name, _)| names.contains(*name))
                    .map(|(_, sink)| Arc::clone(sink))
                    .collect(),
                _ => registry.values().cloned().collect(),
            }
        };

        for sink in &sinks {
            if let Err(err) = sink.deliver(fields) {
                self.metrics.record_write_failure();
                self.report(&err);
            }
        }
        self.metrics.record_dispatched();
    }

    fn report(&self, err: &LoggerError) {
        let callback = self.on_error.read().clone();
        if let Some(callback) = callback {
            callback(err);
        }
    }
}

pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    base: LineBuilder,
}

impl Logger {
    /// A logger with no outputs and a `Debug` threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base(LogLevel::default(), FieldSet::new())
    }

    /// A logger writing to stdout with a [`SimpleFormatter`].
    #[must_use]
    pub fn stdout() -> Self {
        let logger = Self::new();
        logger.install("stdout", Box::new(ConsoleWriter::stdout()), Box::new(SimpleFormatter::new()));
        logger
    }

    fn with_base(level: LogLevel, fields: FieldSet) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(level));
        let base = LineBuilder::new(Arc::clone(&dispatcher), fields, None);
        Self { dispatcher, base }
    }

    /// Register an output under `name`.
    ///
    /// Fails if `name` is empty or already registered.
    pub fn add_output<W, F>(&self, name: impl Into<String>, writer: W, formatter: F) -> Result<()>
    where
        W: Write + Send + 'static,
        F: Formatter + 'static,
    {
        self.add_boxed_output(name.into(), Box::new(writer), Box::new(formatter))
    }

    pub(crate) fn add_boxed_output(
        &self,
        name: String,
        writer: Box<dyn Write + Send>,
        formatter: Box<dyn Formatter>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(LoggerError::invalid_name(name));
        }
        let mut sinks = self.dispatcher.sinks.write();
        if sinks.contains_key(&name) {
            return Err(LoggerError::duplicate_name(name));
        }
        sinks.insert(name.clone(), Sink::new(name, writer, formatter));
        Ok(())
    }

    fn install(&self, name: &str, writer: Box<dyn Write + Send>, formatter: Box<dyn Formatter>) {
        self.dispatcher
            .sinks
            .write()
            .insert(name.to_string(), Sink::new(name.to_string(), writer, formatter));
    }

    /// Unregister an output. Returns whether it was registered.
    pub fn remove_output(&self, name: &str) -> bool {
        self.dispatcher.sinks.write().remove(name).is_some()
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.dispatcher.sinks.read().contains_key(name)
    }

    /// Registered output names, sorted.
    pub fn output_names(&self) -> Vec<String> {
        self.dispatcher.sinks.read().keys().cloned().collect()
    }

    /// Replace the threshold used by subsequent dispatches.
    pub fn set_level(&self, level: LogLevel) {
        self.dispatcher.threshold.store(level.as_u8(), Ordering::Release);
    }

    pub fn level(&self) -> LogLevel {
        self.dispatcher.level()
    }

    /// Install or clear the delivery error callback.
    pub fn set_error_callback(&self, callback: Option<ErrorCallback>) {
        *self.dispatcher.on_error.write() = callback;
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.dispatcher.metrics
    }

    /// Flush every output, returning the first failure.
    pub fn flush(&self) -> Result<()> {
        let sinks: Vec<Arc<Sink>> = self.dispatcher.sinks.read().values().cloned().collect();
        let mut first_error = None;
        for sink in &sinks {
            if let Err(e) = sink.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// The shared base builder.
    pub fn base(&self) -> &LineBuilder {
        &self.base
    }

    /// A builder that dispatches only to the named outputs.
    ///
    /// It carries the base fields and can be reused like the base builder.
    /// An empty list means every output.
    pub fn scoped_to_outputs<I, S>(&self, names: I) -> LineBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Arc<[String]> = names.into_iter().map(Into::into).collect();
        LineBuilder::new(
            Arc::clone(&self.dispatcher),
            self.base.fields().clone(),
            Some(names),
        )
    }
}

impl Log for &Logger {
    #[track_caller]
    #[inline(never)]
    fn with_caller(self, skip: usize) -> Line {
        let site = match skip {
            0 => Some(Frame::from_location(Location::caller())),
            n => stack::capture_frames(n, 1).into_iter().next(),
        };
        self.base.fork().attach_caller(site)
    }

    #[inline(never)]
    fn with_stack(self, skip: usize, depth: usize) -> Line {
        let frames = stack::capture_frames(skip, depth);
        self.base.fork().attach_frames(frames)
    }

    fn with_fields(self, fields: &FieldSet) -> Line {
        self.base.with_fields(fields)
    }

    fn emit(self, level: LogLevel, error: Option<ErrorValue>, message: String) {
        self.base.emit(level, error, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("outputs", &self.output_names())
            .field("base", self.base.fields())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logline::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level(LogLevel::INFO)
///     .output("stdout", ConsoleWriter::stdout(), SimpleFormatter::new())
///     .field("service", "billing")
///     .on_error(Arc::new(|err: &LoggerError| eprintln!("log output failed: {}", err)))
///     .build()
///     .unwrap();
///
/// logger.infoln("ready");
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    outputs: Vec<(String, Box<dyn Write + Send>, Box<dyn Formatter>)>,
    fields: Vec<(String, FieldValue)>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::default(),
            outputs: Vec::new(),
            fields: Vec::new(),
            on_error: None,
        }
    }

    /// Set the severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add a named output
    #[must_use = "builder methods return a new value"]
    pub fn output<W, F>(mut self, name: impl Into<String>, writer: W, formatter: F) -> Self
    where
        W: Write + Send + 'static,
        F: Formatter + 'static,
    {
        self.outputs
            .push((name.into(), Box::new(writer), Box::new(formatter)));
        self
    }

    pub(crate) fn boxed_output(
        mut self,
        name: String,
        writer: Box<dyn Write + Send>,
        formatter: Box<dyn Formatter>,
    ) -> Self {
        self.outputs.push((name, writer, formatter));
        self
    }

    /// Add a field stamped on every event
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Set a callback for delivery failures
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Build the Logger
    ///
    /// Fails on reserved base field keys and on empty or duplicate output
    /// names.
    pub fn build(self) -> Result<Logger> {
        let fields = FieldSet::new();
        for (key, value) in self.fields {
            fields.try_set(key, value)?;
        }

        let logger = Logger::with_base(self.level, fields);
        for (name, writer, formatter) in self.outputs {
            logger.add_boxed_output(name, writer, formatter)?;
        }
        logger.set_error_callback(self.on_error);
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
