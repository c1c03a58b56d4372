//! Integration tests for logline
//!
//! These tests verify:
//! - Fan-out to multiple formatters
//! - Severity gating, including `Print` and custom levels
//! - Caller and stack capture
//! - File outputs and declarative configuration
//! - Error reporting for failing outputs

use logline::prelude::*;
use logline::{keys, LoggerConfig};
use std::fs;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn json_events(sink: &MemoryWriter) -> Vec<serde_json::Value> {
    sink.contents()
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is one JSON event"))
        .collect()
}

#[test]
fn test_simple_and_json_outputs_receive_same_event() {
    let a = MemoryWriter::new();
    let b = MemoryWriter::new();
    let logger = Logger::builder()
        .level(LogLevel::INFO)
        .output("a", a.clone(), SimpleFormatter::new())
        .output("b", b.clone(), JsonFormatter::new(false))
        .build()
        .expect("valid logger");

    logger.infoln("hello");

    let text = a.contents();
    assert!(text.contains("Info: hello"));
    assert_eq!(text.lines().count(), 1);

    let events = json_events(&b);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["message"], "hello\n");
    let level: LogLevel = events[0]["loglevel"]
        .as_str()
        .expect("level is text")
        .parse()
        .expect("level parses");
    assert_eq!(level, LogLevel::INFO);
}

#[test]
fn test_debug_suppressed_under_error_threshold() {
    let sink = MemoryWriter::new();
    let logger = Logger::builder()
        .level(LogLevel::ERROR)
        .output("mem", sink.clone(), SimpleFormatter::new())
        .build()
        .expect("valid logger");

    logger.debugln("x");
    logger.infof(format_args!("{}", "y"));
    logger.warningln("z");

    assert!(sink.is_empty());
    assert_eq!(logger.metrics().events_filtered(), 3);
    assert_eq!(logger.metrics().events_dispatched(), 0);
}

#[test]
fn test_print_and_custom_levels() {
    let sink = MemoryWriter::new();
    let logger = Logger::builder()
        .level(LogLevel::WARNING)
        .output("mem", sink.clone(), JsonFormatter::new(false))
        .build()
        .expect("valid logger");

    let custom = LogLevel::custom(2).expect("in range");
    logger.println(LogLevel::PRINT, "always");
    logger.println(custom, "too verbose");

    logger.set_level(custom);
    logger.println(custom, "now visible");

    logger.set_level(LogLevel::MUTE);
    logger.println(LogLevel::PRINT, "muted");

    let messages: Vec<String> = json_events(&sink)
        .iter()
        .map(|e| e["message"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(messages, vec!["always\n", "now visible\n"]);
}

#[test]
fn test_caller_is_the_emitting_line() {
    let sink = MemoryWriter::new();
    let logger = Logger::new();
    logger
        .add_output("mem", sink.clone(), JsonFormatter::new(false))
        .expect("output added");

    let expected_line = line!() + 1;
    logger.with_caller(0).infoln("located");

    let events = json_events(&sink);
    assert_eq!(events[0]["line"], expected_line);
    assert!(events[0]["file"]
        .as_str()
        .expect("file is text")
        .ends_with("integration_tests.rs"));
}

#[inline(never)]
fn log_from_helper(logger: &Logger) {
    logger.with_caller(1).infoln("from helper");
}

#[test]
fn test_caller_skip_reports_the_helpers_caller() {
    let sink = MemoryWriter::new();
    let logger = Logger::new();
    logger
        .add_output("mem", sink.clone(), JsonFormatter::new(false))
        .expect("output added");

    let expected_line = line!() + 1;
    log_from_helper(&logger);

    let events = json_events(&sink);
    assert_eq!(events[0]["message"], "from helper\n");
    assert_eq!(events[0]["line"], expected_line);
    assert_eq!(events[0]["file"], "tests/integration_tests.rs");
}

#[test]
fn test_caller_and_stack_files_share_one_form() {
    let sink = MemoryWriter::new();
    let logger = Logger::new();
    logger
        .add_output("mem", sink.clone(), JsonFormatter::new(false))
        .expect("output added");

    logger.with_caller(0).infoln("caller");
    logger.with_stack(0, 1).infoln("stack");

    let events = json_events(&sink);
    let caller_file = events[0]["file"].as_str().expect("file is text");
    let stack_file = events[1]["frames"][0]["file"]
        .as_str()
        .expect("frame file is text");
    assert_eq!(caller_file, "tests/integration_tests.rs");
    assert_eq!(stack_file, caller_file);
}

#[inline(never)]
fn innermost(logger: &Logger) -> Line {
    logger.with_stack(0, 3)
}

#[inline(never)]
fn middle(logger: &Logger) -> Line {
    innermost(logger)
}

#[inline(never)]
fn outer(logger: &Logger) -> Line {
    middle(logger)
}

#[test]
fn test_stack_has_requested_depth() {
    let sink = MemoryWriter::new();
    let logger = Logger::new();
    logger
        .add_output("mem", sink.clone(), JsonFormatter::new(false))
        .expect("output added");

    outer(&logger).errorln(ErrorValue::msg("boom"), "with stack");

    let events = json_events(&sink);
    let frames = events[0]["frames"].as_array().expect("frames recorded");
    assert_eq!(frames.len(), 3);
    for frame in frames {
        assert!(!frame["file"].as_str().unwrap_or_default().is_empty());
        assert!(frame["line"].as_u64().unwrap_or(0) > 0);
    }
    assert!(frames[0]["func"]
        .as_str()
        .unwrap_or_default()
        .contains("innermost"));
    assert_eq!(events[0]["error"], "boom");
}

#[test]
fn test_base_fields_and_enrichment() {
    let sink = MemoryWriter::new();
    let logger = Logger::builder()
        .field("service", "billing")
        .output("mem", sink.clone(), JsonFormatter::new(false))
        .build()
        .expect("valid logger");

    let request = FieldSet::new()
        .try_with("request_id", "r-1")
        .and_then(|f| f.try_with("attempt", 2))
        .expect("custom keys");
    logger.with_fields(&request).infoln("charged");
    logger.infoln("plain");

    let events = json_events(&sink);
    assert_eq!(events[0]["service"], "billing");
    assert_eq!(events[0]["request_id"], "r-1");
    assert_eq!(events[0]["attempt"], 2);
    assert_eq!(events[1]["service"], "billing");
    assert!(events[1].get("request_id").is_none());
}

#[test]
fn test_reserved_keys_in_custom_fields_are_ignored() {
    let sink = MemoryWriter::new();
    let logger = Logger::new();
    logger
        .add_output("mem", sink.clone(), JsonFormatter::new(false))
        .expect("output added");

    assert!(FieldSet::new().try_with(keys::MESSAGE, "forged").is_err());

    logger.infoln("real");
    assert_eq!(json_events(&sink)[0]["message"], "real\n");
}

#[test]
fn test_scoped_outputs() {
    let a = MemoryWriter::new();
    let b = MemoryWriter::new();
    let logger = Logger::builder()
        .output("a", a.clone(), SimpleFormatter::new())
        .output("b", b.clone(), SimpleFormatter::new())
        .build()
        .expect("valid logger");

    let only_b = logger.scoped_to_outputs(["b", "missing"]);
    only_b.infoln("for b");
    only_b.with_caller(0).infoln("for b again");

    assert!(a.is_empty());
    assert_eq!(b.contents().lines().filter(|l| l.contains("for b")).count(), 2);
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::new();
    logger
        .add_output(
            "file",
            FileWriter::new(&log_file).expect("Failed to open log file"),
            SimpleFormatter::new(),
        )
        .expect("output added");

    let malicious = "User login\n[2024-10-17 00:00:00] Error: fake\n";
    logger.infoln(malicious);
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1, "one event is one line");
    assert!(content.contains("User login\\n[2024-10-17"));
}

#[test]
fn test_logger_from_toml_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("configured.log");

    let document = format!(
        r#"
level = "Warning"
report_errors = false

[fields]
service = "billing"
replica = 3

[[outputs]]
name = "file"
target = {{ type = "file", path = "{}" }}
format = {{ type = "json" }}
"#,
        log_file.display()
    );
    let config: LoggerConfig = toml::from_str(&document).expect("valid config");
    let logger = config.build().expect("logger builds");

    logger.infoln("filtered");
    logger.warningln("kept");
    logger.flush().expect("flushed");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let events: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["message"], "kept\n");
    assert_eq!(events[0]["service"], "billing");
    assert_eq!(events[0]["replica"], 3);
}

struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_failing_output_reported_and_isolated() {
    let failures = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&failures);
    let good = MemoryWriter::new();

    let logger = Logger::builder()
        .output("broken", BrokenPipe, SimpleFormatter::new())
        .output("good", good.clone(), SimpleFormatter::new())
        .on_error(Arc::new(move |err: &LoggerError| {
            assert_eq!(err.output_name(), Some("broken"));
            seen.fetch_add(1, Ordering::SeqCst);
        }))
        .build()
        .expect("valid logger");

    logger.infoln("one");
    logger.infoln("two");

    assert_eq!(failures.load(Ordering::SeqCst), 2);
    assert_eq!(good.contents().lines().count(), 2);
    assert_eq!(logger.metrics().write_failures(), 2);
}

#[test]
fn test_outputs_managed_at_runtime() {
    let logger = Logger::new();
    let sink = MemoryWriter::new();

    logger
        .add_output("late", sink.clone(), SimpleFormatter::new())
        .expect("output added");
    assert!(logger.has_output("late"));

    logger.infoln("seen");
    assert!(logger.remove_output("late"));
    logger.infoln("unseen");

    assert!(!logger.has_output("late"));
    assert!(sink.contents().contains("seen"));
    assert!(!sink.contents().contains("unseen"));
}
