//! Human-readable text formatter

use super::Formatter;
use crate::core::{FieldSet, LogLevel, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use std::fmt::Write;

/// Renders `[time] Level: message`, followed by indented blocks for custom
/// fields, the error, the caller and the stack when present.
///
/// ```text
/// [2025-01-08 10:30:45] Error: upload failed
///     "bucket"="media" "size"="1024"
///     connection reset
///     Caller:
///     src/upload.rs (88)
/// ```
///
/// Custom fields are sorted by key. Line breaks inside the message, field
/// values and error text are escaped so that one event never reads as
/// several.
#[derive(Debug, Clone, Default)]
pub struct SimpleFormatter {
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl SimpleFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Color the severity tag. Has no effect without the `console` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn level_tag(&self, level: LogLevel) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return level.to_string().color(level.color_code()).to_string();
        }
        level.to_string()
    }

    fn sanitize_message(message: &str) -> String {
        Self::escape_line_breaks(message.strip_suffix('\n').unwrap_or(message))
    }

    fn escape_line_breaks(text: &str) -> String {
        text.replace('\n', "\\n").replace('\r', "\\r")
    }
}

impl Formatter for SimpleFormatter {
    fn format(&self, fields: &FieldSet) -> String {
        let mut out = format!(
            "[{}] {}: {}\n",
            self.timestamp_format.format(&fields.time()),
            self.level_tag(fields.level()),
            Self::sanitize_message(&fields.message())
        );

        let custom = fields.user_fields().entries();
        if !custom.is_empty() {
            let pairs: Vec<String> = custom
                .iter()
                .map(|(key, value)| {
                    format!(
                        "\"{}\"=\"{}\"",
                        Self::escape_line_breaks(&key),
                        Self::escape_line_breaks(&value.to_string())
                    )
                })
                .collect();
            let _ = writeln!(out, "\t{}", pairs.join(" "));
        }

        if let Some(err) = fields.error() {
            let _ = writeln!(out, "\t{}", Self::escape_line_breaks(&err.to_string()));
        }

        let file = fields.file();
        if !file.is_empty() {
            let _ = writeln!(out, "\tCaller:\n\t{} ({})", file, fields.line());
        }

        let frames = fields.frames();
        if !frames.is_empty() {
            out.push_str("\tStack:\n");
            for frame in &frames {
                let _ = writeln!(
                    out,
                    "\t{} ({})\n\t\t{}",
                    frame.file(),
                    frame.line(),
                    frame.func()
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{keys, ErrorValue, Frame};
    use chrono::TimeZone;
    use chrono::Utc;

    fn event(level: LogLevel, message: &str) -> FieldSet {
        let fields = FieldSet::new();
        let time = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        fields.set(keys::TIME, time);
        fields.set(keys::MESSAGE, message);
        fields.set(keys::LOG_LEVEL, level);
        fields
    }

    #[test]
    fn test_header_line() {
        let out = SimpleFormatter::new().format(&event(LogLevel::INFO, "hello\n"));
        assert_eq!(out, "[2025-01-08 10:30:45] Info: hello\n");
    }

    #[test]
    fn test_message_without_newline_gets_one() {
        let out = SimpleFormatter::new().format(&event(LogLevel::WARNING, "careful"));
        assert_eq!(out, "[2025-01-08 10:30:45] Warning: careful\n");
    }

    #[test]
    fn test_log_injection_is_escaped() {
        let out = SimpleFormatter::new().format(&event(
            LogLevel::INFO,
            "login\n[2025-01-08 10:30:45] Error: forged\n",
        ));
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("login\\n[2025-01-08"));
    }

    #[test]
    fn test_field_values_and_error_are_escaped() {
        let fields = event(LogLevel::ERROR, "failed");
        fields.try_set("input", "a\nb\r\nc").unwrap();
        fields.set(keys::ERROR, ErrorValue::msg("line one\n[2025-01-08 10:30:45] Info: forged"));

        let out = SimpleFormatter::new().format(&fields);
        assert_eq!(out.lines().count(), 3, "got {:?}", out);
        assert!(out.contains("\t\"input\"=\"a\\nb\\r\\nc\"\n"), "got {:?}", out);
        assert!(out.contains("\tline one\\n[2025-01-08"), "got {:?}", out);
    }

    #[test]
    fn test_custom_fields_sorted() {
        let fields = event(LogLevel::DEBUG, "m");
        fields.try_set("zeta", 2).unwrap();
        fields.try_set("alpha", "a").unwrap();

        let out = SimpleFormatter::new().format(&fields);
        assert!(out.contains("\t\"alpha\"=\"a\" \"zeta\"=\"2\"\n"), "got {:?}", out);
    }

    #[test]
    fn test_error_caller_and_stack_blocks() {
        let fields = event(LogLevel::ERROR, "failed");
        fields.set(keys::ERROR, ErrorValue::msg("connection reset"));
        fields.set(keys::FILE, "src/upload.rs");
        fields.set(keys::LINE, 88u32);
        let frame = Frame {
            file: "src/upload.rs".to_string(),
            line: 90,
            func: "app::upload".to_string(),
        };
        fields.set(keys::FRAMES, vec![frame.to_fields()]);

        let out = SimpleFormatter::new().format(&fields);
        let expected = "[2025-01-08 10:30:45] Error: failed\n\
                        \tconnection reset\n\
                        \tCaller:\n\
                        \tsrc/upload.rs (88)\n\
                        \tStack:\n\
                        \tsrc/upload.rs (90)\n\
                        \t\tapp::upload\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_custom_timestamp_layout() {
        let out = SimpleFormatter::new()
            .with_timestamp_format(TimestampFormat::Unix)
            .format(&event(LogLevel::INFO, "x"));
        assert!(out.starts_with("[1736332245] Info: x"));
    }

    #[test]
    fn test_custom_level_tag() {
        let out = SimpleFormatter::new().format(&event(LogLevel::from_u8(9), "x"));
        assert!(out.contains("Custom(9): x"));
    }
}
