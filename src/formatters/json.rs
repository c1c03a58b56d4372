//! JSON formatter
//!
//! One JSON object per event with keys in sorted order. Errors render as
//! their message, timestamps as RFC 3339 and nested frames as objects.

use super::Formatter;
use crate::core::FieldSet;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Serializes the whole field set.
///
/// With `indent` set, output is pretty-printed using a tab per level.
/// A serialization failure is reported in place of the event.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    indent: bool,
}

impl JsonFormatter {
    pub fn new(indent: bool) -> Self {
        Self { indent }
    }

    fn encode(&self, fields: &FieldSet) -> serde_json::Result<String> {
        if !self.indent {
            return serde_json::to_string(fields);
        }

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
        fields.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, fields: &FieldSet) -> String {
        match self.encode(fields) {
            Ok(mut text) => {
                text.push('\n');
                text
            }
            Err(e) => format!("{}\n", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{keys, ErrorValue, Frame, LogLevel};
    use chrono::{TimeZone, Utc};

    fn event() -> FieldSet {
        let fields = FieldSet::new();
        let time = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        fields.set(keys::TIME, time);
        fields.set(keys::MESSAGE, "hello\n");
        fields.set(keys::LOG_LEVEL, LogLevel::INFO);
        fields
    }

    #[test]
    fn test_compact_single_line_sorted() {
        let fields = event();
        fields.try_set("user", "ada").unwrap();

        let out = JsonFormatter::new(false).format(&fields);
        assert!(out.ends_with('\n'));
        assert_eq!(out.lines().count(), 1);
        assert_eq!(
            out,
            "{\"loglevel\":\"Info\",\"message\":\"hello\\n\",\"time\":\"2025-01-08T10:30:45.000000000Z\",\"user\":\"ada\"}\n"
        );
    }

    #[test]
    fn test_indented_uses_tabs() {
        let out = JsonFormatter::new(true).format(&event());
        assert!(out.contains("\n\t\"loglevel\": \"Info\""), "got {:?}", out);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_level_parses_back() {
        let out = JsonFormatter::new(false).format(&event());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let level: LogLevel = value["loglevel"].as_str().unwrap().parse().unwrap();
        assert_eq!(level, LogLevel::INFO);
    }

    #[test]
    fn test_error_and_frames() {
        let fields = event();
        fields.set(keys::ERROR, ErrorValue::msg("boom"));
        let frame = Frame {
            file: "src/main.rs".to_string(),
            line: 12,
            func: "app::main".to_string(),
        };
        fields.set(keys::FRAMES, vec![frame.to_fields()]);

        let out = JsonFormatter::new(false).format(&fields);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"], "boom");
        assert_eq!(value["frames"][0]["file"], "src/main.rs");
        assert_eq!(value["frames"][0]["line"], 12);
        assert_eq!(value["frames"][0]["func"], "app::main");
    }

    #[test]
    fn test_output_parses_back_into_field_set() {
        let fields = event();
        fields.set(keys::ERROR, ErrorValue::msg("boom"));
        fields.try_set("attempt", 3).unwrap();
        let frame = Frame {
            file: "src/main.rs".to_string(),
            line: 12,
            func: "app::main".to_string(),
        };
        fields.set(keys::FRAMES, vec![frame.to_fields()]);

        for indent in [false, true] {
            let out = JsonFormatter::new(indent).format(&fields);
            let parsed: FieldSet = serde_json::from_str(&out).unwrap();

            assert_eq!(parsed.message(), "hello\n");
            assert_eq!(parsed.level(), LogLevel::INFO);
            assert_eq!(parsed.time(), fields.time());
            assert_eq!(parsed.error(), Some(ErrorValue::msg("boom")));
            assert_eq!(parsed.frames(), vec![frame.to_fields()]);
            assert_eq!(parsed.user_fields(), fields.user_fields());
        }
    }
}
