//! Formatters render a field set into the text written to an output

pub mod json;
pub mod simple;

pub use json::JsonFormatter;
pub use simple::SimpleFormatter;

use crate::core::FieldSet;

/// Renders one event.
///
/// Any `Fn(&FieldSet) -> String + Send + Sync` closure is a formatter.
pub trait Formatter: Send + Sync {
    fn format(&self, fields: &FieldSet) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&FieldSet) -> String + Send + Sync,
{
    fn format(&self, fields: &FieldSet) -> String {
        self(fields)
    }
}
