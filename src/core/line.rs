//! Line builders with copy-on-write enrichment
//!
//! A [`LineBuilder`] is shared: the logger's base builder and scoped handles
//! are used from many threads at once and are never mutated after
//! construction. The first enrichment call on a shared builder copies its
//! fields into an owned [`Line`]; later calls on that `Line` mutate it in
//! place. Two threads chaining from the same builder therefore never see
//! each other's fields.

use super::field_value::ErrorValue;
use super::fields::{keys, FieldSet};
use super::log::Log;
use super::log_level::LogLevel;
use super::logger::Dispatcher;
use super::stack::{self, Frame};
use chrono::Utc;
use std::panic::Location;
use std::sync::Arc;

/// A reusable, shareable builder.
pub struct LineBuilder {
    dispatcher: Arc<Dispatcher>,
    fields: FieldSet,
    targets: Option<Arc<[String]>>,
}

impl LineBuilder {
    pub(crate) fn new(
        dispatcher: Arc<Dispatcher>,
        fields: FieldSet,
        targets: Option<Arc<[String]>>,
    ) -> Self {
        Self {
            dispatcher,
            fields,
            targets,
        }
    }

    /// Fields copied into every line forked from this builder.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Output names this builder dispatches to, if restricted.
    pub fn targets(&self) -> Option<&[String]> {
        self.targets.as_deref()
    }

    /// Copy this builder's current fields into a new owned line.
    pub fn fork(&self) -> Line {
        Line {
            dispatcher: Arc::clone(&self.dispatcher),
            fields: self.fields.clone(),
            targets: self.targets.clone(),
        }
    }
}

impl Log for &LineBuilder {
    #[track_caller]
    #[inline(never)]
    fn with_caller(self, skip: usize) -> Line {
        let site = match skip {
            0 => Some(Frame::from_location(Location::caller())),
            n => stack::capture_frames(n, 1).into_iter().next(),
        };
        self.fork().attach_caller(site)
    }

    #[inline(never)]
    fn with_stack(self, skip: usize, depth: usize) -> Line {
        let frames = stack::capture_frames(skip, depth);
        self.fork().attach_frames(frames)
    }

    fn with_fields(self, fields: &FieldSet) -> Line {
        self.fork().with_fields(fields)
    }

    fn emit(self, level: LogLevel, error: Option<ErrorValue>, message: String) {
        self.fork().emit(level, error, message);
    }
}

/// An owned builder forked from a [`LineBuilder`].
///
/// Enrichment mutates the line in place; emission consumes it.
pub struct Line {
    dispatcher: Arc<Dispatcher>,
    fields: FieldSet,
    targets: Option<Arc<[String]>>,
}

impl Line {
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub(crate) fn attach_caller(self, site: Option<Frame>) -> Self {
        if let Some(site) = site {
            self.fields.set(keys::FILE, site.file);
            self.fields.set(keys::LINE, site.line);
        }
        self
    }

    pub(crate) fn attach_frames(self, frames: Vec<Frame>) -> Self {
        if !frames.is_empty() {
            let frames: Vec<FieldSet> = frames.iter().map(Frame::to_fields).collect();
            self.fields.set(keys::FRAMES, frames);
        }
        self
    }
}

impl Log for Line {
    #[track_caller]
    #[inline(never)]
    fn with_caller(self, skip: usize) -> Line {
        let site = match skip {
            0 => Some(Frame::from_location(Location::caller())),
            n => stack::capture_frames(n, 1).into_iter().next(),
        };
        self.attach_caller(site)
    }

    #[inline(never)]
    fn with_stack(self, skip: usize, depth: usize) -> Line {
        let frames = stack::capture_frames(skip, depth);
        self.attach_frames(frames)
    }

    fn with_fields(self, fields: &FieldSet) -> Line {
        self.fields.merge_user_fields(fields);
        self
    }

    fn emit(self, level: LogLevel, error: Option<ErrorValue>, message: String) {
        if let Some(error) = error {
            self.fields.set(keys::ERROR, error);
        }
        self.fields.set(keys::TIME, Utc::now());
        self.fields.set(keys::MESSAGE, message);
        self.fields.set(keys::LOG_LEVEL, level);
        self.dispatcher.dispatch(&self.fields, self.targets.as_deref());
    }
}
