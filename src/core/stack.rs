//! Caller and stack frame capture

use super::fields::{keys, FieldSet};
use once_cell::sync::Lazy;
use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

static WORKING_DIR: Lazy<Option<PathBuf>> = Lazy::new(|| env::current_dir().ok());

/// One resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub func: String,
}

impl Frame {
    pub(crate) fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: normalize_path(Path::new(location.file())),
            line: location.line(),
            func: String::new(),
        }
    }

    /// The frame as a nested field set of `file`, `line` and `func`.
    pub fn to_fields(&self) -> FieldSet {
        let fields = FieldSet::new();
        fields.set(keys::FILE, self.file.clone());
        fields.set(keys::LINE, self.line);
        fields.set(keys::FUNC, self.func.clone());
        fields
    }
}

/// Paths under the process's starting directory are recorded relative to
/// it; everything else is kept as given.
///
/// Debug info carries absolute paths while `#[track_caller]` locations are
/// relative to the build root, so both end up in the same form.
fn normalize_path(path: &Path) -> String {
    let relative = WORKING_DIR
        .as_deref()
        .filter(|_| path.is_absolute())
        .and_then(|dir| path.strip_prefix(dir).ok());
    relative.unwrap_or(path).display().to_string()
}

fn is_boundary(frame: &backtrace::Frame) -> bool {
    frame.symbol_address() as usize == capture_frames as usize
}

/// Resolved symbols of one physical frame, innermost inlined call first.
struct PhysicalFrame {
    boundary: bool,
    symbols: Vec<(String, Option<Frame>)>,
}

/// Capture up to `depth` frames, starting `skip` frames above the caller of
/// the public entry point that invoked this function.
///
/// Every entry point (`with_caller`, `with_stack`) must call this directly so
/// that exactly one physical frame sits between it and user code. Frames
/// without symbol information end the capture early.
#[inline(never)]
pub(crate) fn capture_frames(skip: usize, depth: usize) -> Vec<Frame> {
    if depth == 0 {
        return Vec::new();
    }

    let mut physical: Vec<PhysicalFrame> = Vec::new();
    backtrace::trace(|frame| {
        let mut symbols = Vec::new();
        backtrace::resolve_frame(frame, |symbol| {
            let name = symbol
                .name()
                .map(|n| format!("{:#}", n))
                .unwrap_or_default();
            let resolved = match (symbol.filename(), symbol.lineno()) {
                (Some(file), Some(line)) if line > 0 => Some(Frame {
                    file: normalize_path(file),
                    line,
                    func: name.clone(),
                }),
                _ => None,
            };
            symbols.push((name, resolved));
        });
        physical.push(PhysicalFrame {
            boundary: is_boundary(frame),
            symbols,
        });
        true
    });

    // Prefer the frame whose entry address is this function. Without a
    // usable address, fall back to the exact symbol name; closures and
    // generic helpers instantiated from here only contain it.
    let boundary = physical.iter().position(|f| f.boundary).or_else(|| {
        physical.iter().rposition(|f| {
            f.symbols.iter().any(|(name, _)| {
                name == "capture_frames" || name.ends_with("::capture_frames")
            })
        })
    });
    let Some(boundary) = boundary else {
        return Vec::new();
    };

    // The next physical frame is the entry point, which is never inlined.
    physical
        .into_iter()
        .skip(boundary + 2)
        .flat_map(|f| f.symbols)
        .skip(skip)
        .map(|(_, frame)| frame)
        .take(depth)
        .take_while(Option::is_some)
        .flatten()
        .collect()
}
