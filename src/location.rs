//! Call-location prefixes derived from stack traces.
//!
//! Capturing a stack is runtime-specific, so it is split in two:
//! [`capture_backtrace`] turns a [`std::backtrace::Backtrace`] into
//! [`StackFrame`] records, and [`derive_location`] is a pure function over
//! those records. The capture step can be replaced through
//! [`DecorateOptions`](crate::DecorateOptions), which is how the derivation is
//! tested without depending on the shape of a real stack.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

/// Rendered when no usable frame exists.
pub const UNKNOWN: &str = "unknown";

/// Path segment that marks a frame as belonging to a dependency.
pub const DEPENDENCY_MARKER: &str = ".cargo/registry";

/// Module path prefixes whose frames belong to the decorator itself.
const SELF_MODULES: [&str; 2] = [
    concat!(env!("CARGO_CRATE_NAME"), "::decorator::"),
    concat!(env!("CARGO_CRATE_NAME"), "::location::"),
];

/// `   3: 0x55d0c1a2b3c4 - crate::module::function::h0123456789abcdef`
///
/// The frame number, address column and trailing symbol hash are optional;
/// only the path in between is captured.
static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+:\s+)?(?:0x[0-9a-fA-F]+\s+-\s+)?(\S.*?)(?:::h[0-9a-f]{16})?\s*$")
        .expect("valid symbol pattern")
});

/// `             at /path/to/file.rs:12:5`
static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*at\s+(\S.*?)\s*$").expect("valid location pattern"));

/// One frame of a captured stack: the function symbol and its `file:line:column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub symbol: String,
    pub location: String,
}

impl StackFrame {
    pub fn new(symbol: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            location: location.into(),
        }
    }

    /// Whether this frame is part of the decorator's own implementation.
    pub fn is_decorator_frame(&self) -> bool {
        let symbol = self.symbol.trim_start_matches('<');
        SELF_MODULES.iter().any(|m| symbol.starts_with(m))
    }

    /// Whether this frame belongs to the standard library (call shims, closures glue).
    pub fn is_runtime_frame(&self) -> bool {
        let symbol = self.symbol.trim_start_matches('<');
        self.location.starts_with("/rustc/")
            || RUNTIME_CRATES.iter().any(|c| symbol.starts_with(c))
    }
}

const RUNTIME_CRATES: [&str; 3] = ["core::", "std::", "alloc::"];

/// Replaceable stack capture.
pub type CaptureFn = Arc<dyn Fn() -> Vec<StackFrame> + Send + Sync>;

/// Capture the current stack with [`Backtrace::force_capture`].
///
/// Frames without source information (no debug info) are dropped.
pub fn capture_backtrace() -> Vec<StackFrame> {
    let rendered = format!("{:#}", Backtrace::force_capture());
    parse_backtrace(&rendered)
}

/// Parse the text form of a backtrace into frames.
///
/// Each `at file:line:col` line is attached to the nearest symbol line above
/// it; inlined frames produce several frames sharing a number.
pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
    let mut frames = Vec::new();
    let mut symbol: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = LOCATION_PATTERN.captures(line) {
            if let Some(sym) = symbol.take() {
                frames.push(StackFrame::new(sym, &caps[1]));
            }
        } else if let Some(caps) = SYMBOL_PATTERN.captures(line) {
            symbol = Some(caps[1].to_string());
        }
    }

    frames
}

/// Reduce a captured stack to the rendered call location.
///
/// 1. frames up to and including the decorator's own frames are discarded,
///    along with standard-library frames interleaved with them;
/// 2. `strip_prefix` is removed from the front of every location;
/// 3. the first remaining frame is the primary location;
/// 4. when the primary frame is inside a dependency, the first later frame
///    outside any dependency is appended in parentheses.
pub fn derive_location(frames: &[StackFrame], strip_prefix: &str, dependency_marker: &str) -> String {
    let start = frames
        .iter()
        .position(StackFrame::is_decorator_frame)
        .unwrap_or(0);
    let callers: Vec<&str> = frames[start..]
        .iter()
        .skip_while(|f| f.is_decorator_frame() || f.is_runtime_frame())
        .map(|f| strip(&f.location, strip_prefix))
        .collect();

    let Some(primary) = callers.first() else {
        return UNKNOWN.to_string();
    };

    match first_project_frame(&callers, dependency_marker) {
        Some(project) => format!("{primary} ({project})"),
        None => (*primary).to_string(),
    }
}

fn strip<'a>(location: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return location;
    }
    location.strip_prefix(prefix).unwrap_or(location)
}

/// The first frame outside any dependency, unless that is the primary frame itself.
fn first_project_frame<'a>(callers: &[&'a str], dependency_marker: &str) -> Option<&'a str> {
    match callers.iter().position(|c| !c.contains(dependency_marker)) {
        Some(0) | None => None,
        Some(i) => Some(callers[i]),
    }
}

/// The default prefix stripped from call locations: the consumer's project root.
///
/// `CARGO_MANIFEST_DIR` when it is set in the environment, otherwise the
/// current directory. Always ends with `/`.
pub fn project_root() -> String {
    let mut root = std::env::var("CARGO_MANIFEST_DIR")
        .ok()
        .filter(|dir| !dir.is_empty())
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .map(|dir| dir.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    if !root.ends_with('/') {
        root.push('/');
    }
    root
}

/// Call-location settings bound to a capture function.
#[derive(Clone)]
pub struct CallLocation {
    strip_prefix: String,
    dependency_marker: String,
    capture: CaptureFn,
}

impl CallLocation {
    pub fn new(strip_prefix: String, dependency_marker: String, capture: CaptureFn) -> Self {
        Self {
            strip_prefix,
            dependency_marker,
            capture,
        }
    }

    pub fn strip_prefix(&self) -> &str {
        &self.strip_prefix
    }

    /// Capture the current stack and render the caller's location.
    pub fn render(&self) -> String {
        let frames = (self.capture)();
        derive_location(&frames, &self.strip_prefix, &self.dependency_marker)
    }
}

impl fmt::Debug for CallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallLocation")
            .field("strip_prefix", &self.strip_prefix)
            .field("dependency_marker", &self.dependency_marker)
            .finish_non_exhaustive()
    }
}
