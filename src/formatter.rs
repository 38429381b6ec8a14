//! Text rendering shared by the decorator and the console backend.
//!
//! - Prefix parts render as `[p1][p2]...[pn]`, glued to the message with no
//!   separator
//! - Non-string messages are coerced to display text
//! - Console lines follow the `BADGE: message extra...` layout with an
//!   optionally colored badge

use std::fmt::Write;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::level::Level;

/// Render prefix parts as `[p1][p2]...`; empty when there are no parts.
pub fn render_prefix<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for part in parts {
        out.push('[');
        out.push_str(part.as_ref());
        out.push(']');
    }
    out
}

/// Format a JSON value for display.
///
/// - Strings: unquoted
/// - Numbers/bools: as-is
/// - Arrays and objects: compact JSON
/// - Null: "null"
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Prefix the first argument with `prefix`, coercing it to a string.
///
/// An empty argument list gets an empty message so the prefix is still emitted.
pub fn apply_prefix(args: &mut Vec<Value>, prefix: &str) {
    if args.is_empty() {
        args.push(Value::String(String::new()));
    }
    let message = format_value(&args[0]);
    args[0] = Value::String(format!("{prefix}{message}"));
}

/// Format one console line: `BADGE: message extra1 extra2`.
pub fn format_console_line(level: Level, args: &[Value], use_color: bool, out: &mut String) {
    let badge = level.badge();
    if use_color {
        let _ = write!(out, "{}:", badge.style(level.style()));
    } else {
        out.push_str(badge);
        out.push(':');
    }

    for arg in args {
        out.push(' ');
        out.push_str(&format_value(arg));
    }
}
