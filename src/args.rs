//! Argument lists for decorated log calls.
//!
//! A call's arguments are either given up front or produced lazily by a
//! closure. The closure only runs once the call has passed the level and
//! `level_check` gates, so expensive messages cost nothing when filtered.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Arguments of one log call. The first argument is the message.
pub enum Args<'a> {
    Eager(Vec<Value>),
    Lazy(Box<dyn FnOnce() -> Value + 'a>),
}

impl<'a> Args<'a> {
    /// Arguments computed on demand. A JSON array result becomes the
    /// argument list; any other value becomes a single argument.
    pub fn lazy<F, R>(f: F) -> Self
    where
        F: FnOnce() -> R + 'a,
        R: Into<Value>,
    {
        Self::Lazy(Box::new(move || f().into()))
    }

    /// Produce the final argument list, running a lazy producer if needed.
    pub fn resolve(self) -> Vec<Value> {
        match self {
            Self::Eager(args) => args,
            Self::Lazy(f) => match f() {
                Value::Array(args) => args,
                single => vec![single],
            },
        }
    }
}

impl fmt::Debug for Args<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(args) => f.debug_tuple("Eager").field(args).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<&str> for Args<'_> {
    fn from(message: &str) -> Self {
        Self::Eager(vec![Value::String(message.to_string())])
    }
}

impl From<String> for Args<'_> {
    fn from(message: String) -> Self {
        Self::Eager(vec![Value::String(message)])
    }
}

impl From<&String> for Args<'_> {
    fn from(message: &String) -> Self {
        Self::from(message.as_str())
    }
}

impl From<Value> for Args<'_> {
    fn from(value: Value) -> Self {
        Self::Eager(vec![value])
    }
}

impl From<Vec<Value>> for Args<'_> {
    fn from(args: Vec<Value>) -> Self {
        Self::Eager(args)
    }
}

/// Convert any serializable value into a log argument (`null` if it cannot be represented).
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Build an eager [`Args`] list from serializable expressions.
///
/// ```
/// let args = logwrap::args!["listening on", 8080];
/// assert_eq!(args.resolve(), vec![serde_json::json!("listening on"), serde_json::json!(8080)]);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        $crate::Args::from(::std::vec![$($crate::args::to_value(&$arg)),*])
    };
}
