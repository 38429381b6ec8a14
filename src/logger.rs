//! The underlying loggers a [`DecoratedLogger`](crate::DecoratedLogger) wraps.
//!
//! An underlying logger is a shared, duck-typed value: it may expose any
//! subset of the six level methods as named members, may carry data members
//! (most notably `level`), and may itself be callable. Decoration only reads
//! the shape once; afterwards the decorated logger keeps a shared handle and
//! calls the resolved methods with the logger as receiver.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::decorator::DecoratedLogger;
use crate::level::Level;

/// A log method: receives the logger it was resolved from and the final
/// argument list (message first).
pub type LogFn = Arc<dyn Fn(&Logger, Vec<Value>) + Send + Sync>;

/// A named member of a duck-typed object: either something callable or plain data.
pub enum Member<F> {
    Call(F),
    Data(Value),
}

impl<F: Clone> Clone for Member<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Call(f) => Self::Call(f.clone()),
            Self::Data(v) => Self::Data(v.clone()),
        }
    }
}

impl<F> fmt::Debug for Member<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call(_) => f.write_str("Call(..)"),
            Self::Data(v) => f.debug_tuple("Data").field(v).finish(),
        }
    }
}

impl<F> Member<F> {
    /// JavaScript-style truthiness: data members that are `null`, `false`,
    /// `0` or `""` count as not supplied.
    pub fn is_supplied(&self) -> bool {
        match self {
            Self::Call(_) => true,
            Self::Data(v) => is_truthy(v),
        }
    }

    /// Short description of the member's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Call(_) => "function",
            Self::Data(v) => value_kind(v),
        }
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct LoggerInner {
    callable: Option<LogFn>,
    members: RwLock<BTreeMap<String, Member<LogFn>>>,
}

/// A shared handle to an underlying logger.
///
/// Cloning the handle does not copy the logger; all clones see the same
/// members. Build one with [`Logger::object`] or [`Logger::callable`] and
/// the `with_*` builder methods.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    /// A plain object logger with no members yet.
    pub fn object() -> Self {
        Self::from_parts(None)
    }

    /// A callable logger. Calling it forwards to `f`.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&Logger, Vec<Value>) + Send + Sync + 'static,
    {
        Self::from_parts(Some(Arc::new(f)))
    }

    fn from_parts(callable: Option<LogFn>) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                callable,
                members: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Add a callable member named `name`.
    #[must_use]
    pub fn with_method<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Logger, Vec<Value>) + Send + Sync + 'static,
    {
        self.set(name, Member::Call(Arc::new(f)));
        self
    }

    /// Add a level method.
    #[must_use]
    pub fn with_level<F>(self, level: Level, f: F) -> Self
    where
        F: Fn(&Logger, Vec<Value>) + Send + Sync + 'static,
    {
        self.with_method(level.name(), f)
    }

    /// Add a data member named `name`.
    #[must_use]
    pub fn with_data(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, Member::Data(value.into()));
        self
    }

    /// Whether the logger itself can be called.
    pub fn is_callable(&self) -> bool {
        self.inner.callable.is_some()
    }

    /// Call the logger itself. Returns `false` if it is not callable.
    pub fn call(&self, args: Vec<Value>) -> bool {
        match &self.inner.callable {
            Some(f) => {
                f(self, args);
                true
            }
            None => false,
        }
    }

    pub(crate) fn callable_fn(&self) -> Option<LogFn> {
        self.inner.callable.clone()
    }

    pub fn get(&self, name: &str) -> Option<Member<LogFn>> {
        self.inner.members.read().get(name).cloned()
    }

    pub fn set(&self, name: &str, member: Member<LogFn>) {
        self.inner.members.write().insert(name.to_string(), member);
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.members.read().contains_key(name)
    }

    /// The callable member named `name`, if there is one.
    pub fn method(&self, name: &str) -> Option<LogFn> {
        match self.inner.members.read().get(name) {
            Some(Member::Call(f)) => Some(f.clone()),
            _ => None,
        }
    }

    /// Data member named `name`, if there is one.
    pub fn data(&self, name: &str) -> Option<Value> {
        match self.inner.members.read().get(name) {
            Some(Member::Data(v)) => Some(v.clone()),
            _ => None,
        }
    }

    /// The logger's own `level` member, if it is a valid level name.
    pub fn level(&self) -> Option<Level> {
        self.data("level").as_ref().and_then(Level::from_json_value)
    }

    pub fn set_level(&self, level: Level) {
        self.set("level", Member::Data(Value::String(level.name().to_string())));
    }

    /// Whether two handles refer to the same logger.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("callable", &self.is_callable())
            .field("members", &*self.inner.members.read())
            .finish()
    }
}

/// Anything that can be handed to [`decorate`](crate::decorate).
///
/// [`Target::Value`] carries dynamically-shaped input (for example a value
/// read from a configuration document); only JSON objects are accepted and
/// they behave like an object logger whose members are all data.
#[derive(Debug, Clone)]
pub enum Target {
    Logger(Logger),
    Decorated(DecoratedLogger),
    Value(Value),
}

impl From<Logger> for Target {
    fn from(logger: Logger) -> Self {
        Self::Logger(logger)
    }
}

impl From<&Logger> for Target {
    fn from(logger: &Logger) -> Self {
        Self::Logger(logger.clone())
    }
}

impl From<DecoratedLogger> for Target {
    fn from(logger: DecoratedLogger) -> Self {
        Self::Decorated(logger)
    }
}

impl From<&DecoratedLogger> for Target {
    fn from(logger: &DecoratedLogger) -> Self {
        Self::Decorated(logger.clone())
    }
}

impl From<Value> for Target {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}
