//! Normalized statistics-recording interface.
//!
//! A decorated logger always exposes the seven stat operations. Operations
//! the caller's provider does not supply become no-ops that still complete a
//! trailing callback, so callback-style callers behave the same whether or
//! not statistics are wired up.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::WrapError;
use crate::logger::{Member, value_kind};

/// Completion callback passed as the last argument of a stat call.
pub type Callback = Box<dyn FnOnce() + Send>;

/// A stat operation: `(name, value, callback)`.
pub type StatFn = Arc<dyn Fn(&str, Option<Value>, Option<Callback>) + Send + Sync>;

/// Names of the recognized stat operations.
pub const STAT_OPERATIONS: [&str; 7] = [
    "increment",
    "decrement",
    "histogram",
    "gauge",
    "timing",
    "set",
    "unique",
];

/// A partial stat provider as supplied by the caller.
///
/// Members are duck-typed like a logger's: any recognized operation that is
/// supplied must be callable, unrecognized members are ignored.
#[derive(Debug, Clone, Default)]
pub struct StatProvider {
    members: BTreeMap<String, Member<StatFn>>,
}

impl StatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callable operation.
    #[must_use]
    pub fn with<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&str, Option<Value>, Option<Callback>) + Send + Sync + 'static,
    {
        self.members.insert(name.to_string(), Member::Call(Arc::new(f)));
        self
    }

    /// Add a plain data member (rejected at decoration time if it shadows an operation).
    #[must_use]
    pub fn with_data(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.members.insert(name.to_string(), Member::Data(value.into()));
        self
    }

    /// Build a provider from a dynamic document; every member becomes data.
    pub(crate) fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        let members = map
            .iter()
            .map(|(k, v)| (k.clone(), Member::Data(v.clone())))
            .collect();
        Self { members }
    }
}

/// The complete, normalized stat interface exposed by a decorated logger.
#[derive(Clone)]
pub struct Stat {
    increment: StatFn,
    decrement: StatFn,
    histogram: StatFn,
    gauge: StatFn,
    timing: StatFn,
    set: StatFn,
    unique: StatFn,
}

impl Stat {
    /// All seven operations as no-ops.
    pub fn noop() -> Self {
        let noop: StatFn = Arc::new(noop);
        Self {
            increment: noop.clone(),
            decrement: noop.clone(),
            histogram: noop.clone(),
            gauge: noop.clone(),
            timing: noop.clone(),
            set: noop.clone(),
            unique: noop,
        }
    }

    /// Validate `provider` and fill every missing operation with a no-op.
    ///
    /// Fails with [`WrapError::InvalidArgument`] naming the first recognized
    /// member that is supplied but not callable.
    pub fn from_provider(provider: Option<&StatProvider>) -> Result<Self, WrapError> {
        let Some(provider) = provider else {
            return Ok(Self::noop());
        };
        let resolve = |name: &str| -> Result<StatFn, WrapError> {
            match provider.members.get(name) {
                Some(Member::Call(f)) => Ok(f.clone()),
                Some(member @ Member::Data(v)) if member.is_supplied() => {
                    Err(WrapError::invalid(format!(
                        "when supplied options.stat.{name} MUST be a function. Got {}",
                        value_kind(v)
                    )))
                }
                _ => Ok(Arc::new(noop)),
            }
        };
        Ok(Self {
            increment: resolve("increment")?,
            decrement: resolve("decrement")?,
            histogram: resolve("histogram")?,
            gauge: resolve("gauge")?,
            timing: resolve("timing")?,
            set: resolve("set")?,
            unique: resolve("unique")?,
        })
    }

    /// Increment a counter (`value` defaults to 1 in most providers).
    pub fn increment(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.increment)(name, value, callback);
    }

    /// Decrement a counter.
    pub fn decrement(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.decrement)(name, value, callback);
    }

    /// Record a histogram sample.
    pub fn histogram(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.histogram)(name, value, callback);
    }

    /// Set a gauge.
    pub fn gauge(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.gauge)(name, value, callback);
    }

    /// Record how long an operation took.
    pub fn timing(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.timing)(name, value, callback);
    }

    /// Count a unique occurrence.
    pub fn set(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.set)(name, value, callback);
    }

    /// Count a unique occurrence; same contract as [`set`](Self::set).
    pub fn unique(&self, name: &str, value: Option<Value>, callback: Option<Callback>) {
        (self.unique)(name, value, callback);
    }
}

impl fmt::Debug for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stat").finish_non_exhaustive()
    }
}

/// Does nothing except complete the callback, if one was passed.
fn noop(_name: &str, _value: Option<Value>, callback: Option<Callback>) {
    if let Some(cb) = callback {
        cb();
    }
}
