//! An underlying logger that records calls instead of printing them.
//!
//! Use it in tests to check exactly which level method a decorated logger
//! invoked and with which arguments.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::formatter::format_value;
use crate::level::Level;
use crate::logger::{Logger, Member};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Name of the underlying method that was invoked.
    pub method: String,
    pub args: Vec<Value>,
}

impl Call {
    /// The first argument rendered as text (empty if there were no arguments).
    pub fn message(&self) -> String {
        self.args.first().map(format_value).unwrap_or_default()
    }
}

/// Recording logger. Clones share the same logger and call list.
#[derive(Clone)]
pub struct Recorder {
    logger: Logger,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    /// A recorder exposing all six level methods.
    pub fn new() -> Self {
        Self::with_levels(&Level::ALL)
    }

    /// A recorder exposing only the given level methods.
    pub fn with_levels(levels: &[Level]) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::object();
        for level in levels {
            let sink = calls.clone();
            let method = level.name();
            logger = logger.with_level(*level, move |_, args| {
                sink.lock().push(Call {
                    method: method.to_string(),
                    args,
                });
            });
        }
        Self { logger, calls }
    }

    /// Give the underlying logger a `level` data member.
    #[must_use]
    pub fn with_level_member(self, level: impl Into<Value>) -> Self {
        self.logger.set("level", Member::Data(level.into()));
        self
    }

    /// Handle to the recording logger (to pass to [`decorate`](crate::decorate)).
    pub fn logger(&self) -> Logger {
        self.logger.clone()
    }

    /// Record a call by hand, e.g. from a custom method added to another logger.
    pub fn record(&self, method: &str, args: Vec<Value>) {
        self.calls.lock().push(Call {
            method: method.to_string(),
            args,
        });
    }

    /// Copy of all calls so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// First argument of every call, rendered as text.
    pub fn messages(&self) -> Vec<String> {
        self.calls.lock().iter().map(Call::message).collect()
    }

    /// Remove and return all calls so far.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recorder")
            .field("logger", &self.logger)
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}
