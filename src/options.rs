//! Options accepted by [`decorate`](crate::decorate).
//!
//! Options can be built in code with the builder methods on
//! [`DecorateOptions`], or read from a dynamic document with
//! [`DecorateOptions::from_value`], which applies the same validation rules
//! a loosely-typed caller would hit (wrong shapes are rejected, falsy values
//! count as not supplied).

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::decorator::DecoratedLogger;
use crate::error::WrapError;
use crate::level::Level;
use crate::location::CaptureFn;
use crate::logger::{is_truthy, value_kind};
use crate::stat::{Stat, StatProvider};
use crate::timestamp::Clock;

/// Final per-call gate: `(level, logger) -> emit?`.
pub type LevelCheck = Arc<dyn Fn(Level, &DecoratedLogger) -> bool + Send + Sync>;

/// An on/off switch that can also carry a custom string.
///
/// For `timestamp` the string is a strftime format; for `call_location` it is
/// the prefix stripped from stack locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ToggleRepr")]
pub enum Toggle {
    #[default]
    Off,
    On,
    Custom(String),
}

impl Toggle {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }

    pub fn custom(&self) -> Option<&str> {
        match self {
            Self::Custom(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret a dynamic value: strings select [`Toggle::Custom`], anything
    /// else is judged by truthiness.
    pub fn from_json_value(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.is_empty() => Self::Custom(s.clone()),
            other if is_truthy(other) => Self::On,
            _ => Self::Off,
        }
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<&str> for Toggle {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<String> for Toggle {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Off
        } else {
            Self::Custom(s)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToggleRepr {
    Flag(bool),
    Text(String),
}

impl From<ToggleRepr> for Toggle {
    fn from(repr: ToggleRepr) -> Self {
        match repr {
            ToggleRepr::Flag(b) => Self::from(b),
            ToggleRepr::Text(s) => Self::from(s),
        }
    }
}

/// Decoration options.
#[derive(Clone, Default)]
pub struct DecorateOptions {
    /// Tags prefixed to every message, in order. Empty tags are discarded.
    pub tags: Vec<String>,
    /// Partial stat provider; missing operations become no-ops.
    pub stat: Option<StatProvider>,
    /// Final gate evaluated on every call that passes the level threshold.
    pub level_check: Option<LevelCheck>,
    /// Prefix the caller's location; a custom string is the prefix stripped from paths.
    pub call_location: Toggle,
    /// Prefix the current UTC time; a custom string is the strftime format.
    pub timestamp: Toggle,
    /// Root stripped from call locations when `call_location` is not a custom prefix.
    pub project_root: Option<String>,
    /// Path segment identifying dependency frames. Defaults to `.cargo/registry`.
    pub dependency_marker: Option<String>,
    /// Time source for timestamps. Defaults to the system clock.
    pub clock: Option<Arc<dyn Clock>>,
    /// Stack capture for call locations. Defaults to [`capture_backtrace`](crate::location::capture_backtrace).
    pub capture: Option<CaptureFn>,
}

impl DecorateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn stat(mut self, provider: StatProvider) -> Self {
        self.stat = Some(provider);
        self
    }

    #[must_use]
    pub fn level_check<F>(mut self, check: F) -> Self
    where
        F: Fn(Level, &DecoratedLogger) -> bool + Send + Sync + 'static,
    {
        self.level_check = Some(Arc::new(check));
        self
    }

    #[must_use]
    pub fn call_location(mut self, toggle: impl Into<Toggle>) -> Self {
        self.call_location = toggle.into();
        self
    }

    #[must_use]
    pub fn timestamp(mut self, toggle: impl Into<Toggle>) -> Self {
        self.timestamp = toggle.into();
        self
    }

    #[must_use]
    pub fn project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn dependency_marker(mut self, marker: impl Into<String>) -> Self {
        self.dependency_marker = Some(marker.into());
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn capture<F>(mut self, capture: F) -> Self
    where
        F: Fn() -> Vec<crate::location::StackFrame> + Send + Sync + 'static,
    {
        self.capture = Some(Arc::new(capture));
        self
    }

    /// Read options from a dynamic document.
    ///
    /// Recognized keys: `tags`, `stat`, `levelCheck`, `callLocation`,
    /// `timestamp`, `projectRoot`. Falsy documents mean "no options". An
    /// array is an object without any of those keys, so it also yields the
    /// defaults (and as `stat`, a provider with no operations).
    ///
    /// # Errors
    ///
    /// [`WrapError::InvalidArgument`] if the document is truthy but neither
    /// an object nor an array, if `levelCheck` is supplied (a document cannot hold a
    /// function), if `stat` is supplied and neither an object nor an array, or if any stat
    /// operation is supplied and not a function.
    pub fn from_value(value: &Value) -> Result<Self, WrapError> {
        if !is_truthy(value) || value.is_array() {
            return Ok(Self::default());
        }
        let Value::Object(map) = value else {
            return Err(WrapError::invalid(format!(
                "when supplied options MUST be assignable (object or function). Got {}",
                value_kind(value)
            )));
        };

        let mut options = Self::default();

        if let Some(Value::Array(tags)) = map.get("tags") {
            options.tags = tags
                .iter()
                .filter_map(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(check) = map.get("levelCheck")
            && is_truthy(check)
        {
            return Err(WrapError::invalid(format!(
                "when supplied options.levelCheck MUST be a function. Got {}",
                value_kind(check)
            )));
        }

        if let Some(stat) = map.get("stat")
            && is_truthy(stat)
        {
            let provider = match stat {
                Value::Object(members) => StatProvider::from_json_map(members),
                Value::Array(_) => StatProvider::new(),
                other => {
                    return Err(WrapError::invalid(format!(
                        "when supplied options.stat MUST be assignable (function or object). Got {}",
                        value_kind(other)
                    )));
                }
            };
            Stat::from_provider(Some(&provider))?;
            options.stat = Some(provider);
        }

        if let Some(v) = map.get("callLocation") {
            options.call_location = Toggle::from_json_value(v);
        }
        if let Some(v) = map.get("timestamp") {
            options.timestamp = Toggle::from_json_value(v);
        }
        if let Some(Value::String(root)) = map.get("projectRoot")
            && !root.is_empty()
        {
            options.project_root = Some(root.clone());
        }

        Ok(options)
    }
}

impl fmt::Debug for DecorateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecorateOptions")
            .field("tags", &self.tags)
            .field("stat", &self.stat)
            .field("level_check", &self.level_check.is_some())
            .field("call_location", &self.call_location)
            .field("timestamp", &self.timestamp)
            .field("project_root", &self.project_root)
            .field("dependency_marker", &self.dependency_marker)
            .field("clock", &self.clock)
            .field("capture", &self.capture.is_some())
            .finish()
    }
}
