//! Decoration of underlying loggers.
//!
//! [`decorate`] resolves the underlying logger's shape once into a complete
//! level table, validates the options and returns a [`DecoratedLogger`]
//! handle. Every level method on the handle then runs the same pipeline:
//!
//! 1. threshold gate (`levels[active] >= levels[call]`)
//! 2. `level_check` gate
//! 3. argument resolution (lazy producers run here)
//! 4. prefix composition: `[timestamp][call location][tag]...`
//! 5. message coercion and prefixing
//! 6. invocation of the resolved method with the underlying logger as receiver

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::args::Args;
use crate::error::WrapError;
use crate::formatter::{apply_prefix, render_prefix};
use crate::level::{Level, levels_map};
use crate::location::{self, CallLocation, DEPENDENCY_MARKER};
use crate::logger::{LogFn, Logger, Member, Target, value_kind};
use crate::options::{DecorateOptions, LevelCheck};
use crate::stat::Stat;
use crate::timestamp::{SystemClock, TimestampPrefix};

/// Live, ordered list of tags shared by every call of one decorated logger.
#[derive(Debug, Default)]
pub struct Tags {
    list: RwLock<Vec<String>>,
}

impl Tags {
    fn new(tags: Vec<String>) -> Self {
        Self {
            list: RwLock::new(tags),
        }
    }

    pub fn push(&self, tag: impl Into<String>) {
        self.list.write().push(tag.into());
    }

    /// Insert at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize, tag: impl Into<String>) {
        let mut list = self.list.write();
        let index = index.min(list.len());
        list.insert(index, tag.into());
    }

    pub fn remove(&self, index: usize) -> Option<String> {
        let mut list = self.list.write();
        (index < list.len()).then(|| list.remove(index))
    }

    /// Remove every occurrence of `tag`; returns whether anything was removed.
    pub fn remove_tag(&self, tag: &str) -> bool {
        let mut list = self.list.write();
        let before = list.len();
        list.retain(|t| t != tag);
        list.len() != before
    }

    pub fn replace(&self, tags: Vec<String>) {
        *self.list.write() = tags;
    }

    pub fn clear(&self) {
        self.list.write().clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.list.read().iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    /// Copy of the current list.
    pub fn to_vec(&self) -> Vec<String> {
        self.list.read().clone()
    }
}

struct Inner {
    underlying: Logger,
    table: [LogFn; 6],
    levels: BTreeMap<&'static str, usize>,
    level: RwLock<Level>,
    /// The underlying logger had a valid `level` at decoration time.
    sync_level: bool,
    tags: Tags,
    stat: Stat,
    level_check: Option<LevelCheck>,
    timestamp: Option<TimestampPrefix>,
    call_location: Option<CallLocation>,
}

/// A decorated logger.
///
/// Cheap to clone; clones are the same instance (see [`ptr_eq`](Self::ptr_eq)).
#[derive(Clone)]
pub struct DecoratedLogger {
    inner: Arc<Inner>,
}

enum Resolved {
    Already(DecoratedLogger),
    Fresh(Logger),
}

fn resolve_target(target: Target) -> Result<Resolved, WrapError> {
    match target {
        Target::Decorated(logger) => Ok(Resolved::Already(logger)),
        Target::Logger(logger) => Ok(Resolved::Fresh(logger)),
        Target::Value(Value::Object(map)) => {
            let logger = Logger::object();
            for (name, value) in map {
                logger.set(&name, Member::Data(value));
            }
            Ok(Resolved::Fresh(logger))
        }
        Target::Value(other) => Err(WrapError::invalid(format!(
            "log MUST be assignable (function or object). Got {}",
            value_kind(&other)
        ))),
    }
}

/// Decorate `target` with level filtering, prefixes and a stat interface.
///
/// Decorating an already-decorated logger warns through that logger's own
/// `warn` and returns the same instance.
///
/// # Errors
///
/// - [`WrapError::InvalidArgument`] if `target` is neither an object nor a
///   callable, or if the stat provider or timestamp format is invalid.
/// - [`WrapError::NoValidLevels`] if no level method can be resolved.
pub fn decorate(
    target: impl Into<Target>,
    options: DecorateOptions,
) -> Result<DecoratedLogger, WrapError> {
    match resolve_target(target.into())? {
        Resolved::Already(logger) => Ok(rewrap(logger)),
        Resolved::Fresh(logger) => build(logger, options),
    }
}

/// Like [`decorate`], with options read from a dynamic document
/// (see [`DecorateOptions::from_value`]).
///
/// # Errors
///
/// Everything [`decorate`] reports, plus option-shape errors from the document.
pub fn decorate_value(
    target: impl Into<Target>,
    options: &Value,
) -> Result<DecoratedLogger, WrapError> {
    match resolve_target(target.into())? {
        Resolved::Already(logger) => Ok(rewrap(logger)),
        Resolved::Fresh(logger) => build(logger, DecorateOptions::from_value(options)?),
    }
}

fn rewrap(logger: DecoratedLogger) -> DecoratedLogger {
    logger.warn("Attempted to re-wrap log object!");
    logger
}

fn build(underlying: Logger, options: DecorateOptions) -> Result<DecoratedLogger, WrapError> {
    let stat = Stat::from_provider(options.stat.as_ref())?;

    let timestamp = if options.timestamp.is_enabled() {
        let clock = options.clock.clone().unwrap_or_else(|| Arc::new(SystemClock));
        Some(TimestampPrefix::new(options.timestamp.custom(), clock)?)
    } else {
        None
    };

    let call_location = options.call_location.is_enabled().then(|| {
        let strip = options
            .call_location
            .custom()
            .map(str::to_string)
            .or_else(|| options.project_root.clone())
            .unwrap_or_else(location::project_root);
        let marker = options
            .dependency_marker
            .clone()
            .unwrap_or_else(|| DEPENDENCY_MARKER.to_string());
        let capture = options
            .capture
            .clone()
            .unwrap_or_else(|| Arc::new(location::capture_backtrace));
        CallLocation::new(strip, marker, capture)
    });

    let table = resolve_levels(&underlying)?;

    let (level, sync_level) = match underlying.level() {
        Some(level) => (level, true),
        None => (Level::default(), false),
    };

    let tags: Vec<String> = options.tags.into_iter().filter(|t| !t.is_empty()).collect();

    log::debug!(
        "decorated logger: level={level}, tags={tags:?}, timestamp={}, call_location={}",
        timestamp.is_some(),
        call_location.is_some()
    );

    Ok(DecoratedLogger {
        inner: Arc::new(Inner {
            underlying,
            table,
            levels: levels_map(),
            level: RwLock::new(level),
            sync_level,
            tags: Tags::new(tags),
            stat,
            level_check: options.level_check,
            timestamp,
            call_location,
        }),
    })
}

/// Build the complete level table ("nearest available" resolution).
///
/// `error` takes the logger's own `error` method, else the logger itself when
/// it is callable, else the first level method found. Every later level
/// without a method inherits the closest more severe one.
fn resolve_levels(logger: &Logger) -> Result<[LogFn; 6], WrapError> {
    let found = Level::ALL.map(|level| logger.method(level.name()));

    let error = found[0]
        .clone()
        .or_else(|| logger.callable_fn())
        .or_else(|| found.iter().flatten().next().cloned())
        .ok_or(WrapError::NoValidLevels)?;

    let mut current = error.clone();
    let table = Level::ALL.map(|level| {
        if level == Level::Error {
            return error.clone();
        }
        if let Some(f) = &found[level.index()] {
            current = f.clone();
        }
        current.clone()
    });

    log::trace!(
        "resolved levels: {:?}",
        Level::ALL
            .iter()
            .map(|l| (l.name(), found[l.index()].is_some()))
            .collect::<Vec<_>>()
    );

    Ok(table)
}

impl DecoratedLogger {
    /// Severity name→index map. Never changes.
    pub fn levels(&self) -> &BTreeMap<&'static str, usize> {
        &self.inner.levels
    }

    /// The active threshold.
    pub fn level(&self) -> Level {
        *self.inner.level.read()
    }

    /// Set the active threshold by name.
    ///
    /// # Errors
    ///
    /// [`WrapError::InvalidLevel`] if `name` is not one of the six level
    /// names; the previous level is kept.
    pub fn set_level(&self, name: &str) -> Result<(), WrapError> {
        let level: Level = name.parse()?;
        self.set_level_to(level);
        Ok(())
    }

    /// Set the active threshold. Writes through to the underlying logger's
    /// `level` if it had a valid one when decorated.
    pub fn set_level_to(&self, level: Level) {
        *self.inner.level.write() = level;
        if self.inner.sync_level {
            self.inner.underlying.set_level(level);
        }
    }

    pub fn tags(&self) -> &Tags {
        &self.inner.tags
    }

    pub fn stat(&self) -> &Stat {
        &self.inner.stat
    }

    /// The wrapped logger.
    pub fn underlying(&self) -> &Logger {
        &self.inner.underlying
    }

    /// Call a callable underlying logger directly, without filtering or prefixes.
    /// Returns `false` if the underlying logger is not callable.
    pub fn call(&self, args: Vec<Value>) -> bool {
        self.inner.underlying.call(args)
    }

    /// Whether two handles are the same decorated logger.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Log at `level`. Returns whether the call reached the underlying logger.
    pub fn log<'a>(&self, level: Level, args: impl Into<Args<'a>>) -> bool {
        if !self.level().permits(level) {
            return false;
        }
        if let Some(check) = &self.inner.level_check
            && !check(level, self)
        {
            return false;
        }

        let mut args = args.into().resolve();

        let mut prefix = self.inner.tags.to_vec();
        if let Some(location) = &self.inner.call_location {
            prefix.insert(0, location.render());
        }
        if let Some(timestamp) = &self.inner.timestamp {
            prefix.insert(0, timestamp.render());
        }
        apply_prefix(&mut args, &render_prefix(&prefix));

        (self.inner.table[level.index()])(&self.inner.underlying, args);
        true
    }

    pub fn error<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Error, args)
    }

    pub fn warn<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Warn, args)
    }

    pub fn info<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Info, args)
    }

    pub fn verbose<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Verbose, args)
    }

    pub fn debug<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Debug, args)
    }

    pub fn silly<'a>(&self, args: impl Into<Args<'a>>) -> bool {
        self.log(Level::Silly, args)
    }
}

impl fmt::Debug for DecoratedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedLogger")
            .field("level", &self.level())
            .field("tags", &self.inner.tags.to_vec())
            .field("timestamp", &self.inner.timestamp)
            .field("call_location", &self.inner.call_location)
            .field("underlying", &self.inner.underlying)
            .finish_non_exhaustive()
    }
}
