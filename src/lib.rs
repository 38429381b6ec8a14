//! `logwrap` — level-filtering, tagging decorator for duck-typed loggers.
//!
//! Wrap any logger exposing some of the six level methods (`error`, `warn`,
//! `info`, `verbose`, `debug`, `silly`), or a bare callable, into a
//! [`DecoratedLogger`] that fills in missing levels, filters by a runtime
//! threshold, prefixes messages with timestamps, call locations and tags,
//! and carries a no-op-safe stat (metrics) interface.
//!
//! # Example
//!
//! ```
//! use logwrap::{DecorateOptions, Recorder, decorate};
//!
//! let recorder = Recorder::new();
//! let log = decorate(recorder.logger(), DecorateOptions::new().tag("api")).unwrap();
//!
//! log.info("listening");
//! log.debug("suppressed at the default info threshold");
//!
//! assert_eq!(recorder.messages(), vec!["[api]listening"]);
//! ```

pub mod args;
pub mod backends;
pub mod cli;
pub mod config;
pub mod decorator;
pub mod error;
pub mod formatter;
pub mod level;
pub mod location;
pub mod logger;
pub mod options;
pub mod recorder;
pub mod stat;
pub mod timestamp;

// Re-export primary API types for convenience.
pub use args::Args;
pub use config::Config;
pub use decorator::{DecoratedLogger, Tags, decorate, decorate_value};
pub use error::WrapError;
pub use level::{DEFAULT_LEVEL, LEVELS, Level};
pub use logger::{LogFn, Logger, Member, Target};
pub use options::{DecorateOptions, LevelCheck, Toggle};
pub use recorder::{Call, Recorder};
pub use stat::{Callback, Stat, StatFn, StatProvider};
pub use timestamp::{Clock, FixedClock, SystemClock};
