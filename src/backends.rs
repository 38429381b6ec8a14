//! Ready-made underlying loggers.
//!
//! - [`console`] writes `BADGE: message ...` lines, with selected levels
//!   routed to stderr
//! - [`log_facade`] forwards to whatever [`log`] implementation the
//!   application installed

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::formatter::{format_console_line, format_value};
use crate::level::Level;
use crate::logger::Logger;

/// A writer shared between the level methods of a console logger.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Console backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Colorize level badges.
    pub use_color: bool,
    /// Levels written to stderr; everything else goes to stdout.
    pub stderr_levels: Vec<Level>,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            use_color: false,
            stderr_levels: vec![Level::Error, Level::Debug],
        }
    }
}

/// Console logger writing to the process's stdout and stderr.
pub fn console(options: &ConsoleOptions) -> Logger {
    console_with_writers(
        options,
        Arc::new(Mutex::new(io::stdout())),
        Arc::new(Mutex::new(io::stderr())),
    )
}

/// Console logger writing to the given writers.
///
/// Write errors are ignored: a log call never fails because its output is gone.
pub fn console_with_writers(options: &ConsoleOptions, out: SharedWriter, err: SharedWriter) -> Logger {
    let mut logger = Logger::object();
    for level in Level::ALL {
        let writer = if options.stderr_levels.contains(&level) {
            err.clone()
        } else {
            out.clone()
        };
        let use_color = options.use_color;
        logger = logger.with_level(level, move |_, args| {
            let mut line = String::with_capacity(64);
            format_console_line(level, &args, use_color, &mut line);
            let mut w = writer.lock();
            let _ = writeln!(w, "{line}");
        });
    }
    logger
}

/// Map a level onto the `log` crate's levels.
pub const fn to_log_level(level: Level) -> log::Level {
    match level {
        Level::Error => log::Level::Error,
        Level::Warn => log::Level::Warn,
        Level::Info => log::Level::Info,
        Level::Verbose | Level::Debug => log::Level::Debug,
        Level::Silly => log::Level::Trace,
    }
}

/// Logger forwarding every level to the `log` facade under `target`.
///
/// Arguments are joined with spaces into one record.
pub fn log_facade(target: &str) -> Logger {
    let mut logger = Logger::object();
    for level in Level::ALL {
        let target = target.to_string();
        let log_level = to_log_level(level);
        logger = logger.with_level(level, move |_, args| {
            let message = join_args(&args);
            log::log!(target: target.as_str(), log_level, "{message}");
        });
    }
    logger
}

fn join_args(args: &[Value]) -> String {
    args.iter().map(format_value).collect::<Vec<_>>().join(" ")
}
