//! Command-line argument definitions for `logwrap`.
//!
//! Uses [`clap`] derive macros for argument parsing.

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::level::{LEVELS, Level};

/// Log stdin lines through a decorated console logger.
///
/// Every input line is logged at `--emit-level`. Lines above the `--level`
/// threshold are dropped; the rest are prefixed with timestamp, call
/// location and tags as configured, then written to stdout (or stderr for
/// the stderr levels).
#[derive(Debug, Parser)]
#[command(name = "logwrap", version, about, long_about = None)]
pub struct Cli {
    /// Control color output.
    ///
    /// `auto` (the default) enables colors only when stdout is a TTY and
    /// `NO_COLOR` is unset.
    #[arg(short = 'c', long, value_enum)]
    pub color: Option<ColorMode>,

    /// Threshold level; lines logged at a more verbose level are dropped.
    #[arg(short = 'l', long, value_parser = parse_level_arg)]
    pub level: Option<Level>,

    /// Level every input line is logged at.
    #[arg(short = 'e', long, value_parser = parse_level_arg, default_value = "info")]
    pub emit_level: Level,

    /// Tag prefixed to every line. Repeat for several tags.
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Prefix each line with the current UTC time, optionally in a custom
    /// strftime format.
    #[arg(short = 'T', long, num_args = 0..=1, default_missing_value = "")]
    pub timestamp: Option<String>,

    /// Prefix each line with the location that logged it.
    ///
    /// Needs symbols and line tables in the binary; a build stripped of
    /// them prints `unknown`.
    #[arg(short = 'L', long)]
    pub call_location: bool,

    /// Prefix stripped from call locations.
    #[arg(long)]
    pub project_root: Option<String>,

    /// Path to configuration file.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Enable colors only when stdout is a TTY.
    Auto,
    /// Always enable colors.
    Always,
    /// Never enable colors.
    Never,
}

impl ColorMode {
    /// Parse a config-file value; unknown values fall back to `auto`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "always" => Self::Always,
            "never" => Self::Never,
            _ => Self::Auto,
        }
    }
}

/// Parse a level argument case-insensitively.
fn parse_level_arg(s: &str) -> Result<Level, String> {
    Level::from_name(&s.to_ascii_lowercase()).ok_or_else(|| {
        format!(
            "invalid level '{s}': expected one of {}",
            LEVELS.join(", ")
        )
    })
}
