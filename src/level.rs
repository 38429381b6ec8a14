//! Severity levels understood by a decorated logger.
//!
//! The six levels form a fixed ordering from the most severe and least
//! verbose (`error`, index 0) to the least severe and most verbose
//! (`silly`, index 5). A call at level `L` is emitted when the active
//! threshold's index is greater than or equal to `L`'s index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use owo_colors::Style;

use crate::error::WrapError;

/// Level names in severity order.
pub const LEVELS: [&str; 6] = ["error", "warn", "info", "verbose", "debug", "silly"];

/// Name of the level a decorated logger starts at when the underlying logger
/// does not carry a valid one.
pub const DEFAULT_LEVEL: &str = "info";

/// Canonical level enumeration.
///
/// Ordered by index, so `Level::Error < Level::Silly`. The discriminant is the
/// index exposed through [`levels_map`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error = 0,
    Warn = 1,
    #[default]
    Info = 2,
    Verbose = 3,
    Debug = 4,
    Silly = 5,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Self; 6] = [
        Self::Error,
        Self::Warn,
        Self::Info,
        Self::Verbose,
        Self::Debug,
        Self::Silly,
    ];

    /// Index of this level (`error` = 0 ... `silly` = 5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, which is also the method name on a logger object.
    pub const fn name(self) -> &'static str {
        LEVELS[self as usize]
    }

    /// Level at `index`, if in range.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Whether a logger whose threshold is `self` emits calls made at `target`.
    pub const fn permits(self, target: Self) -> bool {
        self.index() >= target.index()
    }

    /// 7-character display badge, right-justified (e.g. `"   INFO"`, `"VERBOSE"`).
    #[allow(clippy::trivially_copy_pass_by_ref)] // &self required since OwoColorize has conflicting trait methods
    pub const fn badge(&self) -> &'static str {
        match self {
            Self::Error => "  ERROR",
            Self::Warn => "   WARN",
            Self::Info => "   INFO",
            Self::Verbose => "VERBOSE",
            Self::Debug => "  DEBUG",
            Self::Silly => "  SILLY",
        }
    }

    /// Returns the [`Style`] for this level's badge when colors are enabled.
    ///
    /// - Error: red bold
    /// - Warn: yellow bold
    /// - Info: green bold
    /// - Verbose: cyan bold
    /// - Debug: blue bold
    /// - Silly: magenta bold
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub const fn style(&self) -> Style {
        match self {
            Self::Error => Style::new().red().bold(),
            Self::Warn => Style::new().yellow().bold(),
            Self::Info => Style::new().green().bold(),
            Self::Verbose => Style::new().cyan().bold(),
            Self::Debug => Style::new().blue().bold(),
            Self::Silly => Style::new().magenta().bold(),
        }
    }

    /// Parse a level name exactly as it appears in [`LEVELS`].
    ///
    /// Returns `None` for anything else, including other casings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "verbose" => Some(Self::Verbose),
            "debug" => Some(Self::Debug),
            "silly" => Some(Self::Silly),
            _ => None,
        }
    }

    /// Parse a level from a [`serde_json::Value`]; only exact level-name strings match.
    pub fn from_json_value(value: &serde_json::Value) -> Option<Self> {
        value.as_str().and_then(Self::from_name)
    }
}

impl FromStr for Level {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| WrapError::InvalidLevel {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fresh name→index map of the six levels.
pub fn levels_map() -> BTreeMap<&'static str, usize> {
    Level::ALL.iter().map(|l| (l.name(), l.index())).collect()
}
