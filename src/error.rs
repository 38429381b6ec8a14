//! Error types for `logwrap`.
//!
//! Uses [`thiserror`] for ergonomic error derivation.

use thiserror::Error;

use crate::level::LEVELS;

/// Errors that can occur while decorating a logger or loading configuration.
///
/// Decoration errors are raised synchronously at setup time. Per-call logging
/// never returns an error.
///
/// The binary maps [`Config`](Self::Config) and [`Toml`](Self::Toml) to
/// exit 1 and [`Io`](Self::Io) to exit 2.
#[derive(Debug, Error)]
pub enum WrapError {
    /// The logger or one of the options has the wrong shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The underlying logger exposes none of the level methods.
    #[error("no valid levels found on the supplied log object ({})", LEVELS.join(","))]
    NoValidLevels,

    /// Attempt to use a level name outside the fixed enumeration.
    #[error("level \"{name}\" is invalid. Valid options are: {}", LEVELS.join(","))]
    InvalidLevel { name: String },

    /// Configuration error (unreadable config file, bad flag value).
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error.
    #[error("config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl WrapError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
