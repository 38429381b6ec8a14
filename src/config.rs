//! Configuration management with TOML file support.
//!
//! Merges settings from three sources (highest precedence first):
//! 1. CLI flags
//! 2. Config file (`~/.config/logwrap/config.toml` or `$XDG_CONFIG_HOME/logwrap/config.toml`)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backends::ConsoleOptions;
use crate::cli::{Cli, ColorMode};
use crate::error::WrapError;
use crate::level::Level;
use crate::options::{DecorateOptions, Toggle};

/// Runtime configuration merged from defaults, config file, and CLI arguments.
///
/// Use [`Config::from_cli`] to build from parsed CLI arguments, or
/// [`Config::default`] for built-in defaults (useful in tests and benchmarks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Color output mode (auto/always/never).
    pub color_mode: ColorMode,
    /// Threshold level. `None` keeps the decorator's default (`info`).
    pub level: Option<Level>,
    /// Level each input line is logged at.
    pub emit_level: Level,
    /// Tags prefixed to every message.
    pub tags: Vec<String>,
    /// Timestamp prefix; a custom value is the strftime format.
    pub timestamp: Toggle,
    /// Call-location prefix; a custom value is the prefix stripped from paths.
    pub call_location: Toggle,
    /// Root stripped from call locations.
    pub project_root: Option<String>,
    /// Levels the console backend writes to stderr.
    pub stderr_levels: Vec<Level>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Auto,
            level: None,
            emit_level: Level::Info,
            tags: Vec::new(),
            timestamp: Toggle::Off,
            call_location: Toggle::Off,
            project_root: None,
            stderr_levels: ConsoleOptions::default().stderr_levels,
        }
    }
}

impl Config {
    /// Build a [`Config`] from CLI arguments, loading the config file if present.
    ///
    /// Merge precedence: CLI flags > config file > defaults. Tags from the
    /// file come first, followed by tags given on the command line.
    ///
    /// # Errors
    ///
    /// [`WrapError::Config`] if the config file cannot be read,
    /// [`WrapError::Toml`] if it is not valid TOML, and
    /// [`WrapError::InvalidLevel`] if it names an unknown level.
    pub fn from_cli(cli: &Cli) -> Result<Self, WrapError> {
        let mut config = Self::default();

        let config_path = cli.config.clone().unwrap_or_else(Self::default_config_path);
        if config_path.exists() {
            let file_config = FileConfig::load(&config_path)?;
            config.apply_file_config(file_config)?;
        } else if cli.config.is_some() {
            return Err(WrapError::Config(format!(
                "config file {} does not exist",
                config_path.display()
            )));
        }

        if let Some(color) = cli.color {
            config.color_mode = color;
        }
        if cli.level.is_some() {
            config.level = cli.level;
        }
        config.emit_level = cli.emit_level;
        config.tags.extend(cli.tags.iter().filter(|t| !t.is_empty()).cloned());

        match cli.timestamp.as_deref() {
            Some("") => {
                if !config.timestamp.is_enabled() {
                    config.timestamp = Toggle::On;
                }
            }
            Some(format) => config.timestamp = Toggle::Custom(format.to_string()),
            None => {}
        }

        if cli.call_location && !config.call_location.is_enabled() {
            config.call_location = Toggle::On;
        }
        if cli.project_root.is_some() {
            config.project_root.clone_from(&cli.project_root);
        }

        Ok(config)
    }

    /// Default config file path: `$XDG_CONFIG_HOME/logwrap/config.toml` or `~/.config/logwrap/config.toml`.
    fn default_config_path() -> PathBuf {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("logwrap").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("logwrap")
                .join("config.toml")
        } else {
            PathBuf::from(".config/logwrap/config.toml")
        }
    }

    /// Apply settings from a parsed config file.
    fn apply_file_config(&mut self, file: FileConfig) -> Result<(), WrapError> {
        if let Some(color) = file.color {
            self.color_mode = ColorMode::from_name(&color);
        }
        if let Some(level) = file.level {
            self.level = Some(level.parse()?);
        }
        if let Some(tags) = file.tags {
            self.tags = tags.into_iter().filter(|t| !t.is_empty()).collect();
        }
        if let Some(timestamp) = file.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(call_location) = file.call_location {
            self.call_location = call_location;
        }
        if let Some(root) = file.project_root.filter(|r| !r.is_empty()) {
            self.project_root = Some(root);
        }
        if let Some(levels) = file.stderr_levels {
            self.stderr_levels = levels
                .iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?;
        }
        Ok(())
    }

    /// Decoration options for the merged settings.
    pub fn decorate_options(&self) -> DecorateOptions {
        let mut options = DecorateOptions::new()
            .tags(self.tags.iter().cloned())
            .timestamp(self.timestamp.clone())
            .call_location(self.call_location.clone());
        if let Some(root) = &self.project_root {
            options = options.project_root(root.clone());
        }
        options
    }

    /// Console backend settings for the merged settings.
    pub fn console_options(&self, use_color: bool) -> ConsoleOptions {
        ConsoleOptions {
            use_color,
            stderr_levels: self.stderr_levels.clone(),
        }
    }
}

/// Config file structure (TOML deserialization).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    color: Option<String>,
    level: Option<String>,
    tags: Option<Vec<String>>,
    timestamp: Option<Toggle>,
    call_location: Option<Toggle>,
    project_root: Option<String>,
    stderr_levels: Option<Vec<String>>,
}

impl FileConfig {
    fn load(path: &Path) -> Result<Self, WrapError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WrapError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
