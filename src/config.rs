/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Configuration loading from a TOML file and environment variables.
//!
//! Every field has a default, so an absent file yields a working setup that
//! follows the base contract: no forced flushing, colored stdout output.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use termcolor::ColorChoice;

/// Default capacity of the sequencer's request channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 65536;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TerminalConfig {
    /// Sequencer settings.
    #[serde(default)]
    pub sequencer: SequencerConfig,

    /// Console output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sequencer service settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SequencerConfig {
    /// Request channel buffer size (backpressure when full).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Optional recovery from missing sequences.
    #[serde(default)]
    pub flush: FlushPolicy,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            flush: FlushPolicy::default(),
        }
    }
}

/// When to give up waiting for a missing sequence.
///
/// Both limits are off by default, in which case a session waits for a
/// missing sequence indefinitely.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct FlushPolicy {
    /// Flush a session once its oldest buffered entry has waited this long.
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,

    /// Flush a session once it buffers more than this many entries.
    #[serde(default)]
    pub max_pending: Option<usize>,
}

impl FlushPolicy {
    /// A policy that never flushes.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Idle timeout as a `Duration`.
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }

    /// Returns `true` if neither limit is set.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.idle_timeout_ms.is_none() && self.max_pending.is_none()
    }
}

/// Where formatted lines go.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Colored text on stdout.
    #[default]
    Stdout,
    /// `tracing` info events.
    Tracing,
}

/// Color handling for the stdout sink.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout looks like a terminal.
    #[default]
    Auto,
    /// Always emit color codes.
    Always,
    /// Never emit color codes.
    Never,
}

impl ColorMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: SinkKind,

    /// Color handling for the stdout sink.
    #[serde(default)]
    pub color: ColorMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "termlog_rs=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not valid configuration.
pub fn parse_config(text: &str) -> Result<TerminalConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides.
///
/// Environment variable overrides:
/// - `TERMLOG_LOG_LEVEL` overrides `logging.level`
/// - `TERMLOG_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `TERMLOG_COLOR` overrides `output.color`
/// - `TERMLOG_FLUSH_IDLE_MS` overrides `sequencer.flush.idle_timeout_ms`
/// - `TERMLOG_MAX_PENDING` overrides `sequencer.flush.max_pending`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if an override is malformed.
pub fn load_config(path: Option<&Path>) -> Result<TerminalConfig, ConfigError> {
    let mut config = match path {
        Some(path) if path.exists() => parse_config(&std::fs::read_to_string(path)?)?,
        _ => TerminalConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Applies overrides obtained through `lookup`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for a value that does not parse.
pub fn apply_env_overrides<F>(config: &mut TerminalConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    if let Some(level) = lookup("TERMLOG_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
        config.logging.level = level;
    }

    if let Some(json) = lookup("TERMLOG_LOG_JSON") {
        config.logging.json = json.trim().eq_ignore_ascii_case("true") || json.trim() == "1";
    }

    if let Some(color) = lookup("TERMLOG_COLOR") {
        config.output.color = ColorMode::parse(&color).ok_or(ConfigError::InvalidValue {
            key: "TERMLOG_COLOR",
            value: color,
        })?;
    }

    if let Some(idle) = lookup("TERMLOG_FLUSH_IDLE_MS") {
        let ms = idle.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            key: "TERMLOG_FLUSH_IDLE_MS",
            value: idle.clone(),
        })?;
        config.sequencer.flush.idle_timeout_ms = Some(ms);
    }

    if let Some(max) = lookup("TERMLOG_MAX_PENDING") {
        let limit = max.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
            key: "TERMLOG_MAX_PENDING",
            value: max.clone(),
        })?;
        config.sequencer.flush.max_pending = Some(limit);
    }

    Ok(())
}
