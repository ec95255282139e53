/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types.
//!
//! Only the edges of the crate can fail: talking to a sequencer that has shut
//! down, loading configuration, and installing the tracing subscriber.
//! Dispatching itself never returns an error.

use thiserror::Error;

/// Errors that can occur when interacting with the Sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The sequencer task has stopped.
    #[error("sequencer has been shut down")]
    Shutdown,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override held a value that could not be used.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Name of the override.
        key: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Errors that can occur when installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already set.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}
