/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Log command types.
//!
//! This module defines the closed set of console operations a producer can
//! emit. The kind of a command only decides what happens when it executes;
//! every kind is sequenced the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A console operation emitted by a producer.
///
/// # Examples
///
/// ```
/// use termlog_rs::sequencer::{LogCommand, LogKind};
/// use serde_json::json;
///
/// let command = LogCommand::Warn(json!("disk almost full"));
/// assert_eq!(command.kind(), Some(LogKind::Warn));
/// assert_eq!(LogCommand::Group.kind(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum LogCommand {
    /// Output of an assertion that held.
    Assert(Value),

    /// Error-level message.
    Error(Value),

    /// Info-level message.
    Info(Value),

    /// Plain log call with one or more arguments.
    Log(Vec<Value>),

    /// Structured data to be printed as a table.
    Table(Value),

    /// Warning-level message.
    Warn(Value),

    /// Opens a group; later lines are indented one more level.
    Group,

    /// Closes the innermost open group.
    GroupEnd,
}

impl LogCommand {
    /// Returns the visual kind of a printing command, or `None` for group
    /// commands which produce no output of their own.
    #[must_use]
    pub fn kind(&self) -> Option<LogKind> {
        match self {
            Self::Assert(_) => Some(LogKind::Assert),
            Self::Error(_) => Some(LogKind::Error),
            Self::Info(_) => Some(LogKind::Info),
            Self::Log(_) => Some(LogKind::Log),
            Self::Table(_) => Some(LogKind::Table),
            Self::Warn(_) => Some(LogKind::Warn),
            Self::Group | Self::GroupEnd => None,
        }
    }

    /// Returns `true` for `Group` and `GroupEnd`.
    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::GroupEnd)
    }
}

/// Visual classification of a printed line, used by sinks to pick a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    /// Passing assertion.
    Assert,
    /// Error message.
    Error,
    /// Informational message.
    Info,
    /// Plain log line.
    Log,
    /// Rendered table.
    Table,
    /// Warning.
    Warn,
}

impl LogKind {
    /// Lowercase name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Error => "error",
            Self::Info => "info",
            Self::Log => "log",
            Self::Table => "table",
            Self::Warn => "warn",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
