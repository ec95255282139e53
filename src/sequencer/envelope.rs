/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Sequenced command envelopes.
//!
//! An [`Envelope`] is what a producer hands to the transport: the command plus
//! the sequence number it was stamped with at emission time and the session
//! whose counter issued that number.

use super::command::LogCommand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one producer session and therefore one sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A command stamped with its session and sequence number.
///
/// # Examples
///
/// ```
/// use termlog_rs::sequencer::{Envelope, LogCommand, SessionId};
///
/// let envelope = Envelope::new(SessionId::new(), 0, LogCommand::Group);
/// assert_eq!(envelope.sequence_num, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Session whose counter issued `sequence_num`.
    pub session: SessionId,

    /// Position of the command in its session's emitted stream, starting at 0.
    pub sequence_num: u64,

    /// The console operation.
    pub command: LogCommand,
}

impl Envelope {
    /// Creates a new envelope.
    #[must_use]
    pub fn new(session: SessionId, sequence_num: u64, command: LogCommand) -> Self {
        Self {
            session,
            sequence_num,
            command,
        }
    }
}
