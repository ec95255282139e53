/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Executed event types.
//!
//! This module defines the events handed to listeners after a command has
//! been executed in sequence order.

use super::command::LogCommand;
use super::envelope::SessionId;

/// Event emitted after a command executed.
///
/// Listeners receive these strictly in execution order, which within a
/// session is sequence order.
///
/// # Examples
///
/// ```
/// use termlog_rs::sequencer::{ExecutedEvent, LogCommand, SessionId};
///
/// let event = ExecutedEvent::new(SessionId::new(), 3, 1234567890, LogCommand::GroupEnd);
/// assert_eq!(event.sequence_num, 3);
/// ```
#[derive(Debug, Clone)]
pub struct ExecutedEvent {
    /// Session the command came from.
    pub session: SessionId,

    /// Sequence number the producer assigned.
    pub sequence_num: u64,

    /// Nanosecond timestamp when the command was executed.
    pub timestamp_ns: u64,

    /// The command that was executed.
    pub command: LogCommand,
}

impl ExecutedEvent {
    /// Creates a new executed event.
    #[must_use]
    pub fn new(
        session: SessionId,
        sequence_num: u64,
        timestamp_ns: u64,
        command: LogCommand,
    ) -> Self {
        Self {
            session,
            sequence_num,
            timestamp_ns,
            command,
        }
    }
}
