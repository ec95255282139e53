/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Producer handle.
//!
//! A [`Terminal`] is one producer session. It stamps every command with the
//! next number of its own counter at the moment the command is emitted, before
//! any delivery happens, so the stamp records the emission order no matter how
//! the envelopes travel afterwards.

use super::command::LogCommand;
use super::core::SequencerClient;
use super::envelope::{Envelope, SessionId};
use crate::error::SequencerError;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

/// Console-like producer bound to one session.
///
/// # Examples
///
/// ```no_run
/// use termlog_rs::sequencer::{Sequencer, Terminal};
/// use termlog_rs::sink::MemorySink;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sequencer = Sequencer::new(MemorySink::new());
/// let terminal = Terminal::new(sequencer.client());
/// let _handle = sequencer.spawn();
///
/// terminal.group().await?;
/// terminal.table(json!(["vite", "plugin", "terminal"])).await?;
/// terminal.group_end().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Terminal {
    session: SessionId,
    next_sequence: AtomicU64,
    client: SequencerClient,
}

impl Terminal {
    /// Opens a new session on `client`.
    #[must_use]
    pub fn new(client: SequencerClient) -> Self {
        Self::with_session(client, SessionId::new())
    }

    /// Opens a session with a known id. The counter starts at 0.
    #[must_use]
    pub fn with_session(client: SequencerClient, session: SessionId) -> Self {
        Self {
            session,
            next_sequence: AtomicU64::new(0),
            client,
        }
    }

    /// This terminal's session.
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Number of sequence numbers issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next_sequence.load(Ordering::Acquire)
    }

    /// Assigns the next sequence number to `command` without sending it.
    #[must_use]
    pub fn stamp(&self, command: LogCommand) -> Envelope {
        let sequence = self.next_sequence.fetch_add(1, Ordering::AcqRel);
        Envelope::new(self.session, sequence, command)
    }

    /// Stamps and sends a command.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn emit(&self, command: LogCommand) -> Result<(), SequencerError> {
        let envelope = self.stamp(command);
        self.client.send(envelope).await
    }

    /// Prints a plain log line.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn log(&self, message: impl Into<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Log(vec![message.into()])).await
    }

    /// Prints several values on one line.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn log_args(&self, args: Vec<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Log(args)).await
    }

    /// Prints an info line.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn info(&self, message: impl Into<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Info(message.into())).await
    }

    /// Prints a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn warn(&self, message: impl Into<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Warn(message.into())).await
    }

    /// Prints an error.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn error(&self, message: impl Into<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Error(message.into())).await
    }

    /// Prints `message` if `condition` holds.
    ///
    /// A false condition sends nothing and uses no sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn assert(
        &self,
        condition: bool,
        message: impl Into<Value>,
    ) -> Result<(), SequencerError> {
        if !condition {
            return Ok(());
        }
        self.emit(LogCommand::Assert(message.into())).await
    }

    /// Prints structured data as a table.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn table(&self, data: impl Into<Value>) -> Result<(), SequencerError> {
        self.emit(LogCommand::Table(data.into())).await
    }

    /// Opens a group.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn group(&self) -> Result<(), SequencerError> {
        self.emit(LogCommand::Group).await
    }

    /// Closes the innermost group.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn group_end(&self) -> Result<(), SequencerError> {
        self.emit(LogCommand::GroupEnd).await
    }
}
