/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Sequencer receipt types.
//!
//! This module defines the receipt returned to callers after delivering an
//! envelope to the Sequencer.

use super::envelope::SessionId;
use super::result::Admission;

/// Receipt returned after delivering an envelope to the Sequencer.
///
/// # Examples
///
/// ```
/// use termlog_rs::sequencer::{Admission, SessionId, SubmitReceipt};
///
/// let receipt = SubmitReceipt::new(SessionId::new(), 0, Admission::Executed { executed: 1 });
/// assert!(receipt.is_executed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Session of the delivered envelope.
    pub session: SessionId,

    /// Sequence number of the delivered envelope.
    pub sequence_num: u64,

    /// What the dispatcher did with it.
    pub admission: Admission,
}

impl SubmitReceipt {
    /// Creates a new receipt.
    #[must_use]
    pub fn new(session: SessionId, sequence_num: u64, admission: Admission) -> Self {
        Self {
            session,
            sequence_num,
            admission,
        }
    }

    /// Returns `true` if the delivery ran at least one command.
    #[inline]
    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.admission.is_executed()
    }
}
