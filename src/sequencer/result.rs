/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Admission outcomes.
//!
//! This module defines what happened to a single submission to the
//! resequencing dispatcher. None of the outcomes is an error.

/// Outcome of submitting one sequenced item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The item was due and ran, followed by any contiguous buffered items.
    Executed {
        /// Number of items run by this submission, the submitted one included.
        executed: usize,
    },

    /// The item is ahead of the cursor and was buffered.
    Buffered,

    /// An item with the same sequence was already buffered and has been
    /// replaced by this one.
    Replaced,

    /// The sequence was already executed or skipped; the item was dropped.
    Stale,
}

impl Admission {
    /// Returns `true` if the submission ran at least one item.
    #[inline]
    #[must_use]
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }

    /// Returns `true` if the item is waiting in the buffer.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Buffered | Self::Replaced)
    }

    /// Returns `true` if the item was dropped as stale.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}
