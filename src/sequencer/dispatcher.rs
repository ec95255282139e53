/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Resequencing dispatcher.
//!
//! [`Dispatcher`] is a reorder buffer: items arrive tagged with the sequence
//! number their producer assigned, in whatever order the transport delivers
//! them, and are executed strictly in sequence order.
//!
//! - An item whose sequence equals the cursor runs immediately, then every
//!   contiguous buffered item runs after it (the drain).
//! - An item ahead of the cursor is buffered. A second item for the same
//!   buffered sequence replaces the first.
//! - An item behind the cursor was already executed (or skipped by a forced
//!   flush) and is dropped.
//! - Once `u64::MAX` has run the dispatcher is exhausted: everything after
//!   that is stale.
//!
//! A sequence that never arrives holds back everything after it. That stall
//! is visible through [`Dispatcher::stats`] and can be broken explicitly with
//! [`Dispatcher::force_flush`] or [`Dispatcher::flush_if_stalled`]; nothing
//! is flushed unless the caller asks.
//!
//! # Examples
//!
//! ```
//! use std::cell::RefCell;
//! use termlog_rs::sequencer::{Admission, Dispatcher};
//!
//! let printed = RefCell::new(Vec::new());
//! let mut dispatcher: Dispatcher<Box<dyn FnOnce() + '_>> = Dispatcher::new();
//!
//! let admission = dispatcher.submit(1, Box::new(|| printed.borrow_mut().push("B")));
//! assert_eq!(admission, Admission::Buffered);
//! assert!(printed.borrow().is_empty());
//!
//! let admission = dispatcher.submit(0, Box::new(|| printed.borrow_mut().push("A")));
//! assert_eq!(admission, Admission::Executed { executed: 2 });
//! assert_eq!(*printed.borrow(), vec!["A", "B"]);
//! ```

use super::result::Admission;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// An item waiting for its turn.
#[derive(Debug)]
struct Pending<T> {
    item: T,
    buffered_at: Instant,
}

/// Snapshot of a dispatcher's bookkeeping, for stall detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatcherStats {
    /// Next sequence due for execution.
    pub expected: u64,

    /// Number of buffered items.
    pub pending: usize,

    /// Lowest buffered sequence, if any.
    pub lowest_pending: Option<u64>,

    /// How long the longest-waiting buffered item has been held.
    pub oldest_pending_age: Option<Duration>,
}

impl DispatcherStats {
    /// Returns `true` if items are buffered behind a missing sequence.
    #[inline]
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.pending > 0
    }

    /// Number of sequences missing between the cursor and the lowest
    /// buffered item.
    #[must_use]
    pub fn gap(&self) -> u64 {
        self.lowest_pending
            .map_or(0, |lowest| lowest.saturating_sub(self.expected))
    }
}

/// Reorder buffer that executes sequenced items in order.
///
/// The dispatcher itself has no side effects beyond its bookkeeping; all
/// effects happen in the executor passed to [`submit_with`](Self::submit_with)
/// or, for closures, in the closures themselves via [`submit`](Self::submit).
#[derive(Debug)]
pub struct Dispatcher<T> {
    expected: u64,
    /// Set once `u64::MAX` has run; every later sequence is stale.
    exhausted: bool,
    pending: BTreeMap<u64, Pending<T>>,
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Dispatcher<T> {
    /// Creates a dispatcher expecting sequence 0.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a dispatcher whose first due sequence is `expected`.
    #[must_use]
    pub fn starting_at(expected: u64) -> Self {
        Self {
            expected,
            exhausted: false,
            pending: BTreeMap::new(),
        }
    }

    /// Next sequence due for execution.
    #[inline]
    #[must_use]
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Number of buffered items.
    #[inline]
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is buffered.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Admits one item.
    ///
    /// `execute` is called with `(sequence, item)` for the submitted item if
    /// it is due, and then for each buffered item the drain releases, in
    /// sequence order. It is never called for buffered or stale items.
    pub fn submit_with<F>(&mut self, sequence: u64, item: T, mut execute: F) -> Admission
    where
        F: FnMut(u64, T),
    {
        if sequence < self.expected || self.exhausted {
            warn!(
                sequence,
                expected = self.expected,
                exhausted = self.exhausted,
                "dropping stale sequence"
            );
            return Admission::Stale;
        }

        if sequence > self.expected {
            let entry = Pending {
                item,
                buffered_at: Instant::now(),
            };
            return match self.pending.insert(sequence, entry) {
                Some(_) => {
                    warn!(sequence, "duplicate pending sequence replaced");
                    Admission::Replaced
                }
                None => {
                    debug!(
                        sequence,
                        expected = self.expected,
                        pending = self.pending.len(),
                        "buffered out-of-order item"
                    );
                    Admission::Buffered
                }
            };
        }

        execute(sequence, item);
        self.advance();
        let executed = 1 + self.drain(&mut execute);
        Admission::Executed { executed }
    }

    /// Runs every contiguous buffered item starting at the cursor.
    fn drain<F>(&mut self, execute: &mut F) -> usize
    where
        F: FnMut(u64, T),
    {
        let mut drained = 0;
        while !self.exhausted {
            let Some(entry) = self.pending.remove(&self.expected) else {
                break;
            };
            trace!(sequence = self.expected, "draining buffered item");
            execute(self.expected, entry.item);
            self.advance();
            drained += 1;
        }
        if drained > 0 {
            debug!(drained, expected = self.expected, "drain complete");
        }
        drained
    }

    /// Runs every buffered item in ascending sequence order, regardless of
    /// gaps, and moves the cursor past the highest one.
    ///
    /// Sequences skipped this way are treated as stale if they arrive later.
    /// Returns the number of items run.
    pub fn force_flush<F>(&mut self, mut execute: F) -> usize
    where
        F: FnMut(u64, T),
    {
        let Some(&highest) = self.pending.keys().next_back() else {
            return 0;
        };

        warn!(
            expected = self.expected,
            highest,
            pending = self.pending.len(),
            "force flushing buffered items past a missing sequence"
        );

        let pending = std::mem::take(&mut self.pending);
        let flushed = pending.len();
        for (sequence, entry) in pending {
            execute(sequence, entry.item);
        }
        self.expected = highest;
        self.advance();
        flushed
    }

    /// Moves the cursor past the sequence that just ran.
    fn advance(&mut self) {
        match self.expected.checked_add(1) {
            Some(next) => self.expected = next,
            None => {
                warn!("sequence space exhausted, later submissions are stale");
                self.exhausted = true;
            }
        }
    }

    /// Force flushes if the oldest buffered item has waited longer than
    /// `idle` as of `now`. Returns the number of items run.
    pub fn flush_if_stalled<F>(&mut self, idle: Duration, now: Instant, execute: F) -> usize
    where
        F: FnMut(u64, T),
    {
        match self.oldest_buffered_at() {
            Some(oldest) if now.saturating_duration_since(oldest) >= idle => {
                self.force_flush(execute)
            }
            _ => 0,
        }
    }

    /// Bookkeeping snapshot as of `now`.
    #[must_use]
    pub fn stats(&self, now: Instant) -> DispatcherStats {
        DispatcherStats {
            expected: self.expected,
            pending: self.pending.len(),
            lowest_pending: self.pending.keys().next().copied(),
            oldest_pending_age: self
                .oldest_buffered_at()
                .map(|oldest| now.saturating_duration_since(oldest)),
        }
    }

    /// Drops every buffered item without running it and returns how many
    /// were discarded. The cursor is left where it was.
    pub fn discard_pending(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }

    fn oldest_buffered_at(&self) -> Option<Instant> {
        self.pending.values().map(|entry| entry.buffered_at).min()
    }
}

impl<F: FnOnce()> Dispatcher<F> {
    /// Admits one zero-argument action.
    ///
    /// The action runs when its sequence becomes due. Use
    /// `Dispatcher<Box<dyn FnOnce()>>` to mix different closures.
    pub fn submit(&mut self, sequence: u64, execute: F) -> Admission {
        self.submit_with(sequence, execute, |_, action| action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Action = Box<dyn FnOnce()>;

    fn record(log: &Arc<Mutex<Vec<u64>>>, n: u64) -> Action {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(n))
    }

    #[test]
    fn test_in_order_submission_runs_immediately() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher<Action> = Dispatcher::new();

        for n in 0..5 {
            let admission = dispatcher.submit(n, record(&log, n));
            assert_eq!(admission, Admission::Executed { executed: 1 });
        }

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(dispatcher.expected(), 5);
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn test_out_of_order_buffering_drains_in_one_pass() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher<Action> = Dispatcher::new();

        assert_eq!(dispatcher.submit(2, record(&log, 2)), Admission::Buffered);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(
            dispatcher.submit(0, record(&log, 0)),
            Admission::Executed { executed: 1 }
        );
        assert_eq!(*log.lock().unwrap(), vec![0]);

        assert_eq!(
            dispatcher.submit(1, record(&log, 1)),
            Admission::Executed { executed: 2 }
        );
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(dispatcher.expected(), 3);
    }

    #[test]
    fn test_pending_keys_stay_ahead_of_cursor() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::new();
        for sequence in [7, 3, 5, 1] {
            dispatcher.submit_with(sequence, sequence, |_, _| {});
        }
        let stats = dispatcher.stats(Instant::now());
        assert_eq!(stats.expected, 0);
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.lowest_pending, Some(1));
        assert_eq!(stats.gap(), 1);

        dispatcher.submit_with(0, 0, |_, _| {});
        assert_eq!(dispatcher.expected(), 2);
        assert_eq!(dispatcher.stats(Instant::now()).lowest_pending, Some(3));
    }

    #[test]
    fn test_starting_at_offsets_cursor() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::starting_at(10);
        assert!(dispatcher.submit_with(9, 9, |_, _| {}).is_stale());
        assert!(dispatcher.submit_with(10, 10, |_, _| {}).is_executed());
    }

    #[test]
    fn test_flush_if_stalled_respects_idle_window() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::new();
        dispatcher.submit_with(4, 4, |_, _| {});
        let start = Instant::now();

        let mut seen = Vec::new();
        let flushed =
            dispatcher.flush_if_stalled(Duration::from_secs(60), start, |s, _| seen.push(s));
        assert_eq!(flushed, 0);
        assert!(seen.is_empty());

        let later = start + Duration::from_secs(61);
        let flushed =
            dispatcher.flush_if_stalled(Duration::from_secs(60), later, |s, _| seen.push(s));
        assert_eq!(flushed, 1);
        assert_eq!(seen, vec![4]);
        assert_eq!(dispatcher.expected(), 5);
    }

    #[test]
    fn test_discard_pending_keeps_cursor() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::new();
        dispatcher.submit_with(3, 3, |_, _| {});
        dispatcher.submit_with(4, 4, |_, _| {});
        assert_eq!(dispatcher.discard_pending(), 2);
        assert_eq!(dispatcher.expected(), 0);
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn test_force_flush_of_highest_sequence_saturates_cursor() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::new();
        assert_eq!(dispatcher.submit_with(u64::MAX, 1, |_, _| {}), Admission::Buffered);
        dispatcher.submit_with(7, 2, |_, _| {});

        let mut seen = Vec::new();
        assert_eq!(dispatcher.force_flush(|s, _| seen.push(s)), 2);
        assert_eq!(seen, vec![7, u64::MAX]);
        assert_eq!(dispatcher.expected(), u64::MAX);

        // Nothing already run may come back.
        assert!(dispatcher.submit_with(u64::MAX, 3, |_, _| {}).is_stale());
        assert!(dispatcher.submit_with(0, 4, |_, _| {}).is_stale());
        assert!(dispatcher.submit_with(7, 5, |_, _| {}).is_stale());
        assert_eq!(dispatcher.force_flush(|s, _| seen.push(s)), 0);
        assert_eq!(seen, vec![7, u64::MAX]);
    }

    #[test]
    fn test_drain_stops_at_highest_sequence() {
        let mut dispatcher: Dispatcher<u64> = Dispatcher::starting_at(u64::MAX - 1);
        assert_eq!(dispatcher.submit_with(u64::MAX, 0, |_, _| {}), Admission::Buffered);

        let mut seen = Vec::new();
        let admission = dispatcher.submit_with(u64::MAX - 1, 0, |s, _| seen.push(s));
        assert_eq!(admission, Admission::Executed { executed: 2 });
        assert_eq!(seen, vec![u64::MAX - 1, u64::MAX]);
        assert!(dispatcher.is_idle());
        assert!(dispatcher.submit_with(u64::MAX, 0, |_, _| {}).is_stale());
    }
}
