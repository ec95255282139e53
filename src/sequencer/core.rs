/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Core Sequencer implementation.
//!
//! This module provides the Sequencer service: a single task that owns the
//! console and one [`Dispatcher`] per producer session, receives envelopes
//! over a channel in arrival order, and executes them in sequence order.

use super::command::LogCommand;
use super::console::Console;
use super::dispatcher::{Dispatcher, DispatcherStats};
use super::envelope::{Envelope, SessionId};
use super::event::ExecutedEvent;
use super::receipt::SubmitReceipt;
use crate::config::{FlushPolicy, SequencerConfig};
use crate::error::SequencerError;
use crate::sink::LogSink;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Type alias for event listener functions.
type EventListener = Arc<dyn Fn(&ExecutedEvent) + Send + Sync>;

/// Shortest interval between idle-flush sweeps.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

/// Requests accepted by the sequencer task.
#[derive(Debug)]
enum Request {
    Deliver {
        envelope: Envelope,
        reply: Option<oneshot::Sender<SubmitReceipt>>,
    },
    Stats {
        reply: oneshot::Sender<Vec<SessionStats>>,
    },
    Flush {
        session: Option<SessionId>,
        reply: oneshot::Sender<usize>,
    },
    Close {
        session: SessionId,
        reply: oneshot::Sender<Option<usize>>,
    },
}

/// Dispatcher bookkeeping for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// The session.
    pub session: SessionId,

    /// Its dispatcher's state.
    pub dispatcher: DispatcherStats,
}

/// A single-task sequencer that replays console commands in emission order.
///
/// Envelopes may arrive in any order. Within a session they execute strictly
/// by sequence number; the group depth is shared by all sessions.
///
/// # Examples
///
/// ```no_run
/// use termlog_rs::sequencer::{Sequencer, Terminal};
/// use termlog_rs::sink::MemorySink;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sequencer = Sequencer::new(MemorySink::new());
/// let terminal = Terminal::new(sequencer.client());
/// let handle = sequencer.spawn();
///
/// terminal.log("hello").await?;
/// drop(terminal);
/// handle.wait().await?;
/// # Ok(())
/// # }
/// ```
pub struct Sequencer<S: LogSink + 'static> {
    /// Executes commands and owns the group depth.
    console: Console<S>,

    /// One reorder buffer per producer session.
    sessions: HashMap<SessionId, Dispatcher<LogCommand>>,

    /// Recovery policy for missing sequences.
    flush_policy: FlushPolicy,

    /// Channel for submitting requests.
    request_tx: mpsc::Sender<Request>,

    /// Channel for receiving requests (used by event loop).
    request_rx: Option<mpsc::Receiver<Request>>,

    /// Event listeners called synchronously for each executed command.
    event_listeners: Vec<EventListener>,
}

impl<S: LogSink + 'static> Sequencer<S> {
    /// Creates a new Sequencer writing to `sink`, with default settings.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, &SequencerConfig::default())
    }

    /// Creates a new Sequencer from explicit settings.
    #[must_use]
    pub fn with_config(sink: S, config: &SequencerConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity.max(1));

        Self {
            console: Console::new(sink),
            sessions: HashMap::new(),
            flush_policy: config.flush,
            request_tx,
            request_rx: Some(request_rx),
            event_listeners: Vec::new(),
        }
    }

    /// Registers an event listener.
    ///
    /// Listeners are called synchronously in execution order, after the
    /// console has applied the command.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&ExecutedEvent) + Send + Sync + 'static,
    {
        self.event_listeners.push(Arc::new(listener));
    }

    /// Returns a handle for delivering envelopes.
    ///
    /// The event loop stops once every client has been dropped.
    #[must_use]
    pub fn client(&self) -> SequencerClient {
        SequencerClient {
            request_tx: self.request_tx.clone(),
        }
    }

    /// Spawns the sequencer event loop on a new task.
    ///
    /// Returns a handle that can be used to wait for shutdown.
    #[must_use]
    pub fn spawn(mut self) -> SequencerHandle {
        let request_rx = self.request_rx.take();
        // The loop must not hold a sender to its own channel or it never closes.
        let (closed_tx, _) = mpsc::channel(1);
        self.request_tx = closed_tx;

        let handle = tokio::spawn(async move {
            if let Some(request_rx) = request_rx {
                self.run_loop(request_rx).await;
            }
        });

        SequencerHandle { handle }
    }

    /// Runs the main event loop (single task).
    async fn run_loop(&mut self, mut request_rx: mpsc::Receiver<Request>) {
        let mut sweep = self.flush_policy.idle_timeout().map(|idle| {
            let mut timer = tokio::time::interval((idle / 2).max(MIN_SWEEP_PERIOD));
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            timer
        });

        loop {
            let request = match sweep.as_mut() {
                Some(timer) => tokio::select! {
                    request = request_rx.recv() => request,
                    _ = timer.tick() => {
                        self.sweep_stalled(Instant::now());
                        continue;
                    }
                },
                None => request_rx.recv().await,
            };

            let Some(request) = request else {
                break;
            };
            self.handle_request(request);
        }

        self.report_leftovers();
    }

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::Deliver { envelope, reply } => {
                let receipt = self.deliver(envelope);
                if let Some(reply) = reply {
                    let _ = reply.send(receipt);
                }
            }
            Request::Stats { reply } => {
                let _ = reply.send(self.stats(Instant::now()));
            }
            Request::Flush { session, reply } => {
                let _ = reply.send(self.flush(session));
            }
            Request::Close { session, reply } => {
                let _ = reply.send(self.close(session));
            }
        }
    }

    /// Admits one envelope into its session's dispatcher.
    fn deliver(&mut self, envelope: Envelope) -> SubmitReceipt {
        let Envelope {
            session,
            sequence_num,
            command,
        } = envelope;

        let Self {
            console,
            sessions,
            event_listeners,
            flush_policy,
            ..
        } = self;

        let known = sessions.len();
        let dispatcher = sessions.entry(session).or_insert_with(|| {
            debug!(%session, sessions = known + 1, "new producer session");
            Dispatcher::new()
        });

        let mut execute = |sequence: u64, command: LogCommand| {
            execute_command(console, event_listeners, session, sequence, command);
        };

        let admission = dispatcher.submit_with(sequence_num, command, &mut execute);

        if admission.is_pending()
            && flush_policy
                .max_pending
                .is_some_and(|max| dispatcher.pending_len() > max)
        {
            warn!(%session, pending = dispatcher.pending_len(), "pending limit exceeded");
            dispatcher.force_flush(&mut execute);
        }

        SubmitReceipt::new(session, sequence_num, admission)
    }

    /// Force flushes every session whose oldest buffered entry is older than
    /// the idle timeout.
    fn sweep_stalled(&mut self, now: Instant) {
        let Some(idle) = self.flush_policy.idle_timeout() else {
            return;
        };

        let Self {
            console,
            sessions,
            event_listeners,
            ..
        } = self;

        for (&session, dispatcher) in sessions.iter_mut() {
            let flushed = dispatcher.flush_if_stalled(idle, now, |sequence, command| {
                execute_command(console, event_listeners, session, sequence, command);
            });
            if flushed > 0 {
                info!(%session, flushed, "idle timeout flushed stalled session");
            }
        }
    }

    fn flush(&mut self, target: Option<SessionId>) -> usize {
        let Self {
            console,
            sessions,
            event_listeners,
            ..
        } = self;

        sessions
            .iter_mut()
            .filter(|(session, _)| target.is_none_or(|t| t == **session))
            .map(|(&session, dispatcher)| {
                dispatcher.force_flush(|sequence, command| {
                    execute_command(console, event_listeners, session, sequence, command);
                })
            })
            .sum()
    }

    /// Flushes and forgets one session. Returns `None` if it was unknown.
    fn close(&mut self, session: SessionId) -> Option<usize> {
        let mut dispatcher = self.sessions.remove(&session)?;
        let flushed = dispatcher.force_flush(|sequence, command| {
            execute_command(
                &mut self.console,
                &self.event_listeners,
                session,
                sequence,
                command,
            );
        });
        debug!(
            %session,
            flushed,
            sessions = self.sessions.len(),
            "producer session closed"
        );
        Some(flushed)
    }

    fn stats(&self, now: Instant) -> Vec<SessionStats> {
        let mut stats: Vec<SessionStats> = self
            .sessions
            .iter()
            .map(|(&session, dispatcher)| SessionStats {
                session,
                dispatcher: dispatcher.stats(now),
            })
            .collect();
        stats.sort_by_key(|s| s.session);
        stats
    }

    fn report_leftovers(&mut self) {
        for (session, dispatcher) in &mut self.sessions {
            if !dispatcher.is_idle() {
                let discarded = dispatcher.discard_pending();
                warn!(
                    %session,
                    expected = dispatcher.expected(),
                    discarded,
                    "sequencer stopped with buffered commands waiting on a missing sequence"
                );
            }
        }
    }
}

/// Applies one command and notifies listeners.
fn execute_command<S: LogSink>(
    console: &mut Console<S>,
    listeners: &[EventListener],
    session: SessionId,
    sequence: u64,
    command: LogCommand,
) {
    console.execute(&command);

    if listeners.is_empty() {
        return;
    }
    let event = ExecutedEvent::new(session, sequence, nanos_since_epoch(), command);
    for listener in listeners {
        listener(&event);
    }
}

/// Cloneable handle for talking to a running sequencer.
#[derive(Debug, Clone)]
pub struct SequencerClient {
    request_tx: mpsc::Sender<Request>,
}

impl SequencerClient {
    /// Delivers an envelope and waits until the sequencer has admitted it.
    ///
    /// The receipt tells whether the envelope ran, was buffered, or was
    /// dropped as stale.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn deliver(&self, envelope: Envelope) -> Result<SubmitReceipt, SequencerError> {
        let (tx, rx) = oneshot::channel();
        self.request(Request::Deliver {
            envelope,
            reply: Some(tx),
        })
        .await?;
        rx.await.map_err(|_| SequencerError::Shutdown)
    }

    /// Delivers an envelope without waiting for admission.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn send(&self, envelope: Envelope) -> Result<(), SequencerError> {
        self.request(Request::Deliver {
            envelope,
            reply: None,
        })
        .await
    }

    /// Returns per-session dispatcher statistics, ordered by session id.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn stats(&self) -> Result<Vec<SessionStats>, SequencerError> {
        let (tx, rx) = oneshot::channel();
        self.request(Request::Stats { reply: tx }).await?;
        rx.await.map_err(|_| SequencerError::Shutdown)
    }

    /// Force flushes one session, or all of them when `session` is `None`.
    ///
    /// Returns the number of buffered commands executed.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn flush(&self, session: Option<SessionId>) -> Result<usize, SequencerError> {
        let (tx, rx) = oneshot::channel();
        self.request(Request::Flush { session, reply: tx }).await?;
        rx.await.map_err(|_| SequencerError::Shutdown)
    }

    /// Flushes a session's buffered commands and drops its dispatcher.
    ///
    /// Returns the number of commands flushed, or `None` if the session was
    /// never seen. Envelopes for the session arriving afterwards start a
    /// fresh dispatcher at sequence 0, so close a session only once its
    /// producer is gone.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::Shutdown`] if the sequencer has stopped.
    pub async fn close_session(
        &self,
        session: SessionId,
    ) -> Result<Option<usize>, SequencerError> {
        let (tx, rx) = oneshot::channel();
        self.request(Request::Close { session, reply: tx }).await?;
        rx.await.map_err(|_| SequencerError::Shutdown)
    }

    async fn request(&self, request: Request) -> Result<(), SequencerError> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| SequencerError::Shutdown)
    }
}

/// Handle to a spawned sequencer task.
pub struct SequencerHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl SequencerHandle {
    /// Waits for the sequencer to shut down.
    pub async fn wait(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }
}

/// Returns the current time in nanoseconds since the Unix epoch.
#[inline]
fn nanos_since_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
