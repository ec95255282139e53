/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # termlog-rs
//!
//! Replays console output that arrives out of order, in the order it was
//! emitted.
//!
//! Each log call on a producer is stamped with a sequence number as it is
//! made and then travels independently, so envelopes can reach the process in
//! any order. The [`sequencer`] puts them back in order before anything is
//! printed, and applies `group` nesting at print time so indentation matches
//! the emitted stream. Structured payloads can be printed as tables with
//! [`table::render`].
//!
//! ## Modules
//!
//! - [`sequencer`]: reorder buffer, console executor, async service, producer handle
//! - [`group`]: group depth and indentation
//! - [`table`]: tabular rendering of JSON values
//! - [`sink`]: where formatted lines go (stdout, `tracing`, memory)
//! - [`config`]: TOML and environment configuration
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
pub mod error;
pub mod group;
pub mod sequencer;
pub mod sink;
pub mod table;
pub mod telemetry;

pub use config::{FlushPolicy, TerminalConfig, load_config};
pub use error::{ConfigError, SequencerError, TelemetryError};
pub use group::{GroupContext, INDENT_UNIT};
pub use sequencer::{
    Admission, Dispatcher, Envelope, LogCommand, Sequencer, SequencerClient, SessionId, Terminal,
};
pub use sink::{ConsoleLine, LogSink, MemorySink, StdoutSink, TracingSink};
