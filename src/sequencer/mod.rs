/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Sequencer module for in-order replay of console commands.
//!
//! Producers stamp each command with a per-session sequence number when it is
//! emitted. Delivery may reorder, delay, or repeat envelopes; the sequencer
//! puts them back in order and executes them one at a time against a console
//! whose group depth therefore follows the emitted stream.
//!
//! # Architecture
//!
//! - Envelopes are delivered via an async channel, in arrival order
//! - A single task owns every piece of mutable state, so no locking is needed
//! - Each session has its own [`Dispatcher`] (reorder buffer)
//! - Due commands run synchronously, followed by any contiguous buffered ones
//! - Executed events are emitted to registered listeners in execution order
//!
//! # Examples
//!
//! ```no_run
//! use termlog_rs::sequencer::{LogCommand, Sequencer, Terminal};
//! use termlog_rs::sink::MemorySink;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = MemorySink::new();
//! let mut sequencer = Sequencer::new(sink.clone());
//!
//! // Register an event listener
//! sequencer.add_listener(|event| {
//!     println!("Executed {}: {:?}", event.sequence_num, event.command);
//! });
//!
//! let client = sequencer.client();
//! let terminal = Terminal::new(client.clone());
//! let handle = sequencer.spawn();
//!
//! // Stamp in emission order, deliver in any order
//! let first = terminal.stamp(LogCommand::Log(vec!["A".into()]));
//! let second = terminal.stamp(LogCommand::Log(vec!["B".into()]));
//! client.deliver(second).await?;
//! client.deliver(first).await?;
//!
//! drop((client, terminal));
//! handle.wait().await?;
//! assert_eq!(sink.texts(), vec!["» A".to_string(), "» B".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod console;
pub mod core;
pub mod dispatcher;
pub mod envelope;
pub mod event;
pub mod receipt;
pub mod result;
pub mod terminal;

#[cfg(test)]
mod tests;

// Re-export main types
pub use command::{LogCommand, LogKind};
pub use console::Console;
pub use self::core::{Sequencer, SequencerClient, SequencerHandle, SessionStats};
pub use dispatcher::{Dispatcher, DispatcherStats};
pub use envelope::{Envelope, SessionId};
pub use event::ExecutedEvent;
pub use receipt::SubmitReceipt;
pub use result::Admission;
pub use terminal::Terminal;
