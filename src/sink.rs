/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Console sinks.
//!
//! A [`LogSink`] receives each fully formatted line exactly once, in execution
//! order. Sinks never report failure to the caller: a write that fails is
//! logged and forgotten so the sequence keeps moving.

use crate::sequencer::LogKind;
use std::io::Write;
use std::sync::{Arc, Mutex};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// One formatted console line (possibly spanning several text lines).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Kind of the command that produced the line.
    pub kind: LogKind,

    /// Formatted text, without a trailing newline.
    pub text: String,
}

impl ConsoleLine {
    /// Creates a new console line.
    #[must_use]
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Destination for formatted console lines.
pub trait LogSink: Send {
    /// Writes one line.
    fn write(&mut self, line: ConsoleLine);
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write(&mut self, line: ConsoleLine) {
        (**self).write(line);
    }
}

/// Color used for each kind. Tables are printed uncolored.
#[must_use]
pub fn kind_color(kind: LogKind) -> Option<ColorSpec> {
    let (color, intense) = match kind {
        LogKind::Assert => (Color::Green, true),
        LogKind::Error => (Color::Red, true),
        LogKind::Info => (Color::White, false),
        LogKind::Log => (Color::Magenta, true),
        LogKind::Warn => (Color::Yellow, true),
        LogKind::Table => return None,
    };
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_intense(intense);
    Some(spec)
}

/// Writes colored lines to standard output.
pub struct StdoutSink {
    stream: StandardStream,
}

impl StdoutSink {
    /// Creates a sink on stdout with the given color choice.
    #[must_use]
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stream: StandardStream::stdout(choice),
        }
    }

    fn try_write(&mut self, line: &ConsoleLine) -> std::io::Result<()> {
        match kind_color(line.kind) {
            Some(spec) => {
                self.stream.set_color(&spec)?;
                writeln!(self.stream, "{}", line.text)?;
                self.stream.reset()?;
            }
            None => writeln!(self.stream, "{}", line.text)?,
        }
        self.stream.flush()
    }
}

impl std::fmt::Debug for StdoutSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdoutSink").finish_non_exhaustive()
    }
}

impl LogSink for StdoutSink {
    fn write(&mut self, line: ConsoleLine) {
        if let Err(err) = self.try_write(&line) {
            tracing::warn!(kind = %line.kind, error = %err, "failed to write console line");
        }
    }
}

/// Forwards lines as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&mut self, line: ConsoleLine) {
        tracing::info!(target: "termlog::console", kind = %line.kind, "{}", line.text);
    }
}

/// Keeps every line in memory.
///
/// Clones share the same buffer, so one clone can be handed to a sequencer
/// while another is read.
///
/// # Examples
///
/// ```
/// use termlog_rs::sink::{ConsoleLine, LogSink, MemorySink};
/// use termlog_rs::sequencer::LogKind;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.write(ConsoleLine::new(LogKind::Log, "» hello"));
/// assert_eq!(sink.texts(), vec!["» hello".to_string()]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<ConsoleLine>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every captured line.
    #[must_use]
    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lock().clone()
    }

    /// Returns the text of every captured line.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(|line| line.text.clone()).collect()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // a panicking writer must not make the captured lines unreadable
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ConsoleLine>> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn write(&mut self, line: ConsoleLine) {
        self.lock().push(line);
    }
}
