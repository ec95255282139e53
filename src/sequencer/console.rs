/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Command execution against a sink.
//!
//! [`Console`] is where sequenced commands take effect. It owns the group
//! context, so indentation is decided when a command executes, never when it
//! arrives.

use super::command::{LogCommand, LogKind};
use crate::group::{GroupContext, INDENT_UNIT};
use crate::sink::{ConsoleLine, LogSink};
use crate::table;
use serde_json::Value;

/// Marker printed in front of every line.
pub const LINE_MARKER: &str = "» ";

/// Executes commands, tracking group depth and writing to a sink.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use termlog_rs::sequencer::{Console, LogCommand};
/// use termlog_rs::sink::MemorySink;
///
/// let sink = MemorySink::new();
/// let mut console = Console::new(sink.clone());
/// console.execute(&LogCommand::Group);
/// console.execute(&LogCommand::Info(json!("ready")));
/// assert_eq!(sink.texts(), vec!["»   ready".to_string()]);
/// ```
#[derive(Debug)]
pub struct Console<S> {
    group: GroupContext,
    sink: S,
}

impl<S: LogSink> Console<S> {
    /// Creates a console at group depth zero.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            group: GroupContext::new(),
            sink,
        }
    }

    /// Current group context.
    #[must_use]
    pub fn group(&self) -> &GroupContext {
        &self.group
    }

    /// Returns the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Applies one command.
    ///
    /// Group commands adjust the depth and print nothing; every other command
    /// performs exactly one sink write.
    pub fn execute(&mut self, command: &LogCommand) {
        match command {
            LogCommand::Group => self.group.enter(),
            LogCommand::GroupEnd => self.group.leave(),
            LogCommand::Table(value) => {
                let text = self.format_table(value);
                self.sink.write(ConsoleLine::new(LogKind::Table, text));
            }
            LogCommand::Log(args) => {
                let text = self.format_message(&join_args(args));
                self.sink.write(ConsoleLine::new(LogKind::Log, text));
            }
            LogCommand::Assert(value) => self.print(LogKind::Assert, value),
            LogCommand::Error(value) => self.print(LogKind::Error, value),
            LogCommand::Info(value) => self.print(LogKind::Info, value),
            LogCommand::Warn(value) => self.print(LogKind::Warn, value),
        }
    }

    fn print(&mut self, kind: LogKind, value: &Value) {
        let text = self.format_message(&stringify(value));
        self.sink.write(ConsoleLine::new(kind, text));
    }

    /// Marker, then the group-indented message. Continuation lines get one
    /// extra unit so they line up under the text after the marker.
    fn format_message(&self, message: &str) -> String {
        let continued = message.replace('\n', &format!("\n{INDENT_UNIT}"));
        format!("{LINE_MARKER}{}", self.group.indent(&continued))
    }

    /// The table carries a margin one unit wider than the group indent; the
    /// marker takes the place of that extra unit on the first line.
    fn format_table(&self, value: &Value) -> String {
        let rendered = table::render(value, self.group.table_indent());
        match rendered.strip_prefix(INDENT_UNIT) {
            Some(rest) => format!("{LINE_MARKER}{rest}"),
            None => format!("{LINE_MARKER}{rendered}"),
        }
    }
}

/// Strings print as-is, everything else as pretty JSON.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

// Space-separated as a browser console shows them, not comma-joined.
fn join_args(args: &[Value]) -> String {
    args.iter().map(stringify).collect::<Vec<_>>().join(" ")
}
