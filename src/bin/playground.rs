/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Demo binary: emits a short console session, delivers it scrambled, and
//! lets the sequencer print it back in order.

use serde_json::json;
use std::path::PathBuf;
use termlog_rs::config::{SinkKind, load_config};
use termlog_rs::sequencer::{LogCommand, Sequencer, Terminal};
use termlog_rs::sink::{LogSink, StdoutSink, TracingSink};
use termlog_rs::telemetry::init_tracing;

fn resolve_config_path() -> (Option<PathBuf>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(PathBuf::from(path)), "cli-arg");
    }

    if let Ok(path) = std::env::var("TERMLOG_CONFIG") {
        if !path.trim().is_empty() {
            return (Some(PathBuf::from(path)), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config_path, config_source) = resolve_config_path();
    let config = load_config(config_path.as_deref())?;

    init_tracing(&config.logging)?;
    tracing::info!(
        source = config_source,
        path = %config_path.as_deref().map_or("<none>".into(), |p| p.display().to_string()),
        "resolved configuration"
    );

    let sink: Box<dyn LogSink> = match config.output.sink {
        SinkKind::Stdout => Box::new(StdoutSink::new(config.output.color.into())),
        SinkKind::Tracing => Box::new(TracingSink),
    };

    let sequencer = Sequencer::with_config(sink, &config.sequencer);
    let client = sequencer.client();
    let terminal = Terminal::new(client.clone());
    let handle = sequencer.spawn();

    let stream = vec![
        terminal.stamp(LogCommand::Log(vec![json!("Hey terminal! A message from the browser")])),
        terminal.stamp(LogCommand::Group),
        terminal.stamp(LogCommand::Group),
        terminal.stamp(LogCommand::Group),
        terminal.stamp(LogCommand::Log(vec![json!({ "json": { "foo": "bar" } })])),
        terminal.stamp(LogCommand::Log(vec![json!("First arg"), json!("Second arg")])),
        terminal.stamp(LogCommand::Assert(json!("Assertion pass"))),
        terminal.stamp(LogCommand::Info(json!("Some info from the app"))),
        terminal.stamp(LogCommand::Warn(json!("Careful, this came in late"))),
        terminal.stamp(LogCommand::Error(json!("Something went wrong"))),
        terminal.stamp(LogCommand::Table(json!(["vite", "plugin", "terminal"]))),
        terminal.stamp(LogCommand::GroupEnd),
        terminal.stamp(LogCommand::GroupEnd),
        terminal.stamp(LogCommand::GroupEnd),
        terminal.stamp(LogCommand::Log(vec![json!(
            "Hey final terminal! A message from the browser"
        )])),
    ];

    // Odd positions first, then even ones backwards.
    let odd = stream.iter().skip(1).step_by(2);
    let even = stream.iter().step_by(2).rev();
    for envelope in odd.chain(even) {
        client.send(envelope.clone()).await?;
    }

    // A failing assertion consumes no sequence number.
    terminal.assert(false, "Assertion fails").await?;

    drop((client, terminal));
    handle.wait().await?;
    Ok(())
}
