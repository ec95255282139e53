use serde_json::json;
use termlog_rs::sequencer::{Envelope, LogCommand, Sequencer, Terminal};
use termlog_rs::sink::MemorySink;

#[cfg(test)]
mod tests {
    use super::*;

    fn log(value: serde_json::Value) -> LogCommand {
        LogCommand::Log(vec![value])
    }

    /// The classic demo stream, stamped in emission order.
    fn demo_stream(terminal: &Terminal) -> Vec<Envelope> {
        vec![
            terminal.stamp(log(json!("Hey terminal! A message from the browser"))),
            terminal.stamp(LogCommand::Group),
            terminal.stamp(LogCommand::Group),
            terminal.stamp(LogCommand::Group),
            terminal.stamp(log(json!({ "json": { "foo": "bar" } }))),
            terminal.stamp(LogCommand::Log(vec![json!("First arg"), json!("Second arg")])),
            terminal.stamp(LogCommand::Assert(json!("Assertion pass"))),
            terminal.stamp(LogCommand::Info(json!("Some info from the app"))),
            terminal.stamp(LogCommand::Table(json!(["vite", "plugin", "terminal"]))),
            terminal.stamp(LogCommand::GroupEnd),
            terminal.stamp(LogCommand::GroupEnd),
            terminal.stamp(LogCommand::GroupEnd),
            terminal.stamp(log(json!("Hey final terminal! A message from the browser"))),
        ]
    }

    async fn print_in(order: &[usize]) -> Vec<String> {
        let sink = MemorySink::new();
        let sequencer = Sequencer::new(sink.clone());
        let client = sequencer.client();
        let terminal = Terminal::new(client.clone());
        let handle = sequencer.spawn();

        let stream = demo_stream(&terminal);
        for &index in order {
            client.deliver(stream[index].clone()).await.unwrap();
        }

        drop((client, terminal));
        handle.wait().await.unwrap();
        sink.texts()
    }

    #[tokio::test]
    async fn test_demo_stream_is_identical_for_any_delivery_order() {
        let in_order: Vec<usize> = (0..13).collect();
        let reversed: Vec<usize> = (0..13).rev().collect();
        let interleaved = vec![1, 12, 0, 7, 3, 9, 2, 11, 4, 8, 6, 10, 5];

        let expected = print_in(&in_order).await;
        assert_eq!(print_in(&reversed).await, expected);
        assert_eq!(print_in(&interleaved).await, expected);
    }

    #[tokio::test]
    async fn test_demo_stream_output() {
        let order: Vec<usize> = (0..13).rev().collect();
        let texts = print_in(&order).await;

        assert_eq!(texts.len(), 7);
        assert_eq!(texts[0], "» Hey terminal! A message from the browser");
        assert_eq!(
            texts[1],
            "»       {\n          \"json\": {\n            \"foo\": \"bar\"\n          }\n        }"
        );
        assert_eq!(texts[2], "»       First arg Second arg");
        assert_eq!(texts[3], "»       Assertion pass");
        assert_eq!(texts[4], "»       Some info from the app");
        assert!(texts[5].starts_with("»       ┌──────────┐\n        │ Values   │"));
        assert_eq!(texts[6], "» Hey final terminal! A message from the browser");
    }

    #[tokio::test]
    async fn test_retransmitted_stream_prints_once() {
        let order: Vec<usize> = (0..13).chain(0..13).collect();
        let texts = print_in(&order).await;
        assert_eq!(texts.len(), 7);
    }
}
