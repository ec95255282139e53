/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Tests for sequence ordering guarantees.

#[cfg(test)]
mod tests {
    use crate::sequencer::{Admission, Dispatcher, LogCommand, Sequencer, Terminal};
    use crate::sink::MemorySink;
    use std::sync::{Arc, Mutex};

    type Action = Box<dyn FnOnce() + Send>;

    fn record(log: &Arc<Mutex<Vec<u64>>>, n: u64) -> Action {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(n))
    }

    /// Every permutation of `0..n`, by Heap's algorithm.
    fn permutations(n: usize) -> Vec<Vec<u64>> {
        fn heap(k: usize, items: &mut Vec<u64>, out: &mut Vec<Vec<u64>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            for i in 0..k - 1 {
                heap(k - 1, items, out);
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
            }
            heap(k - 1, items, out);
        }

        let mut items: Vec<u64> = (0..n as u64).collect();
        let mut out = Vec::new();
        heap(n, &mut items, &mut out);
        out
    }

    /// Deterministic shuffle driven by a linear congruential generator.
    fn scrambled(n: u64, seed: u64) -> Vec<u64> {
        let mut items: Vec<u64> = (0..n).collect();
        let mut state = seed;
        for i in (1..items.len()).rev() {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            items.swap(i, j);
        }
        items
    }

    fn run_in_order(order: &[u64]) -> Vec<u64> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher<Action> = Dispatcher::new();
        for &sequence in order {
            dispatcher.submit(sequence, record(&log, sequence));
        }
        let result = log.lock().unwrap().clone();
        result
    }

    #[test]
    fn test_every_permutation_executes_in_sequence_order() {
        let all = permutations(6);
        assert_eq!(all.len(), 720);
        for order in all {
            assert_eq!(run_in_order(&order), vec![0, 1, 2, 3, 4, 5], "order {order:?}");
        }
    }

    #[test]
    fn test_large_scrambled_delivery() {
        for seed in [1, 7, 42] {
            let order = scrambled(1000, seed);
            let expected: Vec<u64> = (0..1000).collect();
            assert_eq!(run_in_order(&order), expected);
        }
    }

    #[test]
    fn test_later_sequence_waits_for_earlier_one() {
        let printed = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher<Action> = Dispatcher::new();

        let b = Arc::clone(&printed);
        let admission = dispatcher.submit(1, Box::new(move || b.lock().unwrap().push("B")));
        assert_eq!(admission, Admission::Buffered);
        assert!(printed.lock().unwrap().is_empty());

        let a = Arc::clone(&printed);
        let admission = dispatcher.submit(0, Box::new(move || a.lock().unwrap().push("A")));
        assert_eq!(admission, Admission::Executed { executed: 2 });
        assert_eq!(*printed.lock().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_nothing_runs_until_head_arrives() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher<Action> = Dispatcher::new();

        dispatcher.submit(2, record(&log, 2));
        dispatcher.submit(1, record(&log, 1));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(dispatcher.pending_len(), 2);

        let admission = dispatcher.submit(0, record(&log, 0));
        assert_eq!(admission, Admission::Executed { executed: 3 });
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
        assert!(dispatcher.is_idle());
    }

    #[tokio::test]
    async fn test_reversed_delivery_prints_in_emission_order() {
        let sink = MemorySink::new();
        let sequencer = Sequencer::new(sink.clone());
        let client = sequencer.client();
        let terminal = Terminal::new(client.clone());
        let handle = sequencer.spawn();

        let envelopes: Vec<_> = (0..50)
            .map(|i| terminal.stamp(LogCommand::Log(vec![format!("line {i}").into()])))
            .collect();

        for envelope in envelopes.into_iter().rev() {
            client.deliver(envelope).await.unwrap();
        }

        drop((client, terminal));
        handle.wait().await.unwrap();

        let expected: Vec<String> = (0..50).map(|i| format!("» line {i}")).collect();
        assert_eq!(sink.texts(), expected);
    }

    #[tokio::test]
    async fn test_listener_sees_sequence_order() {
        let mut sequencer = Sequencer::new(MemorySink::new());

        let sequences = Arc::new(Mutex::new(Vec::new()));
        let sequences_clone = sequences.clone();
        sequencer.add_listener(move |event| {
            sequences_clone.lock().unwrap().push(event.sequence_num);
        });

        let client = sequencer.client();
        let terminal = Terminal::new(client.clone());
        let handle = sequencer.spawn();

        let envelopes: Vec<_> = (0..200)
            .map(|i| terminal.stamp(LogCommand::Info(i.into())))
            .collect();
        let order = scrambled(200, 99);
        for index in order {
            client.deliver(envelopes[index as usize].clone()).await.unwrap();
        }

        drop((client, terminal));
        handle.wait().await.unwrap();

        let seq_vec = sequences.lock().unwrap();
        assert_eq!(seq_vec.len(), 200);
        for (i, seq) in seq_vec.iter().enumerate() {
            assert_eq!(*seq, i as u64);
        }
    }

    #[tokio::test]
    async fn test_timestamps_monotonic() {
        let mut sequencer = Sequencer::new(MemorySink::new());

        let timestamps = Arc::new(Mutex::new(Vec::new()));
        let timestamps_clone = timestamps.clone();
        sequencer.add_listener(move |event| {
            timestamps_clone.lock().unwrap().push(event.timestamp_ns);
        });

        let terminal = Terminal::new(sequencer.client());
        let handle = sequencer.spawn();

        for i in 0..100 {
            terminal.log(i).await.unwrap();
        }

        drop(terminal);
        handle.wait().await.unwrap();

        let ts_vec = timestamps.lock().unwrap();
        assert_eq!(ts_vec.len(), 100);
        for i in 0..ts_vec.len() - 1 {
            assert!(ts_vec[i + 1] >= ts_vec[i], "Timestamps must be monotonic");
        }
    }
}
