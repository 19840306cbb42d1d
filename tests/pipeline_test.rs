// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Pipeline Tests
 * Delivery, ordering, dedup and timing behaviour of the line pipeline
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use auxs::errors::AuxError;
use auxs::pipeline::{from_fn, CollectSink, KeyedUniqueSink, LineSink, LineSource, Pipeline};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("line-{}", i)).collect()
}

#[tokio::test]
async fn test_every_line_processed_exactly_once() {
    let seen: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));

    let counter = Arc::clone(&seen);
    let pipeline = Pipeline::with_concurrency(
        7,
        from_fn(move |line: String| {
            let counter = Arc::clone(&counter);
            async move {
                *counter.lock().unwrap().entry(line.clone()).or_default() += 1;
                Ok(vec![line])
            }
        }),
    );

    let outcome = pipeline
        .run(LineSource::lines(numbered(500)), CollectSink::new())
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 500);
    assert!(seen.values().all(|&n| n == 1));
    assert_eq!(outcome.report.read, 500);
    assert_eq!(outcome.report.processed, 500);
    assert_eq!(outcome.report.emitted, 500);
}

#[tokio::test]
async fn test_concurrency_does_not_change_output() {
    async fn run(concurrency: usize) -> Vec<String> {
        let pipeline = Pipeline::with_concurrency(
            concurrency,
            from_fn(|line: String| async move {
                tokio::task::yield_now().await;
                Ok(vec![line.to_uppercase(), format!("{}!", line)])
            }),
        );
        let mut items = pipeline
            .run(LineSource::lines(numbered(200)), CollectSink::new())
            .await
            .unwrap()
            .sink
            .into_items();
        items.sort();
        items
    }

    let single = run(1).await;
    assert_eq!(single.len(), 400);
    assert_eq!(single, run(4).await);
    assert_eq!(single, run(32).await);
}

#[tokio::test]
async fn test_workers_bounded_by_concurrency() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (current, max) = (Arc::clone(&in_flight), Arc::clone(&peak));
    let pipeline = Pipeline::with_concurrency(
        3,
        from_fn(move |line: String| {
            let current = Arc::clone(&current);
            let max = Arc::clone(&max);
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(vec![line])
            }
        }),
    );

    pipeline
        .run(LineSource::lines(numbered(30)), CollectSink::new())
        .await
        .unwrap();

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_input_trimmed_and_blank_lines_skipped() {
    let input: &[u8] = b"  a.com  \n\n   \n\tb.com\r\n";
    let pipeline = Pipeline::with_concurrency(1, from_fn(|l: String| async move { Ok(vec![l]) }));

    let outcome = pipeline
        .run(LineSource::reader(input), CollectSink::new())
        .await
        .unwrap();

    assert_eq!(outcome.sink.into_items(), vec!["a.com", "b.com"]);
    assert_eq!(outcome.report.read, 2);
}

#[tokio::test]
async fn test_empty_input_gives_empty_output() {
    let pipeline = Pipeline::with_concurrency(5, from_fn(|l: String| async move { Ok(vec![l]) }));
    let outcome = pipeline
        .run(LineSource::reader(&b""[..]), LineSink::new(Vec::new()))
        .await
        .unwrap();

    assert!(outcome.sink.into_inner().is_empty());
    assert_eq!(outcome.report.read, 0);
}

#[tokio::test]
async fn test_malformed_line_does_not_abort_run() {
    let pipeline = Pipeline::with_concurrency(
        1,
        from_fn(|line: String| async move {
            line.parse::<u32>()
                .map(|n| vec![n * 2])
                .map_err(|e| AuxError::parse(line, e.to_string()))
        }),
    );

    let outcome = pipeline
        .run(LineSource::lines(["1", "oops", "3"]), CollectSink::new())
        .await
        .unwrap();

    assert_eq!(outcome.sink.into_items(), vec![2, 6]);
    assert_eq!(outcome.report.failed, 1);
    assert_eq!(outcome.report.processed, 2);
}

#[tokio::test]
async fn test_dedup_keeps_first_seen_order() {
    let pipeline = Pipeline::with_concurrency(
        1,
        from_fn(|line: String| async move { Ok(vec![(line.clone(), line)]) }),
    );

    let outcome = pipeline
        .run(
            LineSource::lines(["a.com", "a.com", "b.com"]),
            KeyedUniqueSink::new(Vec::new()),
        )
        .await
        .unwrap();

    let out = String::from_utf8(outcome.sink.into_inner()).unwrap();
    assert_eq!(out, "a.com\nb.com\n");
}

#[tokio::test]
async fn test_unique_line_sink_is_idempotent() {
    let pipeline = Pipeline::with_concurrency(4, from_fn(|l: String| async move { Ok(vec![l]) }));

    let outcome = pipeline
        .run(
            LineSource::lines(["x", "y", "x", "x", "y"]),
            LineSink::new(Vec::new()).unique(),
        )
        .await
        .unwrap();

    let out = String::from_utf8(outcome.sink.into_inner()).unwrap();
    let mut lines: Vec<&str> = out.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["x", "y"]);
}

fn sleepy() -> impl auxs::pipeline::Transform<Output = String> {
    from_fn(|line: String| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(vec![line])
    })
}

#[tokio::test(start_paused = true)]
async fn test_single_worker_runs_lines_back_to_back() {
    let started = Instant::now();
    let outcome = Pipeline::with_concurrency(1, sleepy())
        .run(LineSource::lines(["a", "b", "c"]), CollectSink::new())
        .await
        .unwrap();

    assert_eq!(outcome.sink.items().len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_three_workers_run_lines_in_parallel() {
    let started = Instant::now();
    let outcome = Pipeline::with_concurrency(3, sleepy())
        .run(LineSource::lines(["a", "b", "c"]), CollectSink::new())
        .await
        .unwrap();

    let elapsed = started.elapsed();
    assert_eq!(outcome.sink.items().len(), 3);
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(200));
}
