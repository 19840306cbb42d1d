// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Line Pipeline
 * Bounded reader -> worker pool -> single-writer sink
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod input;
pub mod report;
pub mod sink;
pub mod transform;

pub use input::LineSource;
pub use report::PipelineReport;
pub use sink::{CollectSink, GroupedSink, KeyedUniqueSink, LineSink, Sink};
pub use transform::{from_fn, Emitter, FnTransform, Transform};

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::errors::{AuxError, AuxResult};
use report::Counters;

/// Result of a completed run: the counters plus the sink handed back
#[derive(Debug)]
pub struct PipelineOutcome<S> {
    pub report: PipelineReport,
    pub sink: S,
}

pub struct Pipeline<T: Transform> {
    concurrency: usize,
    transform: Arc<T>,
}

impl<T: Transform> Pipeline<T> {
    pub fn new(config: &PipelineConfig, transform: T) -> Self {
        Self::with_concurrency(config.concurrency(), transform)
    }

    pub fn with_concurrency(concurrency: usize, transform: T) -> Self {
        Self {
            concurrency: concurrency.max(1),
            transform: Arc::new(transform),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Drain `source` through the worker pool into `sink`.
    ///
    /// Per-line failures only show up in the report. The run fails when the
    /// sink fails (closed stdout, full disk) or a pipeline task cannot be joined.
    pub async fn run<S>(&self, source: LineSource, sink: S) -> AuxResult<PipelineOutcome<S>>
    where
        S: Sink<T::Output>,
    {
        let started = Instant::now();
        let counters = Arc::new(Counters::default());

        let (work_tx, work_rx) = mpsc::channel::<String>(self.concurrency);
        let (result_tx, mut result_rx) = mpsc::channel::<T::Output>(self.concurrency);

        let sink_task = tokio::spawn(async move {
            let mut sink = sink;
            while let Some(item) = result_rx.recv().await {
                sink.accept(item)?;
            }
            sink.finish()?;
            Ok::<S, AuxError>(sink)
        });

        let reader = tokio::spawn(input::feed(source, work_tx, Arc::clone(&counters)));

        let work_rx = Arc::new(Mutex::new(work_rx));
        let emitter = Emitter::new(result_tx, Arc::clone(&counters));
        let mut workers = JoinSet::new();

        for worker_id in 0..self.concurrency {
            let work_rx = Arc::clone(&work_rx);
            let transform = Arc::clone(&self.transform);
            let emitter = emitter.clone();
            let counters = Arc::clone(&counters);

            workers.spawn(async move {
                loop {
                    let next = { work_rx.lock().await.recv().await };
                    let Some(line) = next else {
                        break;
                    };

                    match transform.apply(line.clone(), &emitter).await {
                        Ok(()) => counters.line_processed(),
                        Err(AuxError::ChannelClosed) => {
                            counters.line_failed();
                            debug!(worker = worker_id, "Result channel closed, worker exiting");
                            break;
                        }
                        Err(e) => {
                            counters.line_failed();
                            debug!(worker = worker_id, line = %line, error = %e, "Line failed");
                        }
                    }
                }
            });
        }

        // Workers hold the only remaining senders; the sink stops once they are gone.
        drop(emitter);
        drop(work_rx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Worker task aborted");
            }
        }

        if let Err(e) = reader.await {
            warn!(error = %e, "Input reader task aborted");
        }

        let sink = sink_task
            .await
            .map_err(|e| AuxError::General(format!("Sink task aborted: {}", e)))??;

        let report = counters.snapshot();
        debug!(
            read = report.read,
            processed = report.processed,
            failed = report.failed,
            emitted = report.emitted,
            concurrency = self.concurrency,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline finished"
        );

        Ok(PipelineOutcome { report, sink })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_input_finishes() {
        let pipeline = Pipeline::with_concurrency(4, from_fn(|l: String| async move { Ok(vec![l]) }));
        let outcome = pipeline
            .run(LineSource::lines(Vec::<String>::new()), CollectSink::new())
            .await
            .unwrap();

        assert!(outcome.sink.items().is_empty());
        assert_eq!(outcome.report, PipelineReport::default());
    }

    #[tokio::test]
    async fn test_failed_line_does_not_stop_run() {
        let pipeline = Pipeline::with_concurrency(
            2,
            from_fn(|l: String| async move {
                if l == "bad" {
                    Err(AuxError::parse(l, "rejected"))
                } else {
                    Ok(vec![l])
                }
            }),
        );

        let outcome = pipeline
            .run(LineSource::lines(["a", "bad", "b"]), CollectSink::new())
            .await
            .unwrap();

        let mut items = outcome.sink.into_items();
        items.sort();
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(outcome.report.read, 3);
        assert_eq!(outcome.report.processed, 2);
        assert_eq!(outcome.report.failed, 1);
    }

    struct FailingSink;

    impl Sink<String> for FailingSink {
        fn accept(&mut self, _item: String) -> AuxResult<()> {
            Err(AuxError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "closed",
            )))
        }
    }

    #[tokio::test]
    async fn test_sink_failure_ends_run_with_error() {
        let pipeline = Pipeline::with_concurrency(2, from_fn(|l: String| async move { Ok(vec![l]) }));
        let lines: Vec<String> = (0..100).map(|i| i.to_string()).collect();

        let result = pipeline.run(LineSource::lines(lines), FailingSink).await;
        assert!(matches!(result, Err(AuxError::Io(_))));
    }
}
