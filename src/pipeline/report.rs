// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the reader, the workers and every emitter
#[derive(Debug, Default)]
pub(crate) struct Counters {
    read: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    emitted: AtomicU64,
}

impl Counters {
    pub(crate) fn line_read(&self) {
        self.read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn line_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn line_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn item_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PipelineReport {
        PipelineReport {
            read: self.read.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Non-empty lines handed to the workers
    pub read: u64,
    /// Lines whose transform returned Ok
    pub processed: u64,
    /// Lines whose transform returned an error
    pub failed: u64,
    /// Items sent towards the sink (before any sink-side dedup)
    pub emitted: u64,
}

impl PipelineReport {
    pub fn success_rate(&self) -> f64 {
        if self.read == 0 {
            1.0
        } else {
            self.processed as f64 / self.read as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let counters = Counters::default();
        counters.line_read();
        counters.line_read();
        counters.line_processed();
        counters.line_failed();
        counters.item_emitted();

        let report = counters.snapshot();
        assert_eq!(report.read, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.emitted, 1);
        assert!((report.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_run_success_rate() {
        assert_eq!(PipelineReport::default().success_rate(), 1.0);
    }
}
