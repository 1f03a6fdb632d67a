//! Progress Reporting
//!
//! Observes the pipeline's counters at a fixed cadence without touching its
//! control flow: the tracker is invoked inline from the filter/project
//! stage, logs a throughput line every `report_every` processed records, and
//! forwards the same snapshot to an optional external observer (the server
//! wires one up to feed its loading-status endpoint).
//!
//! Observers are event sinks. The trait method takes `&self` and returns
//! nothing; an implementation that forwards into a channel should swallow
//! send failures rather than surface them — nothing an observer does may
//! abort ingestion.

use std::time::{Duration, Instant};

/// A point-in-time snapshot of one ingestion run.
///
/// `processed` and `matched` are monotonically non-decreasing over the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Records decoded so far (malformed lines are not records).
    pub processed: u64,
    /// Records that passed the predicate and were projected.
    pub matched: u64,
    /// Time since the run started.
    pub elapsed: Duration,
}

impl Progress {
    /// Records per second since the start of the run.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// External sink for progress snapshots.
///
/// Implementations must not panic; the pipeline calls them inline.
pub trait ProgressObserver {
    fn observe(&self, progress: Progress);
}

/// Counts records and emits periodic reports.
pub struct ProgressTracker<'a> {
    processed: u64,
    matched: u64,
    started: Instant,
    report_every: u64,
    observer: Option<&'a dyn ProgressObserver>,
    finished: bool,
}

impl<'a> ProgressTracker<'a> {
    /// `report_every == 0` disables periodic reports (the final one still
    /// fires).
    pub fn new(report_every: u64, observer: Option<&'a dyn ProgressObserver>) -> Self {
        Self {
            processed: 0,
            matched: 0,
            started: Instant::now(),
            report_every,
            observer,
            finished: false,
        }
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
        if self.report_every > 0 && self.processed % self.report_every == 0 {
            self.report("ingest progress");
        }
    }

    pub fn record_matched(&mut self) {
        self.matched += 1;
    }

    pub fn snapshot(&self) -> Progress {
        Progress {
            processed: self.processed,
            matched: self.matched,
            elapsed: self.started.elapsed(),
        }
    }

    /// Emit the final report. Called once when the stream is exhausted;
    /// subsequent calls are no-ops.
    pub fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.report("ingest stream exhausted");
        }
    }

    fn report(&self, message: &str) {
        let progress = self.snapshot();
        tracing::info!(
            processed = progress.processed,
            matched = progress.matched,
            rate = format!("{:.0}/s", progress.rate()),
            "{message}"
        );
        if let Some(observer) = self.observer {
            observer.observe(progress);
        }
    }
}
