//! Dataset Handle & Load Status
//!
//! The server's view of "the currently loaded dataset". Instead of a global
//! mutable variable, the table lives behind an explicitly owned, swappable
//! handle: set once when the background load completes, read concurrently by
//! every request handler afterwards. There are no partial states — a table
//! is either fully built or absent.
//!
//! Ingestion progress crosses from the blocking load thread to the HTTP
//! status endpoint as events over a `watch` channel: the ingest pipeline's
//! `ProgressObserver` pushes snapshots in, handlers read the latest out.
//! `watch::Sender::send_replace` cannot fail, so nothing on the observer
//! side can disturb the pipeline.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use observatory_core::Table;
use observatory_ingest::{Progress, ProgressObserver};

/// Swappable reference to the loaded table.
#[derive(Clone, Default)]
pub struct DatasetHandle {
    inner: Arc<RwLock<Option<Arc<Table>>>>,
}

impl DatasetHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fully built table. Handlers see it on their next read.
    pub async fn set(&self, table: Table) {
        *self.inner.write().await = Some(Arc::new(table));
    }

    /// The current table, if loading has completed.
    pub async fn get(&self) -> Option<Arc<Table>> {
        self.inner.read().await.clone()
    }
}

/// What the loading-status endpoint reports.
#[derive(Debug, Clone, Serialize)]
pub struct LoadStatus {
    pub is_loading: bool,
    pub progress: u8,
    pub message: String,
    pub total_processed: u64,
    pub total_matched: u64,
    pub rate: f64,
}

impl LoadStatus {
    pub fn starting() -> Self {
        Self {
            is_loading: true,
            progress: 0,
            message: "Loading dataset".to_string(),
            total_processed: 0,
            total_matched: 0,
            rate: 0.0,
        }
    }

    pub fn loading(progress: Progress) -> Self {
        Self {
            is_loading: true,
            progress: 0,
            message: format!(
                "Processing archive: {} records scanned, {} matched",
                progress.processed, progress.matched
            ),
            total_processed: progress.processed,
            total_matched: progress.matched,
            rate: progress.rate(),
        }
    }

    pub fn ready(rows: usize) -> Self {
        Self {
            is_loading: false,
            progress: 100,
            message: format!("Dataset loaded ({rows} comments)"),
            total_processed: rows as u64,
            total_matched: rows as u64,
            rate: 0.0,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            is_loading: false,
            progress: 0,
            message,
            total_processed: 0,
            total_matched: 0,
            rate: 0.0,
        }
    }
}

/// Channel pair for publishing load status to handlers.
pub fn status_channel() -> (watch::Sender<LoadStatus>, watch::Receiver<LoadStatus>) {
    watch::channel(LoadStatus::starting())
}

/// Bridges ingestion progress into the status channel.
pub struct StatusProgress {
    tx: watch::Sender<LoadStatus>,
}

impl StatusProgress {
    pub fn new(tx: watch::Sender<LoadStatus>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for StatusProgress {
    fn observe(&self, progress: Progress) {
        self.tx.send_replace(LoadStatus::loading(progress));
    }
}
