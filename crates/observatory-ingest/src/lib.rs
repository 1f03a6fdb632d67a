//! Streaming Archive Ingestion
//!
//! This crate turns a multi-gigabyte zstd-compressed NDJSON archive into an
//! in-memory columnar [`Table`] without ever holding more than one record
//! (plus the growing table) in memory.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ ArchiveLines │──▶│ RecordDecoder │──▶│ FilterProject │──▶│ materialize  │
//! │ zstd → lines │   │ NDJSON → map  │   │ predicate +   │   │ rows → Table │
//! │              │   │ skip bad lines│   │ projection    │   │              │
//! └──────────────┘   └───────────────┘   └───────────────┘   └──────────────┘
//! ```
//!
//! Each stage is a lazy iterator; the materializer at the end pulls rows one
//! at a time, which drives the whole chain. Nothing upstream buffers, so
//! archives far larger than available memory stream through fine.
//!
//! ## Failure Policy
//! - A malformed line (bad JSON, invalid UTF-8) is skipped and counted; the
//!   stream continues. Large public dumps routinely contain a small fraction
//!   of corrupt lines and aborting on the first one would make the archive
//!   unusable.
//! - A zstd-level failure is `Error::StreamCorruption` and aborts the run.
//! - The canonical predicate treats a missing `parent_id`/`created_utc` as
//!   `Error::MissingField` and aborts: those fields are guaranteed by the
//!   archive's declared schema, so their absence means the schema assumption
//!   is wrong, not that one record is bad.
//!
//! ## Example
//! ```ignore
//! use observatory_core::{Field, TimeWindow};
//! use observatory_ingest::{ingest, top_level_in_window};
//!
//! let window = TimeWindow::election_night_2024();
//! let table = ingest(
//!     "RC_2024-11.zst".as_ref(),
//!     top_level_in_window(window),
//!     &Field::DEFAULT,
//!     None,
//! )?;
//! println!("{} matching comments", table.row_count());
//! ```

pub mod decode;
pub mod materialize;
pub mod progress;
pub mod project;
pub mod stream;

pub use decode::{RawRecord, RecordDecoder};
pub use materialize::materialize;
pub use progress::{Progress, ProgressObserver, ProgressTracker};
pub use project::{top_level_in_window, FilterProject, Row};
pub use stream::ArchiveLines;

use std::path::Path;

use observatory_core::{Field, Result, Table};

/// Tunables for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Emit a progress report every this many processed records.
    pub report_every: u64,
    /// Upper bound on the zstd decoder window (log2 of bytes). Bounds
    /// decoder memory for archives written with large windows.
    pub window_log_max: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            report_every: 100_000,
            window_log_max: 31,
        }
    }
}

/// Stream the archive at `path`, keep records for which `predicate` returns
/// true, project each to `fields`, and materialize the result.
///
/// Pure with respect to its arguments: no snapshot lookups, no acquisition,
/// no global state. Fails with [`observatory_core::Error::FileNotFound`] if
/// the path does not exist and [`observatory_core::Error::StreamCorruption`]
/// if the compressed stream is unreadable.
pub fn ingest<P>(
    path: &Path,
    predicate: P,
    fields: &[Field],
    observer: Option<&dyn ProgressObserver>,
) -> Result<Table>
where
    P: Fn(&RawRecord) -> Result<bool>,
{
    ingest_with(&IngestOptions::default(), path, predicate, fields, observer)
}

/// [`ingest`] with explicit [`IngestOptions`].
pub fn ingest_with<P>(
    options: &IngestOptions,
    path: &Path,
    predicate: P,
    fields: &[Field],
    observer: Option<&dyn ProgressObserver>,
) -> Result<Table>
where
    P: Fn(&RawRecord) -> Result<bool>,
{
    tracing::info!(path = %path.display(), "starting archive ingest");

    let lines = ArchiveLines::open(path, options.window_log_max)?;
    let records = RecordDecoder::new(lines);
    let tracker = ProgressTracker::new(options.report_every, observer);
    let rows = FilterProject::new(records, predicate, fields, tracker);
    let table = materialize(rows, fields)?;

    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        "archive ingest complete"
    );
    Ok(table)
}
