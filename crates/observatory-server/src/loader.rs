//! Dataset Loader
//!
//! Orchestrates "where does the table come from": a pre-built snapshot if
//! one exists, otherwise a full archive ingest (persisting a snapshot for
//! next time), otherwise synthetic sample data. Runs synchronously on a
//! blocking thread; the server stays responsive and reports progress via
//! the status channel meanwhile.
//!
//! Ingestion failures never crash the process: a missing or corrupt archive
//! degrades to sample data with a loud log line.

use observatory_core::{Error, Field, Table};
use observatory_ingest::{ingest_with, top_level_in_window, IngestOptions, ProgressObserver};
use observatory_snapshot::{read_snapshot, write_snapshot};

use crate::config::ServerConfig;
use crate::sample;

/// Produce the serving table, whatever it takes.
pub fn load_dataset(config: &ServerConfig, observer: Option<&dyn ProgressObserver>) -> Table {
    if config.use_sample_data {
        tracing::info!("sample data requested, skipping load");
        return sample::sample_table(&config.window);
    }

    match read_snapshot(&config.snapshot_path) {
        Ok(table) => return table,
        Err(Error::FileNotFound(_)) => {
            tracing::debug!(path = %config.snapshot_path.display(), "no snapshot, ingesting from archive");
        }
        Err(e) => {
            tracing::warn!(path = %config.snapshot_path.display(), error = %e, "snapshot unreadable, re-ingesting");
        }
    }

    match ingest_archive(config, observer) {
        Ok(table) => table,
        Err(e @ Error::FileNotFound(_)) => {
            tracing::warn!(
                error = %e,
                "archive not found; download it to {} first — serving sample data",
                config.archive_path.display()
            );
            sample::sample_table(&config.window)
        }
        Err(e) => {
            tracing::error!(error = %e, "archive ingest failed, serving sample data");
            sample::sample_table(&config.window)
        }
    }
}

fn ingest_archive(
    config: &ServerConfig,
    observer: Option<&dyn ProgressObserver>,
) -> observatory_core::Result<Table> {
    let options = IngestOptions {
        report_every: config.report_every,
        ..Default::default()
    };
    let table = ingest_with(
        &options,
        &config.archive_path,
        top_level_in_window(config.window),
        &Field::DEFAULT,
        observer,
    )?;

    // Best effort: a failed snapshot write costs the next startup time, not
    // this one's correctness.
    if let Err(e) = write_snapshot(&table, &config.snapshot_path) {
        tracing::warn!(path = %config.snapshot_path.display(), error = %e, "could not persist snapshot");
    }

    Ok(table)
}
