//! Error Types for Observatory
//!
//! This module defines all error types that can occur across the ingestion
//! pipeline, the snapshot format, and table queries.
//!
//! ## Error Categories
//!
//! ### Ingestion Errors
//! - `FileNotFound`: Archive (or snapshot) path does not exist
//! - `StreamCorruption`: The zstd stream could not be decompressed
//! - `MalformedRecord`: A single line failed to decode. This one never
//!   escapes `ingest` — the decoder recovers by skipping the line — but it
//!   is the signal between the line layer and the decoder
//! - `MissingField`: The canonical predicate found a schema-guaranteed
//!   field absent. Fatal: the archive does not match its declared schema,
//!   which is worth surfacing loudly rather than silently under-counting
//!
//! ### Table Query Errors
//! - `UnknownColumn`: Operation referenced a column the table does not have
//! - `ColumnType`: Operation type does not match the column's type
//!
//! ### Snapshot Integrity Errors
//! - `InvalidMagic`: Snapshot file doesn't start/end with expected magic bytes
//! - `UnsupportedVersion`: Snapshot was written by a newer format version
//! - `InvalidCompression`: Unknown compression type ID
//! - `CrcMismatch`: Data corruption detected via checksum
//! - `InvalidSnapshot`: Malformed snapshot data (truncated, bad varints, ...)
//! - `Decompression`: Block decompression failed (likely corruption)
//!
//! ## Usage
//! All fallible functions return `Result<T>`, aliased to `Result<T, Error>`,
//! so `?` propagation works everywhere.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("stream corruption: {0}")]
    StreamCorruption(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column {field} is not a {expected} column")]
    ColumnType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid magic bytes")]
    InvalidMagic,

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u16),

    #[error("invalid compression type: {0}")]
    InvalidCompression(u16),

    #[error("CRC mismatch")]
    CrcMismatch,

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("decompression error: {0}")]
    Decompression(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
