//! Snapshot Storage Format
//!
//! A pre-built table persisted to disk so subsequent runs can skip the
//! multi-minute archive ingest. Columnar, checksummed, compressed.
//!
//! ## Snapshot File Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (24 bytes)                                           │
//! │ - Magic bytes: "OBSN" (4 bytes)                             │
//! │ - Version: 1 (2 bytes)                                      │
//! │ - Compression: None/Lz4 (2 bytes)                           │
//! │ - Row count (8 bytes)                                       │
//! │ - Column count (4 bytes)                                    │
//! │ - Reserved (4 bytes)                                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Column 1                                                    │
//! │ - Name length (2 bytes) + name bytes                        │
//! │ - Type tag: 0 = string, 1 = integer (1 byte)                │
//! │ - Block length (4 bytes) + block bytes                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Column 2 ...                                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes)                                            │
//! │ - CRC32 checksum of everything above (4 bytes)              │
//! │ - Magic bytes: "OBSN" again (4 bytes)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Block Format (uncompressed)
//!
//! One block per column, LZ4-compressed (size-prepended) unless compression
//! is None:
//! - String column: per value, varint length + UTF-8 bytes
//! - Integer column: per value, ZigZag varint
//!
//! ## Why This Design?
//!
//! ### One Block per Column
//! The table is read back whole (it becomes the in-memory serving dataset),
//! so there is no seek path to optimize; a single block per column keeps the
//! format small and makes same-column values adjacent, which is where the
//! compression wins live.
//!
//! ### CRC32 Checksum
//! The snapshot sits on disk between runs; silent corruption must be
//! detected rather than served. The checksum covers everything before the
//! footer.

pub mod reader;
pub mod writer;

pub use reader::{decode_snapshot, read_snapshot};
pub use writer::{encode_snapshot, write_snapshot};

use observatory_core::{Error, Result};

pub(crate) const SNAPSHOT_MAGIC: [u8; 4] = *b"OBSN";
pub(crate) const SNAPSHOT_VERSION: u16 = 1;
pub(crate) const HEADER_SIZE: usize = 24;
pub(crate) const FOOTER_SIZE: usize = 8;

/// Compression applied to column blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Lz4,
}

impl From<Compression> for u16 {
    fn from(c: Compression) -> u16 {
        match c {
            Compression::None => 0,
            Compression::Lz4 => 1,
        }
    }
}

impl TryFrom<u16> for Compression {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Lz4),
            other => Err(Error::InvalidCompression(other)),
        }
    }
}
