//! Snapshot Writer
//!
//! Serializes a finished [`Table`] to the snapshot format: one varint-packed,
//! LZ4-compressed block per column, CRC32 footer over the whole file.

use bytes::{BufMut, BytesMut};
use std::path::Path;

use observatory_core::table::ColumnValues;
use observatory_core::{varint, Result, Table};

use crate::{Compression, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};

/// Encode `table` as snapshot bytes with the given block compression.
pub fn encode_snapshot(table: &Table, compression: Compression) -> Result<Vec<u8>> {
    let mut buf = BytesMut::new();

    // Header
    buf.put_slice(&SNAPSHOT_MAGIC);
    buf.put_u16(SNAPSHOT_VERSION);
    buf.put_u16(compression.into());
    buf.put_u64(table.row_count() as u64);
    buf.put_u32(table.fields().len() as u32);
    buf.put_u32(0); // reserved

    // Columns
    for (field, values) in table.columns() {
        let name = field.name().as_bytes();
        buf.put_u16(name.len() as u16);
        buf.put_slice(name);

        let (type_tag, block) = encode_block(values);
        buf.put_u8(type_tag);

        let block = match compression {
            Compression::None => block,
            Compression::Lz4 => lz4_flex::compress_prepend_size(&block),
        };
        buf.put_u32(block.len() as u32);
        buf.put_slice(&block);
    }

    // Footer
    let crc = crc32fast::hash(&buf);
    buf.put_u32(crc);
    buf.put_slice(&SNAPSHOT_MAGIC);

    Ok(buf.to_vec())
}

fn encode_block(values: &ColumnValues) -> (u8, Vec<u8>) {
    let mut block = Vec::new();
    match values {
        ColumnValues::Str(items) => {
            for item in items {
                varint::encode_u64(&mut block, item.len() as u64);
                block.extend_from_slice(item.as_bytes());
            }
            (0, block)
        }
        ColumnValues::Int(items) => {
            for &item in items {
                varint::encode_i64(&mut block, item);
            }
            (1, block)
        }
    }
}

/// Write `table` to `path` with LZ4 block compression.
///
/// The parent directory is created if missing, so a fresh data directory
/// works on the first run.
pub fn write_snapshot(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = encode_snapshot(table, Compression::Lz4)?;
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        bytes = bytes.len(),
        "wrote snapshot"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use observatory_core::{Comment, Field};

    fn tiny_table() -> Table {
        Table::from_comments(vec![Comment {
            id: "a".to_string(),
            author: "alice".to_string(),
            created_utc: 1_730_764_800,
            subreddit: "politics".to_string(),
            parent_id: "t3_p".to_string(),
            link_id: "t3_p".to_string(),
            score: -5,
            body: "hello".to_string(),
        }])
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_snapshot(&tiny_table(), Compression::None).unwrap();
        assert_eq!(&bytes[0..4], b"OBSN");
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 1); // version
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), 0); // compression
        assert_eq!(&bytes[bytes.len() - 4..], b"OBSN");
    }

    #[test]
    fn test_crc_covers_body() {
        let bytes = encode_snapshot(&tiny_table(), Compression::Lz4).unwrap();
        let footer_start = bytes.len() - crate::FOOTER_SIZE;
        let stored = u32::from_be_bytes(bytes[footer_start..footer_start + 4].try_into().unwrap());
        assert_eq!(stored, crc32fast::hash(&bytes[..footer_start]));
    }

    #[test]
    fn test_empty_table_encodes() {
        let table = Table::empty(&Field::DEFAULT);
        let bytes = encode_snapshot(&table, Compression::Lz4).unwrap();
        assert!(bytes.len() >= crate::HEADER_SIZE + crate::FOOTER_SIZE);
    }
}
