//! Record Decoder
//!
//! Turns the line stream into a lazy sequence of decoded records.
//!
//! Per line: trim, skip if empty, parse as a JSON object. A line that fails
//! to parse is skipped and counted — never fatal. Stream-level errors
//! (`StreamCorruption`, `Io`) propagate and fuse the iterator.
//!
//! The sequence is single-pass and not restartable: the underlying
//! decompression stream is consumed destructively.

use observatory_core::{Error, Result};

/// An untyped record as decoded from one archive line.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Lazy NDJSON decoder over a line iterator.
pub struct RecordDecoder<I> {
    lines: I,
    skipped: u64,
    done: bool,
}

impl<I> RecordDecoder<I>
where
    I: Iterator<Item = Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            skipped: 0,
            done: false,
        }
    }

    /// Number of malformed lines skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<I> Iterator for RecordDecoder<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                None => {
                    self.done = true;
                    if self.skipped > 0 {
                        tracing::warn!(skipped = self.skipped, "skipped malformed lines");
                    }
                    return None;
                }
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<RawRecord>(line) {
                        Ok(record) => return Some(Ok(record)),
                        Err(e) => {
                            self.skipped += 1;
                            tracing::debug!(error = %e, "skipping undecodable line");
                        }
                    }
                }
                Some(Err(Error::MalformedRecord(reason))) => {
                    self.skipped += 1;
                    tracing::debug!(%reason, "skipping malformed line");
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(lines: Vec<Result<String>>) -> (Vec<RawRecord>, u64) {
        let mut decoder = RecordDecoder::new(lines.into_iter());
        let records: Vec<RawRecord> = decoder.by_ref().map(|r| r.unwrap()).collect();
        let skipped = decoder.skipped();
        (records, skipped)
    }

    #[test]
    fn test_decodes_valid_lines() {
        let (records, skipped) = decode_all(vec![
            Ok(r#"{"id": "a"}"#.to_string()),
            Ok(r#"{"id": "b"}"#.to_string()),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "a");
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_skips_empty_and_whitespace_lines() {
        let (records, skipped) = decode_all(vec![
            Ok(String::new()),
            Ok("   ".to_string()),
            Ok(r#"{"id": "a"}"#.to_string()),
        ]);
        assert_eq!(records.len(), 1);
        // blank lines are not malformed, just absent
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_skips_bad_json() {
        let (records, skipped) = decode_all(vec![
            Ok(r#"{"id": "a"}"#.to_string()),
            Ok("{truncated".to_string()),
            Ok("[1, 2, 3]".to_string()), // not an object
            Ok(r#"{"id": "b"}"#.to_string()),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_skips_malformed_line_errors() {
        let (records, skipped) = decode_all(vec![
            Err(Error::MalformedRecord("bad utf-8".to_string())),
            Ok(r#"{"id": "a"}"#.to_string()),
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_stream_error_propagates_and_fuses() {
        let lines = vec![
            Ok(r#"{"id": "a"}"#.to_string()),
            Err(Error::StreamCorruption("boom".to_string())),
            Ok(r#"{"id": "b"}"#.to_string()),
        ];
        let mut decoder = RecordDecoder::new(lines.into_iter());
        assert!(decoder.next().unwrap().is_ok());
        assert!(matches!(
            decoder.next().unwrap(),
            Err(Error::StreamCorruption(_))
        ));
        assert!(decoder.next().is_none());
    }
}
