//! Decompression Stream Adapter
//!
//! Wraps a zstd-compressed archive as an iterator of text lines with bounded
//! memory use, whatever the archive size.
//!
//! ## How It Stays Bounded
//! - `zstd::stream::read::Decoder` decompresses incrementally as bytes are
//!   pulled; `window_log_max` caps the decoder's back-reference window so an
//!   archive written with a huge window cannot balloon memory.
//! - A `BufReader` on top frames lines with `read_until(b'\n')`, reusing one
//!   buffer. Only the current line is ever held.
//!
//! ## Text Decoding
//! UTF-8 is validated per complete line, after framing. A multi-byte
//! sequence that straddles a decompression chunk boundary is therefore never
//! split: by the time validation runs, the line is whole. A line that is not
//! valid UTF-8 yields `Error::MalformedRecord`, which the decoder downstream
//! treats as skippable.
//!
//! ## Resource Handling
//! The open file handle and the decompressor context live inside the
//! iterator and are released when it is dropped, whether iteration ran to
//! the end or was abandoned mid-stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use observatory_core::{Error, Result};
use zstd::stream::read::Decoder;

/// Iterator over the decompressed lines of a zstd archive.
///
/// Yields `Ok(line)` per line (terminator stripped), `Err(MalformedRecord)`
/// for a line that is not valid UTF-8, and `Err(StreamCorruption)` — once,
/// then fuses — if the compressed stream itself is unreadable.
pub struct ArchiveLines {
    reader: BufReader<Decoder<'static, BufReader<File>>>,
    buf: Vec<u8>,
    done: bool,
}

impl ArchiveLines {
    /// Open `path` for streaming decompression.
    ///
    /// `window_log_max` bounds the decoder window (log2 of bytes); public
    /// Reddit dumps need up to 31.
    pub fn open(path: &Path, window_log_max: u32) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let mut decoder =
            Decoder::new(file).map_err(|e| Error::StreamCorruption(e.to_string()))?;
        decoder
            .window_log_max(window_log_max)
            .map_err(|e| Error::StreamCorruption(e.to_string()))?;

        Ok(Self {
            reader: BufReader::new(decoder),
            buf: Vec::new(),
            done: false,
        })
    }
}

impl Iterator for ArchiveLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                match std::str::from_utf8(&self.buf) {
                    Ok(line) => Some(Ok(line.to_owned())),
                    Err(_) => Some(Err(Error::MalformedRecord(
                        "line is not valid UTF-8".to_string(),
                    ))),
                }
            }
            Err(e) => {
                // The only read source is the decompressor; any failure here
                // means the compressed stream is unusable from this point on.
                self.done = true;
                Some(Err(Error::StreamCorruption(e.to_string())))
            }
        }
    }
}
