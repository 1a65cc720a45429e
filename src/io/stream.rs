// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Line-oriented stream adapters.
//!
//! Format readers and writers speak lines; this module turns raw byte
//! streams into that interface and nothing more. No format knowledge, no
//! validation. Buffer capacity is configurable, `\r\n` endings are
//! normalized away on read, and flushing is idempotent.

use crate::core::{HepError, Result};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use super::compression::CompressedSink;

/// Default capacity of the read and write buffers.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Buffered line reader over any byte source.
pub struct LineStream {
    inner: BufReader<Box<dyn Read + Send>>,
    line_number: u64,
}

impl std::fmt::Debug for LineStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}

impl LineStream {
    /// Wrap a byte source with the default buffer capacity.
    pub fn new(source: Box<dyn Read + Send>) -> Self {
        LineStream::with_capacity(DEFAULT_BUFFER_CAPACITY, source)
    }

    /// Wrap a byte source with an explicit buffer capacity.
    pub fn with_capacity(capacity: usize, source: Box<dyn Read + Send>) -> Self {
        LineStream {
            inner: BufReader::with_capacity(capacity.max(1), source),
            line_number: 0,
        }
    }

    /// Read the next line into `buf`, replacing its contents.
    ///
    /// The terminator is stripped and a `\r\n` ending is normalized away.
    /// Returns `false` at clean end of stream; a read or encoding failure
    /// is a real error.
    pub fn read_line_into(&mut self, buf: &mut String) -> Result<bool> {
        buf.clear();
        let n = self.inner.read_line(buf).map_err(|e| {
            HepError::read_failed(
                "stream",
                format!("read error after line {}: {e}", self.line_number),
            )
        })?;
        if n == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(true)
    }

    /// Number of lines handed out so far. Used for error context.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Configured buffer capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

/// Buffered line writer over a codec-wrapped byte sink.
pub struct BlockWriter {
    inner: BufWriter<CompressedSink>,
    bytes_written: u64,
}

impl BlockWriter {
    /// Wrap a sink with the default buffer capacity.
    pub fn new(sink: CompressedSink) -> Self {
        BlockWriter::with_capacity(DEFAULT_BUFFER_CAPACITY, sink)
    }

    /// Wrap a sink with an explicit buffer capacity.
    pub fn with_capacity(capacity: usize, sink: CompressedSink) -> Self {
        BlockWriter {
            inner: BufWriter::with_capacity(capacity.max(1), sink),
            bytes_written: 0,
        }
    }

    /// Write a string fragment as-is.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.inner
            .write_all(s.as_bytes())
            .map_err(|e| HepError::write_failed("stream", e.to_string()))?;
        self.bytes_written += s.len() as u64;
        Ok(())
    }

    /// Write one line, appending the terminator.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Push buffered bytes down to the sink. Idempotent.
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| HepError::write_failed("stream", e.to_string()))
    }

    /// Flush and write the codec trailer. Safe to call more than once.
    pub fn finish(&mut self) -> Result<()> {
        self.flush()?;
        self.inner
            .get_mut()
            .finish()
            .map_err(|e| HepError::write_failed("stream", e.to_string()))
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Configured buffer capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::compression::Compression;
    use std::io::Cursor;

    fn stream_over(bytes: &[u8]) -> LineStream {
        LineStream::new(Box::new(Cursor::new(bytes.to_vec())))
    }

    #[test]
    fn test_read_lines() {
        let mut stream = stream_over(b"first\nsecond\nthird");
        let mut line = String::new();
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "first");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "second");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "third");
        assert!(!stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "");
        assert_eq!(stream.line_number(), 3);
    }

    #[test]
    fn test_crlf_normalized() {
        let mut stream = stream_over(b"one\r\ntwo\nthree\r\n");
        let mut line = String::new();
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "one");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "two");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "three");
        assert!(!stream.read_line_into(&mut line).unwrap());
    }

    #[test]
    fn test_blank_lines_kept() {
        let mut stream = stream_over(b"a\n\nb\n");
        let mut line = String::new();
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "a");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "");
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "b");
    }

    #[test]
    fn test_interior_carriage_return_kept() {
        // Only the line ending is normalized; embedded \r is payload.
        let mut stream = stream_over(b"a\rb\n");
        let mut line = String::new();
        assert!(stream.read_line_into(&mut line).unwrap());
        assert_eq!(line, "a\rb");
    }

    #[test]
    fn test_capacity_configurable() {
        let stream = LineStream::with_capacity(512, Box::new(Cursor::new(Vec::new())));
        assert_eq!(stream.capacity(), 512);
        let stream = LineStream::new(Box::new(Cursor::new(Vec::new())));
        assert_eq!(stream.capacity(), DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let mut stream = stream_over(&[0x48, 0xff, 0xfe, 0x0a]);
        let mut line = String::new();
        let err = stream.read_line_into(&mut line).unwrap_err();
        assert!(matches!(err, HepError::ReadFailed { .. }));
    }

    #[test]
    fn test_writer_to_temp_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("hepcodec_test_stream_{}.txt", std::process::id()));

        {
            let sink = CompressedSink::create(&path).unwrap();
            let mut writer = BlockWriter::new(sink);
            writer.write_line("E 0 1 2").unwrap();
            writer.write_str("U ").unwrap();
            writer.write_line("GEV MM").unwrap();
            writer.finish().unwrap();
            writer.finish().unwrap();
            assert_eq!(writer.bytes_written(), 17);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "E 0 1 2\nU GEV MM\n");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_writer_capacity_configurable() {
        let sink = CompressedSink::new(Compression::None, Box::new(Vec::new()));
        let writer = BlockWriter::with_capacity(256, sink);
        assert_eq!(writer.capacity(), 256);
    }
}
