// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Transparent stream compression.
//!
//! The codec is chosen purely from the filename suffix: `.gz`, `.bz2`, and
//! `.xz` select their codec, anything else means plain bytes. Event data
//! inside a compressed container is the same line-oriented text, so the
//! codec layer sits below format detection and below the stream adapter.
//!
//! # Example
//!
//! ```rust
//! use hepcodec::io::compression::Compression;
//!
//! assert_eq!(Compression::from_suffix("events.hepmc3.gz"), Compression::Gzip);
//! assert_eq!(Compression::from_suffix("events.hepmc3"), Compression::None);
//! ```

use crate::core::{HepError, Result};
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

/// Compression codec of a file, selected by suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Plain bytes
    None,
    /// `.gz`
    Gzip,
    /// `.bz2`
    Bzip2,
    /// `.xz`
    Xz,
}

impl Compression {
    /// Select the codec from a filename suffix. Pure lookup, never fails:
    /// unknown suffixes mean plain bytes.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Compression {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "gz" => Compression::Gzip,
                "bz2" => Compression::Bzip2,
                "xz" => Compression::Xz,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    /// [`from_path`](Self::from_path) over a plain string.
    pub fn from_suffix(name: &str) -> Compression {
        Compression::from_path(Path::new(name))
    }

    /// Codec name for logging and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Xz => "xz",
        }
    }

    /// Check if this is an actual codec rather than plain bytes.
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Compression::None)
    }
}

/// Wrap a raw byte source in the matching decoder.
pub fn wrap_reader(codec: Compression, source: Box<dyn Read + Send>) -> Box<dyn Read + Send> {
    match codec {
        Compression::None => source,
        Compression::Gzip => Box::new(MultiGzDecoder::new(source)),
        Compression::Bzip2 => Box::new(BzDecoder::new(source)),
        Compression::Xz => Box::new(XzDecoder::new(source)),
    }
}

/// Open a file for reading through the codec its suffix selects.
pub fn open_decompressed<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        HepError::read_failed("stream", format!("Failed to open '{}': {e}", path.display()))
    })?;
    Ok(wrap_reader(Compression::from_path(path), Box::new(file)))
}

enum SinkInner {
    Plain(Box<dyn Write + Send>),
    Gzip(GzEncoder<Box<dyn Write + Send>>),
    Bzip2(BzEncoder<Box<dyn Write + Send>>),
    Xz(XzEncoder<Box<dyn Write + Send>>),
}

/// Write sink with codec framing.
///
/// Compressed containers need a trailer; [`finish`](CompressedSink::finish)
/// writes it and flushes the underlying sink. Writes after `finish` are a
/// caller bug and surface as I/O errors from the encoder.
pub struct CompressedSink {
    inner: SinkInner,
}

impl CompressedSink {
    /// Wrap a raw byte sink in the matching encoder.
    pub fn new(codec: Compression, sink: Box<dyn Write + Send>) -> CompressedSink {
        let inner = match codec {
            Compression::None => SinkInner::Plain(sink),
            Compression::Gzip => SinkInner::Gzip(GzEncoder::new(sink, flate2::Compression::default())),
            Compression::Bzip2 => {
                SinkInner::Bzip2(BzEncoder::new(sink, bzip2::Compression::default()))
            }
            Compression::Xz => SinkInner::Xz(XzEncoder::new(sink, 6)),
        };
        CompressedSink { inner }
    }

    /// Create a file for writing through the codec its suffix selects.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<CompressedSink> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            HepError::write_failed(
                "stream",
                format!("Failed to create '{}': {e}", path.display()),
            )
        })?;
        Ok(CompressedSink::new(
            Compression::from_path(path),
            Box::new(file),
        ))
    }

    /// Write the codec trailer (if any) and flush the underlying sink.
    /// Safe to call more than once.
    pub fn finish(&mut self) -> io::Result<()> {
        match &mut self.inner {
            SinkInner::Plain(w) => w.flush(),
            SinkInner::Gzip(enc) => {
                enc.try_finish()?;
                enc.get_mut().flush()
            }
            SinkInner::Bzip2(enc) => {
                enc.try_finish()?;
                enc.get_mut().flush()
            }
            SinkInner::Xz(enc) => {
                enc.try_finish()?;
                enc.get_mut().flush()
            }
        }
    }
}

impl Write for CompressedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            SinkInner::Plain(w) => w.write(buf),
            SinkInner::Gzip(enc) => enc.write(buf),
            SinkInner::Bzip2(enc) => enc.write(buf),
            SinkInner::Xz(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            SinkInner::Plain(w) => w.flush(),
            SinkInner::Gzip(enc) => enc.flush(),
            SinkInner::Bzip2(enc) => enc.flush(),
            SinkInner::Xz(enc) => enc.flush(),
        }
    }
}
