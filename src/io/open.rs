// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Unified open facade.
//!
//! One entry point for every supported format and compression codec:
//! [`open`] (or the [`OpenOptions`] builder for configured opens) resolves
//! the codec from the filename suffix, detects or maps the format, and
//! hands back a [`HepFile`] that reads or writes [`GenEvent`]s.
//!
//! Writers bind lazily. Opening a file for writing creates the file but
//! defers constructing the format writer until the first event arrives, so
//! run metadata attached to that event makes it into the header.
//!
//! # Example
//!
//! ```rust,no_run
//! use hepcodec::io::open::open;
//!
//! let mut input = open("events.hepmc3.gz", "r")?;
//! while let Some(event) = input.read()? {
//!     println!("event {}: {} particles", event.event_number, event.particles_size());
//! }
//! # Ok::<(), hepcodec::HepError>(())
//! ```
//!
//! Writing with explicit configuration:
//!
//! ```rust,no_run
//! use hepcodec::io::open::OpenOptions;
//!
//! let mut output = OpenOptions::new()
//!     .with_mode("w")
//!     .with_format_name("hepmc2")
//!     .with_precision(9)
//!     .open("converted.hepmc2.bz2")?;
//! # Ok::<(), hepcodec::HepError>(())
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::core::{HepError, Result};
use crate::event::{GenEvent, GenRunInfo};

use super::compression::{open_decompressed, Compression, CompressedSink};
use super::detection::{detect_format, HepFormat};
use super::formats::hepevt::{HepevtReader, HepevtWriter};
use super::formats::hepmc2::{Hepmc2Reader, Hepmc2Writer};
use super::formats::hepmc3::{Hepmc3Reader, Hepmc3Writer};
use super::formats::lhef::LhefReader;
use super::stream::{BlockWriter, LineStream, DEFAULT_BUFFER_CAPACITY};
use super::traits::{EventReader, EventWriter, ToGenEvent};

/// Open a file for reading (`"r"`) or writing (`"w"`).
///
/// The compression codec comes from the filename suffix. In read mode the
/// format is detected from the first decompressed bytes; in write mode it
/// defaults to HepMC3. Use [`OpenOptions`] to pin a format or a precision.
pub fn open<P: AsRef<Path>>(path: P, mode: &str) -> Result<HepFile> {
    OpenOptions::new().with_mode(mode).open(path)
}

/// Configuration for opening an event file.
///
/// Fluent builder in front of [`HepFile`]. Nothing is validated until one
/// of the open methods runs, and configuration failures surface before any
/// file is created or touched.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    mode: Option<String>,
    format: Option<String>,
    precision: Option<usize>,
    buffer_capacity: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions {
            mode: None,
            format: None,
            precision: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl OpenOptions {
    /// Create options with defaults: read mode, autodetected format,
    /// format-default precision, 64 KiB stream buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode, `"r"` or `"w"`. Anything else fails at open time.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Pin the format instead of detecting it.
    pub fn with_format(mut self, format: HepFormat) -> Self {
        self.format = Some(format.as_str().to_string());
        self
    }

    /// Pin the format by name, case-insensitively. Unknown names fail at
    /// open time.
    pub fn with_format_name(mut self, name: impl Into<String>) -> Self {
        self.format = Some(name.into());
        self
    }

    /// Request a column width for floating-point fields on write. Formats
    /// with a fixed layout ignore the request.
    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }

    /// Set the stream adapter buffer capacity in bytes.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Open `path` in the configured mode.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<HepFile> {
        let path = path.as_ref();
        match self.mode.as_deref().unwrap_or("r") {
            "r" => self.open_read(path),
            "w" => self.open_write(path),
            other => Err(HepError::invalid_mode(other, "expected 'r' or 'w'")),
        }
    }

    /// Read events from a caller-supplied byte stream.
    ///
    /// The stream is consumed as-is: no suffix means no decompression, and
    /// since an already-started stream cannot rewind after sniffing, the
    /// format must be pinned up front (`NotSeekable` otherwise).
    pub fn read_stream(self, source: Box<dyn Read + Send>) -> Result<HepFile> {
        if let Some(mode) = self.mode.as_deref() {
            if mode != "r" {
                return Err(HepError::invalid_mode(mode, "stream source is read-only"));
            }
        }
        let Some(name) = self.format.as_deref() else {
            return Err(HepError::not_seekable(
                "caller-supplied stream; pin a format to skip detection",
            ));
        };
        let format = HepFormat::from_name(name)?;
        let stream = LineStream::with_capacity(self.buffer_capacity, source);
        let reader = make_reader(format, stream)?;
        Ok(HepFile::new(
            Handle::Reader(reader),
            format,
            Compression::None,
            None,
        ))
    }

    /// Write events to a caller-supplied byte sink.
    ///
    /// The sink receives plain bytes; compression is a suffix decision and
    /// streams have no suffix. The format defaults to HepMC3.
    pub fn write_stream(self, sink: Box<dyn Write + Send>) -> Result<HepFile> {
        if let Some(mode) = self.mode.as_deref() {
            if mode != "w" {
                return Err(HepError::invalid_mode(mode, "stream sink is write-only"));
            }
        }
        let format = self.resolve_write_format()?;
        let out = BlockWriter::with_capacity(
            self.buffer_capacity,
            CompressedSink::new(Compression::None, sink),
        );
        Ok(HepFile::new(
            Handle::Writer(DeferredWriter::new(format, out, self.precision)),
            format,
            Compression::None,
            None,
        ))
    }

    fn open_read(self, path: &Path) -> Result<HepFile> {
        let format = match self.format.as_deref() {
            Some(name) => HepFormat::from_name(name)?,
            None => detect_format(path)?,
        };
        let compression = Compression::from_path(path);
        tracing::debug!(
            path = %path.display(),
            format = format.as_str(),
            codec = compression.as_str(),
            "opening for read"
        );
        let source = open_decompressed(path)?;
        let stream = LineStream::with_capacity(self.buffer_capacity, source);
        let reader = make_reader(format, stream)?;
        Ok(HepFile::new(
            Handle::Reader(reader),
            format,
            compression,
            Some(path.to_path_buf()),
        ))
    }

    fn open_write(self, path: &Path) -> Result<HepFile> {
        let format = self.resolve_write_format()?;
        let compression = Compression::from_path(path);
        tracing::debug!(
            path = %path.display(),
            format = format.as_str(),
            codec = compression.as_str(),
            "opening for write"
        );
        let sink = CompressedSink::create(path)?;
        let out = BlockWriter::with_capacity(self.buffer_capacity, sink);
        Ok(HepFile::new(
            Handle::Writer(DeferredWriter::new(format, out, self.precision)),
            format,
            compression,
            Some(path.to_path_buf()),
        ))
    }

    fn resolve_write_format(&self) -> Result<HepFormat> {
        let format = match self.format.as_deref() {
            Some(name) => HepFormat::from_name(name)?,
            None => HepFormat::Hepmc3,
        };
        if !format.supports_write() {
            return Err(HepError::invalid_mode(
                "w",
                format!("format '{}' is read-only", format.as_str()),
            ));
        }
        Ok(format)
    }
}

fn make_reader(format: HepFormat, stream: LineStream) -> Result<Box<dyn EventReader>> {
    Ok(match format {
        HepFormat::Hepmc3 => Box::new(Hepmc3Reader::new(stream)?),
        HepFormat::Hepmc2 => Box::new(Hepmc2Reader::new(stream)?),
        HepFormat::Lhef => Box::new(LhefReader::new(stream)?),
        HepFormat::Hepevt => Box::new(HepevtReader::new(stream)),
    })
}

enum DeferredState {
    /// Sink waiting for the first event. `None` after a failed bind.
    Unbound(Option<BlockWriter>),
    Bound(Box<dyn EventWriter>),
}

/// Writer that constructs its format backend on the first event.
///
/// The header of a run-aware format comes from the run info of the first
/// written event, so nothing can be serialized before one arrives. Until
/// then [`finish`](DeferredWriter::finish) is a no-op and the target file
/// stays empty.
pub struct DeferredWriter {
    state: DeferredState,
    format: HepFormat,
    precision: Option<usize>,
}

impl DeferredWriter {
    /// Park a stream adapter until the first event binds it.
    pub fn new(format: HepFormat, out: BlockWriter, precision: Option<usize>) -> Self {
        DeferredWriter {
            state: DeferredState::Unbound(Some(out)),
            format,
            precision,
        }
    }

    /// True once the format backend has been constructed.
    pub fn is_bound(&self) -> bool {
        matches!(self.state, DeferredState::Bound(_))
    }

    /// Target format.
    pub fn format(&self) -> HepFormat {
        self.format
    }

    /// Write one event, binding the backend first if necessary.
    pub fn write_event(&mut self, event: &GenEvent) -> Result<()> {
        if let DeferredState::Unbound(slot) = &mut self.state {
            let out = slot.take().ok_or_else(|| {
                HepError::write_failed(self.format.as_str(), "earlier writer construction failed")
            })?;
            let mut writer: Box<dyn EventWriter> = match self.format {
                HepFormat::Hepmc3 => Box::new(Hepmc3Writer::new(out, event.run_info())?),
                HepFormat::Hepmc2 => Box::new(Hepmc2Writer::new(out, event.run_info())?),
                HepFormat::Hepevt => Box::new(HepevtWriter::new(out)),
                HepFormat::Lhef => {
                    return Err(HepError::invalid_mode("w", "format 'lhef' is read-only"))
                }
            };
            if let Some(digits) = self.precision {
                if !writer.set_precision(digits) {
                    tracing::debug!(
                        format = self.format.as_str(),
                        digits,
                        "precision request ignored by fixed-layout format"
                    );
                }
            }
            tracing::debug!(format = self.format.as_str(), "writer bound");
            self.state = DeferredState::Bound(writer);
        }
        match &mut self.state {
            DeferredState::Bound(writer) => writer.write_event(event),
            DeferredState::Unbound(_) => Err(HepError::write_failed(
                self.format.as_str(),
                "writer failed to bind",
            )),
        }
    }

    /// Push buffered output down to the sink. No-op while unbound.
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.state {
            DeferredState::Unbound(_) => Ok(()),
            DeferredState::Bound(writer) => writer.flush(),
        }
    }

    /// Write the footer and codec trailer. No-op while unbound, safe to
    /// call more than once.
    pub fn finish(&mut self) -> Result<()> {
        match &mut self.state {
            DeferredState::Unbound(_) => Ok(()),
            DeferredState::Bound(writer) => writer.finish(),
        }
    }

    /// Number of events written so far.
    pub fn events_written(&self) -> u64 {
        match &self.state {
            DeferredState::Unbound(_) => 0,
            DeferredState::Bound(writer) => writer.events_written(),
        }
    }
}

enum Handle {
    Reader(Box<dyn EventReader>),
    Writer(DeferredWriter),
    Closed,
}

/// Handle to an open event file or stream.
///
/// Read handles yield events one at a time through [`read`](HepFile::read)
/// or by iteration; write handles accept anything convertible to a
/// [`GenEvent`]. Closing is idempotent and happens on drop.
pub struct HepFile {
    handle: Handle,
    format: HepFormat,
    compression: Compression,
    path: Option<PathBuf>,
    iter_fused: bool,
}

impl std::fmt::Debug for HepFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handle = match self.handle {
            Handle::Reader(_) => "Reader",
            Handle::Writer(_) => "Writer",
            Handle::Closed => "Closed",
        };
        f.debug_struct("HepFile")
            .field("handle", &handle)
            .field("format", &self.format)
            .field("compression", &self.compression)
            .field("path", &self.path)
            .field("iter_fused", &self.iter_fused)
            .finish()
    }
}

impl HepFile {
    fn new(
        handle: Handle,
        format: HepFormat,
        compression: Compression,
        path: Option<PathBuf>,
    ) -> Self {
        HepFile {
            handle,
            format,
            compression,
            path,
            iter_fused: false,
        }
    }

    /// Read the next event. `Ok(None)` means clean end-of-data.
    pub fn read(&mut self) -> Result<Option<GenEvent>> {
        match &mut self.handle {
            Handle::Reader(reader) => reader.read_event(),
            Handle::Writer(_) => Err(HepError::invalid_mode("w", "handle is open for writing")),
            Handle::Closed => Err(HepError::invalid_mode("r", "handle is closed")),
        }
    }

    /// Write one event.
    pub fn write<E: ToGenEvent>(&mut self, event: E) -> Result<()> {
        match &mut self.handle {
            Handle::Writer(writer) => {
                let event = event.to_genevent();
                writer.write_event(event.as_ref())
            }
            Handle::Reader(_) => Err(HepError::invalid_mode("r", "handle is open for reading")),
            Handle::Closed => Err(HepError::invalid_mode("w", "handle is closed")),
        }
    }

    /// Push buffered output down to the sink. No-op on read handles.
    pub fn flush(&mut self) -> Result<()> {
        match &mut self.handle {
            Handle::Writer(writer) => writer.flush(),
            Handle::Reader(_) | Handle::Closed => Ok(()),
        }
    }

    /// Finish and release the underlying stream. Idempotent.
    ///
    /// On a write handle this writes the format footer and codec trailer
    /// first; an unbound writer releases an untouched (empty) target.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.handle, Handle::Closed) {
            Handle::Reader(_) | Handle::Closed => Ok(()),
            Handle::Writer(mut writer) => writer.finish(),
        }
    }

    /// True once [`close`](HepFile::close) has run.
    pub fn is_closed(&self) -> bool {
        matches!(self.handle, Handle::Closed)
    }

    /// Format this handle reads or writes.
    pub fn format(&self) -> HepFormat {
        self.format
    }

    /// Compression codec of the underlying file; `None` for streams.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Path of the underlying file, if the facade opened one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run metadata of a read handle, once the header has been parsed.
    pub fn run_info(&self) -> Option<&GenRunInfo> {
        match &self.handle {
            Handle::Reader(reader) => reader.run_info(),
            Handle::Writer(_) | Handle::Closed => None,
        }
    }

    /// Events written through a write handle so far.
    pub fn events_written(&self) -> u64 {
        match &self.handle {
            Handle::Writer(writer) => writer.events_written(),
            Handle::Reader(_) | Handle::Closed => 0,
        }
    }
}

impl Iterator for HepFile {
    type Item = Result<GenEvent>;

    /// Yield events until clean end-of-data. A read failure is yielded
    /// once, then the iterator fuses; write handles yield nothing.
    fn next(&mut self) -> Option<Self::Item> {
        if self.iter_fused {
            return None;
        }
        match &mut self.handle {
            Handle::Reader(reader) => match reader.read_event() {
                Ok(Some(event)) => Some(Ok(event)),
                Ok(None) => None,
                Err(e) => {
                    self.iter_fused = true;
                    Some(Err(e))
                }
            },
            Handle::Writer(_) | Handle::Closed => None,
        }
    }
}

impl Drop for HepFile {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "close failed while dropping handle");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FourVector, GenParticle, GenVertex, ToolInfo};
    use std::fs;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn temp_path(name: &str, ext: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "hepcodec_test_open_{}_{}.{}",
            std::process::id(),
            name,
            ext
        ));
        path
    }

    fn two_body_event(event_number: i64) -> GenEvent {
        let mut event = GenEvent::new();
        event.event_number = event_number;
        let z = event.add_particle(GenParticle::new(FourVector::new(0.0, 0.0, 0.0, 91.2), 23, 2));
        let em = event.add_particle(GenParticle::new(FourVector::new(0.0, 0.0, 45.6, 45.6), 11, 1));
        let ep = event.add_particle(GenParticle::new(
            FourVector::new(0.0, 0.0, -45.6, 45.6),
            -11,
            1,
        ));
        let v = event.add_vertex(GenVertex::new());
        event.add_particle_in(v, z);
        event.add_particle_out(v, em);
        event.add_particle_out(v, ep);
        event
    }

    #[test]
    fn test_open_rejects_bad_mode() {
        let err = open("whatever.hepmc3", "a").unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
        let err = open("whatever.hepmc3", "").unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
        let err = open("whatever.hepmc3", "rw").unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
    }

    #[test]
    fn test_open_read_missing_file() {
        let err = open("/nonexistent/events.hepmc3", "r").unwrap_err();
        assert!(matches!(err, HepError::ReadFailed { .. }));
    }

    #[test]
    fn test_open_write_unknown_format_creates_nothing() {
        let path = temp_path("unknown_format", "dat");
        let err = OpenOptions::new()
            .with_mode("w")
            .with_format_name("root")
            .open(&path)
            .unwrap_err();
        assert!(matches!(err, HepError::UnknownFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_write_lhef_rejected_before_io() {
        let path = temp_path("lhef_write", "lhe");
        let err = OpenOptions::new()
            .with_mode("w")
            .with_format_name("lhef")
            .open(&path)
            .unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let path = temp_path("round_trip", "hepmc3");

        {
            let mut output = open(&path, "w").expect("open for write");
            output.write(&two_body_event(7)).expect("write");
            output.close().expect("close");
        }

        let mut input = open(&path, "r").expect("open for read");
        assert_eq!(input.format(), HepFormat::Hepmc3);
        let event = input.read().expect("read").expect("one event");
        assert_eq!(event.event_number, 7);
        assert_eq!(event.particles_size(), 3);
        assert_eq!(event.vertices_size(), 1);
        assert!(input.read().expect("eof").is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_writer_binds_once() {
        let path = temp_path("bind_once", "hepmc3");

        let mut output = open(&path, "w").expect("open for write");
        output.write(&two_body_event(1)).expect("first write");
        output.write(&two_body_event(2)).expect("second write");
        assert_eq!(output.events_written(), 2);
        output.close().expect("close");

        let content = fs::read_to_string(&path).expect("read back");
        assert_eq!(content.matches("START_EVENT_LISTING").count(), 1);
        assert_eq!(content.matches("END_EVENT_LISTING").count(), 1);
        assert_eq!(content.matches("\nE ").count(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_deferred_writer_state_machine() {
        let path = temp_path("deferred_state", "hepmc3");
        let sink = CompressedSink::create(&path).expect("create");
        let mut writer = DeferredWriter::new(HepFormat::Hepmc3, BlockWriter::new(sink), None);

        assert!(!writer.is_bound());
        assert_eq!(writer.events_written(), 0);
        writer.flush().expect("unbound flush is a no-op");
        writer.finish().expect("unbound finish is a no-op");
        assert_eq!(fs::metadata(&path).expect("stat").len(), 0);

        writer.write_event(&two_body_event(1)).expect("write");
        assert!(writer.is_bound());
        assert_eq!(writer.events_written(), 1);
        writer.finish().expect("finish");
        writer.finish().expect("finish is idempotent");

        let content = fs::read_to_string(&path).expect("read back");
        assert_eq!(content.matches("START_EVENT_LISTING").count(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unbound_close_leaves_empty_file() {
        let path = temp_path("unbound_close", "hepmc3");

        let mut output = open(&path, "w").expect("open for write");
        output.close().expect("close");

        assert!(path.exists());
        assert_eq!(fs::metadata(&path).expect("stat").len(), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_run_info_taken_from_first_event() {
        let path = temp_path("run_info_bind", "hepmc3");

        let mut info = GenRunInfo::new();
        info.tools.push(ToolInfo::new("pythia", "8.3", ""));
        let mut event = two_body_event(1);
        event.set_run_info(Some(info));

        {
            let mut output = open(&path, "w").expect("open for write");
            output.write(&event).expect("write");
            output.close().expect("close");
        }

        let mut input = open(&path, "r").expect("open for read");
        let _ = input.read().expect("read");
        let tools = &input.run_info().expect("run info").tools;
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "pythia");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_precision_applies_to_writer() {
        let path = temp_path("precision", "hepmc3");

        {
            let mut output = OpenOptions::new()
                .with_mode("w")
                .with_precision(3)
                .open(&path)
                .expect("open for write");
            output.write(&two_body_event(1)).expect("write");
            output.close().expect("close");
        }

        let content = fs::read_to_string(&path).expect("read back");
        assert!(content.contains("4.560e1"));
        assert!(!content.contains("4.5600000000000001e1"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mode_mismatch_operations() {
        let path = temp_path("mode_mismatch", "hepmc3");

        let mut output = open(&path, "w").expect("open for write");
        let err = output.read().unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
        output.close().expect("close");

        let err = output.write(&two_body_event(1)).unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
        let err = output.read().unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_close_is_idempotent() {
        let path = temp_path("close_twice", "hepmc3");

        let mut output = open(&path, "w").expect("open for write");
        output.write(&two_body_event(1)).expect("write");
        assert!(!output.is_closed());
        output.close().expect("first close");
        assert!(output.is_closed());
        output.close().expect("second close");
        output.flush().expect("flush after close is a no-op");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_close_on_drop_finishes_writer() {
        let path = temp_path("drop_close", "hepmc3");

        {
            let mut output = open(&path, "w").expect("open for write");
            output.write(&two_body_event(1)).expect("write");
        }

        let content = fs::read_to_string(&path).expect("read back");
        assert!(content.contains("END_EVENT_LISTING"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_iteration_stops_at_end_of_data() {
        let path = temp_path("iterate", "hepmc3");

        {
            let mut output = open(&path, "w").expect("open for write");
            for n in 1..=3 {
                output.write(&two_body_event(n)).expect("write");
            }
            output.close().expect("close");
        }

        let mut input = open(&path, "r").expect("open for read");
        let numbers: Vec<i64> = (&mut input)
            .map(|ev| ev.expect("event").event_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(input.next().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_iteration_yields_error_once_then_fuses() {
        let text =
            "HepMC::Version 3.02.06\nHepMC::Asciiv3-START_EVENT_LISTING\nE not-a-number 0 0\n";
        let mut input = OpenOptions::new()
            .with_format(HepFormat::Hepmc3)
            .read_stream(Box::new(Cursor::new(text.as_bytes().to_vec())))
            .expect("open stream");

        let first = input.next().expect("one item");
        assert!(first.is_err());
        assert!(input.next().is_none());
    }

    #[test]
    fn test_read_stream_requires_format() {
        let err = OpenOptions::new()
            .read_stream(Box::new(Cursor::new(Vec::new())))
            .unwrap_err();
        assert!(matches!(err, HepError::NotSeekable { .. }));
    }

    #[test]
    fn test_read_stream_with_pinned_format() {
        let text = "E 1 1\n1 1 11 0 0 0 0 0e0 0e0 1e0 1e0 0e0 0e0 0e0 0e0 0e0\n";
        let mut input = OpenOptions::new()
            .with_format_name("hepevt")
            .read_stream(Box::new(Cursor::new(text.as_bytes().to_vec())))
            .expect("open stream");

        assert_eq!(input.format(), HepFormat::Hepevt);
        assert_eq!(input.compression(), Compression::None);
        assert!(input.path().is_none());
        let event = input.read().expect("read").expect("one event");
        assert_eq!(event.particles_size(), 1);
        assert!(input.read().expect("eof").is_none());
    }

    #[test]
    fn test_read_stream_rejects_write_mode() {
        let err = OpenOptions::new()
            .with_mode("w")
            .with_format_name("hepevt")
            .read_stream(Box::new(Cursor::new(Vec::new())))
            .unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
    }

    #[test]
    fn test_write_stream_plain_bytes() {
        #[derive(Clone, Default)]
        struct SharedBuf(Arc<Mutex<Vec<u8>>>);

        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf::default();
        let mut output = OpenOptions::new()
            .write_stream(Box::new(buf.clone()))
            .expect("open stream");
        assert_eq!(output.format(), HepFormat::Hepmc3);
        output.write(&two_body_event(4)).expect("write");
        output.close().expect("close");

        let bytes = buf.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.starts_with("HepMC::Version"));
        assert!(text.contains("E 4 1 3"));
        assert!(text.ends_with("END_EVENT_LISTING\n"));
    }

    #[test]
    fn test_write_stream_lhef_rejected() {
        let err = OpenOptions::new()
            .with_format_name("lhef")
            .write_stream(Box::new(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, HepError::InvalidMode { .. }));
    }

    #[test]
    fn test_pinned_format_matches_detection() {
        let path = temp_path("pinned", "hepmc3");

        {
            let mut output = open(&path, "w").expect("open for write");
            output.write(&two_body_event(11)).expect("write");
            output.close().expect("close");
        }

        let mut detected = open(&path, "r").expect("detected open");
        let mut pinned = OpenOptions::new()
            .with_format(HepFormat::Hepmc3)
            .open(&path)
            .expect("pinned open");
        let a = detected.read().expect("read").expect("event");
        let b = pinned.read().expect("read").expect("event");
        assert_eq!(a, b);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_compressed_write_read_through_suffix() {
        let path = temp_path("suffix_gz", "hepmc3.gz");

        {
            let mut output = open(&path, "w").expect("open for write");
            assert_eq!(output.compression(), Compression::Gzip);
            output.write(&two_body_event(3)).expect("write");
            output.close().expect("close");
        }

        let raw = fs::read(&path).expect("raw bytes");
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let mut input = open(&path, "r").expect("open for read");
        assert_eq!(input.compression(), Compression::Gzip);
        let event = input.read().expect("read").expect("event");
        assert_eq!(event.event_number, 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_hepevt_writer_has_no_run_header() {
        let path = temp_path("hepevt_out", "hepevt");

        {
            let mut output = OpenOptions::new()
                .with_mode("w")
                .with_format(HepFormat::Hepevt)
                .open(&path)
                .expect("open for write");
            output.write(&two_body_event(5)).expect("write");
            output.close().expect("close");
        }

        let content = fs::read_to_string(&path).expect("read back");
        assert!(content.starts_with("E 5 3"));

        let _ = fs::remove_file(&path);
    }
}
