// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core traits for unified event I/O.
//!
//! This module defines the foundational traits that all format-specific
//! readers and writers must implement. These traits provide a consistent
//! API across all supported formats (HepMC3, HepMC2, LHEF, HEPEVT).

use std::borrow::Cow;

use crate::event::{GenEvent, GenRunInfo};
use crate::Result;

use super::detection::HepFormat;

/// Trait for reading events from a concrete format.
///
/// This trait abstracts over format-specific readers to provide a unified
/// API. All readers must implement it to be usable through the open facade.
///
/// # Example
///
/// ```no_run
/// use hepcodec::io::traits::EventReader;
///
/// fn count_events(reader: &mut dyn EventReader) -> hepcodec::Result<u64> {
///     let mut n = 0;
///     while reader.read_event()?.is_some() {
///         n += 1;
///     }
///     Ok(n)
/// }
/// ```
pub trait EventReader: Send {
    /// Read the next event.
    ///
    /// Returns `Ok(None)` at clean end of stream. Run metadata parsed
    /// from the file header becomes visible through
    /// [`run_info`](Self::run_info) once it has been encountered.
    fn read_event(&mut self) -> Result<Option<GenEvent>>;

    /// Run-level metadata, if the stream carries any.
    fn run_info(&self) -> Option<&GenRunInfo>;

    /// The format this reader decodes.
    fn format(&self) -> HepFormat;
}

/// Trait for writing events to a concrete format.
///
/// # Example
///
/// ```no_run
/// use hepcodec::io::traits::EventWriter;
/// use hepcodec::event::GenEvent;
///
/// fn write_all<W: EventWriter>(writer: &mut W, events: &[GenEvent]) {
///     for event in events {
///         writer.write_event(event).unwrap();
///     }
///     writer.finish().unwrap();
/// }
/// ```
pub trait EventWriter: Send {
    /// Write one event.
    fn write_event(&mut self, event: &GenEvent) -> Result<()>;

    /// Request a column width for floating-point fields.
    ///
    /// Returns `false` when the format has a fixed layout and ignores
    /// the request. Default implementation ignores it.
    fn set_precision(&mut self, _digits: usize) -> bool {
        false
    }

    /// Push buffered output down to the sink.
    fn flush(&mut self) -> Result<()>;

    /// Write the footer and codec trailer. Safe to call more than once.
    fn finish(&mut self) -> Result<()>;

    /// The format this writer encodes.
    fn format(&self) -> HepFormat;

    /// Number of events written so far.
    fn events_written(&self) -> u64;
}

/// Conversion into a [`GenEvent`] for writing.
///
/// Write paths accept anything event-like. `GenEvent` itself converts by
/// borrowing, so the common path copies nothing; foreign record types can
/// implement this to build an event on demand.
pub trait ToGenEvent {
    /// Borrow or build the event to serialize.
    fn to_genevent(&self) -> Cow<'_, GenEvent>;
}

impl ToGenEvent for GenEvent {
    fn to_genevent(&self) -> Cow<'_, GenEvent> {
        Cow::Borrowed(self)
    }
}

impl<T: ToGenEvent + ?Sized> ToGenEvent for &T {
    fn to_genevent(&self) -> Cow<'_, GenEvent> {
        (**self).to_genevent()
    }
}
