// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for event-record formats.
//!
//! This module provides the foundational types and traits for reading
//! and writing generator event files: format detection, transparent
//! compression, the line-oriented stream adapters, the per-format
//! readers and writers, and the unified open facade on top of them all.

pub mod compression;
pub mod detection;
pub mod formats;
pub mod open;
pub mod stream;

// Re-exports
pub use compression::Compression;
pub use detection::{detect_format, sniff, HepFormat};
pub use open::{open, HepFile, OpenOptions};
pub use stream::{BlockWriter, LineStream, DEFAULT_BUFFER_CAPACITY};

// Traits for format readers and writers
pub mod traits;
pub use traits::{EventReader, EventWriter, ToGenEvent};
