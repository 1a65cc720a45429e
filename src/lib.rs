// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Hepcodec
//!
//! Event-record library for Monte Carlo generator output.
//!
//! This library provides a unified interface over the common interchange
//! formats of simulated collision events:
//! - **HepMC3** ASCII (read/write) in [`io::formats::hepmc3`](crate::io::formats::hepmc3)
//! - **HepMC2** legacy ASCII (read/write) in [`io::formats::hepmc2`](crate::io::formats::hepmc2)
//! - **LHEF** (read-only) in [`io::formats::lhef`](crate::io::formats::lhef)
//! - **HEPEVT** common-block listings (read/write) in [`io::formats::hepevt`](crate::io::formats::hepevt)
//!
//! Files compressed with gzip, bzip2, or xz are handled transparently by
//! suffix, and the format of an input is detected from its first bytes.
//!
//! ## Architecture
//!
//! - `event/` - the in-memory object model ([`GenEvent`], [`GenParticle`],
//!   [`GenVertex`], run metadata, attributes)
//! - `graph/` - validated conversion of flat parallel-array records into
//!   event graphs, deduplicating shared parent sets into vertices
//! - `io/` - format detection, compression codecs, stream adapters, the
//!   per-format readers/writers, and the [`open`](crate::io::open) facade
//!
//! ## Example: Reading events
//!
//! ```rust,no_run
//! # fn main() -> hepcodec::Result<()> {
//! use hepcodec::io::open::open;
//!
//! let mut input = open("events.hepmc3.gz", "r")?;
//! while let Some(event) = input.read()? {
//!     println!("event {}: {} particles", event.event_number, event.particles_size());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Building a graph from a flat record
//!
//! ```rust
//! # fn main() -> hepcodec::Result<()> {
//! use hepcodec::graph::{build_event, FlatArrays, Relations};
//!
//! let arrays = FlatArrays {
//!     px: &[0.0, 0.0],
//!     py: &[0.0, 0.0],
//!     pz: &[5.0, -5.0],
//!     e: &[5.0, 5.0],
//!     m: &[0.0, 0.0],
//!     pid: &[11, -11],
//!     status: &[1, 1],
//!     positions: None,
//! };
//! let parents = [(0, 0), (0, 0)];
//! let event = build_event(1, &arrays, Relations::Parents(&parents), true)?;
//! assert_eq!(event.particles_size(), 2);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{HepError, Result};

// Event object model
pub mod event;

// Flat-record validation and graph construction
pub mod graph;

// I/O types (detection, compression, stream adapters, formats, open facade)
pub mod io;

// Re-export key event types
pub use event::{
    Attribute, AttributeKind, AttributesView, FourVector, GenEvent, GenParticle, GenRunInfo,
    GenVertex, LengthUnit, MomentumUnit, ToolInfo,
};

// Re-export key graph and I/O entry points
pub use graph::{build_event, FlatArrays, Positions, Relations};
pub use io::{open, Compression, HepFile, HepFormat, OpenOptions};
pub use io::{EventReader, EventWriter, ToGenEvent};
