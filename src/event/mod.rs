// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Event object model.
//!
//! This module owns the in-memory representation of generated events:
//! - [`GenEvent`] - the event graph plus weights, units, and metadata
//! - [`GenParticle`] / [`GenVertex`] - graph nodes, linked by id
//! - [`FourVector`] - momentum and position vectors
//! - [`GenRunInfo`] - run-level metadata shared by all events of a file
//! - [`Attribute`] / [`AttributesView`] - typed and raw attribute slots
//!
//! Format readers and writers in [`crate::io`] consume and produce these
//! types; the flat-record builder in [`crate::graph`] constructs them from
//! legacy parallel arrays.

pub mod attributes;
pub mod event;
pub mod fourvector;
pub mod runinfo;
pub mod units;

pub use attributes::{Attribute, AttributeKind, Attributes, AttributesView};
pub use event::{GenEvent, GenParticle, GenVertex};
pub use fourvector::FourVector;
pub use runinfo::{GenRunInfo, ToolInfo};
pub use units::{LengthUnit, MomentumUnit};
