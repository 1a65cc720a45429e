// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Flat-record validation and graph construction.
//!
//! Two layers:
//! - [`range`] - the single chokepoint that validates one relation index
//!   pair (sentinel detection, inversion, bounds)
//! - [`builder`] - applies it across a whole record and emits a
//!   deduplicated particle/vertex graph

pub mod builder;
pub mod range;

pub use builder::{
    build_event, FlatArrays, FlatRecordBuf, Positions, Relations, ONE_BASED_SENTINEL,
};
pub use range::{normalize, NormalizedRange, RawRange, SENTINEL};
