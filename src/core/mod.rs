// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout hepcodec.
//!
//! This module provides the foundational types for the library:
//! - [`HepError`] - Comprehensive error handling
//! - [`Result`] - Library-wide result alias

pub mod error;

pub use error::{HepError, Result};
