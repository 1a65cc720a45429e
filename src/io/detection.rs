// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Event format detection using header signatures.
//!
//! Three of the four supported formats announce themselves in their first
//! bytes; the legacy HEPEVT listing has no signature and is always the
//! fallback. Detection looks at the first 256 decompressed bytes only, so
//! it works identically for plain and compressed files.
//!
//! # Supported Formats
//!
//! - **HepMC3**: signature `HepMC::Asciiv3`
//! - **HepMC2**: signature `HepMC::IO_GenEvent`
//! - **LHEF**: root tag `<LesHouchesEvents`
//! - **HEPEVT**: no signature, fallback
//!
//! # Example
//!
//! ```rust,no_run
//! use hepcodec::io::detection::{detect_format, HepFormat};
//!
//! let format = detect_format("events.hepmc3.gz")?;
//! assert_eq!(format, HepFormat::Hepmc3);
//! # Ok::<(), hepcodec::HepError>(())
//! ```

use std::io::Read;
use std::path::Path;

use crate::core::{HepError, Result};

use super::compression::open_decompressed;

/// Event file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HepFormat {
    /// HepMC3 ASCII
    Hepmc3,
    /// HepMC2 legacy ASCII (`IO_GenEvent`)
    Hepmc2,
    /// Les Houches Event File (read-only)
    Lhef,
    /// Legacy HEPEVT listing
    Hepevt,
}

/// Number of bytes a signature scan looks at.
pub const SNIFF_LEN: usize = 256;

impl HepFormat {
    /// Format name as used in the open facade and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            HepFormat::Hepmc3 => "hepmc3",
            HepFormat::Hepmc2 => "hepmc2",
            HepFormat::Lhef => "lhef",
            HepFormat::Hepevt => "hepevt",
        }
    }

    /// Map a format name, case-insensitively.
    pub fn from_name(name: &str) -> Result<HepFormat> {
        match name.to_lowercase().as_str() {
            "hepmc3" => Ok(HepFormat::Hepmc3),
            "hepmc2" => Ok(HepFormat::Hepmc2),
            "lhef" => Ok(HepFormat::Lhef),
            "hepevt" => Ok(HepFormat::Hepevt),
            _ => Err(HepError::unknown_format(name)),
        }
    }

    /// Check if a writer exists for this format. LHEF is read-only.
    pub fn supports_write(&self) -> bool {
        !matches!(self, HepFormat::Lhef)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Classify a byte prefix into a format.
///
/// Fixed priority: the HepMC3 signature, then HepMC2, then the LHEF root
/// tag; anything else is HEPEVT. Only the first [`SNIFF_LEN`] bytes of
/// `prefix` are considered.
pub fn sniff(prefix: &[u8]) -> HepFormat {
    let window = &prefix[..prefix.len().min(SNIFF_LEN)];
    if contains(window, b"HepMC::Asciiv3") {
        HepFormat::Hepmc3
    } else if contains(window, b"HepMC::IO_GenEvent") {
        HepFormat::Hepmc2
    } else if contains(window, b"<LesHouchesEvents") {
        HepFormat::Lhef
    } else {
        HepFormat::Hepevt
    }
}

/// Detect the format of a file, looking through compression.
///
/// Opens the file with the codec its suffix selects, reads up to
/// [`SNIFF_LEN`] decompressed bytes, and classifies them with [`sniff`].
/// The throwaway handle is dropped afterwards, so the caller re-opens the
/// file for actual reading and never needs to rewind.
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<HepFormat> {
    let path = path.as_ref();
    let mut reader = open_decompressed(path)?;

    let mut header = [0u8; SNIFF_LEN];
    let mut filled = 0;
    loop {
        let n = reader.read(&mut header[filled..]).map_err(|e| {
            HepError::read_failed(
                "detect",
                format!("Failed to read header of '{}': {e}", path.display()),
            )
        })?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == header.len() {
            break;
        }
    }

    Ok(sniff(&header[..filled]))
}
