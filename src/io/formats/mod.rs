// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File format implementations for event data.
//!
//! This module contains readers and writers for the supported event file
//! formats:
//! - [`hepmc3`]: the current ASCII format (read + write)
//! - [`hepmc2`]: the legacy ASCII listing (read + write)
//! - [`lhef`]: Les Houches event files (read only)
//! - [`hepevt`]: the flat common-block listing (read + write)
//!
//! All of them speak lines through the stream adapter and never touch the
//! byte source directly, so compression stays transparent.

pub mod hepevt;
pub mod hepmc2;
pub mod hepmc3;
pub mod lhef;

pub use hepevt::{HepevtReader, HepevtWriter};
pub use hepmc2::{Hepmc2Reader, Hepmc2Writer};
pub use hepmc3::{Hepmc3Reader, Hepmc3Writer};
pub use lhef::LhefReader;

use crate::core::{HepError, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Render one floating-point column with the given significant precision.
///
/// 16 fractional digits round-trip every `f64` exactly.
pub(crate) fn fmt_float(value: f64, precision: usize) -> String {
    format!("{value:.precision$e}")
}

/// Parse one whitespace token, wrapping the failure with line context.
pub(crate) fn parse_tok<T>(format: &'static str, line: u64, what: &str, tok: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    tok.parse().map_err(|e| {
        HepError::read_failed(format, format!("line {line}: bad {what} '{tok}': {e}"))
    })
}

/// Pull the next token off an iterator, failing with line context when the
/// record is short.
pub(crate) fn next_tok<'a>(
    format: &'static str,
    line: u64,
    what: &str,
    toks: &mut impl Iterator<Item = &'a str>,
) -> Result<&'a str> {
    toks.next()
        .ok_or_else(|| HepError::read_failed(format, format!("line {line}: missing {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_float_round_trips_exactly() {
        let values = [0.0, 1.0, -7000.5, std::f64::consts::PI, 1.0e-300, 6.5e12];
        for v in values {
            let text = fmt_float(v, 16);
            assert_eq!(text.parse::<f64>().unwrap(), v, "{text}");
        }
    }

    #[test]
    fn test_fmt_float_precision_truncates() {
        assert_eq!(fmt_float(1.23456, 2), "1.23e0");
        assert_eq!(fmt_float(-1500.0, 3), "-1.500e3");
    }

    #[test]
    fn test_parse_tok_context() {
        let ok: i32 = parse_tok("HEPEVT", 3, "status", "-1").unwrap();
        assert_eq!(ok, -1);
        let err = parse_tok::<i32>("HEPEVT", 3, "status", "x").unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_next_tok_reports_missing_field() {
        let mut toks = "E 1".split_whitespace();
        assert_eq!(next_tok("HepMC3", 1, "tag", &mut toks).unwrap(), "E");
        assert_eq!(next_tok("HepMC3", 1, "event number", &mut toks).unwrap(), "1");
        let err = next_tok("HepMC3", 1, "vertex count", &mut toks).unwrap_err();
        assert!(err.to_string().contains("missing vertex count"));
    }
}
