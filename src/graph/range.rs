// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Relation index range validation.
//!
//! Legacy flat records point at related particles with inclusive index
//! pairs. The pairs arrive in either the 1-based file convention or the
//! 0-based in-memory convention, inverted pairs are legal, and "no
//! relations" is spelled as a sentinel pair. [`normalize`] is the single
//! chokepoint that turns any such pair into a canonical form or rejects it.

use crate::core::{HepError, Result};

/// A raw relation pair as stored in a flat record, inclusive on both ends.
pub type RawRange = (i64, i64);

/// A validated range in the 0-based convention, or `None` for the
/// sentinel (no relations in this direction).
pub type NormalizedRange = Option<(usize, usize)>;

/// The canonical sentinel endpoint in the 0-based convention.
///
/// A pair is THE sentinel exactly when both endpoints equal this value,
/// which is the 1-based `(0, 0)`. Anything below it, and any pairing of
/// one sentinel endpoint with a real index, is malformed rather than a
/// second way to spell "none".
pub const SENTINEL: i64 = -1;

/// Validate and canonicalize one relation pair.
///
/// Steps, in order:
/// 1. shift to the 0-based convention if `one_based`;
/// 2. both endpoints equal to [`SENTINEL`]: return `Ok(None)`;
/// 3. any endpoint below [`SENTINEL`], or exactly one endpoint equal to
///    it: `MalformedSentinel`;
/// 4. `lo > hi`: swap silently (inverted pairs are valid);
/// 5. an endpoint at or past `n_particles`: `OutOfRange`.
pub fn normalize(range: RawRange, n_particles: usize, one_based: bool) -> Result<NormalizedRange> {
    let (mut lo, mut hi) = range;
    if one_based {
        lo = lo.saturating_sub(1);
        hi = hi.saturating_sub(1);
    }
    if lo == SENTINEL && hi == SENTINEL {
        return Ok(None);
    }
    if lo < SENTINEL || hi < SENTINEL {
        return Err(HepError::malformed_sentinel(
            lo,
            hi,
            "endpoint below the sentinel value",
        ));
    }
    if lo == SENTINEL || hi == SENTINEL {
        return Err(HepError::malformed_sentinel(
            lo,
            hi,
            "sentinel paired with a real index",
        ));
    }
    let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
    if hi as usize >= n_particles {
        return Err(HepError::out_of_range(hi, n_particles));
    }
    Ok(Some((lo as usize, hi as usize)))
}
