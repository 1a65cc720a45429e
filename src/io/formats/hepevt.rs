// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plain-text common-block records.
//!
//! The oldest interchange layout there is, one line per particle:
//! - `E <event_number> <n_particles>`
//! - `<index> <status> <pid> <mother1> <mother2> <daughter1> <daughter2>`
//!   `<px> <py> <pz> <e> <m> <x> <y> <z> <t>`
//!
//! Indices are one-based with `0 0` as the no-relation pair. There is no
//! file header or footer and nothing to sniff beyond the leading `E `, so
//! this format is the fallback of last resort in detection order.
//!
//! Mother and daughter columns are redundant views of the same graph; reads
//! trust the mothers and rebuild daughters from the assembled topology.
//! Writes flatten each relation set to its index span, which loses
//! information when a set is non-contiguous.

use super::{fmt_float, next_tok, parse_tok};
use crate::core::{HepError, Result};
use crate::event::{FourVector, GenEvent, GenRunInfo};
use crate::graph::{FlatRecordBuf, RawRange, ONE_BASED_SENTINEL};
use crate::io::detection::HepFormat;
use crate::io::stream::{BlockWriter, LineStream};
use crate::io::traits::{EventReader, EventWriter};

const FORMAT: &str = "HEPEVT";
const PRECISION: usize = 16;

/// Streaming reader for common-block listings.
pub struct HepevtReader {
    stream: LineStream,
    buf: FlatRecordBuf,
    line: String,
}

impl HepevtReader {
    /// No header to verify; the first record is found on demand.
    pub fn new(stream: LineStream) -> Self {
        HepevtReader {
            stream,
            buf: FlatRecordBuf::new(),
            line: String::new(),
        }
    }

    fn parse_particle_line(&mut self, expected_index: usize) -> Result<()> {
        let n = self.stream.line_number();
        let mut toks = self.line.split_whitespace();
        let index: usize = parse_tok(
            FORMAT,
            n,
            "particle index",
            next_tok(FORMAT, n, "particle index", &mut toks)?,
        )?;
        if index != expected_index {
            tracing::warn!(
                line = n,
                index,
                expected_index,
                "particle index out of step, trusting line order"
            );
        }
        let status = parse_tok(
            FORMAT,
            n,
            "status",
            next_tok(FORMAT, n, "status", &mut toks)?,
        )?;
        let pid = parse_tok(FORMAT, n, "pid", next_tok(FORMAT, n, "pid", &mut toks)?)?;
        let mo1: i64 = parse_tok(
            FORMAT,
            n,
            "mother1",
            next_tok(FORMAT, n, "mother1", &mut toks)?,
        )?;
        let mo2: i64 = parse_tok(
            FORMAT,
            n,
            "mother2",
            next_tok(FORMAT, n, "mother2", &mut toks)?,
        )?;
        // Daughter columns are redundant with the mothers; skip them.
        let _da1 = next_tok(FORMAT, n, "daughter1", &mut toks)?;
        let _da2 = next_tok(FORMAT, n, "daughter2", &mut toks)?;
        let mut momentum = [0.0f64; 5];
        for (i, slot) in momentum.iter_mut().enumerate() {
            let what = ["px", "py", "pz", "e", "m"][i];
            *slot = parse_tok(FORMAT, n, what, next_tok(FORMAT, n, what, &mut toks)?)?;
        }
        let mut position = [0.0f64; 4];
        for (i, slot) in position.iter_mut().enumerate() {
            let what = ["x", "y", "z", "t"][i];
            *slot = parse_tok(FORMAT, n, what, next_tok(FORMAT, n, what, &mut toks)?)?;
        }
        self.buf.push(status, pid, (mo1, mo2), momentum, position);
        Ok(())
    }
}

impl EventReader for HepevtReader {
    fn read_event(&mut self) -> Result<Option<GenEvent>> {
        let (event_number, n_particles) = loop {
            if !self.stream.read_line_into(&mut self.line)? {
                return Ok(None);
            }
            if self.line.trim().is_empty() {
                continue;
            }
            if !self.line.starts_with("E ") {
                tracing::warn!(
                    line = self.stream.line_number(),
                    record = %self.line,
                    "skipping unknown record"
                );
                continue;
            }
            let n = self.stream.line_number();
            let mut toks = self.line.split_whitespace();
            toks.next();
            let number: i64 = parse_tok(
                FORMAT,
                n,
                "event number",
                next_tok(FORMAT, n, "event number", &mut toks)?,
            )?;
            let count: usize = parse_tok(
                FORMAT,
                n,
                "particle count",
                next_tok(FORMAT, n, "particle count", &mut toks)?,
            )?;
            break (number, count);
        };

        self.buf.clear();
        self.buf.event_number = event_number;
        self.buf.reserve(n_particles);
        for i in 0..n_particles {
            if !self.stream.read_line_into(&mut self.line)? {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!(
                        "stream ended inside event {event_number}: got {i} of {n_particles} particles"
                    ),
                ));
            }
            self.parse_particle_line(i + 1)?;
        }

        self.buf.build(true).map(Some)
    }

    fn run_info(&self) -> Option<&GenRunInfo> {
        None
    }

    fn format(&self) -> HepFormat {
        HepFormat::Hepevt
    }
}

/// Index span of a relation set, flattened to the file convention.
fn flatten_span(event_number: i64, ids: &[i32]) -> RawRange {
    match (ids.iter().min(), ids.iter().max()) {
        (Some(&lo), Some(&hi)) => {
            if (hi - lo + 1) as usize != ids.len() {
                tracing::warn!(
                    event = event_number,
                    lo,
                    hi,
                    "non-contiguous relation set flattened to its span"
                );
            }
            (lo as i64, hi as i64)
        }
        _ => ONE_BASED_SENTINEL,
    }
}

/// Streaming writer for common-block listings.
///
/// The layout is fixed-width in spirit; per-call precision overrides are
/// not honored so that records stay bit-faithful.
pub struct HepevtWriter {
    out: BlockWriter,
    events_written: u64,
    finished: bool,
}

impl HepevtWriter {
    pub fn new(out: BlockWriter) -> Self {
        HepevtWriter {
            out,
            events_written: 0,
            finished: false,
        }
    }
}

impl EventWriter for HepevtWriter {
    fn write_event(&mut self, event: &GenEvent) -> Result<()> {
        if self.finished {
            return Err(HepError::write_failed(FORMAT, "writer already finished"));
        }
        self.out.write_line(&format!(
            "E {} {}",
            event.event_number,
            event.particles_size()
        ))?;
        for particle in event.particles() {
            let mothers = match particle.production_vertex() {
                Some(v) => {
                    let vertex = event.vertex(v).ok_or_else(|| {
                        HepError::write_failed(FORMAT, format!("dangling vertex link {v}"))
                    })?;
                    flatten_span(event.event_number, vertex.particles_in())
                }
                None => ONE_BASED_SENTINEL,
            };
            let daughters = match particle.end_vertex() {
                Some(v) => {
                    let vertex = event.vertex(v).ok_or_else(|| {
                        HepError::write_failed(FORMAT, format!("dangling vertex link {v}"))
                    })?;
                    flatten_span(event.event_number, vertex.particles_out())
                }
                None => ONE_BASED_SENTINEL,
            };
            let position = particle
                .production_vertex()
                .and_then(|v| event.vertex(v))
                .map(|vertex| vertex.position)
                .unwrap_or(FourVector::new(0.0, 0.0, 0.0, 0.0));
            let m = particle.momentum;
            self.out.write_line(&format!(
                "{} {} {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
                particle.id(),
                particle.status,
                particle.pid,
                mothers.0,
                mothers.1,
                daughters.0,
                daughters.1,
                fmt_float(m.x, PRECISION),
                fmt_float(m.y, PRECISION),
                fmt_float(m.z, PRECISION),
                fmt_float(m.t, PRECISION),
                fmt_float(particle.generated_mass(), PRECISION),
                fmt_float(position.x, PRECISION),
                fmt_float(position.y, PRECISION),
                fmt_float(position.z, PRECISION),
                fmt_float(position.t, PRECISION)
            ))?;
        }
        self.events_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        self.out.finish()
    }

    fn format(&self) -> HepFormat {
        HepFormat::Hepevt
    }

    fn events_written(&self) -> u64 {
        self.events_written
    }
}
