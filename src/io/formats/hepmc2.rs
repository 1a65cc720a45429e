// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Legacy ASCII listing.
//!
//! Compact profile of the old `IO_GenEvent` layout:
//! - header: `HepMC::Version <v>` and `HepMC::IO_GenEvent-START_EVENT_LISTING`
//! - per event: `E <number> <vertices> <nweights> [weights...]`, an optional
//!   `N <count> "name"...` weight-name line, `U <mom> <len>`, then one `V`
//!   block per vertex
//! - a `V` block is `V <id> <status> <x> <y> <z> <t> <norphans> <nout>`
//!   followed by that many `P` lines: first the orphans (incoming particles
//!   with no production vertex), then the outgoing particles
//! - `P <id> <pid> <px> <py> <pz> <e> <m> <status> <end_vertex>`
//! - footer: `HepMC::IO_GenEvent-END_EVENT_LISTING`
//!
//! Every particle hangs off some vertex block, so particles with no vertex
//! links at all cannot be represented and are dropped with a warning. Tool
//! metadata has no slot in this layout; only weight names survive.

use super::{fmt_float, next_tok, parse_tok};
use crate::core::{HepError, Result};
use crate::event::{
    FourVector, GenEvent, GenParticle, GenRunInfo, GenVertex, LengthUnit, MomentumUnit,
};
use crate::io::detection::HepFormat;
use crate::io::stream::{BlockWriter, LineStream};
use crate::io::traits::{EventReader, EventWriter};
use std::collections::BTreeMap;

const FORMAT: &str = "HepMC2";
const VERSION_LINE: &str = "HepMC::Version 2.06.09";
const START_LINE: &str = "HepMC::IO_GenEvent-START_EVENT_LISTING";
const END_LINE: &str = "HepMC::IO_GenEvent-END_EVENT_LISTING";

struct ParticleScratch {
    id: i32,
    pid: i32,
    momentum: FourVector,
    mass: f64,
    status: i32,
    production: Option<i32>,
    end: i32,
}

struct VertexScratch {
    id: i32,
    status: i32,
    position: FourVector,
}

#[derive(Default)]
struct EventScratch {
    number: i64,
    momentum_unit: Option<MomentumUnit>,
    length_unit: Option<LengthUnit>,
    weights: Vec<f64>,
    vertices: Vec<VertexScratch>,
    particles: Vec<ParticleScratch>,
}

/// Streaming reader for the legacy listing.
pub struct Hepmc2Reader {
    stream: LineStream,
    run_info: Option<GenRunInfo>,
    pending_event: Option<String>,
    line: String,
}

impl Hepmc2Reader {
    /// Verify the header eagerly; events stream lazily.
    pub fn new(mut stream: LineStream) -> Result<Self> {
        let mut line = String::new();
        if !stream.read_line_into(&mut line)? || !line.starts_with("HepMC::Version") {
            return Err(HepError::read_failed(
                FORMAT,
                format!("missing version header, got '{line}'"),
            ));
        }
        if !stream.read_line_into(&mut line)? || !line.starts_with(START_LINE) {
            return Err(HepError::read_failed(
                FORMAT,
                format!("missing start-of-listing header, got '{line}'"),
            ));
        }
        let mut pending_event = None;
        loop {
            if !stream.read_line_into(&mut line)? {
                break;
            }
            if line.is_empty() {
                continue;
            }
            if line.starts_with("E ") {
                pending_event = Some(line.clone());
                break;
            }
            if line.starts_with(END_LINE) {
                break;
            }
            tracing::warn!(
                line = stream.line_number(),
                record = %line,
                "skipping unknown preamble record"
            );
        }
        Ok(Hepmc2Reader {
            stream,
            run_info: None,
            pending_event,
            line: String::new(),
        })
    }

    fn parse_event_header(&self, header: &str, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let mut toks = header.split_whitespace();
        toks.next();
        scratch.number = parse_tok(
            FORMAT,
            n,
            "event number",
            next_tok(FORMAT, n, "event number", &mut toks)?,
        )?;
        let n_vertices: usize = parse_tok(
            FORMAT,
            n,
            "vertex count",
            next_tok(FORMAT, n, "vertex count", &mut toks)?,
        )?;
        let n_weights: usize = parse_tok(
            FORMAT,
            n,
            "weight count",
            next_tok(FORMAT, n, "weight count", &mut toks)?,
        )?;
        scratch.vertices.reserve(n_vertices);
        for _ in 0..n_weights {
            let tok = next_tok(FORMAT, n, "weight", &mut toks)?;
            scratch.weights.push(parse_tok(FORMAT, n, "weight", tok)?);
        }
        Ok(())
    }

    fn parse_weight_names(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .line
            .split('"')
            .skip(1)
            .step_by(2)
            .map(str::to_string)
            .collect();
        self.run_info
            .get_or_insert_with(GenRunInfo::new)
            .set_weight_names(names);
        Ok(())
    }

    fn parse_units(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let mut toks = self.line.split_whitespace();
        toks.next();
        let mom = next_tok(FORMAT, n, "momentum unit", &mut toks)?;
        let len = next_tok(FORMAT, n, "length unit", &mut toks)?;
        scratch.momentum_unit = Some(MomentumUnit::from_name(mom).ok_or_else(|| {
            HepError::read_failed(FORMAT, format!("line {n}: unknown momentum unit '{mom}'"))
        })?);
        scratch.length_unit = Some(LengthUnit::from_name(len).ok_or_else(|| {
            HepError::read_failed(FORMAT, format!("line {n}: unknown length unit '{len}'"))
        })?);
        Ok(())
    }

    /// Parse one `V` line plus its attached `P` lines.
    fn parse_vertex_block(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let (id, n_orphans, n_out) = {
            let mut toks = self.line.split_whitespace();
            toks.next();
            let id: i32 = parse_tok(
                FORMAT,
                n,
                "vertex id",
                next_tok(FORMAT, n, "vertex id", &mut toks)?,
            )?;
            let status = parse_tok(
                FORMAT,
                n,
                "vertex status",
                next_tok(FORMAT, n, "vertex status", &mut toks)?,
            )?;
            let x = parse_tok(FORMAT, n, "x", next_tok(FORMAT, n, "x", &mut toks)?)?;
            let y = parse_tok(FORMAT, n, "y", next_tok(FORMAT, n, "y", &mut toks)?)?;
            let z = parse_tok(FORMAT, n, "z", next_tok(FORMAT, n, "z", &mut toks)?)?;
            let t = parse_tok(FORMAT, n, "t", next_tok(FORMAT, n, "t", &mut toks)?)?;
            let n_orphans: usize = parse_tok(
                FORMAT,
                n,
                "orphan count",
                next_tok(FORMAT, n, "orphan count", &mut toks)?,
            )?;
            let n_out: usize = parse_tok(
                FORMAT,
                n,
                "outgoing count",
                next_tok(FORMAT, n, "outgoing count", &mut toks)?,
            )?;
            scratch.vertices.push(VertexScratch {
                id,
                status,
                position: FourVector::new(x, y, z, t),
            });
            (id, n_orphans, n_out)
        };

        scratch.particles.reserve(n_orphans + n_out);
        for i in 0..n_orphans + n_out {
            if !self.stream.read_line_into(&mut self.line)? {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("stream ended inside vertex block {id}"),
                ));
            }
            let production = if i < n_orphans { None } else { Some(id) };
            self.parse_particle(production, scratch)?;
        }
        Ok(())
    }

    fn parse_particle(&mut self, production: Option<i32>, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        if !self.line.starts_with("P ") {
            return Err(HepError::read_failed(
                FORMAT,
                format!("line {n}: expected particle record, got '{}'", self.line),
            ));
        }
        let mut toks = self.line.split_whitespace();
        toks.next();
        let id = parse_tok(
            FORMAT,
            n,
            "particle id",
            next_tok(FORMAT, n, "particle id", &mut toks)?,
        )?;
        let pid = parse_tok(FORMAT, n, "pid", next_tok(FORMAT, n, "pid", &mut toks)?)?;
        let px = parse_tok(FORMAT, n, "px", next_tok(FORMAT, n, "px", &mut toks)?)?;
        let py = parse_tok(FORMAT, n, "py", next_tok(FORMAT, n, "py", &mut toks)?)?;
        let pz = parse_tok(FORMAT, n, "pz", next_tok(FORMAT, n, "pz", &mut toks)?)?;
        let e = parse_tok(FORMAT, n, "e", next_tok(FORMAT, n, "e", &mut toks)?)?;
        let mass = parse_tok(FORMAT, n, "mass", next_tok(FORMAT, n, "mass", &mut toks)?)?;
        let status = parse_tok(
            FORMAT,
            n,
            "status",
            next_tok(FORMAT, n, "status", &mut toks)?,
        )?;
        let end = parse_tok(
            FORMAT,
            n,
            "end vertex",
            next_tok(FORMAT, n, "end vertex", &mut toks)?,
        )?;
        scratch.particles.push(ParticleScratch {
            id,
            pid,
            momentum: FourVector::new(px, py, pz, e),
            mass,
            status,
            production,
            end,
        });
        Ok(())
    }

    fn assemble(&self, mut scratch: EventScratch) -> Result<GenEvent> {
        let mut event = GenEvent::with_units(
            scratch.momentum_unit.unwrap_or(MomentumUnit::Gev),
            scratch.length_unit.unwrap_or(LengthUnit::Mm),
        );
        event.event_number = scratch.number;
        event.weights = std::mem::take(&mut scratch.weights);

        // Legacy barcodes can be arbitrary; remap to dense ids while
        // preserving the sort order.
        scratch.particles.sort_by_key(|p| p.id);
        let mut particle_ids = BTreeMap::new();
        for p in &scratch.particles {
            let mut particle = GenParticle::new(p.momentum, p.pid, p.status);
            particle.set_generated_mass(p.mass);
            let assigned = event.add_particle(particle);
            if particle_ids.insert(p.id, assigned).is_some() {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("duplicate particle barcode {}", p.id),
                ));
            }
        }

        scratch.vertices.sort_by_key(|v| std::cmp::Reverse(v.id));
        let mut vertex_ids = BTreeMap::new();
        for v in &scratch.vertices {
            let mut vertex = GenVertex::new();
            vertex.status = v.status;
            vertex.position = v.position;
            let assigned = event.add_vertex(vertex);
            if vertex_ids.insert(v.id, assigned).is_some() {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("duplicate vertex barcode {}", v.id),
                ));
            }
        }

        for p in &scratch.particles {
            let pid = particle_ids[&p.id];
            if let Some(vb) = p.production {
                let vid = *vertex_ids.get(&vb).ok_or_else(|| {
                    HepError::read_failed(
                        FORMAT,
                        format!("particle {} references unknown vertex {vb}", p.id),
                    )
                })?;
                event.add_particle_out(vid, pid);
            }
            if p.end != 0 {
                let vid = *vertex_ids.get(&p.end).ok_or_else(|| {
                    HepError::read_failed(
                        FORMAT,
                        format!("particle {} references unknown end vertex {}", p.id, p.end),
                    )
                })?;
                event.add_particle_in(vid, pid);
            }
        }

        event.set_run_info(self.run_info.clone());
        Ok(event)
    }
}

impl EventReader for Hepmc2Reader {
    fn read_event(&mut self) -> Result<Option<GenEvent>> {
        let Some(header) = self.pending_event.take() else {
            return Ok(None);
        };

        let mut scratch = EventScratch::default();
        self.parse_event_header(&header, &mut scratch)?;

        loop {
            if !self.stream.read_line_into(&mut self.line)? {
                break;
            }
            if self.line.is_empty() {
                continue;
            }
            if self.line.starts_with("E ") {
                self.pending_event = Some(self.line.clone());
                break;
            }
            if self.line.starts_with(END_LINE) {
                break;
            }
            match self.line.as_bytes()[0] {
                b'N' => self.parse_weight_names()?,
                b'U' => self.parse_units(&mut scratch)?,
                b'V' => self.parse_vertex_block(&mut scratch)?,
                _ => {
                    tracing::warn!(
                        line = self.stream.line_number(),
                        record = %self.line,
                        "skipping unknown event record"
                    );
                }
            }
        }

        self.assemble(scratch).map(Some)
    }

    fn run_info(&self) -> Option<&GenRunInfo> {
        self.run_info.as_ref()
    }

    fn format(&self) -> HepFormat {
        HepFormat::Hepmc2
    }
}

/// Streaming writer for the legacy listing.
pub struct Hepmc2Writer {
    out: BlockWriter,
    precision: usize,
    weight_names: Vec<String>,
    events_written: u64,
    footer_done: bool,
}

impl Hepmc2Writer {
    /// Write the header immediately. Weight names are the only run
    /// metadata this layout can carry.
    pub fn new(mut out: BlockWriter, run_info: Option<&GenRunInfo>) -> Result<Self> {
        out.write_line(VERSION_LINE)?;
        out.write_line(START_LINE)?;
        Ok(Hepmc2Writer {
            out,
            precision: super::hepmc3::DEFAULT_PRECISION,
            weight_names: run_info.map(|i| i.weight_names().to_vec()).unwrap_or_default(),
            events_written: 0,
            footer_done: false,
        })
    }

    fn write_particle(&mut self, event: &GenEvent, id: i32) -> Result<()> {
        let p = self.precision;
        let particle = event.particle(id).ok_or_else(|| {
            HepError::write_failed(FORMAT, format!("dangling particle link {id}"))
        })?;
        let m = particle.momentum;
        self.out.write_line(&format!(
            "P {} {} {} {} {} {} {} {} {}",
            particle.id(),
            particle.pid,
            fmt_float(m.x, p),
            fmt_float(m.y, p),
            fmt_float(m.z, p),
            fmt_float(m.t, p),
            fmt_float(particle.generated_mass(), p),
            particle.status,
            particle.end_vertex().unwrap_or(0)
        ))
    }
}

impl EventWriter for Hepmc2Writer {
    fn write_event(&mut self, event: &GenEvent) -> Result<()> {
        if self.footer_done {
            return Err(HepError::write_failed(FORMAT, "writer already finished"));
        }
        let p = self.precision;

        let mut header = format!(
            "E {} {} {}",
            event.event_number,
            event.vertices_size(),
            event.weights.len()
        );
        for &w in &event.weights {
            header.push(' ');
            header.push_str(&fmt_float(w, p));
        }
        self.out.write_line(&header)?;

        if !self.weight_names.is_empty() {
            let mut line = format!("N {}", self.weight_names.len());
            for name in &self.weight_names {
                line.push_str(&format!(" \"{name}\""));
            }
            self.out.write_line(&line)?;
        }
        self.out.write_line(&format!(
            "U {} {}",
            event.momentum_unit().as_str(),
            event.length_unit().as_str()
        ))?;

        let mut written = vec![false; event.particles_size()];
        for vi in 0..event.vertices_size() {
            let vertex_id = -(vi as i32) - 1;
            let (orphans, outgoing, status, position) = {
                let v = event.vertex(vertex_id).ok_or_else(|| {
                    HepError::write_failed(FORMAT, format!("missing vertex {vertex_id}"))
                })?;
                let orphans: Vec<i32> = v
                    .particles_in()
                    .iter()
                    .copied()
                    .filter(|&pin| {
                        event
                            .particle(pin)
                            .is_some_and(|pp| pp.production_vertex().is_none())
                    })
                    .collect();
                (orphans, v.particles_out().to_vec(), v.status, v.position)
            };
            self.out.write_line(&format!(
                "V {} {} {} {} {} {} {} {}",
                vertex_id,
                status,
                fmt_float(position.x, p),
                fmt_float(position.y, p),
                fmt_float(position.z, p),
                fmt_float(position.t, p),
                orphans.len(),
                outgoing.len()
            ))?;
            for id in orphans.iter().chain(outgoing.iter()) {
                self.write_particle(event, *id)?;
                written[*id as usize - 1] = true;
            }
        }

        let dropped = written.iter().filter(|&&w| !w).count();
        if dropped > 0 {
            tracing::warn!(
                event = event.event_number,
                dropped,
                "particles without vertex links cannot be represented in the legacy listing"
            );
        }

        self.events_written += 1;
        Ok(())
    }

    fn set_precision(&mut self, digits: usize) -> bool {
        self.precision = digits;
        true
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    fn finish(&mut self) -> Result<()> {
        if !self.footer_done {
            self.out.write_line(END_LINE)?;
            self.footer_done = true;
        }
        self.out.finish()
    }

    fn format(&self) -> HepFormat {
        HepFormat::Hepmc2
    }

    fn events_written(&self) -> u64 {
        self.events_written
    }
}
