// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Current-generation ASCII format.
//!
//! Layout of a file:
//! - header: `HepMC::Version <v>` and `HepMC::Asciiv3-START_EVENT_LISTING`
//! - run block: `W` (weight names), `T` (tools), `A` (run attributes),
//!   newline-escaped
//! - per event: `E <number> <vertices> <particles>`, `U <mom> <len>`,
//!   optional `W <weights...>`, `A <owner> <name> <value>` attribute lines,
//!   `V` records in id order, `P` records in id order
//! - footer: `HepMC::Asciiv3-END_EVENT_LISTING`
//!
//! A `P` record carries its production link in the second column: a
//! negative vertex id, `0` for none, or a positive parent particle id when
//! the writer elided a single-parent vertex. The reader accepts all three;
//! this writer always emits explicit `V` records.
//!
//! Floating-point columns use a configurable precision, default 16, which
//! round-trips `f64` exactly.

use super::{fmt_float, next_tok, parse_tok};
use crate::core::{HepError, Result};
use crate::event::{
    Attribute, FourVector, GenEvent, GenParticle, GenRunInfo, GenVertex, LengthUnit, MomentumUnit,
    ToolInfo,
};
use crate::io::detection::HepFormat;
use crate::io::stream::{BlockWriter, LineStream};
use crate::io::traits::{EventReader, EventWriter};

const FORMAT: &str = "HepMC3";
const VERSION_LINE: &str = "HepMC::Version 3.02.06";
const START_LINE: &str = "HepMC::Asciiv3-START_EVENT_LISTING";
const END_LINE: &str = "HepMC::Asciiv3-END_EVENT_LISTING";

/// Default precision of floating-point columns. Round-trip exact.
pub const DEFAULT_PRECISION: usize = 16;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\|"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('|') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Default)]
struct VertexScratch {
    id: i32,
    status: i32,
    position: FourVector,
    incoming: Vec<i32>,
}

struct ParticleScratch {
    id: i32,
    production: i32,
    pid: i32,
    momentum: FourVector,
    mass: f64,
    status: i32,
}

#[derive(Default)]
struct EventScratch {
    number: i64,
    momentum_unit: Option<MomentumUnit>,
    length_unit: Option<LengthUnit>,
    weights: Vec<f64>,
    attributes: Vec<(i32, String, String)>,
    vertices: Vec<VertexScratch>,
    particles: Vec<ParticleScratch>,
}

/// Streaming reader for the current ASCII format.
#[derive(Debug)]
pub struct Hepmc3Reader {
    stream: LineStream,
    run_info: Option<GenRunInfo>,
    pending_event: Option<String>,
    line: String,
}

impl Hepmc3Reader {
    /// Parse the header and run block eagerly; events stream lazily.
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

        let mut run_info: Option<GenRunInfo> = None;
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
            let n = stream.line_number();
            let info = run_info.get_or_insert_with(GenRunInfo::new);
            match line.as_bytes()[0] {
                b'W' => {
                    let joined = unescape(line[1..].trim_start());
                    info.set_weight_names(joined.split('\n').map(str::to_string).collect());
                }
                b'T' => {
                    let joined = unescape(line[1..].trim_start());
                    let mut parts = joined.split('\n');
                    info.tools.push(ToolInfo::new(
                        parts.next().unwrap_or_default(),
                        parts.next().unwrap_or_default(),
                        parts.next().unwrap_or_default(),
                    ));
                }
                b'A' => {
                    let rest = line[1..].trim_start();
                    let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
                    info.set_attribute(name, Attribute::Unparsed(unescape(value)));
                }
                _ => {
                    tracing::warn!(line = n, record = %line, "skipping unknown run record");
                }
            }
        }

        Ok(Hepmc3Reader {
            stream,
            run_info,
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
        let n_particles: usize = parse_tok(
            FORMAT,
            n,
            "particle count",
            next_tok(FORMAT, n, "particle count", &mut toks)?,
        )?;
        scratch.vertices.reserve(n_vertices);
        scratch.particles.reserve(n_particles);
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

    fn parse_weights(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        scratch.weights.clear();
        for tok in self.line.split_whitespace().skip(1) {
            scratch.weights.push(parse_tok(FORMAT, n, "weight", tok)?);
        }
        Ok(())
    }

    fn parse_attribute(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let rest = self.line[1..].trim_start();
        let (owner_tok, rest) = rest.split_once(' ').ok_or_else(|| {
            HepError::read_failed(FORMAT, format!("line {n}: attribute record too short"))
        })?;
        let owner: i32 = parse_tok(FORMAT, n, "attribute owner", owner_tok)?;
        let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
        scratch
            .attributes
            .push((owner, name.to_string(), unescape(value)));
        Ok(())
    }

    fn parse_vertex(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let (body, position) = match self.line.split_once('@') {
            Some((body, pos)) => (body, Some(pos)),
            None => (self.line.as_str(), None),
        };
        let mut toks = body.split_whitespace();
        toks.next();
        let mut vertex = VertexScratch {
            id: parse_tok(
                FORMAT,
                n,
                "vertex id",
                next_tok(FORMAT, n, "vertex id", &mut toks)?,
            )?,
            status: parse_tok(
                FORMAT,
                n,
                "vertex status",
                next_tok(FORMAT, n, "vertex status", &mut toks)?,
            )?,
            ..VertexScratch::default()
        };
        let list = next_tok(FORMAT, n, "incoming list", &mut toks)?;
        let inner = list.trim_start_matches('[').trim_end_matches(']');
        for tok in inner.split(',').filter(|t| !t.trim().is_empty()) {
            vertex
                .incoming
                .push(parse_tok(FORMAT, n, "incoming particle id", tok.trim())?);
        }
        if let Some(pos) = position {
            let mut toks = pos.split_whitespace();
            let x = parse_tok(FORMAT, n, "x", next_tok(FORMAT, n, "x", &mut toks)?)?;
            let y = parse_tok(FORMAT, n, "y", next_tok(FORMAT, n, "y", &mut toks)?)?;
            let z = parse_tok(FORMAT, n, "z", next_tok(FORMAT, n, "z", &mut toks)?)?;
            let t = parse_tok(FORMAT, n, "t", next_tok(FORMAT, n, "t", &mut toks)?)?;
            vertex.position = FourVector::new(x, y, z, t);
        }
        scratch.vertices.push(vertex);
        Ok(())
    }

    fn parse_particle(&mut self, scratch: &mut EventScratch) -> Result<()> {
        let n = self.stream.line_number();
        let mut toks = self.line.split_whitespace();
        toks.next();
        let id = parse_tok(
            FORMAT,
            n,
            "particle id",
            next_tok(FORMAT, n, "particle id", &mut toks)?,
        )?;
        let production = parse_tok(
            FORMAT,
            n,
            "production link",
            next_tok(FORMAT, n, "production link", &mut toks)?,
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
        scratch.particles.push(ParticleScratch {
            id,
            production,
            pid,
            momentum: FourVector::new(px, py, pz, e),
            mass,
            status,
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

        scratch.particles.sort_by_key(|p| p.id);
        for (i, p) in scratch.particles.iter().enumerate() {
            if p.id != i as i32 + 1 {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("particle ids are not contiguous near id {}", p.id),
                ));
            }
            let mut particle = GenParticle::new(p.momentum, p.pid, p.status);
            particle.set_generated_mass(p.mass);
            event.add_particle(particle);
        }

        scratch.vertices.sort_by_key(|v| std::cmp::Reverse(v.id));
        for (i, v) in scratch.vertices.iter().enumerate() {
            if v.id != -(i as i32) - 1 {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("vertex ids are not contiguous near id {}", v.id),
                ));
            }
            let mut vertex = GenVertex::new();
            vertex.status = v.status;
            vertex.position = v.position;
            let vid = event.add_vertex(vertex);
            for &pin in &v.incoming {
                if event.particle(pin).is_none() {
                    return Err(HepError::read_failed(
                        FORMAT,
                        format!("vertex {vid} references unknown particle {pin}"),
                    ));
                }
                event.add_particle_in(vid, pin);
            }
        }

        for p in &scratch.particles {
            match p.production {
                0 => {}
                v if v < 0 => {
                    if event.vertex(v).is_none() {
                        return Err(HepError::read_failed(
                            FORMAT,
                            format!("particle {} references unknown vertex {v}", p.id),
                        ));
                    }
                    event.add_particle_out(v, p.id);
                }
                parent => {
                    // Elided single-parent vertex; recover or create it.
                    let existing = event.particle(parent).and_then(|pp| pp.end_vertex());
                    let vid = match existing {
                        Some(v)
                            if event
                                .vertex(v)
                                .is_some_and(|vx| vx.particles_in() == [parent]) =>
                        {
                            v
                        }
                        _ => {
                            if event.particle(parent).is_none() {
                                return Err(HepError::read_failed(
                                    FORMAT,
                                    format!("particle {} references unknown parent {parent}", p.id),
                                ));
                            }
                            let v = event.add_vertex(GenVertex::new());
                            event.add_particle_in(v, parent);
                            v
                        }
                    };
                    event.add_particle_out(vid, p.id);
                }
            }
        }

        for (owner, name, value) in scratch.attributes {
            event
                .attributes_mut()
                .set(owner, name, Attribute::Unparsed(value));
        }
        event.set_run_info(self.run_info.clone());
        Ok(event)
    }
}

impl EventReader for Hepmc3Reader {
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
                b'U' => self.parse_units(&mut scratch)?,
                b'W' => self.parse_weights(&mut scratch)?,
                b'A' => self.parse_attribute(&mut scratch)?,
                b'V' => self.parse_vertex(&mut scratch)?,
                b'P' => self.parse_particle(&mut scratch)?,
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
        HepFormat::Hepmc3
    }
}

/// Streaming writer for the current ASCII format.
pub struct Hepmc3Writer {
    out: BlockWriter,
    precision: usize,
    events_written: u64,
    footer_done: bool,
}

impl Hepmc3Writer {
    /// Write the header and run block immediately.
    pub fn new(mut out: BlockWriter, run_info: Option<&GenRunInfo>) -> Result<Self> {
        out.write_line(VERSION_LINE)?;
        out.write_line(START_LINE)?;
        if let Some(info) = run_info {
            if !info.weight_names().is_empty() {
                out.write_line(&format!("W {}", escape(&info.weight_names().join("\n"))))?;
            }
            for tool in &info.tools {
                let joined = format!("{}\n{}\n{}", tool.name, tool.version, tool.description);
                out.write_line(&format!("T {}", escape(&joined)))?;
            }
            for (name, attr) in info.attributes() {
                out.write_line(&format!("A {name} {}", escape(&attr.to_serialized())))?;
            }
        }
        Ok(Hepmc3Writer {
            out,
            precision: DEFAULT_PRECISION,
            events_written: 0,
            footer_done: false,
        })
    }
}

impl EventWriter for Hepmc3Writer {
    fn write_event(&mut self, event: &GenEvent) -> Result<()> {
        if self.footer_done {
            return Err(HepError::write_failed(FORMAT, "writer already finished"));
        }
        let p = self.precision;
        self.out.write_line(&format!(
            "E {} {} {}",
            event.event_number,
            event.vertices_size(),
            event.particles_size()
        ))?;
        self.out.write_line(&format!(
            "U {} {}",
            event.momentum_unit().as_str(),
            event.length_unit().as_str()
        ))?;
        if !event.weights.is_empty() {
            let joined: Vec<String> = event.weights.iter().map(|&w| fmt_float(w, p)).collect();
            self.out.write_line(&format!("W {}", joined.join(" ")))?;
        }
        for (owner, name, attr) in event.attributes().iter() {
            self.out
                .write_line(&format!("A {owner} {name} {}", escape(&attr.to_serialized())))?;
        }
        for v in event.vertices() {
            let incoming: Vec<String> = v.particles_in().iter().map(i32::to_string).collect();
            let mut line = format!("V {} {} [{}]", v.id(), v.status, incoming.join(","));
            if v.has_position() {
                let pos = v.position;
                line.push_str(&format!(
                    " @ {} {} {} {}",
                    fmt_float(pos.x, p),
                    fmt_float(pos.y, p),
                    fmt_float(pos.z, p),
                    fmt_float(pos.t, p)
                ));
            }
            self.out.write_line(&line)?;
        }
        for particle in event.particles() {
            let m = particle.momentum;
            self.out.write_line(&format!(
                "P {} {} {} {} {} {} {} {} {}",
                particle.id(),
                particle.production_vertex().unwrap_or(0),
                particle.pid,
                fmt_float(m.x, p),
                fmt_float(m.y, p),
                fmt_float(m.z, p),
                fmt_float(m.t, p),
                fmt_float(particle.generated_mass(), p),
                particle.status
            ))?;
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
        HepFormat::Hepmc3
    }

    fn events_written(&self) -> u64 {
        self.events_written
    }
}
