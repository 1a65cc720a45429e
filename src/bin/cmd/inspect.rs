// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show file information and event contents.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use crate::common::{describe_tool, join_or_dash, open_input, Result};
use hepcodec::GenEvent;

/// Inspect file contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show file information and event totals
    Info {
        /// Input file (HepMC3, HepMC2, LHEF, or HEPEVT, optionally compressed)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print events as listings or JSON summaries
    Events {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Stop after this many events
        #[arg(short, long)]
        limit: Option<u64>,

        /// Emit one JSON object per event instead of a listing
        #[arg(long)]
        json: bool,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input } => cmd_info(input),
            InspectCmd::Events { input, limit, json } => cmd_events(input, limit, json),
        }
    }
}

/// Per-event summary for `--json` output.
#[derive(Serialize)]
struct EventSummary {
    event_number: i64,
    particles: usize,
    vertices: usize,
    final_state: usize,
    weights: Vec<f64>,
    momentum_unit: &'static str,
    length_unit: &'static str,
}

impl EventSummary {
    fn of(event: &GenEvent) -> Self {
        EventSummary {
            event_number: event.event_number,
            particles: event.particles_size(),
            vertices: event.vertices_size(),
            final_state: event
                .particles()
                .iter()
                .filter(|p| p.end_vertex().is_none())
                .count(),
            weights: event.weights.clone(),
            momentum_unit: event.momentum_unit().as_str(),
            length_unit: event.length_unit().as_str(),
        }
    }
}

/// Cmd: Show file info
fn cmd_info(input: PathBuf) -> Result<()> {
    let mut reader = open_input(&input)?;

    println!("=== {} ===", input.display());
    println!("Format: {}", reader.format().as_str());
    println!("Compression: {}", reader.compression().as_str());

    let mut events = 0u64;
    let mut particles = 0u64;
    let mut vertices = 0u64;
    while let Some(event) = reader.read()? {
        events += 1;
        particles += event.particles_size() as u64;
        vertices += event.vertices_size() as u64;
    }

    println!("Events: {}", events);
    println!("Particles: {}", particles);
    println!("Vertices: {}", vertices);

    if let Some(info) = reader.run_info() {
        println!();
        println!("Run info:");
        for tool in &info.tools {
            println!("  Tool: {}", describe_tool(tool));
        }
        println!("  Weight names: {}", join_or_dash(info.weight_names()));
        if !info.attributes().is_empty() {
            println!("  Attributes: {}", info.attributes().len());
        }
    }

    Ok(())
}

/// Cmd: Print events
fn cmd_events(input: PathBuf, limit: Option<u64>, json: bool) -> Result<()> {
    let mut reader = open_input(&input)?;

    let mut printed = 0u64;
    while let Some(event) = reader.read()? {
        if json {
            println!("{}", serde_json::to_string(&EventSummary::of(&event))?);
        } else {
            print!("{}", event.listing());
        }
        printed += 1;
        if let Some(limit) = limit {
            if printed >= limit {
                break;
            }
        }
    }

    if !json {
        println!("{} event(s)", printed);
    }

    Ok(())
}
