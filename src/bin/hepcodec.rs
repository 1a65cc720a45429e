// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Hepcodec CLI
//!
//! Unified command-line tool for generator event files.
//!
//! ## Usage
//!
//! ```sh
//! # Show file information
//! hepcodec inspect info events.hepmc3.gz
//!
//! # Print the first events as listings
//! hepcodec inspect events events.lhe --limit 5
//!
//! # Per-event JSON summaries
//! hepcodec inspect events events.hepmc2.bz2 --json
//!
//! # Convert formats, recompressing by suffix
//! hepcodec convert events.lhe.xz events.hepmc3.gz
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{ConvertCmd, InspectCmd};
use common::Result;

/// Hepcodec - Generator event file toolkit
///
/// Work with HepMC3, HepMC2, LHEF, and HEPEVT files through a unified
/// interface. Format auto-detection and suffix-driven compression mean
/// you rarely need to specify file types.
#[derive(Parser, Clone)]
#[command(name = "hepcodec")]
#[command(about = "Event-record toolkit for HepMC, LHEF, and HEPEVT files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect file contents (info, events)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Convert between formats and compression codecs
    Convert(ConvertCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Convert(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
