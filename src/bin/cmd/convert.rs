// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - copy events between formats and compression codecs.

use std::path::PathBuf;

use clap::Args;

use crate::common::{open_input, Result};
use hepcodec::OpenOptions;

/// Convert between formats. Compression on both sides follows the
/// filename suffixes.
#[derive(Args, Clone, Debug)]
pub struct ConvertCmd {
    /// Input file (any supported format, optionally compressed)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file; suffix selects compression
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format: hepmc3 (default), hepmc2, or hepevt
    #[arg(short, long)]
    format: Option<String>,

    /// Column width for floating-point fields, where the format allows it
    #[arg(short, long)]
    precision: Option<usize>,

    /// Stop after this many events
    #[arg(short, long)]
    limit: Option<u64>,
}

impl ConvertCmd {
    pub fn run(self) -> Result<()> {
        cmd_convert(self)
    }
}

/// Copy events from input to output.
fn cmd_convert(args: ConvertCmd) -> Result<()> {
    println!("Converting:");
    println!("  Input:  {}", args.input.display());
    println!("  Output: {}", args.output.display());

    let mut reader = open_input(&args.input)?;

    let mut options = OpenOptions::new().with_mode("w");
    if let Some(name) = &args.format {
        options = options.with_format_name(name);
    }
    if let Some(digits) = args.precision {
        options = options.with_precision(digits);
    }
    let mut writer = options.open(&args.output)?;

    println!("  From: {}", reader.format().as_str());
    println!("  To:   {}", writer.format().as_str());

    let mut copied = 0u64;
    while let Some(event) = reader.read()? {
        writer.write(&event)?;
        copied += 1;
        if let Some(limit) = args.limit {
            if copied >= limit {
                break;
            }
        }
    }
    writer.close()?;

    println!("  Events copied: {}", copied);
    Ok(())
}
