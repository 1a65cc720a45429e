// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use hepcodec::io::open::{open, HepFile};
use hepcodec::ToolInfo;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Open a file for reading with automatic format detection.
pub fn open_input(path: &Path) -> Result<HepFile> {
    Ok(open(path, "r")?)
}

/// One display line for a generator tool.
pub fn describe_tool(tool: &ToolInfo) -> String {
    let mut line = tool.name.clone();
    if !tool.version.is_empty() {
        line.push(' ');
        line.push_str(&tool.version);
    }
    if !tool.description.is_empty() {
        line.push_str(&format!(" ({})", tool.description));
    }
    line
}

/// Comma-joined list, or a placeholder when empty.
pub fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
