// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Les Houches event files, read side only.
//!
//! An LHE file is XML-shaped but line-oriented in practice:
//! - `<LesHouchesEvents version="...">` opens the file
//! - `<init>` ... `</init>` carries the run-level initialization block
//! - each `<event>` ... `</event>` holds one common-block record: a header
//!   line `NUP IDPRUP XWGTUP SCALUP AQEDUP AQCDUP` and `NUP` particle lines
//!   `IDUP ISTUP MOTHUP1 MOTHUP2 ICOLUP1 ICOLUP2 PUP1..PUP5 VTIMUP SPINUP`
//!
//! Mother columns are one-based index ranges into the same record, so events
//! go through the same range normalization as raw common-block input. Color
//! flow, lifetime and spin columns have no graph-side counterpart and are
//! skipped. Generator-specific lines trailing the particles (weights blocks,
//! comments) are skipped as well.

use super::{next_tok, parse_tok};
use crate::core::{HepError, Result};
use crate::event::{Attribute, GenEvent, GenRunInfo};
use crate::graph::FlatRecordBuf;
use crate::io::detection::HepFormat;
use crate::io::stream::LineStream;
use crate::io::traits::EventReader;

const FORMAT: &str = "LHEF";

/// Streaming reader for `<LesHouchesEvents>` files.
///
/// The raw `<init>` block is preserved verbatim as the `heprup` run
/// attribute so a downstream consumer can still get at beam ids and
/// process cross sections.
#[derive(Debug)]
pub struct LhefReader {
    stream: LineStream,
    run_info: GenRunInfo,
    buf: FlatRecordBuf,
    pending_event: bool,
    counter: i64,
    line: String,
}

impl LhefReader {
    /// Parse the opening tag and the `<init>` block eagerly; events
    /// stream lazily.
    pub fn new(mut stream: LineStream) -> Result<Self> {
        let mut line = String::new();
        loop {
            if !stream.read_line_into(&mut line)? {
                return Err(HepError::read_failed(FORMAT, "empty stream"));
            }
            if line.trim().is_empty() {
                continue;
            }
            if !line.contains("<LesHouchesEvents") {
                return Err(HepError::read_failed(
                    FORMAT,
                    format!("missing <LesHouchesEvents> opening tag, got '{line}'"),
                ));
            }
            break;
        }

        let mut run_info = GenRunInfo::new();
        let mut pending_event = false;
        loop {
            if !stream.read_line_into(&mut line)? {
                break;
            }
            let trimmed = line.trim();
            if trimmed.starts_with("<event") {
                pending_event = true;
                break;
            }
            if trimmed.starts_with("<init") {
                let mut raw = Vec::new();
                loop {
                    if !stream.read_line_into(&mut line)? {
                        return Err(HepError::read_failed(FORMAT, "unterminated <init> block"));
                    }
                    if line.trim().starts_with("</init") {
                        break;
                    }
                    raw.push(line.clone());
                }
                run_info.set_attribute("heprup", Attribute::Unparsed(raw.join("\n")));
            }
        }

        Ok(LhefReader {
            stream,
            run_info,
            buf: FlatRecordBuf::new(),
            pending_event,
            counter: 0,
            line: String::new(),
        })
    }

    /// Advance to the next `<event>` tag. `Ok(false)` means end of file.
    fn seek_event(&mut self) -> Result<bool> {
        if self.pending_event {
            self.pending_event = false;
            return Ok(true);
        }
        loop {
            if !self.stream.read_line_into(&mut self.line)? {
                return Ok(false);
            }
            let trimmed = self.line.trim();
            if trimmed.starts_with("<event") {
                return Ok(true);
            }
            if trimmed.starts_with("</LesHouchesEvents") {
                return Ok(false);
            }
        }
    }

    fn next_record_line(&mut self) -> Result<u64> {
        loop {
            if !self.stream.read_line_into(&mut self.line)? {
                return Err(HepError::read_failed(
                    FORMAT,
                    "stream ended inside an <event> block",
                ));
            }
            if !self.line.trim().is_empty() {
                return Ok(self.stream.line_number());
            }
        }
    }
}

impl EventReader for LhefReader {
    fn read_event(&mut self) -> Result<Option<GenEvent>> {
        if !self.seek_event()? {
            return Ok(None);
        }

        let n = self.next_record_line()?;
        let (nup, xwgtup, scalup, aqedup, aqcdup) = {
            let mut toks = self.line.split_whitespace();
            let nup: usize = parse_tok(FORMAT, n, "NUP", next_tok(FORMAT, n, "NUP", &mut toks)?)?;
            let _idprup: i64 =
                parse_tok(FORMAT, n, "IDPRUP", next_tok(FORMAT, n, "IDPRUP", &mut toks)?)?;
            let xwgtup: f64 =
                parse_tok(FORMAT, n, "XWGTUP", next_tok(FORMAT, n, "XWGTUP", &mut toks)?)?;
            let scalup: f64 =
                parse_tok(FORMAT, n, "SCALUP", next_tok(FORMAT, n, "SCALUP", &mut toks)?)?;
            let aqedup: f64 =
                parse_tok(FORMAT, n, "AQEDUP", next_tok(FORMAT, n, "AQEDUP", &mut toks)?)?;
            let aqcdup: f64 =
                parse_tok(FORMAT, n, "AQCDUP", next_tok(FORMAT, n, "AQCDUP", &mut toks)?)?;
            (nup, xwgtup, scalup, aqedup, aqcdup)
        };

        self.buf.clear();
        self.buf.event_number = self.counter;
        self.buf.reserve(nup);
        for _ in 0..nup {
            let n = self.next_record_line()?;
            let mut toks = self.line.split_whitespace();
            let idup: i32 = parse_tok(FORMAT, n, "IDUP", next_tok(FORMAT, n, "IDUP", &mut toks)?)?;
            let istup: i32 =
                parse_tok(FORMAT, n, "ISTUP", next_tok(FORMAT, n, "ISTUP", &mut toks)?)?;
            let mo1: i64 =
                parse_tok(FORMAT, n, "MOTHUP1", next_tok(FORMAT, n, "MOTHUP1", &mut toks)?)?;
            let mo2: i64 =
                parse_tok(FORMAT, n, "MOTHUP2", next_tok(FORMAT, n, "MOTHUP2", &mut toks)?)?;
            let _icolup1 = next_tok(FORMAT, n, "ICOLUP1", &mut toks)?;
            let _icolup2 = next_tok(FORMAT, n, "ICOLUP2", &mut toks)?;
            let mut pup = [0.0f64; 5];
            for (i, slot) in pup.iter_mut().enumerate() {
                let what = ["PUP1", "PUP2", "PUP3", "PUP4", "PUP5"][i];
                *slot = parse_tok(FORMAT, n, what, next_tok(FORMAT, n, what, &mut toks)?)?;
            }
            self.buf.push(istup, idup, (mo1, mo2), pup, [0.0; 4]);
        }

        // Trailing generator blocks inside <event> are ignored.
        loop {
            let n = self.next_record_line()?;
            let trimmed = self.line.trim();
            if trimmed.starts_with("</event") {
                break;
            }
            tracing::debug!(line = n, record = %trimmed, "skipping trailing event content");
        }

        let mut event = self.buf.build(true)?;
        event.weights = vec![xwgtup];
        let attrs = event.attributes_mut();
        attrs.set(0, "SCALUP", Attribute::Double(scalup));
        attrs.set(0, "AQEDUP", Attribute::Double(aqedup));
        attrs.set(0, "AQCDUP", Attribute::Double(aqcdup));
        event.set_run_info(Some(self.run_info.clone()));
        self.counter += 1;
        Ok(Some(event))
    }

    fn run_info(&self) -> Option<&GenRunInfo> {
        Some(&self.run_info)
    }

    fn format(&self) -> HepFormat {
        HepFormat::Lhef
    }
}
