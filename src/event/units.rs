// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Momentum and length units.
//!
//! Events carry a unit pair; rescaling between pairs is a pure multiplier
//! applied to stored four-vectors.

use serde::{Deserialize, Serialize};

/// Momentum unit of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MomentumUnit {
    /// Mega-electronvolt
    Mev,
    /// Giga-electronvolt
    Gev,
}

/// Length unit of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LengthUnit {
    /// Millimeter
    Mm,
    /// Centimeter
    Cm,
}

impl MomentumUnit {
    /// Parse a unit name as it appears in event files (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MEV" => Some(MomentumUnit::Mev),
            "GEV" => Some(MomentumUnit::Gev),
            _ => None,
        }
    }

    /// Unit name as written in event files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentumUnit::Mev => "MEV",
            MomentumUnit::Gev => "GEV",
        }
    }

    /// Multiplier that converts a value in `from` into a value in `to`.
    pub fn conversion_factor(from: MomentumUnit, to: MomentumUnit) -> f64 {
        match (from, to) {
            (MomentumUnit::Gev, MomentumUnit::Mev) => 1.0e3,
            (MomentumUnit::Mev, MomentumUnit::Gev) => 1.0e-3,
            _ => 1.0,
        }
    }
}

impl LengthUnit {
    /// Parse a unit name as it appears in event files (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MM" => Some(LengthUnit::Mm),
            "CM" => Some(LengthUnit::Cm),
            _ => None,
        }
    }

    /// Unit name as written in event files.
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "MM",
            LengthUnit::Cm => "CM",
        }
    }

    /// Multiplier that converts a value in `from` into a value in `to`.
    pub fn conversion_factor(from: LengthUnit, to: LengthUnit) -> f64 {
        match (from, to) {
            (LengthUnit::Mm, LengthUnit::Cm) => 0.1,
            (LengthUnit::Cm, LengthUnit::Mm) => 10.0,
            _ => 1.0,
        }
    }
}
