// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Event attribute storage.
//!
//! Attributes arrive from files as raw strings and stay raw until a caller
//! asks for a typed value. The [`Attribute`] enum makes that state explicit:
//! a slot is either `Unparsed` or holds exactly one parsed payload, and the
//! transition runs one way. Slots are grouped per owner (id `0` is the
//! event, positive ids are particles, negative ids are vertices) and
//! surfaced through the dict-like [`AttributesView`].

use crate::core::{HepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Target type of an attribute coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Bool,
    Int,
    Double,
    String,
    VecInt,
    VecDouble,
    VecString,
}

impl AttributeKind {
    /// Kind name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Bool => "Bool",
            AttributeKind::Int => "Int",
            AttributeKind::Double => "Double",
            AttributeKind::String => "String",
            AttributeKind::VecInt => "VecInt",
            AttributeKind::VecDouble => "VecDouble",
            AttributeKind::VecString => "VecString",
        }
    }
}

/// One attribute slot.
///
/// `Unparsed` holds the raw serialized payload exactly as read from a file.
/// All other variants are parsed payloads. Equality is structural; the
/// containers below compare by serialized payload instead, so a round trip
/// through a file does not disturb event equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// Raw payload, not yet coerced to a typed variant
    Unparsed(String),

    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),

    VecInt(Vec<i64>),
    VecDouble(Vec<f64>),
    VecString(Vec<String>),
}

impl Attribute {
    /// Kind of the parsed payload, or `None` while unparsed.
    pub fn kind(&self) -> Option<AttributeKind> {
        match self {
            Attribute::Unparsed(_) => None,
            Attribute::Bool(_) => Some(AttributeKind::Bool),
            Attribute::Int(_) => Some(AttributeKind::Int),
            Attribute::Double(_) => Some(AttributeKind::Double),
            Attribute::String(_) => Some(AttributeKind::String),
            Attribute::VecInt(_) => Some(AttributeKind::VecInt),
            Attribute::VecDouble(_) => Some(AttributeKind::VecDouble),
            Attribute::VecString(_) => Some(AttributeKind::VecString),
        }
    }

    /// Variant name, including `Unparsed`.
    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            None => "Unparsed",
            Some(kind) => kind.as_str(),
        }
    }

    /// Check if this slot still holds the raw payload.
    pub fn is_unparsed(&self) -> bool {
        matches!(self, Attribute::Unparsed(_))
    }

    /// Serialized payload as written to event files.
    pub fn to_serialized(&self) -> String {
        match self {
            Attribute::Unparsed(raw) => raw.clone(),
            Attribute::Bool(v) => if *v { "1" } else { "0" }.to_string(),
            Attribute::Int(v) => v.to_string(),
            Attribute::Double(v) => v.to_string(),
            Attribute::String(v) => v.clone(),
            Attribute::VecInt(v) => join_tokens(v.iter()),
            Attribute::VecDouble(v) => join_tokens(v.iter()),
            Attribute::VecString(v) => v.join(" "),
        }
    }

    /// Parse a serialized payload into the requested kind.
    ///
    /// Pure helper; the error is the bare cause text, to be wrapped with
    /// attribute context by the caller.
    pub fn from_serialized(kind: AttributeKind, raw: &str) -> std::result::Result<Self, String> {
        match kind {
            AttributeKind::Bool => match raw.trim() {
                "1" | "true" => Ok(Attribute::Bool(true)),
                "0" | "false" => Ok(Attribute::Bool(false)),
                other => Err(format!("expected boolean, got '{other}'")),
            },
            AttributeKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(Attribute::Int)
                .map_err(|e| e.to_string()),
            AttributeKind::Double => raw
                .trim()
                .parse::<f64>()
                .map(Attribute::Double)
                .map_err(|e| e.to_string()),
            AttributeKind::String => Ok(Attribute::String(raw.to_string())),
            AttributeKind::VecInt => raw
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<i64>()
                        .map_err(|e| format!("bad integer '{tok}': {e}"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Attribute::VecInt),
            AttributeKind::VecDouble => raw
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>()
                        .map_err(|e| format!("bad float '{tok}': {e}"))
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Attribute::VecDouble),
            AttributeKind::VecString => Ok(Attribute::VecString(
                raw.split_whitespace().map(str::to_string).collect(),
            )),
        }
    }

    /// Coerce this slot to `kind`, in place.
    ///
    /// `Unparsed` parses and becomes the typed variant; a slot already
    /// holding `kind` is left alone; any other parsed kind is refused. On a
    /// parse failure the slot is untouched. `name` is error context only.
    pub fn coerce(&mut self, name: &str, kind: AttributeKind) -> Result<()> {
        match self {
            Attribute::Unparsed(raw) => {
                let parsed = Attribute::from_serialized(kind, raw)
                    .map_err(|cause| HepError::unparsable_attribute(name, kind.as_str(), cause))?;
                *self = parsed;
                Ok(())
            }
            other => {
                if other.kind() == Some(kind) {
                    Ok(())
                } else {
                    Err(HepError::already_converted(
                        name,
                        other.kind_name(),
                        kind.as_str(),
                    ))
                }
            }
        }
    }
}

fn join_tokens<T: fmt::Display>(values: impl Iterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, v) in values.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// Attribute container of one event, grouped by owner id.
///
/// Owner `0` is the event itself, positive ids are particle ids, negative
/// ids are vertex ids. Names sort lexicographically within an owner.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    slots: BTreeMap<i32, BTreeMap<String, Attribute>>,
}

impl Attributes {
    /// Create an empty container.
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Look up one attribute.
    pub fn get(&self, owner: i32, name: &str) -> Option<&Attribute> {
        self.slots.get(&owner).and_then(|m| m.get(name))
    }

    /// Insert or overwrite one attribute. Last write wins.
    pub fn set(&mut self, owner: i32, name: impl Into<String>, attr: Attribute) {
        self.slots.entry(owner).or_default().insert(name.into(), attr);
    }

    /// Remove one attribute, returning it if present.
    pub fn remove(&mut self, owner: i32, name: &str) -> Option<Attribute> {
        let map = self.slots.get_mut(&owner)?;
        let removed = map.remove(name);
        if map.is_empty() {
            self.slots.remove(&owner);
        }
        removed
    }

    /// Total number of attributes across all owners.
    pub fn len(&self) -> usize {
        self.slots.values().map(BTreeMap::len).sum()
    }

    /// Check if no owner has any attribute.
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(BTreeMap::is_empty)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Iterate `(owner, name, attribute)` in owner order, then name order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str, &Attribute)> {
        self.slots.iter().flat_map(|(owner, map)| {
            map.iter().map(move |(name, attr)| (*owner, name.as_str(), attr))
        })
    }

    /// Dict-like view over one owner's attributes.
    pub fn view(&mut self, owner: i32) -> AttributesView<'_> {
        AttributesView { owner, attrs: self }
    }
}

impl PartialEq for Attributes {
    /// Payload equality: an `Unparsed("1")` slot equals an `Int(1)` slot,
    /// so reading an event back from a file does not disturb equality.
    fn eq(&self, other: &Self) -> bool {
        let mut lhs = self.iter().map(|(o, n, a)| (o, n, a.to_serialized()));
        let mut rhs = other.iter().map(|(o, n, a)| (o, n, a.to_serialized()));
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => continue,
                _ => return false,
            }
        }
    }
}

/// Dict-like facade over one owner's attribute slots.
///
/// Keys iterate in sorted order and the `Display` form is deterministic.
pub struct AttributesView<'a> {
    owner: i32,
    attrs: &'a mut Attributes,
}

impl AttributesView<'_> {
    /// Owner id this view projects.
    pub fn owner(&self) -> i32 {
        self.owner
    }

    /// Look up one attribute.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attrs.get(self.owner, name)
    }

    /// Insert or overwrite one attribute. Last write wins.
    pub fn set(&mut self, name: impl Into<String>, attr: Attribute) {
        self.attrs.set(self.owner, name, attr);
    }

    /// Remove one attribute, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.attrs.remove(self.owner, name)
    }

    /// Number of attributes on this owner.
    pub fn len(&self) -> usize {
        self.attrs.slots.get(&self.owner).map_or(0, BTreeMap::len)
    }

    /// Check if this owner has no attributes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attribute names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.attrs
            .slots
            .get(&self.owner)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Remove every attribute of this owner.
    pub fn clear(&mut self) {
        self.attrs.slots.remove(&self.owner);
    }

    /// Coerce the named slot to `kind` per [`Attribute::coerce`], then
    /// return the (now typed) slot.
    pub fn coerce(&mut self, name: &str, kind: AttributeKind) -> Result<&Attribute> {
        let slot = self
            .attrs
            .slots
            .get_mut(&self.owner)
            .and_then(|m| m.get_mut(name))
            .ok_or_else(|| HepError::Other(format!("no attribute named '{name}'")))?;
        slot.coerce(name, kind)?;
        Ok(&*slot)
    }
}

impl PartialEq<BTreeMap<String, Attribute>> for AttributesView<'_> {
    fn eq(&self, other: &BTreeMap<String, Attribute>) -> bool {
        match self.attrs.slots.get(&self.owner) {
            Some(map) => map == other,
            None => other.is_empty(),
        }
    }
}

impl fmt::Display for AttributesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        if let Some(map) = self.attrs.slots.get(&self.owner) {
            for (i, (name, attr)) in map.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", name, attr.to_serialized())?;
            }
        }
        write!(f, "}}")
    }
}
