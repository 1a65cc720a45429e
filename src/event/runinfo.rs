// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Run-level metadata shared by all events of a file.

use super::attributes::Attribute;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One generator tool that touched the run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl ToolInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ToolInfo {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// Run-level metadata: tools, weight names, and named attributes.
///
/// Formats that carry no run block (HEPEVT) drop this wholesale; the legacy
/// listing keeps weight names but loses tools.
#[derive(Debug, Clone, Default)]
pub struct GenRunInfo {
    pub tools: Vec<ToolInfo>,
    weight_names: Vec<String>,
    attributes: BTreeMap<String, Attribute>,
}

impl GenRunInfo {
    /// Create empty run metadata.
    pub fn new() -> Self {
        GenRunInfo::default()
    }

    /// Names of the event weights, in weight order.
    pub fn weight_names(&self) -> &[String] {
        &self.weight_names
    }

    /// Replace the weight names.
    pub fn set_weight_names(&mut self, names: Vec<String>) {
        self.weight_names = names;
    }

    /// Position of a named weight, if declared.
    pub fn weight_index(&self, name: &str) -> Option<usize> {
        self.weight_names.iter().position(|n| n == name)
    }

    /// Look up a run attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Mutable access to a run attribute.
    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.get_mut(name)
    }

    /// Insert or overwrite a run attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, attr: Attribute) {
        self.attributes.insert(name.into(), attr);
    }

    /// All run attributes, sorted by name.
    pub fn attributes(&self) -> &BTreeMap<String, Attribute> {
        &self.attributes
    }
}

impl PartialEq for GenRunInfo {
    /// Attributes compare by serialized payload, so file round trips do not
    /// disturb equality.
    fn eq(&self, other: &Self) -> bool {
        if self.tools != other.tools || self.weight_names != other.weight_names {
            return false;
        }
        if self.attributes.len() != other.attributes.len() {
            return false;
        }
        self.attributes.iter().zip(other.attributes.iter()).all(
            |((name_a, attr_a), (name_b, attr_b))| {
                name_a == name_b && attr_a.to_serialized() == attr_b.to_serialized()
            },
        )
    }
}
