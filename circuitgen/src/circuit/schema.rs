//! Circuit Document Data Types
//!
//! Input descriptors and the output document in the Wokwi `diagram.json`
//! shape. Field order of the serialized document is fixed:
//! `version`, `author`, `editor`, `parts`, `connections`, `dependencies`.

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::core::{CircuitGenError, Result};

/// Reserved instance id of the microcontroller part
pub const MCU_ID: &str = "mcu";

/// A recognized component to place, as produced by the recognizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Canonical component type id (catalog key)
    #[serde(alias = "type")]
    pub type_id: String,

    /// Instance id; assigned as `comp{n}` when omitted
    #[serde(default, alias = "id", skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Human label used in build instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Attributes copied onto the placed part (e.g. LED color)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl ComponentDescriptor {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A placed component instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub id: String,

    #[serde(rename = "type")]
    pub type_id: String,

    pub top: i64,

    pub left: i64,

    pub attrs: BTreeMap<String, String>,
}

impl Part {
    pub fn new(id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_id: type_id.into(),
            top: 0,
            left: 0,
            attrs: BTreeMap::new(),
        }
    }

    pub fn at(mut self, top: i64, left: i64) -> Self {
        self.top = top;
        self.left = left;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_attrs(mut self, attrs: BTreeMap<String, String>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn pin(&self, name: impl Into<String>) -> PinRef {
        PinRef::new(self.id.clone(), name)
    }
}

/// Address of one pin on one part, rendered as `part:pin`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinRef {
    pub part: String,
    pub pin: String,
}

impl PinRef {
    pub fn new(part: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            pin: pin.into(),
        }
    }

    pub fn is_mcu(&self) -> bool {
        self.part == MCU_ID
    }
}

impl std::fmt::Display for PinRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.part, self.pin)
    }
}

impl std::str::FromStr for PinRef {
    type Err = CircuitGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((part, pin)) if !part.is_empty() && !pin.is_empty() => Ok(Self::new(part, pin)),
            _ => Err(CircuitGenError::Validation(format!(
                "'{}' is not a part:pin reference",
                s
            ))),
        }
    }
}

impl Serialize for PinRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A wire between two pins. Serialized as `[from, to, color, []]`; the last
/// element holds routing hints, which the generator leaves empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: PinRef,
    pub to: PinRef,
    pub color: Option<String>,
}

impl Connection {
    pub fn new(from: PinRef, to: PinRef) -> Self {
        Self {
            from,
            to,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn touches(&self, pin: &PinRef) -> bool {
        &self.from == pin || &self.to == pin
    }

    pub fn involves(&self, part_id: &str) -> bool {
        self.from.part == part_id || self.to.part == part_id
    }

    /// The end opposite `pin`, if `pin` is one of the ends
    pub fn other_end(&self, pin: &PinRef) -> Option<&PinRef> {
        if &self.from == pin {
            Some(&self.to)
        } else if &self.to == pin {
            Some(&self.from)
        } else {
            None
        }
    }
}

impl Serialize for Connection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let hints: [&str; 0] = [];
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.from)?;
        tuple.serialize_element(&self.to)?;
        tuple.serialize_element(&self.color)?;
        tuple.serialize_element(&hints)?;
        tuple.end()
    }
}

/// The complete circuit document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitDocument {
    pub version: u32,
    pub author: String,
    pub editor: String,
    pub parts: Vec<Part>,
    pub connections: Vec<Connection>,
    /// Reserved; always empty
    pub dependencies: BTreeMap<String, String>,
}

impl CircuitDocument {
    pub const SCHEMA_VERSION: u32 = 1;

    pub fn new(author: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            version: Self::SCHEMA_VERSION,
            author: author.into(),
            editor: editor.into(),
            parts: Vec::new(),
            connections: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }

    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Connections with at least one end on the given part
    pub fn connections_for<'a>(&'a self, part_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |c| c.involves(part_id))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One cumulative snapshot of a progressive build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressiveStep {
    /// 1-based; step 1 holds the microcontroller alone
    pub step_index: usize,
    pub circuit_document: CircuitDocument,
    pub instruction_text: String,
}
