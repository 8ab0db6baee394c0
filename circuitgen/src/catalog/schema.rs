//! Component Catalog Schema
//!
//! Data structures for catalog rows: the category of a component, its
//! declared pins with their electrical role, and the passive part it needs
//! in series (if any). Rows are deserialized from the embedded JSON tables.

use serde::{Deserialize, Serialize};

/// Functional category of a component. The connection builder dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Microcontroller,
    Output,
    Input,
    Display,
    Sensor,
    Actuator,
    Passive,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Microcontroller => write!(f, "Microcontroller"),
            Category::Output => write!(f, "Output"),
            Category::Input => write!(f, "Input"),
            Category::Display => write!(f, "Display"),
            Category::Sensor => write!(f, "Sensor"),
            Category::Actuator => write!(f, "Actuator"),
            Category::Passive => write!(f, "Passive"),
        }
    }
}

impl Category {
    /// Whether the connection template for this category wires pins of `role`
    pub fn wires(&self, role: PinRole) -> bool {
        match (self, role) {
            (_, PinRole::NoConnect) => false,
            (Category::Microcontroller | Category::Sensor | Category::Display, _) => true,
            (Category::Output | Category::Actuator | Category::Input, PinRole::Bus(_)) => false,
            (Category::Output | Category::Actuator | Category::Input, _) => true,
            (Category::Passive, role) => matches!(role, PinRole::Signal(_)),
        }
    }

    /// Output and actuator templates route signals through a series passive.
    pub fn takes_series_passive(&self) -> bool {
        matches!(self, Category::Output | Category::Actuator)
    }
}

/// Supply voltage of a power pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supply {
    #[serde(rename = "5v")]
    FiveVolt,
    #[serde(rename = "3v3")]
    ThreeVolt,
}

impl std::fmt::Display for Supply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Supply::FiveVolt => write!(f, "5 V"),
            Supply::ThreeVolt => write!(f, "3.3 V"),
        }
    }
}

/// Kind of a general-purpose signal pin. Each kind is a separate allocation pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Digital,
    Analog,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Digital => write!(f, "digital"),
            SignalKind::Analog => write!(f, "analog"),
        }
    }
}

/// A shared bus line (I2C or SPI). Bus pins are fixed on the microcontroller
/// and shared by every device on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusLine {
    Sda,
    Scl,
    Sck,
    Mosi,
    Miso,
}

impl BusLine {
    /// Conventional wire color for the line.
    pub fn wire_color(&self) -> &'static str {
        match self {
            BusLine::Sda => "gold",
            BusLine::Scl => "cyan",
            BusLine::Sck => "gray",
            BusLine::Mosi => "green",
            BusLine::Miso => "orange",
        }
    }
}

impl std::fmt::Display for BusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusLine::Sda => write!(f, "SDA"),
            BusLine::Scl => write!(f, "SCL"),
            BusLine::Sck => write!(f, "SCK"),
            BusLine::Mosi => write!(f, "MOSI"),
            BusLine::Miso => write!(f, "MISO"),
        }
    }
}

/// Electrical role of a declared pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinRole {
    Power(Supply),
    Ground,
    Signal(SignalKind),
    Bus(BusLine),
    /// Declared by the part but never wired.
    NoConnect,
}

impl PinRole {
    pub fn is_wired(&self) -> bool {
        !matches!(self, PinRole::NoConnect)
    }
}

/// A named pin of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSpec {
    /// Pin name as the simulator knows it (e.g. "A", "GND.1", "1.l")
    pub name: String,

    pub role: PinRole,

    /// Human-readable description used in build instructions (e.g. "anode")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A passive that must sit in series with one of the component's pins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveRequirement {
    /// Catalog type id of the passive (e.g. "wokwi-resistor")
    pub type_id: String,

    pub value: f64,

    /// Unit of `value` (e.g. "ohm")
    pub unit: String,

    /// The peripheral's driven terminal the passive attaches to
    pub pin: String,
}

impl PassiveRequirement {
    /// Value as stored in the part's `value` attribute ("220", "4.7").
    pub fn value_attr(&self) -> String {
        self.value.to_string()
    }

    /// Value with unit symbol for humans ("220 Ω").
    pub fn display(&self) -> String {
        match self.unit.as_str() {
            "ohm" | "ohms" => format!("{} Ω", self.value_attr()),
            "farad" => format!("{} F", self.value_attr()),
            other => format!("{} {}", self.value_attr(), other),
        }
    }
}

/// Id prefix of synthesized passives whose entry declares none
pub const FALLBACK_PASSIVE_PREFIX: &str = "p";

fn default_wire_color() -> String {
    "green".to_string()
}

/// One row of the component catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical component type id (unique key)
    pub type_id: String,

    /// Display name
    pub name: String,

    pub category: Category,

    /// Declared pins in catalog order
    pub pins: Vec<PinSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_passive: Option<PassiveRequirement>,

    /// Wire color for this component's signal connections
    #[serde(default = "default_wire_color")]
    pub wire_color: String,

    /// Prefix of synthesized instance ids (passives only, e.g. "r" -> "r1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_prefix: Option<String>,
}

impl CatalogEntry {
    pub fn is_microcontroller(&self) -> bool {
        self.category == Category::Microcontroller
    }

    pub fn pin(&self, name: &str) -> Option<&PinSpec> {
        self.pins.iter().find(|p| p.name == name)
    }

    pub fn declares_pin(&self, name: &str) -> bool {
        self.pin(name).is_some()
    }

    /// Prefix of instance ids synthesized for this passive
    pub fn passive_id_prefix(&self) -> &str {
        self.id_prefix.as_deref().unwrap_or(FALLBACK_PASSIVE_PREFIX)
    }

    /// Why the connection template for this row's category could not wire it.
    pub fn wiring_problem(&self) -> Option<String> {
        let unwired = self
            .pins
            .iter()
            .find(|p| p.role.is_wired() && !self.category.wires(p.role));
        if let Some(spec) = unwired {
            return Some(format!(
                "pin {} has a role the {} template never wires",
                spec.name, self.category
            ));
        }

        let req = self.requires_passive.as_ref()?;
        if !self.category.takes_series_passive() {
            return Some(format!(
                "{} components cannot take a series {}",
                self.category, req.type_id
            ));
        }
        match self.pin(&req.pin).map(|p| p.role) {
            Some(PinRole::Signal(_)) => None,
            Some(_) => Some(format!("series passive pin {} is not a signal pin", req.pin)),
            None => Some(format!("series passive pin {} is not declared", req.pin)),
        }
    }

    /// Pins with exactly the given role, in declaration order
    pub fn pins_with_role(&self, role: PinRole) -> impl Iterator<Item = &PinSpec> {
        self.pins.iter().filter(move |p| p.role == role)
    }

    /// Pins that take part in wiring (everything except `no_connect`)
    pub fn wired_pins(&self) -> impl Iterator<Item = &PinSpec> {
        self.pins.iter().filter(|p| p.role.is_wired())
    }

    pub fn ground_pins(&self) -> Vec<&str> {
        self.pins_with_role(PinRole::Ground)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn signal_pins(&self, kind: SignalKind) -> Vec<&str> {
        self.pins_with_role(PinRole::Signal(kind))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// The power pin for a supply, if declared
    pub fn power_pin(&self, supply: Supply) -> Option<&str> {
        self.pins_with_role(PinRole::Power(supply))
            .next()
            .map(|p| p.name.as_str())
    }

    /// First declared power pin of any supply
    pub fn first_power_pin(&self) -> Option<&str> {
        self.pins
            .iter()
            .find(|p| matches!(p.role, PinRole::Power(_)))
            .map(|p| p.name.as_str())
    }

    pub fn bus_pin(&self, line: BusLine) -> Option<&str> {
        self.pins_with_role(PinRole::Bus(line))
            .next()
            .map(|p| p.name.as_str())
    }
}
