//! Connection Builder
//!
//! Per-category wiring templates linking one peripheral to the
//! microcontroller. Templates only decide which pin roles are wired and in
//! what order; pin names always come from the catalog entry and the
//! allocator.
//!
//! | Category            | Order                                   |
//! |---------------------|-----------------------------------------|
//! | Output, Actuator    | signal (through passive), power, ground |
//! | Input               | signal, power, ground                   |
//! | Sensor              | signal, bus, power, ground              |
//! | Display             | bus, signal, power, ground              |
//! | Passive             | both terminals to signal pins           |

use crate::catalog::{BusLine, CatalogEntry, Category, PinRole, PinSpec, SignalKind};
use crate::circuit::schema::{Connection, Part, PinRef, MCU_ID};
use crate::core::{CircuitGenError, Result};
use crate::engine::layout::Position;
use crate::engine::AssemblyContext;

pub const POWER_WIRE_COLOR: &str = "red";
pub const GROUND_WIRE_COLOR: &str = "black";

/// A peripheral pin as shown in instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinLabel {
    pub name: String,
    pub label: Option<String>,
}

impl From<&PinSpec> for PinLabel {
    fn from(spec: &PinSpec) -> Self {
        Self {
            name: spec.name.clone(),
            label: spec.label.clone(),
        }
    }
}

/// A passive placed in series on a signal line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPassive {
    pub id: String,
    pub name: String,
    /// Value with unit, e.g. "220 Ω"
    pub value: String,
    pub terminal_a: String,
    pub terminal_b: String,
}

/// One wiring decision, recorded for build instructions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringAction {
    Signal {
        mcu_pin: String,
        pin: PinLabel,
        kind: SignalKind,
        color: String,
        passive: Option<SeriesPassive>,
    },
    Bus {
        mcu_pin: String,
        pin: PinLabel,
        line: BusLine,
        color: String,
    },
    Power {
        mcu_pin: String,
        pin: PinLabel,
    },
    Ground {
        mcu_pin: String,
        pin: PinLabel,
    },
}

/// Everything one peripheral adds to the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wiring {
    /// Synthesized passives
    pub parts: Vec<Part>,
    pub connections: Vec<Connection>,
    pub actions: Vec<WiringAction>,
}

pub struct ConnectionBuilder<'a, 'c> {
    ctx: &'a mut AssemblyContext<'c>,
    entry: &'c CatalogEntry,
    part_id: &'a str,
    anchor: Position,
    wiring: Wiring,
}

impl<'a, 'c> ConnectionBuilder<'a, 'c> {
    /// Wire `part` (an instance of `entry`) to the microcontroller.
    pub fn build(
        ctx: &'a mut AssemblyContext<'c>,
        part: &'a Part,
        entry: &'c CatalogEntry,
    ) -> Result<Wiring> {
        let mut builder = Self {
            ctx,
            entry,
            part_id: &part.id,
            anchor: Position::new(part.top, part.left),
            wiring: Wiring::default(),
        };

        match entry.category {
            Category::Output | Category::Actuator => {
                builder.wire_signals(true)?;
                builder.wire_power()?;
                builder.wire_ground()?;
            }
            Category::Input => {
                builder.wire_signals(false)?;
                builder.wire_power()?;
                builder.wire_ground()?;
            }
            Category::Sensor => {
                builder.wire_signals(false)?;
                builder.wire_bus()?;
                builder.wire_power()?;
                builder.wire_ground()?;
            }
            Category::Display => {
                builder.wire_bus()?;
                builder.wire_signals(false)?;
                builder.wire_power()?;
                builder.wire_ground()?;
            }
            Category::Passive => {
                builder.wire_signals(false)?;
            }
            Category::Microcontroller => {
                return Err(CircuitGenError::Validation(format!(
                    "'{}' ({}) is a second microcontroller; a circuit holds exactly one",
                    part.id, entry.type_id
                )));
            }
        }

        Ok(builder.wiring)
    }

    fn peripheral_pin(&self, spec: &PinSpec) -> PinRef {
        PinRef::new(self.part_id, &spec.name)
    }

    fn wire_signals(&mut self, allow_passive: bool) -> Result<()> {
        let entry = self.entry;
        for spec in &entry.pins {
            let PinRole::Signal(kind) = spec.role else {
                continue;
            };
            let mcu_pin = self.ctx.allocator.allocate_signal(kind)?;
            let driving = PinRef::new(MCU_ID, mcu_pin);
            let target = self.peripheral_pin(spec);
            let color = entry.wire_color.as_str();

            let passive = if allow_passive {
                let insertion =
                    self.ctx
                        .passives
                        .maybe_insert(entry, driving, target, color, self.anchor)?;
                let series = match (&insertion.part, insertion.terminals()) {
                    (Some(part), Some((a, b))) => Some(SeriesPassive {
                        id: part.id.clone(),
                        name: self
                            .ctx
                            .catalog
                            .get(&part.type_id)
                            .map(|p| p.name.clone())
                            .unwrap_or_else(|| part.type_id.clone()),
                        value: entry
                            .requires_passive
                            .as_ref()
                            .map(|r| r.display())
                            .unwrap_or_default(),
                        terminal_a: a.to_string(),
                        terminal_b: b.to_string(),
                    }),
                    _ => None,
                };
                self.wiring.connections.extend(insertion.connections);
                self.wiring.parts.extend(insertion.part);
                series
            } else {
                self.wiring
                    .connections
                    .push(Connection::new(driving, target).with_color(color));
                None
            };

            self.wiring.actions.push(WiringAction::Signal {
                mcu_pin: mcu_pin.to_string(),
                pin: spec.into(),
                kind,
                color: color.to_string(),
                passive,
            });
        }
        Ok(())
    }

    fn wire_bus(&mut self) -> Result<()> {
        let entry = self.entry;
        for spec in &entry.pins {
            let PinRole::Bus(line) = spec.role else {
                continue;
            };
            let mcu_pin = self.ctx.allocator.bus_pin(line)?;
            self.wiring.connections.push(
                Connection::new(PinRef::new(MCU_ID, mcu_pin), self.peripheral_pin(spec))
                    .with_color(line.wire_color()),
            );
            self.wiring.actions.push(WiringAction::Bus {
                mcu_pin: mcu_pin.to_string(),
                pin: spec.into(),
                line,
                color: line.wire_color().to_string(),
            });
        }
        Ok(())
    }

    fn wire_power(&mut self) -> Result<()> {
        let entry = self.entry;
        for spec in &entry.pins {
            let PinRole::Power(supply) = spec.role else {
                continue;
            };
            let mcu_pin = self.ctx.allocator.power_rail(supply)?;
            self.wiring.connections.push(
                Connection::new(PinRef::new(MCU_ID, mcu_pin), self.peripheral_pin(spec))
                    .with_color(POWER_WIRE_COLOR),
            );
            self.wiring.actions.push(WiringAction::Power {
                mcu_pin: mcu_pin.to_string(),
                pin: spec.into(),
            });
        }
        Ok(())
    }

    fn wire_ground(&mut self) -> Result<()> {
        let entry = self.entry;
        for spec in entry.pins_with_role(PinRole::Ground) {
            let mcu_pin = self.ctx.allocator.allocate_ground()?;
            self.wiring.connections.push(
                Connection::new(PinRef::new(MCU_ID, mcu_pin), self.peripheral_pin(spec))
                    .with_color(GROUND_WIRE_COLOR),
            );
            self.wiring.actions.push(WiringAction::Ground {
                mcu_pin: mcu_pin.to_string(),
                pin: spec.into(),
            });
        }
        Ok(())
    }
}
