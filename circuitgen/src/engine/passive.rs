//! Passive Inserter
//!
//! Places the passive a catalog entry asks for (e.g. the current-limiting
//! resistor of an LED) in series between the driving microcontroller pin and
//! the peripheral pin. Terminal A/B are the passive's first and second
//! declared pins, so the wiring direction never depends on the caller.

use std::collections::BTreeMap;

use crate::catalog::{Catalog, CatalogEntry};
use crate::circuit::schema::{Connection, Part, PinRef};
use crate::core::{CircuitGenError, Result};
use crate::engine::layout::{self, Position};

/// Result of one insertion attempt
#[derive(Debug, Clone, PartialEq)]
pub struct PassiveInsertion {
    /// The synthesized passive, if one was required
    pub part: Option<Part>,
    /// One direct connection, or two series connections
    pub connections: Vec<Connection>,
}

impl PassiveInsertion {
    pub fn passive_id(&self) -> Option<&str> {
        self.part.as_ref().map(|p| p.id.as_str())
    }

    /// Passive terminals facing the driver and the peripheral, in that order
    pub fn terminals(&self) -> Option<(&str, &str)> {
        self.part.as_ref()?;
        match self.connections.as_slice() {
            [into, out] => Some((into.to.pin.as_str(), out.from.pin.as_str())),
            _ => None,
        }
    }
}

/// Per-generation passive factory with its own id counters
#[derive(Debug)]
pub struct PassiveInserter<'c> {
    catalog: &'c Catalog,
    counters: BTreeMap<String, usize>,
}

impl<'c> PassiveInserter<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            counters: BTreeMap::new(),
        }
    }

    /// Connect `driving` to `target`, through a passive when `peripheral`
    /// requires one on `target`'s pin.
    pub fn maybe_insert(
        &mut self,
        peripheral: &CatalogEntry,
        driving: PinRef,
        target: PinRef,
        color: &str,
        anchor: Position,
    ) -> Result<PassiveInsertion> {
        let requirement = peripheral
            .requires_passive
            .as_ref()
            .filter(|req| req.pin == target.pin);

        let Some(requirement) = requirement else {
            return Ok(PassiveInsertion {
                part: None,
                connections: vec![Connection::new(driving, target).with_color(color)],
            });
        };

        let catalog: &'c Catalog = self.catalog;
        let passive = catalog.lookup(&requirement.type_id)?;
        let mut terminals = passive.wired_pins();
        let (Some(terminal_a), Some(terminal_b)) = (terminals.next(), terminals.next()) else {
            return Err(CircuitGenError::AssemblyInvariantViolation(format!(
                "passive type '{}' declares fewer than two terminals",
                passive.type_id
            )));
        };
        let (terminal_a, terminal_b) = (terminal_a.name.as_str(), terminal_b.name.as_str());

        let id = self.next_id(passive);
        let position = layout::passive_position(anchor);
        let part = Part::new(id, &passive.type_id)
            .at(position.top, position.left)
            .with_attr("value", requirement.value_attr());

        tracing::debug!(
            passive = %part.id,
            value = %requirement.display(),
            peripheral = %target.part,
            "inserted series passive"
        );

        let connections = vec![
            Connection::new(driving, part.pin(terminal_a)).with_color(color),
            Connection::new(part.pin(terminal_b), target).with_color(color),
        ];

        Ok(PassiveInsertion {
            part: Some(part),
            connections,
        })
    }

    fn next_id(&mut self, passive: &CatalogEntry) -> String {
        let prefix = passive.passive_id_prefix();
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}", prefix, counter)
    }

    /// Number of passives synthesized so far
    pub fn inserted(&self) -> usize {
        self.counters.values().sum()
    }
}
