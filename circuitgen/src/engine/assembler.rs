//! Assembler
//!
//! Turns an ordered descriptor list into one circuit document:
//!
//! 1. Resolve descriptors against the catalog (one microcontroller, unique
//!    instance ids, defaults applied).
//! 2. Place the microcontroller first, then each peripheral in input order,
//!    wiring it with the connection builder.
//! 3. Check the finished document before handing it out.
//!
//! A fresh [`AssemblyContext`] is created per call, so pin allocation and
//! passive ids never leak between documents.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::{Catalog, CatalogEntry, Category};
use crate::circuit::netlist::Netlist;
use crate::circuit::schema::{
    CircuitDocument, ComponentDescriptor, Connection, Part, PinRef, MCU_ID,
};
use crate::core::{CircuitGenError, GenerationOptions, Result};
use crate::engine::layout::{self, MCU_POSITION};
use crate::engine::wiring::{ConnectionBuilder, WiringAction};
use crate::engine::AssemblyContext;

/// A descriptor after validation and id assignment
#[derive(Debug, Clone)]
pub struct ResolvedComponent<'c> {
    pub instance_id: String,
    pub entry: &'c CatalogEntry,
    pub label: Option<String>,
    pub attrs: BTreeMap<String, String>,
}

/// Validated input: the microcontroller plus peripherals in input order
#[derive(Debug, Clone)]
pub struct ResolvedPlan<'c> {
    pub mcu: ResolvedComponent<'c>,
    pub peripherals: Vec<ResolvedComponent<'c>>,
}

/// What was placed for one component, used to write instructions
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub instance_id: String,
    pub type_id: String,
    pub name: String,
    pub category: Category,
    pub label: Option<String>,
    pub actions: Vec<WiringAction>,
}

impl PlacementRecord {
    fn new(component: &ResolvedComponent<'_>, actions: Vec<WiringAction>) -> Self {
        Self {
            instance_id: component.instance_id.clone(),
            type_id: component.entry.type_id.clone(),
            name: component.entry.name.clone(),
            category: component.entry.category,
            label: component.label.clone(),
            actions,
        }
    }
}

/// A document together with its placement log
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: CircuitDocument,
    /// Microcontroller first, then peripherals in placement order
    pub placements: Vec<PlacementRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    catalog: &'a Catalog,
    options: &'a GenerationOptions,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a Catalog, options: &'a GenerationOptions) -> Self {
        Self { catalog, options }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Assemble the complete document for `descriptors`.
    pub fn assemble(&self, descriptors: &[ComponentDescriptor]) -> Result<CircuitDocument> {
        Ok(self.assemble_with_placements(descriptors)?.document)
    }

    /// Like [`Assembler::assemble`], keeping the placement log.
    pub fn assemble_with_placements(
        &self,
        descriptors: &[ComponentDescriptor],
    ) -> Result<Assembly> {
        let plan = self.resolve(descriptors)?;
        self.assemble_plan(&plan, plan.peripherals.len())
    }

    /// Validate descriptors and assign instance ids.
    pub fn resolve(&self, descriptors: &[ComponentDescriptor]) -> Result<ResolvedPlan<'a>> {
        if descriptors.is_empty() {
            return Err(CircuitGenError::Validation(
                "component list is empty".to_string(),
            ));
        }

        let catalog: &'a Catalog = self.catalog;
        let reserved = catalog.passive_id_prefixes();
        let mut mcu: Option<ResolvedComponent<'a>> = None;
        let mut peripherals: Vec<ResolvedComponent<'a>> = Vec::new();

        for descriptor in descriptors {
            if descriptor.type_id.trim().is_empty() {
                return Err(CircuitGenError::Validation(
                    "component descriptor has an empty type id".to_string(),
                ));
            }
            let entry = catalog.lookup(&descriptor.type_id)?;

            if entry.is_microcontroller() {
                if let Some(existing) = &mcu {
                    return Err(CircuitGenError::Validation(format!(
                        "more than one microcontroller: '{}' and '{}'",
                        existing.entry.type_id, entry.type_id
                    )));
                }
                if let Some(id) = descriptor.instance_id.as_deref() {
                    if id != MCU_ID {
                        return Err(CircuitGenError::Validation(format!(
                            "microcontroller id must be '{}', got '{}'",
                            MCU_ID, id
                        )));
                    }
                }
                mcu = Some(ResolvedComponent {
                    instance_id: MCU_ID.to_string(),
                    entry,
                    label: descriptor.label.clone(),
                    attrs: descriptor.attrs.clone(),
                });
                continue;
            }

            let instance_id = match descriptor.instance_id.as_deref() {
                Some(id) => {
                    validate_instance_id(id, &reserved)?;
                    id.to_string()
                }
                None => format!("comp{}", peripherals.len() + 1),
            };
            peripherals.push(ResolvedComponent {
                instance_id,
                entry,
                label: descriptor.label.clone(),
                attrs: descriptor.attrs.clone(),
            });
        }

        let mcu = match mcu {
            Some(mcu) => mcu,
            None => {
                let entry = catalog.lookup(&self.options.default_microcontroller)?;
                if !entry.is_microcontroller() {
                    return Err(CircuitGenError::Validation(format!(
                        "default microcontroller '{}' is a {}",
                        entry.type_id, entry.category
                    )));
                }
                tracing::debug!(type_id = %entry.type_id, "no microcontroller given, using default");
                ResolvedComponent {
                    instance_id: MCU_ID.to_string(),
                    entry,
                    label: None,
                    attrs: BTreeMap::new(),
                }
            }
        };

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(MCU_ID);
        for component in &peripherals {
            if !seen.insert(component.instance_id.as_str()) {
                return Err(CircuitGenError::Validation(format!(
                    "duplicate instance id '{}'",
                    component.instance_id
                )));
            }
        }

        Ok(ResolvedPlan { mcu, peripherals })
    }

    /// Assemble the microcontroller plus the first `count` peripherals.
    pub fn assemble_plan(&self, plan: &ResolvedPlan<'a>, count: usize) -> Result<Assembly> {
        let count = count.min(plan.peripherals.len());
        let mut ctx = AssemblyContext::new(self.catalog, plan.mcu.entry);
        let mut document = CircuitDocument::new(&self.options.author, &self.options.editor);
        let mut placements = Vec::with_capacity(count + 1);

        document.parts.push(
            Part::new(MCU_ID, &plan.mcu.entry.type_id)
                .at(MCU_POSITION.top, MCU_POSITION.left)
                .with_attrs(plan.mcu.attrs.clone()),
        );
        placements.push(PlacementRecord::new(&plan.mcu, Vec::new()));

        for (index, component) in plan.peripherals[..count].iter().enumerate() {
            let position = layout::peripheral_position(index);
            let part = Part::new(&component.instance_id, &component.entry.type_id)
                .at(position.top, position.left)
                .with_attrs(component.attrs.clone());

            let wiring = ConnectionBuilder::build(&mut ctx, &part, component.entry)?;
            tracing::debug!(
                id = %part.id,
                type_id = %part.type_id,
                connections = wiring.connections.len(),
                passives = wiring.parts.len(),
                "placed component"
            );

            document.parts.push(part);
            document.parts.extend(wiring.parts);
            document.connections.extend(wiring.connections);
            placements.push(PlacementRecord::new(component, wiring.actions));
        }

        check_document(self.catalog, &document)?;

        tracing::info!(
            mcu = %plan.mcu.entry.type_id,
            parts = document.parts.len(),
            connections = document.connections.len(),
            "assembled circuit document"
        );

        Ok(Assembly {
            document,
            placements,
        })
    }
}

/// Reject ids that cannot be told apart from pin references, the
/// microcontroller, or synthesized passives.
fn validate_instance_id(id: &str, reserved_prefixes: &[&str]) -> Result<()> {
    if id.trim().is_empty() {
        return Err(CircuitGenError::Validation(
            "instance id must not be empty".to_string(),
        ));
    }
    if id.contains(':') {
        return Err(CircuitGenError::Validation(format!(
            "instance id '{}' must not contain ':'",
            id
        )));
    }
    if id == MCU_ID {
        return Err(CircuitGenError::Validation(format!(
            "instance id '{}' is reserved for the microcontroller",
            id
        )));
    }
    let synthesized = reserved_prefixes.iter().any(|prefix| {
        id.strip_prefix(prefix)
            .map(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false)
    });
    if synthesized {
        return Err(CircuitGenError::Validation(format!(
            "instance id '{}' is reserved for generated passives",
            id
        )));
    }
    Ok(())
}

fn violation(message: String) -> CircuitGenError {
    CircuitGenError::AssemblyInvariantViolation(message)
}

/// Structural checks on a finished document.
fn check_document(catalog: &Catalog, doc: &CircuitDocument) -> Result<()> {
    let mut typed: Vec<(&Part, &CatalogEntry)> = Vec::with_capacity(doc.parts.len());
    let mut ids: HashSet<&str> = HashSet::new();
    for part in &doc.parts {
        let entry = catalog.get(&part.type_id).ok_or_else(|| {
            violation(format!(
                "part '{}' has unknown type '{}'",
                part.id, part.type_id
            ))
        })?;
        if !ids.insert(part.id.as_str()) {
            return Err(violation(format!("duplicate part id '{}'", part.id)));
        }
        typed.push((part, entry));
    }

    // Exactly one microcontroller, first, under the reserved id.
    let mcu_entry = match typed.first() {
        Some((part, entry)) if part.id == MCU_ID && entry.is_microcontroller() => *entry,
        _ => return Err(violation("first part is not the microcontroller".to_string())),
    };
    if let Some((part, _)) = typed.iter().skip(1).find(|(_, e)| e.is_microcontroller()) {
        return Err(violation(format!("second microcontroller '{}'", part.id)));
    }

    let entry_of = |part_id: &str| {
        typed
            .iter()
            .find(|(part, _)| part.id == part_id)
            .map(|(_, entry)| *entry)
    };

    // Both ends of every wire name a declared, wireable pin.
    for conn in &doc.connections {
        for end in [&conn.from, &conn.to] {
            let wired = entry_of(end.part.as_str())
                .and_then(|entry| entry.pin(&end.pin))
                .map(|spec| spec.role.is_wired())
                .unwrap_or(false);
            if !wired {
                return Err(violation(format!("connection end {} is not a wired pin", end)));
            }
        }
    }

    // Every wired non-microcontroller pin is used exactly once.
    let netlist = Netlist::from_document(doc);
    for (part, entry) in typed.iter().skip(1) {
        for spec in entry.wired_pins() {
            let degree = netlist.degree(&part.pin(&spec.name));
            if degree != 1 {
                return Err(violation(format!(
                    "pin {}:{} is wired {} times",
                    part.id, spec.name, degree
                )));
            }
        }
    }

    // Grounds are handed out round-robin in declaration order.
    let grounds = mcu_entry.ground_pins();
    let issued = doc
        .connections
        .iter()
        .filter(|c| c.from.is_mcu() && grounds.contains(&c.from.pin.as_str()));
    for (k, conn) in issued.enumerate() {
        let expected = grounds[k % grounds.len()];
        if conn.from.pin != expected {
            return Err(violation(format!(
                "ground connection {} uses {} instead of {}",
                k + 1,
                conn.from.pin,
                expected
            )));
        }
    }

    // Required passives sit between the microcontroller and the pin.
    for (part, entry) in &typed {
        let Some(requirement) = &entry.requires_passive else {
            continue;
        };
        let target = part.pin(&requirement.pin);
        let feeding: Vec<&Connection> = doc
            .connections
            .iter()
            .filter(|c| c.touches(&target))
            .collect();
        let passive_end = match feeding.as_slice() {
            [single] => single.other_end(&target),
            _ => None,
        };
        let through_passive = passive_end.and_then(|end| {
            let passive = entry_of(end.part.as_str())?;
            if passive.type_id != requirement.type_id {
                return None;
            }
            let far = passive.wired_pins().find(|spec| spec.name != end.pin)?;
            let far = PinRef::new(&end.part, &far.name);
            doc.connections
                .iter()
                .find_map(|c| c.other_end(&far))
                .filter(|pin| pin.is_mcu())
        });
        if through_passive.is_none() {
            return Err(violation(format!(
                "{} of '{}' is not driven through a {}",
                target, part.id, requirement.type_id
            )));
        }
    }

    Ok(())
}
