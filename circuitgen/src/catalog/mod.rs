//! Component Catalog
//!
//! The catalog is the single source of truth for pin names, categories and
//! passive requirements. Every other part of the engine consults it instead
//! of hard-coding pin names.
//!
//! # Usage
//!
//! ```rust
//! use circuitgen::catalog::{Catalog, Category};
//!
//! let catalog = Catalog::builtin();
//! let led = catalog.lookup("wokwi-led").unwrap();
//! assert_eq!(led.category, Category::Output);
//! assert!(led.requires_passive.is_some());
//! ```

pub mod builtin;
pub mod schema;

pub use builtin::CATALOG_VERSION;
pub use schema::*;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::core::{CircuitGenError, Result};

/// Read-only table of component definitions keyed by type id
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// The built-in catalog, parsed once per process.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let catalog = Catalog::from_entries(builtin::builtin_entries());
            tracing::debug!(
                entries = catalog.len(),
                version = CATALOG_VERSION,
                "Loaded built-in component catalog"
            );
            catalog
        })
    }

    /// Build a catalog from rows. A later row with an already-seen type id is
    /// ignored, and so is a row its category's connection template cannot
    /// wire or whose series passive is missing from the rows.
    pub fn from_entries(rows: Vec<CatalogEntry>) -> Self {
        let mut accepted: Vec<CatalogEntry> = Vec::with_capacity(rows.len());
        let mut seen = HashSet::with_capacity(rows.len());

        for entry in rows {
            if !seen.insert(entry.type_id.clone()) {
                tracing::warn!("Duplicate catalog entry for {} ignored", entry.type_id);
                continue;
            }
            if let Some(problem) = entry.wiring_problem() {
                tracing::warn!("Skipping catalog entry {}: {}", entry.type_id, problem);
                continue;
            }
            accepted.push(entry);
        }

        let terminals: HashSet<String> = accepted
            .iter()
            .filter(|e| e.category == Category::Passive && e.wired_pins().count() >= 2)
            .map(|e| e.type_id.clone())
            .collect();
        accepted.retain(|entry| match &entry.requires_passive {
            Some(req) if !terminals.contains(&req.type_id) => {
                tracing::warn!(
                    "Skipping catalog entry {}: {} is not a two-terminal passive in the catalog",
                    entry.type_id,
                    req.type_id
                );
                false
            }
            _ => true,
        });

        let index = accepted
            .iter()
            .enumerate()
            .map(|(i, e)| (e.type_id.clone(), i))
            .collect();
        Self {
            entries: accepted,
            index,
        }
    }

    /// Look up a component type, failing with `UnknownComponentType`.
    pub fn lookup(&self, type_id: &str) -> Result<&CatalogEntry> {
        self.get(type_id)
            .ok_or_else(|| CircuitGenError::UnknownComponentType {
                type_id: type_id.to_string(),
            })
    }

    pub fn get(&self, type_id: &str) -> Option<&CatalogEntry> {
        self.index.get(type_id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.index.contains_key(type_id)
    }

    /// All entries in table order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn microcontrollers(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.is_microcontroller())
    }

    /// Id prefixes reserved for synthesized passive parts, including the
    /// fallback of passives that declare none
    pub fn passive_id_prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.category == Category::Passive) {
            let prefix = entry.passive_id_prefix();
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        prefixes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_and_unknown() {
        let catalog = Catalog::builtin();
        let uno = catalog.lookup("wokwi-arduino-uno").unwrap();
        assert!(uno.is_microcontroller());
        assert_eq!(uno.ground_pins(), vec!["GND.1", "GND.2", "GND.3"]);

        match catalog.lookup("does-not-exist") {
            Err(CircuitGenError::UnknownComponentType { type_id }) => {
                assert_eq!(type_id, "does-not-exist")
            }
            other => panic!("expected UnknownComponentType, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let rows = builtin::parse_table(
            "test",
            r#"[
                {"type_id": "dup", "name": "First", "category": "input", "pins": []},
                {"type_id": "dup", "name": "Second", "category": "input", "pins": []}
            ]"#,
        );
        let catalog = Catalog::from_entries(rows);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("dup").unwrap().name, "First");
    }

    #[test]
    fn test_passive_prefixes() {
        assert_eq!(Catalog::builtin().passive_id_prefixes(), vec!["r"]);
    }

    #[test]
    fn test_passive_without_prefix_reserves_fallback() {
        let rows = builtin::parse_table(
            "test",
            r#"[
                {"type_id": "res-x", "name": "Resistor", "category": "passive",
                 "pins": [{"name": "1", "role": {"signal": "digital"}},
                          {"name": "2", "role": {"signal": "digital"}}]}
            ]"#,
        );
        let catalog = Catalog::from_entries(rows);
        assert_eq!(catalog.passive_id_prefixes(), vec![FALLBACK_PASSIVE_PREFIX]);
    }

    #[test]
    fn test_unwireable_rows_are_skipped() {
        let rows = builtin::parse_table(
            "test",
            r#"[
                {"type_id": "res-x", "name": "Resistor", "category": "passive", "id_prefix": "r",
                 "pins": [{"name": "1", "role": {"signal": "digital"}},
                          {"name": "2", "role": {"signal": "digital"}}]},
                {"type_id": "button-x", "name": "Button", "category": "input",
                 "pins": [{"name": "1", "role": {"signal": "digital"}}, {"name": "2", "role": "ground"}],
                 "requires_passive": {"type_id": "res-x", "value": 10000, "unit": "ohm", "pin": "1"}},
                {"type_id": "led-bus", "name": "Bus LED", "category": "output",
                 "pins": [{"name": "SDA", "role": {"bus": "sda"}}, {"name": "C", "role": "ground"}]},
                {"type_id": "led-power", "name": "Power LED", "category": "output",
                 "pins": [{"name": "A", "role": {"power": "5v"}}, {"name": "C", "role": "ground"}],
                 "requires_passive": {"type_id": "res-x", "value": 220, "unit": "ohm", "pin": "A"}},
                {"type_id": "led-missing", "name": "Orphan LED", "category": "output",
                 "pins": [{"name": "A", "role": {"signal": "digital"}}, {"name": "C", "role": "ground"}],
                 "requires_passive": {"type_id": "res-y", "value": 220, "unit": "ohm", "pin": "A"}},
                {"type_id": "led-x", "name": "LED", "category": "output",
                 "pins": [{"name": "A", "role": {"signal": "digital"}}, {"name": "C", "role": "ground"}],
                 "requires_passive": {"type_id": "res-x", "value": 220, "unit": "ohm", "pin": "A"}}
            ]"#,
        );
        assert_eq!(rows.len(), 6);

        let catalog = Catalog::from_entries(rows);
        let kept: Vec<&str> = catalog.entries().map(|e| e.type_id.as_str()).collect();
        assert_eq!(kept, vec!["res-x", "led-x"]);
        assert_eq!(catalog.lookup("led-x").unwrap().type_id, "led-x");
        assert!(catalog.get("button-x").is_none());
    }

    #[test]
    fn test_builtin_rows_all_load() {
        assert_eq!(Catalog::builtin().len(), builtin::builtin_entries().len());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_send_sync() {
        assert_send_sync::<Catalog>();
        assert_send_sync::<CatalogEntry>();
        assert_send_sync::<crate::circuit::schema::CircuitDocument>();
        assert_send_sync::<crate::circuit::schema::ProgressiveStep>();
        assert_send_sync::<crate::core::GenerationOptions>();
        assert_send_sync::<crate::core::CircuitGenError>();
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = Catalog::builtin() as *const Catalog;
        let b = Catalog::builtin() as *const Catalog;
        assert_eq!(a, b);
    }
}
