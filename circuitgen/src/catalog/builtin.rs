//! Built-in Component Tables
//!
//! The catalog ships as JSON tables compiled into the binary. Each table is
//! an array of catalog rows; a row that fails to deserialize is skipped with
//! a warning so one bad row never hides the rest of its table.

use crate::catalog::schema::CatalogEntry;

const EMBEDDED_MICROCONTROLLERS: &str = include_str!("../../catalog/microcontrollers.json");
const EMBEDDED_OUTPUTS: &str = include_str!("../../catalog/outputs.json");
const EMBEDDED_INPUTS: &str = include_str!("../../catalog/inputs.json");
const EMBEDDED_SENSORS: &str = include_str!("../../catalog/sensors.json");
const EMBEDDED_DISPLAYS: &str = include_str!("../../catalog/displays.json");
const EMBEDDED_ACTUATORS: &str = include_str!("../../catalog/actuators.json");
const EMBEDDED_PASSIVES: &str = include_str!("../../catalog/passives.json");

/// Revision of the built-in tables. Bump when a row's pins or rules change.
pub const CATALOG_VERSION: u32 = 1;

/// Parse every embedded table, in table order.
pub fn builtin_entries() -> Vec<CatalogEntry> {
    let tables = [
        ("microcontrollers", EMBEDDED_MICROCONTROLLERS),
        ("outputs", EMBEDDED_OUTPUTS),
        ("inputs", EMBEDDED_INPUTS),
        ("sensors", EMBEDDED_SENSORS),
        ("displays", EMBEDDED_DISPLAYS),
        ("actuators", EMBEDDED_ACTUATORS),
        ("passives", EMBEDDED_PASSIVES),
    ];

    let mut entries = Vec::new();
    for (table, json_str) in tables {
        entries.extend(parse_table(table, json_str));
    }
    entries
}

/// Parse one table, skipping rows that do not match the schema.
pub fn parse_table(table: &str, json_str: &str) -> Vec<CatalogEntry> {
    let rows = match serde_json::from_str::<Vec<serde_json::Value>>(json_str) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!("Failed to parse catalog table {}: {}", table, e);
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<CatalogEntry>(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping malformed row in catalog table {}: {}", table, e);
            }
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::Category;

    #[test]
    fn test_all_embedded_rows_parse() {
        let entries = builtin_entries();
        assert_eq!(entries.len(), 15);
        assert!(entries.iter().any(|e| e.category == Category::Passive));
    }

    #[test]
    fn test_bad_row_is_skipped() {
        let json = r#"[
            {"type_id": "ok", "name": "Ok", "category": "input", "pins": []},
            {"type_id": "broken", "category": "not-a-category"}
        ]"#;
        let entries = parse_table("test", json);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].type_id, "ok");
    }

    #[test]
    fn test_unparseable_table_yields_nothing() {
        assert!(parse_table("test", "{ nope").is_empty());
    }
}
