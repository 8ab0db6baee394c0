//! Core generation API shared by the CLI and library users.
//! Stateless: every call builds its own allocator and id counters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::circuit::schema::{CircuitDocument, ComponentDescriptor, ProgressiveStep};
use crate::engine::assembler::Assembler;
use crate::engine::progressive::ProgressiveSequencer;

#[derive(Debug, thiserror::Error)]
pub enum CircuitGenError {
    #[error("Unknown component type '{type_id}'")]
    UnknownComponentType { type_id: String },
    #[error("Pin pool '{pool}' exhausted ({capacity} pins available)")]
    PinExhausted { pool: String, capacity: usize },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Assembly invariant violated: {0}")]
    AssemblyInvariantViolation(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CircuitGenError>;

/// Options for generation runs (CLI or library).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// `author` field of produced documents
    pub author: String,
    /// `editor` field of produced documents
    pub editor: String,
    /// Microcontroller placed when the input names none
    pub default_microcontroller: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            author: "circuitgen".to_string(),
            editor: "wokwi".to_string(),
            default_microcontroller: "wokwi-arduino-uno".to_string(),
        }
    }
}

impl GenerationOptions {
    /// Parse options from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Parse a JSON array of component descriptors.
///
/// Malformed JSON is a `Json` error; a well-formed row that is not a valid
/// descriptor (e.g. one without `type`) is a `Validation` error.
pub fn parse_descriptors(json: &str) -> Result<Vec<ComponentDescriptor>> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(json)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            serde_json::from_value(row)
                .map_err(|e| CircuitGenError::Validation(format!("descriptor {}: {}", i, e)))
        })
        .collect()
}

/// Read a JSON array of component descriptors from a file.
pub fn load_descriptors(path: &Path) -> Result<Vec<ComponentDescriptor>> {
    let content = std::fs::read_to_string(path)?;
    parse_descriptors(&content)
}

/// Core generation API used by the CLI.
pub struct CircuitGenCore;

impl CircuitGenCore {
    /// Assemble one circuit document from an ordered descriptor list.
    pub fn generate(
        descriptors: &[ComponentDescriptor],
        options: &GenerationOptions,
    ) -> Result<CircuitDocument> {
        Assembler::new(Catalog::builtin(), options).assemble(descriptors)
    }

    /// Produce the cumulative build steps for a descriptor list.
    pub fn generate_progressive(
        descriptors: &[ComponentDescriptor],
        options: &GenerationOptions,
    ) -> Result<Vec<ProgressiveStep>> {
        ProgressiveSequencer::new(Assembler::new(Catalog::builtin(), options))
            .sequence(descriptors)
    }

    /// Generate from a JSON descriptor array.
    pub fn generate_from_json(
        json: &str,
        options: &GenerationOptions,
    ) -> Result<CircuitDocument> {
        let descriptors = parse_descriptors(json)?;
        Self::generate(&descriptors, options)
    }

    /// Generate from a file holding a JSON descriptor array.
    pub fn generate_from_file(
        path: &Path,
        options: &GenerationOptions,
    ) -> Result<CircuitDocument> {
        let descriptors = load_descriptors(path)?;
        Self::generate(&descriptors, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_partial_json_keeps_defaults() {
        let options = GenerationOptions::from_json_str(r#"{"author": "Lab 3"}"#).unwrap();
        assert_eq!(options.author, "Lab 3");
        assert_eq!(options.editor, "wokwi");
        assert_eq!(options.default_microcontroller, "wokwi-arduino-uno");
    }

    #[test]
    fn test_parse_descriptors_accepts_aliases() {
        let descriptors = parse_descriptors(
            r#"[{"type": "wokwi-arduino-uno", "id": "mcu"}, {"type_id": "wokwi-led"}]"#,
        )
        .unwrap();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].type_id, "wokwi-arduino-uno");
        assert_eq!(descriptors[0].instance_id.as_deref(), Some("mcu"));
        assert_eq!(descriptors[1].instance_id, None);
    }

    #[test]
    fn test_parse_descriptors_missing_type_is_validation() {
        match parse_descriptors(r#"[{"type": "wokwi-led"}, {"id": "x"}]"#) {
            Err(CircuitGenError::Validation(msg)) => assert!(msg.starts_with("descriptor 1:")),
            other => panic!("expected Validation, got {:?}", other),
        }

        let err = CircuitGenCore::generate_from_json(r#"[{"id": "x"}]"#, &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, CircuitGenError::Validation(_)));

        let err = parse_descriptors(r#"[{"type": 7}]"#).unwrap_err();
        assert!(matches!(err, CircuitGenError::Validation(_)));
    }

    #[test]
    fn test_generate_from_json_rejects_malformed_input() {
        let err = CircuitGenCore::generate_from_json("{not json", &GenerationOptions::default())
            .unwrap_err();
        assert!(matches!(err, CircuitGenError::Json(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = CircuitGenError::PinExhausted {
            pool: "analog".to_string(),
            capacity: 4,
        };
        assert_eq!(err.to_string(), "Pin pool 'analog' exhausted (4 pins available)");
    }
}
