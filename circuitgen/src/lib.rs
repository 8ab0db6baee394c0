//! circuitgen - circuit document generation for Wokwi-style simulators
//!
//! This library turns an ordered list of recognized components into a wired
//! circuit document: pins are allocated on the microcontroller, required
//! passives (such as LED current-limiting resistors) are inserted in series,
//! and every peripheral is connected by a category wiring template.
//!
//! # Quick Start
//!
//! ```rust
//! use circuitgen::{CircuitGenCore, ComponentDescriptor, GenerationOptions};
//!
//! let descriptors = vec![
//!     ComponentDescriptor::new("wokwi-arduino-uno"),
//!     ComponentDescriptor::new("wokwi-led"),
//! ];
//! let doc = CircuitGenCore::generate(&descriptors, &GenerationOptions::default()).unwrap();
//!
//! assert_eq!(doc.parts[0].id, "mcu");
//! assert_eq!(doc.connections.len(), 3);
//! println!("{}", doc.to_json_pretty().unwrap());
//! ```
//!
//! # Features
//!
//! - **Pin allocation**: Per-kind signal pools, round-robin grounds, shared bus pins
//! - **Passive insertion**: Series parts driven by catalog requirements
//! - **Progressive builds**: Cumulative snapshots with step instructions
//! - **Netlist view**: Electrically connected pin groups of a document

pub mod catalog;
pub mod circuit;
pub mod core;
pub mod engine;

// Re-export main types
pub use catalog::{Catalog, CatalogEntry, Category, PinRole};
pub use circuit::netlist::{Net, Netlist};
pub use circuit::schema::{
    CircuitDocument, ComponentDescriptor, Connection, Part, PinRef, ProgressiveStep, MCU_ID,
};
pub use core::{
    load_descriptors, parse_descriptors, CircuitGenCore, CircuitGenError, GenerationOptions,
};
pub use engine::{Assembler, ProgressiveSequencer};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CircuitDocument, CircuitGenCore, CircuitGenError, ComponentDescriptor, GenerationOptions,
        ProgressiveStep,
    };
}
