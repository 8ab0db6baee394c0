//! Generation engine: pin allocation, passive insertion, wiring templates,
//! assembly and progressive sequencing.

pub mod allocator;
pub mod assembler;
pub mod instructions;
pub mod layout;
pub mod passive;
pub mod progressive;
pub mod wiring;

pub use allocator::PinAllocator;
pub use assembler::{Assembler, Assembly, PlacementRecord, ResolvedComponent, ResolvedPlan};
pub use passive::{PassiveInserter, PassiveInsertion};
pub use progressive::ProgressiveSequencer;
pub use wiring::{ConnectionBuilder, Wiring, WiringAction};

use crate::catalog::{Catalog, CatalogEntry};

/// Mutable state of one generation run
#[derive(Debug)]
pub struct AssemblyContext<'c> {
    pub catalog: &'c Catalog,
    pub allocator: PinAllocator<'c>,
    pub passives: PassiveInserter<'c>,
}

impl<'c> AssemblyContext<'c> {
    pub fn new(catalog: &'c Catalog, mcu: &'c CatalogEntry) -> Self {
        Self {
            catalog,
            allocator: PinAllocator::new(mcu),
            passives: PassiveInserter::new(catalog),
        }
    }
}
