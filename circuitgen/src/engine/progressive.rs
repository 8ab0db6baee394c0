//! Progressive Sequencer
//!
//! Splits a build into cumulative steps. Step 1 holds the microcontroller
//! alone; step `k + 1` holds it plus the first `k` peripherals. Every step is
//! assembled from scratch, so each snapshot is self-contained and its pins
//! match the full build for the parts it shares with it.

use crate::circuit::schema::{ComponentDescriptor, ProgressiveStep};
use crate::core::{CircuitGenError, Result};
use crate::engine::assembler::Assembler;
use crate::engine::instructions;

pub struct ProgressiveSequencer<'a> {
    assembler: Assembler<'a>,
}

impl<'a> ProgressiveSequencer<'a> {
    pub fn new(assembler: Assembler<'a>) -> Self {
        Self { assembler }
    }

    /// One step per component, microcontroller first.
    pub fn sequence(&self, descriptors: &[ComponentDescriptor]) -> Result<Vec<ProgressiveStep>> {
        let plan = self.assembler.resolve(descriptors)?;
        let mcu_name = plan.mcu.entry.name.as_str();
        let mut steps = Vec::with_capacity(plan.peripherals.len() + 1);

        for count in 0..=plan.peripherals.len() {
            let step_index = count + 1;
            let assembly = self.assembler.assemble_plan(&plan, count)?;
            let newest = assembly.placements.last().ok_or_else(|| {
                CircuitGenError::AssemblyInvariantViolation(format!(
                    "step {} placed nothing",
                    step_index
                ))
            })?;
            let instruction_text = instructions::render_step(step_index, mcu_name, newest);

            tracing::debug!(
                step = step_index,
                added = %newest.instance_id,
                parts = assembly.document.parts.len(),
                "sequenced build step"
            );

            steps.push(ProgressiveStep {
                step_index,
                circuit_document: assembly.document,
                instruction_text,
            });
        }

        tracing::info!(steps = steps.len(), "progressive build ready");
        Ok(steps)
    }
}
