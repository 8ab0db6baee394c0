//! Progressive build example: print the instructions for every step of a
//! small sensor project.

use circuitgen::prelude::*;

fn main() -> Result<(), CircuitGenError> {
    let descriptors = vec![
        ComponentDescriptor::new("wokwi-esp32-devkit-v1"),
        ComponentDescriptor::new("wokwi-dht22").with_label("room sensor"),
        ComponentDescriptor::new("board-ssd1306"),
        ComponentDescriptor::new("wokwi-led").with_id("alarm"),
    ];

    let steps = CircuitGenCore::generate_progressive(&descriptors, &GenerationOptions::default())?;

    for step in &steps {
        println!("{}", step.instruction_text);
        println!(
            "  ({} parts, {} connections so far)\n",
            step.circuit_document.parts.len(),
            step.circuit_document.connections.len()
        );
    }
    Ok(())
}
