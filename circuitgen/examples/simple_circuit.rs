//! Simple generation example: wire an LED and a button to an Arduino Uno and
//! print the circuit document.

use circuitgen::prelude::*;
use std::path::Path;

fn main() -> Result<(), CircuitGenError> {
    let options = GenerationOptions::default();

    let doc = match std::env::args().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            if !path.exists() {
                eprintln!("File not found: {}", path.display());
                eprintln!("Usage: cargo run --example simple_circuit [path/to/components.json]");
                std::process::exit(1);
            }
            CircuitGenCore::generate_from_file(path, &options)?
        }
        None => CircuitGenCore::generate(
            &[
                ComponentDescriptor::new("wokwi-arduino-uno"),
                ComponentDescriptor::new("wokwi-led").with_attr("color", "green"),
                ComponentDescriptor::new("wokwi-pushbutton").with_label("start"),
            ],
            &options,
        )?,
    };

    eprintln!(
        "Generated {} parts and {} connections",
        doc.parts.len(),
        doc.connections.len()
    );
    println!("{}", doc.to_json_pretty()?);
    Ok(())
}
