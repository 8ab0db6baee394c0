//! Catalog consistency and netlist tests

use circuitgen::catalog::{Catalog, Category, PinRole};
use circuitgen::prelude::*;
use circuitgen::{Netlist, PinRef};

#[test]
fn test_every_entry_is_wireable() {
    let catalog = Catalog::builtin();
    assert!(!catalog.is_empty());

    for entry in catalog.entries() {
        assert!(!entry.pins.is_empty(), "{} declares no pins", entry.type_id);
        if entry.is_microcontroller() {
            assert!(!entry.ground_pins().is_empty(), "{} has no ground", entry.type_id);
            continue;
        }
        if let Some(req) = &entry.requires_passive {
            assert!(entry.declares_pin(&req.pin), "{} requires passive on undeclared pin", entry.type_id);
            let passive = catalog.lookup(&req.type_id).unwrap();
            assert_eq!(passive.category, Category::Passive);
            assert!(passive.wired_pins().count() >= 2);
        }
    }
}

#[test]
fn test_every_peripheral_generates_on_every_board() {
    let catalog = Catalog::builtin();
    let options = GenerationOptions::default();

    for board in catalog.microcontrollers() {
        for entry in catalog.entries().filter(|e| !e.is_microcontroller()) {
            let descriptors = vec![
                ComponentDescriptor::new(&board.type_id),
                ComponentDescriptor::new(&entry.type_id),
            ];
            let doc = CircuitGenCore::generate(&descriptors, &options).unwrap_or_else(|e| {
                panic!("{} on {} failed: {}", entry.type_id, board.type_id, e)
            });
            let wired = entry.wired_pins().count();
            let touching = doc.connections_for("comp1").count();
            assert_eq!(touching, wired, "{} on {}", entry.type_id, board.type_id);
        }
    }
}

#[test]
fn test_bus_pins_shared_between_displays() {
    let doc = CircuitGenCore::generate(
        &[
            ComponentDescriptor::new("board-ssd1306"),
            ComponentDescriptor::new("board-ssd1306"),
        ],
        &GenerationOptions::default(),
    )
    .unwrap();
    let netlist = Netlist::from_document(&doc);

    let sda = netlist.net_of(&PinRef::new("mcu", "A4")).unwrap();
    assert_eq!(sda.name, "A4");
    assert!(sda.contains(&PinRef::new("comp1", "SDA")));
    assert!(sda.contains(&PinRef::new("comp2", "SDA")));
    assert!(netlist.are_connected(&PinRef::new("comp1", "SCL"), &PinRef::new("comp2", "SCL")));
    assert!(!netlist.are_connected(&PinRef::new("comp1", "SCL"), &PinRef::new("comp1", "SDA")));
}

#[test]
fn test_series_resistor_splits_nets() {
    let doc = CircuitGenCore::generate(
        &[ComponentDescriptor::new("wokwi-led")],
        &GenerationOptions::default(),
    )
    .unwrap();
    let netlist = Netlist::from_document(&doc);

    let names: Vec<&str> = netlist.nets().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["2", "N1", "GND.1"]);
    assert_eq!(netlist.wire_count(), 3);
    assert_eq!(netlist.pin_count(), 6);
}

#[test]
fn test_power_role_pins_share_rail() {
    let doc = CircuitGenCore::generate(
        &[ComponentDescriptor::new("wokwi-ili9341")],
        &GenerationOptions::default(),
    )
    .unwrap();
    let netlist = Netlist::from_document(&doc);
    let rail = netlist.net_of(&PinRef::new("mcu", "5V")).unwrap();

    let entry = Catalog::builtin().lookup("wokwi-ili9341").unwrap();
    for spec in entry.pins.iter().filter(|p| matches!(p.role, PinRole::Power(_))) {
        assert!(rail.contains(&PinRef::new("comp1", &spec.name)), "{}", spec.name);
    }
}
