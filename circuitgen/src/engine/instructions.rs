//! Human-readable build instructions for one progressive step.

use crate::catalog::Category;
use crate::engine::assembler::PlacementRecord;
use crate::engine::wiring::{PinLabel, WiringAction, GROUND_WIRE_COLOR, POWER_WIRE_COLOR};

/// Instructions for the step that placed `record`.
///
/// Only the new component and the facts of its own placement are used, so
/// the text for a step never depends on what comes after it.
pub fn render_step(step_index: usize, mcu_name: &str, record: &PlacementRecord) -> String {
    let mut text = String::new();

    if record.category == Category::Microcontroller {
        text.push_str(&format!(
            "Step {}: place the {} ({})\n",
            step_index,
            display_name(record),
            record.instance_id
        ));
        text.push_str(&format!(
            "Put the {} in the middle of the workspace. Every later component is wired to it.\n",
            mcu_name
        ));
        return text;
    }

    text.push_str(&format!(
        "Step {}: add the {} ({})\n",
        step_index,
        display_name(record),
        record.instance_id
    ));

    if record.actions.is_empty() {
        text.push_str("Place it next to the board. It needs no wiring.\n");
        return text;
    }

    for (n, action) in record.actions.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", n + 1, describe(action, mcu_name, record)));
    }
    text
}

fn display_name(record: &PlacementRecord) -> String {
    match &record.label {
        Some(label) => format!("{} \"{}\"", record.name, label),
        None => record.name.clone(),
    }
}

fn pin_phrase(pin: &PinLabel) -> String {
    match &pin.label {
        Some(label) => format!("pin {} ({})", pin.name, label),
        None => format!("pin {}", pin.name),
    }
}

fn describe(action: &WiringAction, mcu_name: &str, record: &PlacementRecord) -> String {
    let id = &record.instance_id;
    match action {
        WiringAction::Signal {
            mcu_pin,
            pin,
            kind,
            color,
            passive: Some(passive),
        } => format!(
            "Connect {} pin {} ({} signal) to pin {} of the {} {} {}, then pin {} of {} to {} {}. Use {} wires.",
            mcu_name,
            mcu_pin,
            kind,
            passive.terminal_a,
            passive.value,
            passive.name.to_lowercase(),
            passive.id,
            passive.terminal_b,
            passive.id,
            id,
            pin_phrase(pin),
            color
        ),
        WiringAction::Signal {
            mcu_pin,
            pin,
            kind,
            color,
            passive: None,
        } => format!(
            "Connect {} {} to {} pin {} ({} signal) with a {} wire.",
            id,
            pin_phrase(pin),
            mcu_name,
            mcu_pin,
            kind,
            color
        ),
        WiringAction::Bus {
            mcu_pin,
            pin,
            line,
            color,
        } => format!(
            "Connect {} {} to {} pin {} (shared {} bus line) with a {} wire.",
            id,
            pin_phrase(pin),
            mcu_name,
            mcu_pin,
            line,
            color
        ),
        WiringAction::Power { mcu_pin, pin } => format!(
            "Connect {} {} to {} pin {} (power) with a {} wire.",
            id,
            pin_phrase(pin),
            mcu_name,
            mcu_pin,
            POWER_WIRE_COLOR
        ),
        WiringAction::Ground { mcu_pin, pin } => format!(
            "Connect {} {} to {} pin {} (ground) with a {} wire.",
            id,
            pin_phrase(pin),
            mcu_name,
            mcu_pin,
            GROUND_WIRE_COLOR
        ),
    }
}
