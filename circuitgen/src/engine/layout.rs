//! Part placement. Positions are cosmetic; nothing downstream reads them.

/// Top/left coordinates on the simulator canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub top: i64,
    pub left: i64,
}

impl Position {
    pub const fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }

    pub fn offset(self, top: i64, left: i64) -> Self {
        Self::new(self.top + top, self.left + left)
    }
}

/// Canvas position of the microcontroller
pub const MCU_POSITION: Position = Position::new(200, 200);

/// Offsets around the microcontroller for the first eight peripherals
const SPACING_PATTERNS: [(i64, i64); 8] = [
    (-120, 150),
    (120, 150),
    (-50, 250),
    (50, 250),
    (-120, -150),
    (120, -150),
    (0, 300),
    (0, -200),
];

/// Offset of a synthesized passive from the part it protects
const PASSIVE_OFFSET: (i64, i64) = (30, -50);

/// Position of the `index`-th peripheral (0-based, input order).
pub fn peripheral_position(index: usize) -> Position {
    if let Some(&(top, left)) = SPACING_PATTERNS.get(index) {
        return MCU_POSITION.offset(top, left);
    }

    // Past the fixed slots, walk a circle that widens every eight parts.
    let angle = ((index * 45) % 360) as f64;
    let radius = 200.0 + (index / 8) as f64 * 50.0;
    let radians = angle.to_radians();
    MCU_POSITION.offset(
        (radius * radians.sin()) as i64,
        (radius * radians.cos()) as i64,
    )
}

pub fn passive_position(anchor: Position) -> Position {
    anchor.offset(PASSIVE_OFFSET.0, PASSIVE_OFFSET.1)
}
