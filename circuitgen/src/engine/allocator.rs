//! Pin Allocator
//!
//! Issues microcontroller pins to peripherals. Signal pins come from
//! per-kind pools in declaration order and can run out; ground pins cycle
//! round-robin and never run out; power and bus pins are fixed and shared.
//!
//! An allocator belongs to exactly one generation. It is created by the
//! assembler for every call and dropped with it.

use crate::catalog::{BusLine, CatalogEntry, SignalKind, Supply};
use crate::core::{CircuitGenError, Result};

#[derive(Debug)]
pub struct PinAllocator<'c> {
    mcu: &'c CatalogEntry,
    grounds: Vec<&'c str>,
    digital: Vec<&'c str>,
    analog: Vec<&'c str>,
    next_digital: usize,
    next_analog: usize,
    ground_cycle: usize,
}

impl<'c> PinAllocator<'c> {
    pub fn new(mcu: &'c CatalogEntry) -> Self {
        Self {
            mcu,
            grounds: mcu.ground_pins(),
            digital: mcu.signal_pins(SignalKind::Digital),
            analog: mcu.signal_pins(SignalKind::Analog),
            next_digital: 0,
            next_analog: 0,
            ground_cycle: 0,
        }
    }

    /// The k-th call returns ground pin `1 + ((k - 1) mod G)`.
    pub fn allocate_ground(&mut self) -> Result<&'c str> {
        if self.grounds.is_empty() {
            return Err(CircuitGenError::PinExhausted {
                pool: "ground".to_string(),
                capacity: 0,
            });
        }
        let pin = self.grounds[self.ground_cycle % self.grounds.len()];
        self.ground_cycle += 1;
        tracing::trace!(pin, issued = self.ground_cycle, "allocated ground pin");
        Ok(pin)
    }

    /// Next unused pin of `kind`, in declaration order.
    pub fn allocate_signal(&mut self, kind: SignalKind) -> Result<&'c str> {
        let (pool, next) = match kind {
            SignalKind::Digital => (&self.digital, &mut self.next_digital),
            SignalKind::Analog => (&self.analog, &mut self.next_analog),
        };
        let Some(&pin) = pool.get(*next) else {
            return Err(CircuitGenError::PinExhausted {
                pool: kind.to_string(),
                capacity: pool.len(),
            });
        };
        *next += 1;
        tracing::trace!(pin, %kind, "allocated signal pin");
        Ok(pin)
    }

    /// Fixed power pin for a supply; falls back to the first declared power pin.
    pub fn power_rail(&self, supply: Supply) -> Result<&'c str> {
        let mcu: &'c CatalogEntry = self.mcu;
        mcu.power_pin(supply)
            .or_else(|| mcu.first_power_pin())
            .ok_or_else(|| CircuitGenError::PinExhausted {
                pool: "power".to_string(),
                capacity: 0,
            })
    }

    /// Fixed, shared pin for a bus line.
    pub fn bus_pin(&self, line: BusLine) -> Result<&'c str> {
        let mcu: &'c CatalogEntry = self.mcu;
        mcu.bus_pin(line)
            .ok_or_else(|| CircuitGenError::PinExhausted {
                pool: format!("{} bus", line),
                capacity: 0,
            })
    }

    pub fn ground_pins(&self) -> &[&'c str] {
        &self.grounds
    }

    pub fn grounds_issued(&self) -> usize {
        self.ground_cycle
    }

    pub fn signals_issued(&self, kind: SignalKind) -> usize {
        match kind {
            SignalKind::Digital => self.next_digital,
            SignalKind::Analog => self.next_analog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn uno() -> &'static CatalogEntry {
        Catalog::builtin().lookup("wokwi-arduino-uno").unwrap()
    }

    #[test]
    fn test_ground_round_robin() {
        let mut allocator = PinAllocator::new(uno());
        let issued: Vec<&str> = (0..7).map(|_| allocator.allocate_ground().unwrap()).collect();
        assert_eq!(
            issued,
            vec!["GND.1", "GND.2", "GND.3", "GND.1", "GND.2", "GND.3", "GND.1"]
        );
        assert_eq!(allocator.grounds_issued(), 7);
    }

    #[test]
    fn test_signal_pools_are_independent() {
        let mut allocator = PinAllocator::new(uno());
        assert_eq!(allocator.allocate_signal(SignalKind::Digital).unwrap(), "2");
        assert_eq!(allocator.allocate_signal(SignalKind::Analog).unwrap(), "A0");
        assert_eq!(allocator.allocate_signal(SignalKind::Digital).unwrap(), "3");
        assert_eq!(allocator.signals_issued(SignalKind::Digital), 2);
        assert_eq!(allocator.signals_issued(SignalKind::Analog), 1);
    }

    #[test]
    fn test_signal_pool_exhaustion() {
        let mut allocator = PinAllocator::new(uno());
        for _ in 0..4 {
            allocator.allocate_signal(SignalKind::Analog).unwrap();
        }
        match allocator.allocate_signal(SignalKind::Analog) {
            Err(CircuitGenError::PinExhausted { pool, capacity }) => {
                assert_eq!(pool, "analog");
                assert_eq!(capacity, 4);
            }
            other => panic!("expected PinExhausted, got {:?}", other),
        }
        // Exhaustion of one pool leaves the other untouched.
        assert_eq!(allocator.allocate_signal(SignalKind::Digital).unwrap(), "2");
    }

    #[test]
    fn test_fixed_pins() {
        let allocator = PinAllocator::new(uno());
        assert_eq!(allocator.power_rail(Supply::FiveVolt).unwrap(), "5V");
        assert_eq!(allocator.power_rail(Supply::ThreeVolt).unwrap(), "3.3V");
        assert_eq!(allocator.bus_pin(BusLine::Sda).unwrap(), "A4");
        assert_eq!(allocator.bus_pin(BusLine::Sck).unwrap(), "13");
    }

    #[test]
    fn test_board_without_grounds() {
        let board: CatalogEntry = serde_json::from_str(
            r#"{"type_id": "bare", "name": "Bare", "category": "microcontroller",
                "pins": [{"name": "D1", "role": {"signal": "digital"}}]}"#,
        )
        .unwrap();
        let mut allocator = PinAllocator::new(&board);
        assert!(matches!(
            allocator.allocate_ground(),
            Err(CircuitGenError::PinExhausted { capacity: 0, .. })
        ));
        assert!(allocator.power_rail(Supply::FiveVolt).is_err());
        match allocator.bus_pin(BusLine::Scl) {
            Err(CircuitGenError::PinExhausted { pool, .. }) => assert_eq!(pool, "SCL bus"),
            other => panic!("expected PinExhausted, got {:?}", other),
        }
    }
}
