//! Rotary Encoder Driver
//!
//! Quadrature decoding for the tuning knob. The decoder runs in the pin
//! interrupt and counts one pulse per valid Gray-code edge into a
//! [`PulseCounter`]; the control core drains the counter once per tick.

use core::sync::atomic::{AtomicI32, Ordering};

/// Encoder rotation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Clockwise rotation (increment)
    Clockwise,
    /// Counter-clockwise rotation (decrement)
    CounterClockwise,
}

impl Direction {
    /// Signed pulse for this direction
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clockwise => defmt::write!(f, "CW"),
            Self::CounterClockwise => defmt::write!(f, "CCW"),
        }
    }
}

/// Pin levels packed as `A | B << 1`
const fn phase(a: bool, b: bool) -> u8 {
    (a as u8) | ((b as u8) << 1)
}

/// Quadrature decoder counting every edge
///
/// Clockwise runs through phases 0 → 1 → 3 → 2 → 0 (A leads B).
/// Bounces that revisit the same phase, and double steps that skip one,
/// are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadratureDecoder {
    last: u8,
}

impl QuadratureDecoder {
    /// Create a decoder starting from the current pin levels
    #[must_use]
    pub const fn new(a: bool, b: bool) -> Self {
        Self { last: phase(a, b) }
    }

    /// Update with new A/B pin states, returns direction on a valid edge
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        let current = phase(a, b);
        let previous = core::mem::replace(&mut self.last, current);
        match (previous, current) {
            (0, 1) | (1, 3) | (3, 2) | (2, 0) => Some(Direction::Clockwise),
            (0, 2) | (2, 3) | (3, 1) | (1, 0) => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}

/// Pulse accumulator shared between the encoder interrupt and the core
///
/// This is the only state that crosses the interrupt boundary. The
/// interrupt only calls [`Self::record`]; the core only calls
/// [`Self::take_pulse_delta`], which reads and clears in one atomic swap
/// so no pulse is lost between the read and the reset.
#[derive(Debug, Default)]
pub struct PulseCounter(AtomicI32);

impl PulseCounter {
    /// Create an empty counter
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicI32::new(0))
    }

    /// Count one decoded edge
    pub fn record(&self, direction: Direction) {
        self.0.fetch_add(direction.delta(), Ordering::Relaxed);
    }

    /// Pulses since the last call (positive is clockwise)
    pub fn take_pulse_delta(&self) -> i32 {
        self.0.swap(0, Ordering::AcqRel)
    }
}
