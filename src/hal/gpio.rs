//! GPIO Abstractions
//!
//! Type-safe GPIO pin wrappers for the uBITX control lines.
//! Provides semantic meaning to pins through the type system.

use embassy_stm32::gpio::{Input, Output};

use crate::config::{BUTTON_DEBOUNCE_MS, LOOP_PERIOD_MS, PTT_DEBOUNCE_MS};
use crate::types::LpfBand;

/// Status LED driver
pub struct StatusLed<'d> {
    pin: Output<'d>,
}

impl<'d> StatusLed<'d> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(mut pin: Output<'d>) -> Self {
        pin.set_low();
        Self { pin }
    }

    /// Toggle LED state
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }
}

/// Drive an output from a bool
fn drive(pin: &mut Output<'_>, high: bool) {
    if high {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

/// Relay and keying outputs
pub struct RigLines<'d> {
    tx_rx: Output<'d>,
    cw_key: Output<'d>,
    lpf_a: Output<'d>,
    lpf_b: Output<'d>,
    lpf_c: Output<'d>,
}

impl<'d> RigLines<'d> {
    /// Take the lines, releasing everything (receive, key up, no LPF relay)
    #[must_use]
    pub fn new(
        tx_rx: Output<'d>,
        cw_key: Output<'d>,
        lpf_a: Output<'d>,
        lpf_b: Output<'d>,
        lpf_c: Output<'d>,
    ) -> Self {
        let mut lines = Self {
            tx_rx,
            cw_key,
            lpf_a,
            lpf_b,
            lpf_c,
        };
        lines.set_tx_rx(false);
        lines.set_cw_key(false);
        lines.select_lpf(LpfBand::Above21MHz);
        lines
    }

    /// TX/RX switching line
    pub fn set_tx_rx(&mut self, transmit: bool) {
        drive(&mut self.tx_rx, transmit);
    }

    /// CW key line
    pub fn set_cw_key(&mut self, down: bool) {
        drive(&mut self.cw_key, down);
    }

    /// Set the three LPF relays for a band
    pub fn select_lpf(&mut self, band: LpfBand) {
        let (a, b, c) = band.relays();
        drive(&mut self.lpf_a, a);
        drive(&mut self.lpf_b, b);
        drive(&mut self.lpf_c, c);
    }
}

/// Consecutive-sample debouncer
#[derive(Clone, Copy, Debug)]
struct Debounce {
    stable: bool,
    last_raw: bool,
    count: u32,
    threshold: u32,
}

impl Debounce {
    const fn new(threshold_ms: u32) -> Self {
        let threshold = threshold_ms / LOOP_PERIOD_MS as u32;
        Self {
            stable: false,
            last_raw: false,
            count: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feed one sample, returns true when the stable level changed
    fn update(&mut self, raw: bool) -> bool {
        if raw == self.last_raw {
            if self.count < self.threshold {
                self.count += 1;
            }
        } else {
            self.count = 0;
            self.last_raw = raw;
        }

        if self.count >= self.threshold && raw != self.stable {
            self.stable = raw;
            return true;
        }
        false
    }
}

/// PTT (Push-to-Talk) input
pub struct PttInput<'d> {
    pin: Input<'d>,
    debounce: Debounce,
}

impl<'d> PttInput<'d> {
    /// Create a new PTT input (active low with internal pull-up)
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self {
            pin,
            debounce: Debounce::new(PTT_DEBOUNCE_MS),
        }
    }

    /// Sample the pin, returns the debounced level (true when pressed)
    pub fn update(&mut self) -> bool {
        self.debounce.update(self.pin.is_low());
        self.debounce.stable
    }
}

/// Function button with click detection
pub struct FunctionButton<'d> {
    pin: Input<'d>,
    debounce: Debounce,
}

impl<'d> FunctionButton<'d> {
    /// Create the button (active low with pull-up)
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self {
            pin,
            debounce: Debounce::new(BUTTON_DEBOUNCE_MS),
        }
    }

    /// Sample the pin, returns true once per press
    pub fn clicked(&mut self) -> bool {
        self.debounce.update(self.pin.is_low()) && self.debounce.stable
    }

    /// Raw level, true while the button is down
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.pin.is_low()
    }
}
