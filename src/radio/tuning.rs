//! Tuning
//!
//! Turns encoder pulses into frequency changes. Faster knob motion takes
//! larger steps; with RIT active the knob moves the receive frequency in
//! fixed 100 Hz steps.

use crate::config::{
    BAND_STEP_HZ, HIGHEST_FREQ, LOWEST_FREQ, TUNE_FAST_PULSES, TUNE_MEDIUM_PULSES,
    TUNE_STEP_FAST_HZ, TUNE_STEP_MEDIUM_HZ, TUNE_STEP_SLOW_HZ,
};
use crate::hal::RigOutputs;
use crate::radio::settings::SettingsStore;
use crate::radio::transceiver::Transceiver;
use crate::types::{Frequency, Sideband};

/// RIT tuning step
pub const RIT_STEP_HZ: i64 = 100;

/// Frequency change for a batch of encoder pulses
#[must_use]
pub const fn tuning_step(pulses: i32) -> i64 {
    let step = if pulses > TUNE_FAST_PULSES || pulses < -TUNE_FAST_PULSES {
        TUNE_STEP_FAST_HZ
    } else if pulses > TUNE_MEDIUM_PULSES || pulses < -TUNE_MEDIUM_PULSES {
        TUNE_STEP_MEDIUM_HZ
    } else {
        TUNE_STEP_SLOW_HZ
    };
    if pulses > 0 {
        step as i64
    } else if pulses < 0 {
        -(step as i64)
    } else {
        0
    }
}

impl<H: RigOutputs, S: SettingsStore> Transceiver<H, S> {
    /// Apply encoder pulses accumulated since the last tick
    ///
    /// Ignored while transmitting. Crossing 10 MHz switches to the
    /// conventional sideband for the new side.
    pub fn tune(&mut self, pulses: i32) {
        if pulses == 0 || self.state.in_tx() {
            return;
        }
        if self.state.is_rit() {
            let delta = if pulses > 0 { RIT_STEP_HZ } else { -RIT_STEP_HZ };
            let next = self.state.frequency().offset(delta);
            self.set_frequency(next.as_hz());
            return;
        }

        let previous = self.state.frequency();
        let next = previous.offset(tuning_step(pulses));
        if previous.is_upper_band() != next.is_upper_band() {
            self.state = self.state.with_sideband(Sideband::for_frequency(next));
            debug!("sideband follows band: {}", self.state.sideband());
        }
        self.set_frequency(next.as_hz());
    }

    /// Move one band-select step up or down
    ///
    /// Cancels RIT. A step that would reach either end of the tunable
    /// range is refused. The sideband follows the 10 MHz convention.
    pub fn band_step(&mut self, up: bool) {
        self.rit_disable();
        let current = self.state.frequency().as_hz();
        let next = if up {
            current
                .checked_add(BAND_STEP_HZ)
                .filter(|&hz| hz < HIGHEST_FREQ)
        } else {
            current
                .checked_sub(BAND_STEP_HZ)
                .filter(|&hz| hz > LOWEST_FREQ)
        };
        let Some(hz) = next else {
            return;
        };
        self.state = self
            .state
            .with_sideband(Sideband::for_frequency(Frequency::clamped(hz)));
        self.set_frequency(hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_grows_with_speed() {
        assert_eq!(tuning_step(0), 0);
        assert_eq!(tuning_step(1), 50);
        assert_eq!(tuning_step(2), 50);
        assert_eq!(tuning_step(3), 500);
        assert_eq!(tuning_step(5), 10_000);
        assert_eq!(tuning_step(-1), -50);
        assert_eq!(tuning_step(-3), -500);
        assert_eq!(tuning_step(-5), -10_000);
    }
}
