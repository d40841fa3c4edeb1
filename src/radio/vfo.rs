//! VFO (Variable Frequency Oscillator) Management
//!
//! Dial frequency, sideband, dual VFOs and the RIT/split offsets. Every
//! retune goes through [`Transceiver::set_frequency`], which is the only
//! place the synthesizer and filter relays are reprogrammed for receive.

use crate::config::FIRST_IF;
use crate::hal::RigOutputs;
use crate::radio::settings::{SettingField, SettingsStore, VfoSlot};
use crate::radio::state::ShiftMode;
use crate::radio::transceiver::Transceiver;
use crate::types::{ClockOutput, Frequency, LpfBand, Sideband, VfoSelect};

/// Second LO frequency that puts the carrier on the wanted sideband
#[must_use]
pub const fn second_lo_hz(sideband: Sideband, usb_carrier: u32) -> u32 {
    match sideband {
        Sideband::Usb => FIRST_IF.saturating_add(usb_carrier),
        Sideband::Lsb => FIRST_IF.saturating_sub(usb_carrier),
    }
}

/// First LO frequency for a dial frequency
#[must_use]
pub const fn first_lo_hz(frequency: Frequency) -> u32 {
    FIRST_IF + frequency.as_hz()
}

impl<H: RigOutputs, S: SettingsStore> Transceiver<H, S> {
    /// Tune to `hz`, clamped into the tunable range
    ///
    /// Selects the transmit filter, then programs the first and second
    /// local oscillators for the active sideband.
    pub fn set_frequency(&mut self, hz: u32) {
        let frequency = Frequency::clamped(hz);
        if frequency.as_hz() != hz {
            debug!("clamped {} Hz to {}", hz, frequency);
        }

        self.hw.select_lpf(LpfBand::for_frequency(frequency));
        self.hw
            .set_oscillator(ClockOutput::FirstLo, first_lo_hz(frequency));
        self.hw.set_oscillator(
            ClockOutput::SecondLo,
            second_lo_hz(self.state.sideband(), self.state.settings().usb_carrier),
        );

        self.state = self.state.with_frequency(frequency);
        self.mark_dirty();
    }

    /// Select sideband and retune
    pub fn sideband_set(&mut self, sideband: Sideband) {
        self.state = self.state.with_sideband(sideband);
        self.set_frequency(self.state.frequency().as_hz());
    }

    /// Flip between LSB and USB
    pub fn sideband_toggle(&mut self) {
        self.sideband_set(self.state.sideband().toggle());
    }

    /// Exchange the active VFO with the other one
    ///
    /// Leaves RIT first, stores the dial into the active VFO (and the store
    /// when `save` is set), then loads and tunes the other VFO.
    pub fn vfo_swap(&mut self, save: bool) {
        self.rit_disable();

        let active = self.state.active_vfo();
        let current = VfoSlot::new(self.state.frequency(), self.state.sideband());
        self.state = self.state.with_vfo_slot(active, current);
        if save {
            self.save_vfo(active, current);
        }

        let next = active.toggle();
        let slot = self.state.vfo(next);
        self.state = self
            .state
            .with_vfo(next)
            .with_sideband(slot.sideband);
        self.set_frequency(slot.frequency.as_hz());
        debug!("swapped to {}", next);
    }

    /// Make both VFOs equal to the dial
    ///
    /// Leaves RIT first. With `save` both slots are also persisted.
    pub fn vfo_copy(&mut self, save: bool) {
        self.rit_disable();

        let current = VfoSlot::new(self.state.frequency(), self.state.sideband());
        self.state = self
            .state
            .with_vfo_slot(VfoSelect::A, current)
            .with_vfo_slot(VfoSelect::B, current);
        if save {
            self.save_vfo(VfoSelect::A, current);
            self.save_vfo(VfoSelect::B, current);
        }
        debug!("VFO copy {}", current);
        self.mark_dirty();
    }

    fn save_vfo(&mut self, select: VfoSelect, slot: VfoSlot) {
        let (frequency, usb) = match select {
            VfoSelect::A => (
                SettingField::VfoA(slot.frequency),
                SettingField::VfoAUsb(slot.sideband.is_usb()),
            ),
            VfoSelect::B => (
                SettingField::VfoB(slot.frequency),
                SettingField::VfoBUsb(slot.sideband.is_usb()),
            ),
        };
        self.persist(frequency);
        self.persist(usb);
    }

    /// Enter RIT: receive on the dial, transmit on `tx_hz`
    ///
    /// Replaces whatever shift was active.
    pub fn rit_enable(&mut self, tx_hz: u32) {
        if self.state.is_split() {
            warn!("RIT replaces split");
        }
        let rx = self.state.frequency();
        self.state = self.state.with_shift(ShiftMode::Rit {
            tx: Frequency::clamped(tx_hz),
            rx,
        });
        debug!("RIT on, TX {}", Frequency::clamped(tx_hz));
        self.mark_dirty();
    }

    /// Leave RIT and return to the transmit frequency
    ///
    /// Does nothing unless RIT is active.
    pub fn rit_disable(&mut self) {
        if let ShiftMode::Rit { tx, .. } = self.state.shift_mode() {
            self.state = self.state.with_shift(ShiftMode::None);
            self.set_frequency(tx.as_hz());
            debug!("RIT off");
        }
    }

    /// Toggle RIT around the current dial frequency
    pub fn rit_toggle(&mut self) {
        if self.state.is_rit() {
            self.rit_disable();
        } else {
            self.rit_enable(self.state.frequency().as_hz());
        }
    }

    /// Enter split operation
    ///
    /// Replaces whatever shift was active.
    pub fn split_enable(&mut self) {
        if self.state.is_rit() {
            warn!("split replaces RIT");
        }
        self.state = self.state.with_shift(ShiftMode::Split);
        debug!("split on");
        self.mark_dirty();
    }

    /// Leave split operation
    ///
    /// Does nothing unless split is active.
    pub fn split_disable(&mut self) {
        if self.state.is_split() {
            self.state = self.state.with_shift(ShiftMode::None);
            debug!("split off");
            self.mark_dirty();
        }
    }

    /// Toggle split operation
    pub fn split_toggle(&mut self) {
        if self.state.is_split() {
            self.split_disable();
        } else {
            self.split_enable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_lo_straddles_first_if() {
        assert_eq!(second_lo_hz(Sideband::Usb, 11_056_273), 56_061_273);
        assert_eq!(second_lo_hz(Sideband::Lsb, 11_056_273), 33_948_727);
    }

    #[test]
    fn first_lo_is_dial_plus_if() {
        let f = Frequency::clamped(7_074_000);
        assert_eq!(first_lo_hz(f), 52_079_000);
    }
}
