//! Transmit Control
//!
//! The TX/RX sequencer. Entering and leaving transmit always runs the
//! same ordered steps so that relays, oscillators and the shift mode agree
//! at every point in the sequence.

use crate::hal::RigOutputs;
use crate::radio::settings::SettingsStore;
use crate::radio::state::ShiftMode;
use crate::radio::transceiver::Transceiver;
use crate::types::{ClockOutput, Sideband, TxMode};

/// Frequency the first LO is moved to for a CW carrier
///
/// The carrier sits one sidetone away from the dial so that the operator
/// hears it at the sidetone pitch on the same sideband.
#[must_use]
pub const fn cw_carrier_hz(dial_hz: u32, side_tone: u32, sideband: Sideband) -> u32 {
    match sideband {
        Sideband::Usb => dial_hz.saturating_add(side_tone),
        Sideband::Lsb => dial_hz.saturating_sub(side_tone),
    }
}

impl<H: RigOutputs, S: SettingsStore> Transceiver<H, S> {
    /// Switch to transmit
    ///
    /// 1. Assert the TX line unless inhibited.
    /// 2. Mark the radio as transmitting.
    /// 3. Apply the shift: RIT saves the receive frequency and tunes to its
    ///    TX frequency, split swaps to the other VFO without saving.
    /// 4. For CW (and not inhibited) silence the carrier and second LO and
    ///    move the first LO onto the carrier frequency.
    ///
    /// Calling this while already transmitting is logged and ignored.
    pub fn tx_start(&mut self, mode: TxMode) {
        if self.state.in_tx() {
            warn!("tx start while transmitting ignored");
            return;
        }
        let inhibit = self.state.tx_inhibit();
        if !inhibit {
            self.hw.set_tx_rx(true);
        }
        self.state = self.state.with_in_tx(true);

        match self.state.shift_mode() {
            ShiftMode::Rit { tx, .. } => {
                let rx = self.state.frequency();
                self.state = self.state.with_shift(ShiftMode::Rit { tx, rx });
                self.set_frequency(tx.as_hz());
            }
            ShiftMode::Split => self.vfo_swap(false),
            ShiftMode::None => {}
        }

        if mode == TxMode::Cw && !inhibit {
            let carrier = cw_carrier_hz(
                self.state.frequency().as_hz(),
                self.state.settings().cw_side_tone,
                self.state.sideband(),
            );
            self.hw.set_oscillator(ClockOutput::Carrier, 0);
            self.hw.set_oscillator(ClockOutput::SecondLo, 0);
            self.hw.set_oscillator(ClockOutput::FirstLo, carrier);
        }

        info!("TX {} on {}", mode, self.state.frequency());
        self.mark_dirty();
    }

    /// Return to receive
    ///
    /// Drops the TX line, restores the carrier oscillator, undoes the
    /// shift applied by [`Self::tx_start`] and retunes.
    pub fn tx_stop(&mut self) {
        self.state = self.state.with_in_tx(false);
        self.hw.set_tx_rx(false);
        self.hw
            .set_oscillator(ClockOutput::Carrier, self.state.settings().usb_carrier);

        match self.state.shift_mode() {
            ShiftMode::Rit { rx, .. } => self.state = self.state.with_frequency(rx),
            ShiftMode::Split => self.vfo_swap(false),
            ShiftMode::None => {}
        }
        self.set_frequency(self.state.frequency().as_hz());

        info!("RX on {}", self.state.frequency());
        self.mark_dirty();
    }

    /// Gate the CW carrier and sidetone
    pub fn cw_key(&mut self, down: bool) {
        if down {
            self.hw.sidetone_on(self.state.settings().cw_side_tone);
        } else {
            self.hw.sidetone_off();
        }
        self.hw.set_cw_key(down);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cw_carrier_follows_sideband() {
        assert_eq!(cw_carrier_hz(7_030_000, 800, Sideband::Usb), 7_030_800);
        assert_eq!(cw_carrier_hz(7_030_000, 800, Sideband::Lsb), 7_029_200);
    }
}
