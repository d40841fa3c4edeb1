//! Radio State
//!
//! Everything the operator or a remote controller can observe about the
//! radio. Transitions return new instances; only the transceiver swaps the
//! live copy, so every other component sees a read-only view.

use crate::radio::settings::{Settings, VfoSlot};
use crate::types::{Frequency, IambicMode, Sideband, VfoSelect};

/// Frequency-offset mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShiftMode {
    /// Transmit and receive on the dial frequency
    #[default]
    None,
    /// Receive incremental tuning
    Rit {
        /// Frequency to transmit on
        tx: Frequency,
        /// Receive frequency saved while transmitting
        rx: Frequency,
    },
    /// Transmit on the inactive VFO
    Split,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ShiftMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "NONE"),
            Self::Rit { tx, rx } => defmt::write!(f, "RIT(tx={} rx={})", tx, rx),
            Self::Split => defmt::write!(f, "SPLIT"),
        }
    }
}

/// Complete radio state (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioState {
    /// Operating (dial) frequency
    frequency: Frequency,
    /// Active sideband
    sideband: Sideband,
    /// Active VFO
    vfo: VfoSelect,
    /// RIT / split
    shift: ShiftMode,
    /// Transmitting
    in_tx: bool,
    /// Transmit lockout: TX sequencing runs but the TX line stays low
    tx_inhibit: bool,
    /// Persisted configuration including both VFO memories
    settings: Settings,
}

impl RadioState {
    /// Create the power-on state: VFO A active, receiving
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self {
            frequency: settings.vfo_a.frequency,
            sideband: settings.vfo_a.sideband,
            vfo: VfoSelect::A,
            shift: ShiftMode::None,
            in_tx: false,
            tx_inhibit: false,
            settings,
        }
    }

    /// Get operating frequency
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Get active sideband
    #[must_use]
    pub const fn sideband(&self) -> Sideband {
        self.sideband
    }

    /// Check if upper sideband is active
    #[must_use]
    pub const fn is_usb(&self) -> bool {
        self.sideband.is_usb()
    }

    /// Get active VFO
    #[must_use]
    pub const fn active_vfo(&self) -> VfoSelect {
        self.vfo
    }

    /// Check if VFO A is active
    #[must_use]
    pub const fn vfo_a_active(&self) -> bool {
        matches!(self.vfo, VfoSelect::A)
    }

    /// Get the stored memory of a VFO
    #[must_use]
    pub const fn vfo(&self, select: VfoSelect) -> VfoSlot {
        match select {
            VfoSelect::A => self.settings.vfo_a,
            VfoSelect::B => self.settings.vfo_b,
        }
    }

    /// Get shift mode
    #[must_use]
    pub const fn shift_mode(&self) -> ShiftMode {
        self.shift
    }

    /// Check if RIT is active
    #[must_use]
    pub const fn is_rit(&self) -> bool {
        matches!(self.shift, ShiftMode::Rit { .. })
    }

    /// Check if split is active
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self.shift, ShiftMode::Split)
    }

    /// Check if transmitting
    #[must_use]
    pub const fn in_tx(&self) -> bool {
        self.in_tx
    }

    /// Check if the TX line is locked out
    #[must_use]
    pub const fn tx_inhibit(&self) -> bool {
        self.tx_inhibit
    }

    /// Get settings
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get keying mode
    #[must_use]
    pub const fn iambic_mode(&self) -> IambicMode {
        self.settings.iambic_mode
    }

    /// Set frequency (returns new state)
    #[must_use]
    pub const fn with_frequency(self, frequency: Frequency) -> Self {
        Self { frequency, ..self }
    }

    /// Set sideband (returns new state)
    #[must_use]
    pub const fn with_sideband(self, sideband: Sideband) -> Self {
        Self { sideband, ..self }
    }

    /// Select VFO (returns new state)
    #[must_use]
    pub const fn with_vfo(self, vfo: VfoSelect) -> Self {
        Self { vfo, ..self }
    }

    /// Set shift mode (returns new state)
    #[must_use]
    pub const fn with_shift(self, shift: ShiftMode) -> Self {
        Self { shift, ..self }
    }

    /// Set TX flag (returns new state)
    #[must_use]
    pub const fn with_in_tx(self, in_tx: bool) -> Self {
        Self { in_tx, ..self }
    }

    /// Set TX lockout (returns new state)
    #[must_use]
    pub const fn with_tx_inhibit(self, tx_inhibit: bool) -> Self {
        Self { tx_inhibit, ..self }
    }

    /// Replace settings (returns new state)
    #[must_use]
    pub const fn with_settings(self, settings: Settings) -> Self {
        Self { settings, ..self }
    }

    /// Store a VFO memory (returns new state)
    #[must_use]
    pub const fn with_vfo_slot(self, select: VfoSelect, slot: VfoSlot) -> Self {
        let mut settings = self.settings;
        match select {
            VfoSelect::A => settings.vfo_a = slot,
            VfoSelect::B => settings.vfo_b = slot,
        }
        Self { settings, ..self }
    }
}

impl Default for RadioState {
    fn default() -> Self {
        Self::new(Settings::factory())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Radio({}, {}, {}, {}, tx={})",
            self.frequency,
            self.sideband,
            self.vfo,
            self.shift,
            self.in_tx
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state_uses_vfo_a() {
        let state = RadioState::default();
        assert_eq!(state.frequency().as_hz(), 3_573_000);
        assert!(state.is_usb());
        assert!(state.vfo_a_active());
        assert_eq!(state.shift_mode(), ShiftMode::None);
        assert!(!state.in_tx());
    }

    #[test]
    fn builders_leave_other_fields_alone() {
        let state = RadioState::default();
        let next = state.with_in_tx(true).with_shift(ShiftMode::Split);
        assert!(next.in_tx());
        assert!(next.is_split());
        assert_eq!(next.frequency(), state.frequency());
        assert_eq!(next.settings(), state.settings());
    }
}
