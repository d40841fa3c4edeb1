//! Transceiver
//!
//! Owns the live [`RadioState`], the rig outputs and the settings store.
//! Frequency/VFO management lives in [`super::vfo`], TX/RX sequencing in
//! [`super::transmit`]; both are inherent impls on [`Transceiver`] so a
//! single owner mediates every state change.

use crate::config::limits;
use crate::hal::RigOutputs;
use crate::radio::settings::{self, SettingField, Settings, SettingsError, SettingsStore};
use crate::radio::state::RadioState;
use crate::types::{ClockOutput, IambicMode};

/// The radio control core
pub struct Transceiver<H, S> {
    pub(crate) state: RadioState,
    pub(crate) hw: H,
    store: S,
    dirty: bool,
}

impl<H: RigOutputs, S: SettingsStore> Transceiver<H, S> {
    /// Bring the radio up with loaded settings
    ///
    /// Calibrates the synthesizer, starts the carrier oscillator and tunes
    /// VFO A.
    pub fn new(mut hw: H, store: S, settings: Settings) -> Self {
        hw.calibrate(settings.master_cal);
        hw.set_oscillator(ClockOutput::Carrier, settings.usb_carrier);
        let mut radio = Self {
            state: RadioState::new(settings),
            hw,
            store,
            dirty: true,
        };
        radio.set_frequency(settings.vfo_a.frequency.as_hz());
        info!("radio up on {} {}", radio.state.frequency(), radio.state.sideband());
        radio
    }

    /// Bring the radio up from stored settings
    ///
    /// # Errors
    ///
    /// When the store is unusable it is rewritten with factory defaults
    /// and the load error is returned; the caller is expected to halt.
    pub fn from_store(hw: H, mut store: S) -> Result<Self, SettingsError> {
        match settings::load(&mut store) {
            Ok(loaded) => Ok(Self::new(hw, store, loaded)),
            Err(err) => {
                error!("settings: {}", err);
                settings::factory_reset(&mut store);
                Err(err)
            }
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &RadioState {
        &self.state
    }

    /// Rig outputs
    #[must_use]
    pub const fn hardware(&self) -> &H {
        &self.hw
    }

    /// Rig outputs (mutable)
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Settings store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Flag the display for a redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consume the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    /// Update a setting in RAM and in the store
    pub(crate) fn persist(&mut self, field: SettingField) {
        let mut settings = *self.state.settings();
        settings.apply(field);
        self.state = self.state.with_settings(settings);
        self.store.save(field);
        debug!("saved {}", field);
    }

    /// Set dit length in milliseconds
    pub fn cw_speed_set(&mut self, dit_ms: u32) {
        self.persist(SettingField::CwSpeed(dit_ms.max(1)));
        self.mark_dirty();
    }

    /// Set keyer speed in words per minute
    pub fn cw_wpm_set(&mut self, wpm: u32) {
        let (lo, hi) = limits::CW_WPM;
        let wpm = wpm.clamp(lo, hi);
        self.cw_speed_set(crate::config::CW_WPM_DIT_MS / wpm);
    }

    /// Set sidetone pitch
    pub fn cw_tone_set(&mut self, hz: u32) {
        let (lo, hi) = limits::CW_TONE_HZ;
        self.persist(SettingField::CwSideTone(hz.clamp(lo, hi)));
        self.mark_dirty();
    }

    /// Set TX hang time in units of 10 ms
    pub fn cw_delay_time_set(&mut self, units: u32) {
        let (lo, hi) = limits::CW_DELAY_TIME;
        self.persist(SettingField::CwDelayTime(units.clamp(lo, hi)));
        self.mark_dirty();
    }

    /// Select keying mode by persisted index (0 straight, 1 A, 2 B)
    ///
    /// Unknown indices are ignored.
    pub fn iambic_key_set(&mut self, index: u8) {
        match IambicMode::from_index(index) {
            Some(mode) => {
                self.persist(SettingField::IambicMode(mode));
                info!("keyer mode {}", mode);
                self.mark_dirty();
            }
            None => warn!("ignoring keyer mode {}", index),
        }
    }

    /// Set BFO frequency and retune
    pub fn set_usb_carrier(&mut self, hz: u32) {
        let (lo, hi) = limits::USB_CARRIER_HZ;
        let hz = hz.clamp(lo, hi);
        self.persist(SettingField::UsbCarrier(hz));
        self.hw.set_oscillator(ClockOutput::Carrier, hz);
        self.set_frequency(self.state.frequency().as_hz());
    }

    /// Set synthesizer calibration and retune
    pub fn set_master_cal(&mut self, master_cal: i32) {
        self.persist(SettingField::MasterCal(master_cal));
        self.hw.calibrate(master_cal);
        self.hw
            .set_oscillator(ClockOutput::Carrier, self.state.settings().usb_carrier);
        self.set_frequency(self.state.frequency().as_hz());
    }

    /// Lock out (or release) the TX line
    pub fn tx_inhibit_set(&mut self, inhibit: bool) {
        self.state = self.state.with_tx_inhibit(inhibit);
        info!("tx inhibit {}", inhibit);
        self.mark_dirty();
    }

    /// Rewrite the store with factory defaults
    ///
    /// The running state is left alone; the defaults apply from the next
    /// power-up.
    pub fn factory_reset(&mut self) {
        settings::factory_reset(&mut self.store);
        self.mark_dirty();
    }
}
