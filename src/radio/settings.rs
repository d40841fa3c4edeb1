//! Persistent Settings
//!
//! Operator and calibration values that survive power cycles. The core
//! reads them once at startup through a [`SettingsStore`] and writes each
//! field back individually when an operation changes it.

use core::fmt;

use crate::config::{defaults, CW_DELAY_UNIT_MS, CW_WPM_DIT_MS};
use crate::types::{Frequency, IambicMode, Sideband};

/// Frequency and sideband memory of one VFO
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VfoSlot {
    /// Dial frequency
    pub frequency: Frequency,
    /// Sideband
    pub sideband: Sideband,
}

impl VfoSlot {
    /// Create a slot
    #[must_use]
    pub const fn new(frequency: Frequency, sideband: Sideband) -> Self {
        Self {
            frequency,
            sideband,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VfoSlot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} {}", self.frequency, self.sideband);
    }
}

/// Complete persisted configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Synthesizer reference calibration
    pub master_cal: i32,
    /// BFO frequency in Hz
    pub usb_carrier: u32,
    /// Sidetone pitch in Hz (also the CW transmit offset)
    pub cw_side_tone: u32,
    /// Dit length in milliseconds
    pub cw_speed: u32,
    /// TX hang time in units of 10 ms
    pub cw_delay_time: u32,
    /// Keying mode
    pub iambic_mode: IambicMode,
    /// VFO A memory
    pub vfo_a: VfoSlot,
    /// VFO B memory
    pub vfo_b: VfoSlot,
}

impl Settings {
    /// Factory defaults
    #[must_use]
    pub const fn factory() -> Self {
        Self {
            master_cal: defaults::MASTER_CAL,
            usb_carrier: defaults::USB_CARRIER,
            cw_side_tone: defaults::CW_SIDE_TONE,
            cw_speed: defaults::CW_SPEED,
            cw_delay_time: defaults::CW_DELAY_TIME,
            iambic_mode: IambicMode::IambicA,
            vfo_a: VfoSlot::new(
                Frequency::clamped(defaults::VFO_A),
                Sideband::from_usb(defaults::VFO_A_USB),
            ),
            vfo_b: VfoSlot::new(
                Frequency::clamped(defaults::VFO_B),
                Sideband::from_usb(defaults::VFO_B_USB),
            ),
        }
    }

    /// Hang time in milliseconds
    #[must_use]
    pub const fn cw_delay_ms(&self) -> u64 {
        self.cw_delay_time as u64 * CW_DELAY_UNIT_MS
    }

    /// Keyer speed in words per minute
    #[must_use]
    pub const fn cw_wpm(&self) -> u32 {
        if self.cw_speed == 0 {
            0
        } else {
            CW_WPM_DIT_MS / self.cw_speed
        }
    }

    /// Check that loaded values can drive the radio
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::OutOfRange`] naming the first bad field.
    pub const fn validate(&self) -> Result<(), SettingsError> {
        if self.cw_speed == 0 {
            return Err(SettingsError::OutOfRange("cw_speed"));
        }
        if self.cw_delay_time == 0 {
            return Err(SettingsError::OutOfRange("cw_delay_time"));
        }
        if self.usb_carrier == 0 {
            return Err(SettingsError::OutOfRange("usb_carrier"));
        }
        Ok(())
    }

    /// Write one field into this set
    pub fn apply(&mut self, field: SettingField) {
        match field {
            SettingField::MasterCal(v) => self.master_cal = v,
            SettingField::UsbCarrier(v) => self.usb_carrier = v,
            SettingField::CwSideTone(v) => self.cw_side_tone = v,
            SettingField::CwSpeed(v) => self.cw_speed = v,
            SettingField::CwDelayTime(v) => self.cw_delay_time = v,
            SettingField::IambicMode(v) => self.iambic_mode = v,
            SettingField::VfoA(v) => self.vfo_a.frequency = v,
            SettingField::VfoAUsb(v) => self.vfo_a.sideband = Sideband::from_usb(v),
            SettingField::VfoB(v) => self.vfo_b.frequency = v,
            SettingField::VfoBUsb(v) => self.vfo_b.sideband = Sideband::from_usb(v),
        }
    }

    /// Every field, in storage order
    #[must_use]
    pub const fn fields(&self) -> [SettingField; 10] {
        [
            SettingField::MasterCal(self.master_cal),
            SettingField::UsbCarrier(self.usb_carrier),
            SettingField::CwSideTone(self.cw_side_tone),
            SettingField::VfoA(self.vfo_a.frequency),
            SettingField::VfoAUsb(self.vfo_a.sideband.is_usb()),
            SettingField::VfoB(self.vfo_b.frequency),
            SettingField::VfoBUsb(self.vfo_b.sideband.is_usb()),
            SettingField::CwSpeed(self.cw_speed),
            SettingField::CwDelayTime(self.cw_delay_time),
            SettingField::IambicMode(self.iambic_mode),
        ]
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::factory()
    }
}

/// A single persisted value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    /// Reference calibration
    MasterCal(i32),
    /// BFO frequency
    UsbCarrier(u32),
    /// Sidetone pitch
    CwSideTone(u32),
    /// Dit length in milliseconds
    CwSpeed(u32),
    /// Hang time in units of 10 ms
    CwDelayTime(u32),
    /// Keying mode
    IambicMode(IambicMode),
    /// VFO A frequency
    VfoA(Frequency),
    /// VFO A sideband flag
    VfoAUsb(bool),
    /// VFO B frequency
    VfoB(Frequency),
    /// VFO B sideband flag
    VfoBUsb(bool),
}

#[cfg(feature = "embedded")]
impl defmt::Format for SettingField {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::MasterCal(v) => defmt::write!(f, "master_cal={}", v),
            Self::UsbCarrier(v) => defmt::write!(f, "usb_carrier={}", v),
            Self::CwSideTone(v) => defmt::write!(f, "cw_side_tone={}", v),
            Self::CwSpeed(v) => defmt::write!(f, "cw_speed={}", v),
            Self::CwDelayTime(v) => defmt::write!(f, "cw_delay_time={}", v),
            Self::IambicMode(v) => defmt::write!(f, "iambic={}", v),
            Self::VfoA(v) => defmt::write!(f, "vfo_a={}", v),
            Self::VfoAUsb(v) => defmt::write!(f, "vfo_a_usb={}", v),
            Self::VfoB(v) => defmt::write!(f, "vfo_b={}", v),
            Self::VfoBUsb(v) => defmt::write!(f, "vfo_b_usb={}", v),
        }
    }
}

/// What a store hands back on load
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredSettings {
    /// Field values as stored
    pub settings: Settings,
    /// The store carries the initialization marker
    pub initialized: bool,
}

/// Settings load failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// The store has never been written
    Uninitialized,
    /// A stored field cannot drive the radio
    OutOfRange(&'static str),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "settings store is uninitialized"),
            Self::OutOfRange(field) => write!(f, "stored {field} is out of range"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SettingsError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Uninitialized => defmt::write!(f, "uninitialized"),
            Self::OutOfRange(field) => defmt::write!(f, "{} out of range", field),
        }
    }
}

/// Non-volatile settings storage
pub trait SettingsStore {
    /// Read every field and the initialization marker
    fn load(&mut self) -> StoredSettings;

    /// Persist one field
    fn save(&mut self, field: SettingField);

    /// Write the initialization marker
    fn mark_initialized(&mut self);
}

/// Load and validate settings
///
/// # Errors
///
/// Fails when the store was never initialized or holds unusable values.
/// Startup treats either as fatal: reset to factory defaults, then halt.
pub fn load<S: SettingsStore>(store: &mut S) -> Result<Settings, SettingsError> {
    let stored = store.load();
    if !stored.initialized {
        return Err(SettingsError::Uninitialized);
    }
    stored.settings.validate()?;
    Ok(stored.settings)
}

/// Write factory defaults and the initialization marker
pub fn factory_reset<S: SettingsStore>(store: &mut S) -> Settings {
    let settings = Settings::factory();
    for field in settings.fields() {
        store.save(field);
    }
    store.mark_initialized();
    warn!("settings reset to factory defaults");
    settings
}

/// Settings store kept in RAM
///
/// Backs host builds and boards without non-volatile storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    settings: Settings,
    initialized: bool,
    writes: u32,
}

impl MemoryStore {
    /// An uninitialized store
    #[must_use]
    pub const fn new() -> Self {
        Self {
            settings: Settings::factory(),
            initialized: false,
            writes: 0,
        }
    }

    /// A store already holding `settings`
    #[must_use]
    pub const fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            initialized: true,
            writes: 0,
        }
    }

    /// Current stored values
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of field writes since creation
    #[must_use]
    pub const fn writes(&self) -> u32 {
        self.writes
    }
}

impl SettingsStore for MemoryStore {
    fn load(&mut self) -> StoredSettings {
        StoredSettings {
            settings: self.settings,
            initialized: self.initialized,
        }
    }

    fn save(&mut self, field: SettingField) {
        self.settings.apply(field);
        self.writes += 1;
    }

    fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_store_is_rejected() {
        let mut store = MemoryStore::new();
        assert_eq!(load(&mut store), Err(SettingsError::Uninitialized));
    }

    #[test]
    fn factory_reset_initializes_store() {
        let mut store = MemoryStore::new();
        let settings = factory_reset(&mut store);
        assert_eq!(settings, Settings::factory());
        assert_eq!(load(&mut store), Ok(Settings::factory()));
        assert_eq!(store.writes(), 10);
    }

    #[test]
    fn zero_cw_speed_is_out_of_range() {
        let mut settings = Settings::factory();
        settings.cw_speed = 0;
        let mut store = MemoryStore::with_settings(settings);
        assert_eq!(load(&mut store), Err(SettingsError::OutOfRange("cw_speed")));
    }

    #[test]
    fn wpm_from_dit_length() {
        assert_eq!(Settings::factory().cw_wpm(), 12);
        assert_eq!(Settings::factory().cw_delay_ms(), 600);
    }
}
