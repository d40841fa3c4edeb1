//! Shared types used across the uBITX firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use crate::config::{keyer_adc, lpf, HIGHEST_FREQ, LOWEST_FREQ, SIDEBAND_SWITCH_HZ};

/// Frequency in Hertz with validation
///
/// Represents a dial frequency within the tunable range of the radio.
/// The frequency is stored in Hz for precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Minimum supported frequency
    pub const MIN_HZ: u32 = LOWEST_FREQ;

    /// Maximum supported frequency
    pub const MAX_HZ: u32 = HIGHEST_FREQ;

    /// Lowest tunable frequency
    pub const MIN: Self = Self(Self::MIN_HZ);

    /// Highest tunable frequency
    pub const MAX: Self = Self(Self::MAX_HZ);

    /// Create a new Frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        if hz >= Self::MIN_HZ && hz <= Self::MAX_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Create a new Frequency from Hz, clamping into the tunable range
    #[must_use]
    pub const fn clamped(hz: u32) -> Self {
        if hz < Self::MIN_HZ {
            Self::MIN
        } else if hz > Self::MAX_HZ {
            Self::MAX
        } else {
            Self(hz)
        }
    }

    /// Create a new Frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        Self::from_hz(khz.saturating_mul(1000))
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 / 1000
    }

    /// Offset by a signed amount, clamping into the tunable range
    #[must_use]
    pub fn offset(self, delta_hz: i64) -> Self {
        let hz = (i64::from(self.0) + delta_hz).clamp(0, i64::from(u32::MAX));
        Self::clamped(u32::try_from(hz).unwrap_or(u32::MAX))
    }

    /// Check if this frequency is in the range where USB is the convention
    #[must_use]
    pub const fn is_upper_band(self) -> bool {
        self.0 >= SIDEBAND_SWITCH_HZ
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03} kHz", self.0 / 1000, self.0 % 1000)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mhz = self.0 / 1_000_000;
        let khz = (self.0 % 1_000_000) / 1000;
        let hz = self.0 % 1000;
        write!(f, "{mhz}.{khz:03}.{hz:03}")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u32} Hz", self.0);
    }
}

/// Sideband selected by the BFO
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sideband {
    /// Lower sideband
    Lsb,
    /// Upper sideband
    #[default]
    Usb,
}

impl Sideband {
    /// Build from the stored "is USB" flag
    #[must_use]
    pub const fn from_usb(is_usb: bool) -> Self {
        if is_usb {
            Self::Usb
        } else {
            Self::Lsb
        }
    }

    /// Conventional sideband for a frequency (USB from 10 MHz up)
    #[must_use]
    pub const fn for_frequency(freq: Frequency) -> Self {
        Self::from_usb(freq.is_upper_band())
    }

    /// Check if upper sideband
    #[must_use]
    pub const fn is_usb(self) -> bool {
        matches!(self, Self::Usb)
    }

    /// The opposite sideband
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Lsb => Self::Usb,
            Self::Usb => Self::Lsb,
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lsb => "LSB",
            Self::Usb => "USB",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Sideband {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.name());
    }
}

/// Transmission mode requested from the sequencer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxMode {
    /// Voice: the normal SSB chain is keyed
    Ssb,
    /// Morse: the LO is retuned to emit a carrier directly
    Cw,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Ssb => defmt::write!(f, "SSB"),
            Self::Cw => defmt::write!(f, "CW"),
        }
    }
}

/// VFO selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VfoSelect {
    /// VFO A
    #[default]
    A,
    /// VFO B
    B,
}

impl VfoSelect {
    /// The other VFO
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VfoSelect {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::A => defmt::write!(f, "VFO-A"),
            Self::B => defmt::write!(f, "VFO-B"),
        }
    }
}

/// Transmit low-pass filter selection
///
/// Three relays (A, B, C) pick one of four filter sections. The
/// selection is a pure function of the dial frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpfBand {
    /// Above 21 MHz: no relay engaged
    Above21MHz,
    /// 14 to 21 MHz: relay A
    From14To21MHz,
    /// Above 7 up to 14 MHz: relay B
    From7To14MHz,
    /// Up to 7 MHz: relay C
    UpTo7MHz,
}

impl LpfBand {
    /// Select the filter for a frequency
    #[must_use]
    pub const fn for_frequency(freq: Frequency) -> Self {
        let hz = freq.as_hz();
        if hz > lpf::ABOVE_HZ {
            Self::Above21MHz
        } else if hz >= lpf::RELAY_A_FROM_HZ {
            Self::From14To21MHz
        } else if hz > lpf::RELAY_B_ABOVE_HZ {
            Self::From7To14MHz
        } else {
            Self::UpTo7MHz
        }
    }

    /// Relay drive pattern as `(A, B, C)`
    #[must_use]
    pub const fn relays(self) -> (bool, bool, bool) {
        match self {
            Self::Above21MHz => (false, false, false),
            Self::From14To21MHz => (true, false, false),
            Self::From7To14MHz => (false, true, false),
            Self::UpTo7MHz => (false, false, true),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LpfBand {
    fn format(&self, f: defmt::Formatter) {
        let (a, b, c) = self.relays();
        defmt::write!(f, "LPF(A={} B={} C={})", a, b, c);
    }
}

/// Synthesizer outputs and their role in the signal chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockOutput {
    /// CLK0: carrier oscillator (BFO)
    Carrier,
    /// CLK1: second local oscillator
    SecondLo,
    /// CLK2: first local oscillator (RF)
    FirstLo,
}

impl ClockOutput {
    /// Synthesizer output index
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Carrier => 0,
            Self::SecondLo => 1,
            Self::FirstLo => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockOutput {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CLK{}", self.index());
    }
}

/// Keying mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IambicMode {
    /// Straight key
    Straight,
    /// Iambic A
    #[default]
    IambicA,
    /// Iambic B (paddles latched while an element is sent)
    IambicB,
}

impl IambicMode {
    /// Decode the persisted selector (0 straight, 1 A, 2 B)
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Straight),
            1 => Some(Self::IambicA),
            2 => Some(Self::IambicB),
            _ => None,
        }
    }

    /// Persisted selector
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Straight => 0,
            Self::IambicA => 1,
            Self::IambicB => 2,
        }
    }

    /// Check if one of the iambic modes
    #[must_use]
    pub const fn is_iambic(self) -> bool {
        !matches!(self, Self::Straight)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for IambicMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Straight => defmt::write!(f, "STRAIGHT"),
            Self::IambicA => defmt::write!(f, "IAMBIC-A"),
            Self::IambicB => defmt::write!(f, "IAMBIC-B"),
        }
    }
}

/// Decoded paddle contacts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Paddle {
    /// Nothing closed
    #[default]
    None,
    /// Dot paddle (or a straight key)
    Dot,
    /// Dash paddle
    Dash,
    /// Both paddles squeezed
    Both,
}

impl Paddle {
    /// Decode a 10-bit reading of the analog keyer input
    ///
    /// A shorted input reads as a straight key (`Dot`) unless an iambic
    /// mode is active.
    #[must_use]
    pub const fn from_adc(level: u16, iambic: bool) -> Self {
        if level > keyer_adc::DOT_MAX && level <= keyer_adc::DASH_MAX {
            Self::Dash
        } else if level > keyer_adc::BOTH_MAX && level <= keyer_adc::DOT_MAX {
            Self::Dot
        } else if level > keyer_adc::SHORTED_MAX && level <= keyer_adc::BOTH_MAX {
            Self::Both
        } else if level <= keyer_adc::SHORTED_MAX && !iambic {
            Self::Dot
        } else {
            Self::None
        }
    }

    /// Dot contact closed
    #[must_use]
    pub const fn dot(self) -> bool {
        matches!(self, Self::Dot | Self::Both)
    }

    /// Dash contact closed
    #[must_use]
    pub const fn dash(self) -> bool {
        matches!(self, Self::Dash | Self::Both)
    }

    /// Any contact closed
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Paddle {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "-"),
            Self::Dot => defmt::write!(f, "DOT"),
            Self::Dash => defmt::write!(f, "DASH"),
            Self::Both => defmt::write!(f, "BOTH"),
        }
    }
}
