//! FT-817 EEPROM read emulation
//!
//! Host software reads a handful of FT-817 EEPROM locations to learn the
//! radio configuration. The answers below are a fixed compatibility table;
//! a few entries reflect live state, the rest are constants a real FT-817
//! would plausibly return.

use crate::radio::state::RadioState;
use crate::types::VfoSelect;

/// Answer a two-byte EEPROM read at `address`
#[must_use]
pub fn read(address: u16, state: &RadioState) -> [u8; 2] {
    let [high, low] = address.to_be_bytes();
    let settings = state.settings();

    match low {
        0x45 if high == 0x03 => [0x00, 0xD0],
        0x47 if high == 0x03 => [0xDC, 0xE0],
        // bit 7: VFO (not memory) mode, bit 0: VFO B
        0x55 => [0x80 | u8::from(state.active_vfo() == VfoSelect::B), 0x00],
        0x57 => [0xC0, 0x40],
        0x5C => [0xB2, 0x42],
        // CW pitch in 50 Hz steps from 300 Hz
        0x5E => [clamp_u8(settings.cw_side_tone.saturating_sub(300) / 50), 0x25],
        0x5F => [0x32, 0x08],
        0x60 => [clamp_u8(settings.cw_delay_time), 0x32],
        0x61 => [0x28, 0x08],
        // CW speed as WPM - 4
        0x62 => [clamp_u8(settings.cw_wpm().saturating_sub(4)), 0xB2],
        0x63 => [0xB2, 0xA5],
        0x67 => [0xB2, 0xB2],
        0x69 | 0x78 => [if state.is_usb() { 0x20 } else { 0x00 }, 0x00],
        0x7A => [if state.is_split() { 0xFF } else { 0x7F }, 0x00],
        0xB3 => [0x00, 0x4D],
        _ => [0x00, 0x00],
    }
}

fn clamp_u8(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_addresses_need_page_three() {
        let state = RadioState::default();
        assert_eq!(read(0x0345, &state), [0x00, 0xD0]);
        assert_eq!(read(0x0445, &state), [0x00, 0x00]);
        assert_eq!(read(0x0347, &state), [0xDC, 0xE0]);
        assert_eq!(read(0x0047, &state), [0x00, 0x00]);
    }

    #[test]
    fn keyer_settings_are_reported() {
        let state = RadioState::default();
        // 800 Hz tone, 60 x 10 ms delay, 12 WPM
        assert_eq!(read(0x005E, &state), [0x0A, 0x25]);
        assert_eq!(read(0x0060, &state), [60, 0x32]);
        assert_eq!(read(0x0062, &state), [8, 0xB2]);
    }

    #[test]
    fn unknown_address_reads_zero() {
        assert_eq!(read(0x0000, &RadioState::default()), [0x00, 0x00]);
    }
}
