//! Packed BCD frequency codec
//!
//! FT-817 CAT carries frequencies as eight BCD digits in 10 Hz units,
//! most significant digit first.

/// Encode a frequency in Hz (truncated to 10 Hz) into 4 packed BCD bytes
#[must_use]
pub const fn encode_frequency(hz: u32) -> [u8; 4] {
    let mut n = (hz / 10) % 100_000_000;
    let mut out = [0u8; 4];
    let mut i = 4;
    while i > 0 {
        i -= 1;
        let low = (n % 10) as u8;
        n /= 10;
        let high = (n % 10) as u8;
        n /= 10;
        out[i] = (high << 4) | low;
    }
    out
}

/// Decode 4 packed BCD bytes into a frequency in Hz
///
/// Returns `None` if any nibble is not a decimal digit.
#[must_use]
pub fn decode_frequency(bytes: [u8; 4]) -> Option<u32> {
    let mut value = 0u32;
    for b in bytes {
        let high = b >> 4;
        let low = b & 0x0F;
        if high > 9 || low > 9 {
            return None;
        }
        value = value * 100 + u32::from(high) * 10 + u32::from(low);
    }
    Some(value * 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_frequency_layout() {
        assert_eq!(encode_frequency(14_074_000), [0x01, 0x40, 0x74, 0x00]);
        assert_eq!(decode_frequency([0x00, 0x70, 0x30, 0x00]), Some(7_030_000));
    }

    #[test]
    fn sub_10hz_is_truncated() {
        assert_eq!(encode_frequency(7_074_009), encode_frequency(7_074_000));
    }

    #[test]
    fn rejects_hex_nibbles() {
        assert_eq!(decode_frequency([0x0A, 0x00, 0x00, 0x00]), None);
    }
}
