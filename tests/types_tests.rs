//! Types Module Tests
//!
//! Tests for domain types (Frequency, Sideband, LpfBand, Paddle, etc.)
//! Run with: cargo test --no-default-features --features std --test types_tests

use ubitx_firmware::types::{
    ClockOutput, Frequency, IambicMode, LpfBand, Paddle, Sideband, VfoSelect,
};

// =============================================================================
// Frequency Tests
// =============================================================================

#[test]
fn frequency_from_hz_bounds() {
    assert!(Frequency::from_hz(1_000_000).is_some());
    assert!(Frequency::from_hz(30_000_000).is_some());
    assert!(Frequency::from_hz(999_999).is_none());
    assert!(Frequency::from_hz(30_000_001).is_none());
}

#[test]
fn frequency_clamped() {
    assert_eq!(Frequency::clamped(0), Frequency::MIN);
    assert_eq!(Frequency::clamped(u32::MAX), Frequency::MAX);
    assert_eq!(Frequency::clamped(7_074_000).as_hz(), 7_074_000);
}

#[test]
fn frequency_from_khz() {
    assert_eq!(Frequency::from_khz(7_074).map(Frequency::as_hz), Some(7_074_000));
    assert!(Frequency::from_khz(u32::MAX).is_none());
}

#[test]
fn frequency_offset_saturates_at_edges() {
    let f = Frequency::clamped(1_000_050);
    assert_eq!(f.offset(-100).as_hz(), 1_000_000);
    assert_eq!(Frequency::MAX.offset(10_000), Frequency::MAX);
    assert_eq!(f.offset(50).as_khz(), 1_000);
}

#[test]
fn frequency_display() {
    assert_eq!(Frequency::clamped(7_074_000).to_string(), "7.074.000");
    assert_eq!(Frequency::clamped(14_200_050).to_string(), "14.200.050");
}

// =============================================================================
// Sideband / VFO
// =============================================================================

#[test]
fn sideband_follows_10mhz_convention() {
    assert_eq!(Sideband::for_frequency(Frequency::clamped(7_074_000)), Sideband::Lsb);
    assert_eq!(Sideband::for_frequency(Frequency::clamped(10_000_000)), Sideband::Usb);
    assert_eq!(Sideband::Usb.toggle(), Sideband::Lsb);
    assert_eq!(Sideband::Lsb.name(), "LSB");
}

#[test]
fn vfo_toggle() {
    assert_eq!(VfoSelect::A.toggle(), VfoSelect::B);
    assert_eq!(VfoSelect::B.toggle(), VfoSelect::A);
}

// =============================================================================
// Filter and oscillator addressing
// =============================================================================

#[test]
fn lpf_relay_patterns() {
    assert_eq!(LpfBand::Above21MHz.relays(), (false, false, false));
    assert_eq!(LpfBand::From14To21MHz.relays(), (true, false, false));
    assert_eq!(LpfBand::From7To14MHz.relays(), (false, true, false));
    assert_eq!(LpfBand::UpTo7MHz.relays(), (false, false, true));
}

#[test]
fn clock_output_indices() {
    assert_eq!(ClockOutput::Carrier.index(), 0);
    assert_eq!(ClockOutput::SecondLo.index(), 1);
    assert_eq!(ClockOutput::FirstLo.index(), 2);
}

// =============================================================================
// Keyer inputs
// =============================================================================

#[test]
fn iambic_mode_indices() {
    for mode in [IambicMode::Straight, IambicMode::IambicA, IambicMode::IambicB] {
        assert_eq!(IambicMode::from_index(mode.index()), Some(mode));
    }
    assert_eq!(IambicMode::from_index(3), None);
    assert!(!IambicMode::Straight.is_iambic());
}

#[test]
fn paddle_ladder_ranges() {
    assert_eq!(Paddle::from_adc(0, false), Paddle::Dot);
    assert_eq!(Paddle::from_adc(50, true), Paddle::None);
    assert_eq!(Paddle::from_adc(51, true), Paddle::Both);
    assert_eq!(Paddle::from_adc(300, true), Paddle::Both);
    assert_eq!(Paddle::from_adc(301, true), Paddle::Dot);
    assert_eq!(Paddle::from_adc(600, true), Paddle::Dot);
    assert_eq!(Paddle::from_adc(601, true), Paddle::Dash);
    assert_eq!(Paddle::from_adc(800, true), Paddle::Dash);
    assert_eq!(Paddle::from_adc(801, false), Paddle::None);
    assert_eq!(Paddle::from_adc(1023, true), Paddle::None);
}

#[test]
fn paddle_contacts() {
    assert!(Paddle::Both.dot() && Paddle::Both.dash());
    assert!(Paddle::Dot.dot() && !Paddle::Dot.dash());
    assert!(!Paddle::None.is_pressed());
}
