//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --no-default-features --features std --test config_tests

use ubitx_firmware::config::*;

// =============================================================================
// Frequency plan
// =============================================================================

#[test]
fn tuning_range_is_hf() {
    assert_eq!(LOWEST_FREQ, 1_000_000);
    assert_eq!(HIGHEST_FREQ, 30_000_000);
}

#[test]
fn first_lo_stays_above_if() {
    // The first LO must never fold back into the IF passband
    assert!(FIRST_IF > HIGHEST_FREQ);
    assert!(FIRST_IF.checked_add(HIGHEST_FREQ).is_some());
}

#[test]
fn sideband_switch_inside_range() {
    assert!((LOWEST_FREQ..=HIGHEST_FREQ).contains(&SIDEBAND_SWITCH_HZ));
}

#[test]
fn lpf_edges_ordered() {
    assert!(lpf::RELAY_B_ABOVE_HZ < lpf::RELAY_A_FROM_HZ);
    assert!(lpf::RELAY_A_FROM_HZ < lpf::ABOVE_HZ);
}

// =============================================================================
// Si5351
// =============================================================================

#[test]
fn si5351_vco_in_range() {
    let vco = u64::from(SI5351_XTAL_FREQ) * u64::from(SI5351_PLL_MULT);
    assert!((600_000_000..=900_000_000).contains(&vco));
    assert_eq!(SI5351_I2C_ADDR, 0x60);
}

// =============================================================================
// CAT and keyer timing
// =============================================================================

#[test]
fn cat_framing() {
    assert_eq!(CAT_FRAME_LEN, 5);
    assert_eq!(CAT_RECEIVE_TIMEOUT_MS, 500);
    assert!(CAT_RX_BUFFER_SIZE >= 2 * CAT_FRAME_LEN);
    assert_eq!(CAT_BAUD_RATE, 38_400);
}

#[test]
fn keyer_timing() {
    assert_eq!(CW_PREKEY_GUARD_MS, 100);
    assert_eq!(CW_DELAY_UNIT_MS, 10);
    assert!(KEYER_MAX_STEPS >= 4);
}

#[test]
fn keyer_ladder_ranges_ordered() {
    assert!(keyer_adc::SHORTED_MAX < keyer_adc::BOTH_MAX);
    assert!(keyer_adc::BOTH_MAX < keyer_adc::DOT_MAX);
    assert!(keyer_adc::DOT_MAX < keyer_adc::DASH_MAX);
    assert!(keyer_adc::DASH_MAX < 1024);
}

#[test]
fn tuning_steps_grow() {
    assert!(TUNE_STEP_SLOW_HZ < TUNE_STEP_MEDIUM_HZ);
    assert!(TUNE_STEP_MEDIUM_HZ < TUNE_STEP_FAST_HZ);
    assert!(TUNE_MEDIUM_PULSES < TUNE_FAST_PULSES);
}

// =============================================================================
// Factory defaults
// =============================================================================

#[test]
fn defaults_inside_limits() {
    let in_range = |(lo, hi): (u32, u32), v: u32| lo <= v && v <= hi;

    assert!(in_range(limits::CW_TONE_HZ, defaults::CW_SIDE_TONE));
    assert!(in_range(limits::CW_DELAY_TIME, defaults::CW_DELAY_TIME));
    assert!(in_range(limits::USB_CARRIER_HZ, defaults::USB_CARRIER));
    assert!(in_range(limits::CW_WPM, CW_WPM_DIT_MS / defaults::CW_SPEED));
    assert!((limits::MASTER_CAL.0..=limits::MASTER_CAL.1).contains(&defaults::MASTER_CAL));
    assert!((LOWEST_FREQ..=HIGHEST_FREQ).contains(&defaults::VFO_A));
    assert!((LOWEST_FREQ..=HIGHEST_FREQ).contains(&defaults::VFO_B));
}

// =============================================================================
// Pins
// =============================================================================

#[test]
fn pins_unique() {
    let all = [
        pins::LED_STATUS,
        pins::I2C1_SCL,
        pins::I2C1_SDA,
        pins::ENCODER_A,
        pins::ENCODER_B,
        pins::FBUTTON,
        pins::PTT_IN,
        pins::ANALOG_KEYER,
        pins::CAT_TX,
        pins::CAT_RX,
        pins::TX_RX,
        pins::CW_KEY,
        pins::CW_TONE,
        pins::TX_LPF_A,
        pins::TX_LPF_B,
        pins::TX_LPF_C,
    ];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
