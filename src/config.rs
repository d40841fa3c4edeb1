//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the uBITX control core.
//! Frequency plan, protocol timing, keyer timing, factory defaults and
//! pin mappings are centralized here.

/// Lowest tunable frequency (1 MHz)
pub const LOWEST_FREQ: u32 = 1_000_000;

/// Highest tunable frequency (30 MHz)
pub const HIGHEST_FREQ: u32 = 30_000_000;

/// First intermediate frequency of the up-conversion chain
pub const FIRST_IF: u32 = 45_005_000;

/// Frequency at and above which upper sideband is the band convention
pub const SIDEBAND_SWITCH_HZ: u32 = 10_000_000;

/// LPF band edges in Hz
pub mod lpf {
    //! Relay selection thresholds for the transmit low-pass filters

    /// Above this frequency every relay is released
    pub const ABOVE_HZ: u32 = 21_000_000;

    /// At or above this frequency relay A is engaged
    pub const RELAY_A_FROM_HZ: u32 = 14_000_000;

    /// Above this frequency relay B is engaged
    pub const RELAY_B_ABOVE_HZ: u32 = 7_000_000;
}

/// `Si5351A` I2C address
pub const SI5351_I2C_ADDR: u8 = 0x60;

/// `Si5351A` crystal frequency
pub const SI5351_XTAL_FREQ: u32 = 25_000_000;

/// `Si5351A` PLL A multiplier
pub const SI5351_PLL_MULT: u32 = 35;

/// I2C bus frequency for the `Si5351A`
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

// ============================================================================
// CAT
// ============================================================================

/// CAT serial baud rate
pub const CAT_BAUD_RATE: u32 = 38_400;

/// Length of every CAT command frame
pub const CAT_FRAME_LEN: usize = 5;

/// Partial frames older than this are discarded
pub const CAT_RECEIVE_TIMEOUT_MS: u64 = 500;

/// Capacity of the serial receive ring
pub const CAT_RX_BUFFER_SIZE: usize = 64;

// ============================================================================
// Keyer
// ============================================================================

/// Delay between switching to TX and the first key-down
pub const CW_PREKEY_GUARD_MS: u64 = 100;

/// Units of the `cw_delay_time` setting
pub const CW_DELAY_UNIT_MS: u64 = 10;

/// Dit length to WPM conversion constant (PARIS)
pub const CW_WPM_DIT_MS: u32 = 1200;

/// Bounded number of keyer transitions evaluated in a single tick
pub const KEYER_MAX_STEPS: usize = 8;

/// Analog keyer input thresholds (10-bit scale)
pub mod keyer_adc {
    //! A resistor ladder on one ADC pin encodes the paddle contacts

    /// Up to this reading the input is shorted (straight key or both paddles)
    pub const SHORTED_MAX: u16 = 50;

    /// Up to this reading both paddles are closed
    pub const BOTH_MAX: u16 = 300;

    /// Up to this reading the dot paddle is closed
    pub const DOT_MAX: u16 = 600;

    /// Up to this reading the dash paddle is closed
    pub const DASH_MAX: u16 = 800;
}

// ============================================================================
// Tuning
// ============================================================================

/// Tuning step for fast knob motion
pub const TUNE_STEP_FAST_HZ: u32 = 10_000;

/// Tuning step for medium knob motion
pub const TUNE_STEP_MEDIUM_HZ: u32 = 500;

/// Tuning step for slow knob motion
pub const TUNE_STEP_SLOW_HZ: u32 = 50;

/// Pulse magnitude above which the fast step is used
pub const TUNE_FAST_PULSES: i32 = 4;

/// Pulse magnitude above which the medium step is used
pub const TUNE_MEDIUM_PULSES: i32 = 2;

/// Band select step
pub const BAND_STEP_HZ: u32 = 100_000;

/// Main loop period in milliseconds
pub const LOOP_PERIOD_MS: u64 = 1;

/// PTT input debounce time in milliseconds
pub const PTT_DEBOUNCE_MS: u32 = 50;

/// Button debounce time in milliseconds
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

// ============================================================================
// Factory defaults
// ============================================================================

/// Settings applied when the store reports it was never initialized
pub mod defaults {
    //! Factory defaults written by a settings reset

    /// Oscillator calibration
    pub const MASTER_CAL: i32 = 154_117;

    /// BFO (carrier) frequency
    pub const USB_CARRIER: u32 = 11_056_273;

    /// Sidetone frequency in Hz
    pub const CW_SIDE_TONE: u32 = 800;

    /// Dit length in milliseconds (12 WPM)
    pub const CW_SPEED: u32 = 100;

    /// Hang time in units of 10 ms
    pub const CW_DELAY_TIME: u32 = 60;

    /// VFO A frequency
    pub const VFO_A: u32 = 3_573_000;

    /// VFO A sideband
    pub const VFO_A_USB: bool = true;

    /// VFO B frequency
    pub const VFO_B: u32 = 7_074_000;

    /// VFO B sideband
    pub const VFO_B_USB: bool = true;
}

/// Accepted ranges for user-adjustable settings
pub mod limits {
    //! Operations that set these values clamp into the listed ranges

    /// Sidetone range in Hz
    pub const CW_TONE_HZ: (u32, u32) = (100, 2000);

    /// Keyer speed range in WPM
    pub const CW_WPM: (u32, u32) = (1, 100);

    /// Hang time range in units of 10 ms
    pub const CW_DELAY_TIME: (u32, u32) = (1, 101);

    /// BFO range in Hz
    pub const USB_CARRIER_HZ: (u32, u32) = (11_000_000, 11_099_999);

    /// Calibration range offered by the menu
    pub const MASTER_CAL: (i32, i32) = (-500_000, 500_000);
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments for the STM32G474 control board

    /// Status LED
    pub const LED_STATUS: &str = "PA5";

    /// I2C1 SCL (Si5351)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (Si5351)
    pub const I2C1_SDA: &str = "PB9";

    /// Encoder A input
    pub const ENCODER_A: &str = "PA0";

    /// Encoder B input
    pub const ENCODER_B: &str = "PA1";

    /// Function button (active low)
    pub const FBUTTON: &str = "PA2";

    /// PTT input (active low)
    pub const PTT_IN: &str = "PA3";

    /// Analog keyer input
    pub const ANALOG_KEYER: &str = "PA4";

    /// CAT USART1 TX
    pub const CAT_TX: &str = "PA9";

    /// CAT USART1 RX
    pub const CAT_RX: &str = "PA10";

    /// TX/RX switching line
    pub const TX_RX: &str = "PB0";

    /// CW carrier key line
    pub const CW_KEY: &str = "PB1";

    /// Sidetone PWM output
    pub const CW_TONE: &str = "PA6";

    /// LPF relay A
    pub const TX_LPF_A: &str = "PC0";

    /// LPF relay B
    pub const TX_LPF_B: &str = "PC1";

    /// LPF relay C
    pub const TX_LPF_C: &str = "PC2";
}
