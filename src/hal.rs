//! Hardware Abstraction Layer
//!
//! The control core never touches peripherals directly. Everything it
//! drives or samples goes through the traits in this module, which the
//! target build implements over embassy-stm32 peripherals and the host
//! tests implement with recording doubles.

use crate::types::{ClockOutput, LpfBand, Paddle};

#[cfg(feature = "embedded")]
pub mod gpio;
#[cfg(feature = "embedded")]
pub mod adc;
#[cfg(feature = "embedded")]
pub mod pwm;
#[cfg(feature = "embedded")]
pub mod uart;
#[cfg(feature = "embedded")]
pub mod board;

/// Outputs that change what the rig transmits or receives
///
/// Every call is fire-and-forget. Failures on the target are logged by
/// the implementation and never reported back to the core.
pub trait RigOutputs {
    /// Drive the TX/RX switching line
    fn set_tx_rx(&mut self, transmit: bool);

    /// Drive the CW key line (carrier gate)
    fn set_cw_key(&mut self, down: bool);

    /// Engage the relays for a low-pass filter section
    fn select_lpf(&mut self, band: LpfBand);

    /// Program a synthesizer output, 0 Hz switches the output off
    fn set_oscillator(&mut self, output: ClockOutput, hz: u32);

    /// Apply a new reference calibration to the synthesizer
    fn calibrate(&mut self, master_cal: i32);

    /// Start the sidetone at the given pitch
    fn sidetone_on(&mut self, hz: u32);

    /// Stop the sidetone
    fn sidetone_off(&mut self);
}

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;
}

/// Byte-oriented serial transport polled for available bytes
pub trait SerialPort {
    /// Number of bytes that can be read without waiting
    fn available(&self) -> usize;

    /// Read one byte if any is buffered
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission
    fn write(&mut self, bytes: &[u8]);
}

/// Paddle (or straight key) input
pub trait PaddleSense {
    /// Sample the paddle contacts
    ///
    /// `iambic` selects how a shorted input is decoded.
    fn read_paddle(&mut self, iambic: bool) -> Paddle;
}

/// Debounced operator inputs
pub trait OperatorInputs {
    /// PTT asserted
    fn ptt_pressed(&mut self) -> bool;

    /// Function button clicked since the last call
    fn button_clicked(&mut self) -> bool;
}

/// Receiver of "state changed, please redraw" notifications
pub trait Display {
    /// Redraw from the current radio state
    fn refresh(&mut self, state: &crate::radio::state::RadioState);
}
