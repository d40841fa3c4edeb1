//! Peripheral Drivers
//!
//! The `Si5351A` synthesizer on the I2C bus (target only) and the
//! quadrature decoder for the tuning knob, which the host tests exercise.

#[cfg(feature = "embedded")]
pub mod si5351;
pub mod encoder;
