//! uBITX Transceiver Control Library
//!
//! This library provides the control core for a uBITX HF transceiver
//! running on an STM32 with embassy. It keeps the radio state and drives
//! the `Si5351A` oscillators, the TX/RX and LPF relays, the CW key line
//! and the sidetone, and it answers FT-817 CAT commands from a host.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Radio tick  │  Menu  │  Display refresh                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   CONTROL CORE                               │
//! │  Frequency/VFO  │  TX/RX sequencer  │  Keyer  │  CAT engine  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  GPIO  │  ADC  │  PWM  │  UART  │  Si5351  │  Encoder        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Single owner**: every state change goes through [`radio::Transceiver`]
//! - **Type-driven design**: custom types enforce invariants at compile time
//! - **No unsafe in application code**
//! - **Functional core, imperative shell**: the control core only sees
//!   the traits in [`hal`], so it runs unchanged in host tests
//! - **Nothing blocks**: keyer and CAT timing are deadlines on a
//!   millisecond clock polled by the main loop

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Collaborator traits for the control core, plus embassy-stm32 adapters.
pub mod hal;

/// Peripheral Drivers
///
/// Encoder decoding and the `Si5351A` synthesizer.
pub mod drivers;

/// Radio Control Logic
///
/// State machines and business logic for radio operation.
pub mod radio;

/// Communication Protocols
///
/// FT-817 CAT command engine.
pub mod protocol;

/// Application loop and mode dispatch
pub mod app;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Control core
    pub use crate::app::{AppMode, QuickMenu, Radio};
    pub use crate::hal::{Clock, Display, OperatorInputs, PaddleSense, RigOutputs, SerialPort};
    pub use crate::radio::Transceiver;

    // Common traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::i2c::I2c;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
