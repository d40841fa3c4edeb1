//! Communication Protocols
//!
//! CAT (Computer Aided Transceiver) remote control. The radio emulates
//! the Yaesu FT-817 binary command set so common logging and digital-mode
//! software can drive it unmodified.

pub mod bcd;
pub mod cat;
pub mod eeprom;

pub use cat::{CatEngine, CatFrame, Opcode};
