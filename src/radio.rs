//! Radio Control Logic
//!
//! State, settings and the operations that change them: frequency and
//! VFO management, TX/RX sequencing, CW keying, tuning and PTT.

pub mod state;
pub mod settings;
pub mod transceiver;
pub mod vfo;
pub mod transmit;
pub mod keyer;
pub mod tuning;
pub mod ptt;

pub use transceiver::Transceiver;
