//! FT-817 CAT engine
//!
//! Frames are five bytes: four parameter bytes followed by the opcode.
//! Bytes arrive over a polled serial port; an incomplete frame that sits
//! longer than [`CAT_RECEIVE_TIMEOUT_MS`] is discarded. Every recognised or
//! unrecognised opcode writes exactly one response.

use heapless::Vec;

use crate::config::{CAT_FRAME_LEN, CAT_RECEIVE_TIMEOUT_MS};
use crate::hal::{RigOutputs, SerialPort};
use crate::protocol::{bcd, eeprom};
use crate::radio::settings::SettingsStore;
use crate::radio::Transceiver;
use crate::types::{Sideband, TxMode};

/// Acknowledgement byte
pub const ACK: u8 = 0x00;

/// PTT-on reply when already transmitting
pub const NAK_ALREADY_TX: u8 = 0xF0;

/// Receiver status reply (squelch open, no CTCSS/DCS)
pub const RX_STATUS: u8 = 0x09;

/// FT-817 mode bytes that select LSB
const MODE_LSB: u8 = 0x00;
const MODE_CW_R: u8 = 0x03;

/// Mode byte reported for the active sideband
const MODE_REPORT_USB: u8 = 0x01;
const MODE_REPORT_LSB: u8 = 0x00;

/// Longest response
const MAX_RESPONSE_LEN: usize = 5;

/// CAT response buffer
pub type CatResponse = Vec<u8, MAX_RESPONSE_LEN>;

/// Supported opcodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Set dial frequency (BCD in bytes 0-3)
    SetFrequency,
    /// Split on
    SplitOn,
    /// Read frequency and mode
    ReadFrequencyMode,
    /// Set operating mode (byte 0)
    SetMode,
    /// PTT on
    PttOn,
    /// Toggle VFO A/B
    ToggleVfo,
    /// Split off
    SplitOff,
    /// PTT off
    PttOff,
    /// Read EEPROM (address in bytes 0-1)
    ReadEeprom,
    /// Read receiver status
    ReadRxStatus,
    /// Read transmitter status
    ReadTxStatus,
}

impl Opcode {
    /// Wire value
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::SetFrequency => 0x01,
            Self::SplitOn => 0x02,
            Self::ReadFrequencyMode => 0x03,
            Self::SetMode => 0x07,
            Self::PttOn => 0x08,
            Self::ToggleVfo => 0x81,
            Self::SplitOff => 0x82,
            Self::PttOff => 0x88,
            Self::ReadEeprom => 0xBB,
            Self::ReadRxStatus => 0xE7,
            Self::ReadTxStatus => 0xF7,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x01 => Self::SetFrequency,
            0x02 => Self::SplitOn,
            0x03 => Self::ReadFrequencyMode,
            0x07 => Self::SetMode,
            0x08 => Self::PttOn,
            0x81 => Self::ToggleVfo,
            0x82 => Self::SplitOff,
            0x88 => Self::PttOff,
            0xBB => Self::ReadEeprom,
            0xE7 => Self::ReadRxStatus,
            0xF7 => Self::ReadTxStatus,
            other => return Err(other),
        })
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Opcode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "op{=u8:#x}", self.code());
    }
}

/// One five-byte command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatFrame([u8; CAT_FRAME_LEN]);

impl CatFrame {
    /// Wrap raw frame bytes
    #[must_use]
    pub const fn new(bytes: [u8; CAT_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Parameter bytes
    #[must_use]
    pub const fn params(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// Opcode byte
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.0[4]
    }
}

/// CAT protocol engine
#[derive(Clone, Debug, Default)]
pub struct CatEngine {
    /// Buffered byte count last seen for an incomplete frame
    pending: usize,
    /// When the incomplete frame expires
    deadline_ms: u64,
    /// A captured frame has not finished executing
    busy: bool,
    /// Transmission was started by CAT
    tx_cat: bool,
}

impl CatEngine {
    /// Create an idle engine
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: 0,
            deadline_ms: 0,
            busy: false,
            tx_cat: false,
        }
    }

    /// Transmission was started by a CAT PTT command
    #[must_use]
    pub const fn owns_tx(&self) -> bool {
        self.tx_cat
    }

    /// A captured frame is still executing
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Poll the port and run at most one command
    pub fn tick<P, H, S>(&mut self, now_ms: u64, port: &mut P, radio: &mut Transceiver<H, S>)
    where
        P: SerialPort,
        H: RigOutputs,
        S: SettingsStore,
    {
        if let Some(frame) = self.receive(now_ms, port) {
            self.execute(frame, port, radio);
        }
    }

    /// Capture a complete frame from the port
    ///
    /// The engine stays busy until [`Self::execute`] finishes with the
    /// frame; any frame captured meanwhile is consumed and dropped.
    pub fn receive<P: SerialPort>(&mut self, now_ms: u64, port: &mut P) -> Option<CatFrame> {
        let available = port.available();
        if available == 0 {
            self.pending = 0;
            return None;
        }

        if self.pending > 0 && now_ms > self.deadline_ms {
            warn!("CAT: discarding {} stale bytes", available);
            while port.read_byte().is_some() {}
            self.pending = 0;
            return None;
        }

        if available < CAT_FRAME_LEN {
            if available > self.pending {
                self.pending = available;
                self.deadline_ms = now_ms + CAT_RECEIVE_TIMEOUT_MS;
            }
            return None;
        }

        let mut bytes = [0u8; CAT_FRAME_LEN];
        for byte in &mut bytes {
            *byte = port.read_byte().unwrap_or_default();
        }
        self.pending = 0;

        if self.busy {
            warn!("CAT: command {=u8:#x} dropped, dispatch in progress", bytes[4]);
            return None;
        }
        self.busy = true;
        Some(CatFrame::new(bytes))
    }

    /// Execute a captured frame and write its response
    pub fn execute<P, H, S>(&mut self, frame: CatFrame, port: &mut P, radio: &mut Transceiver<H, S>)
    where
        P: SerialPort,
        H: RigOutputs,
        S: SettingsStore,
    {
        let response = self.dispatch(frame, radio);
        port.write(&response);
        self.busy = false;
    }

    fn dispatch<H: RigOutputs, S: SettingsStore>(
        &mut self,
        frame: CatFrame,
        radio: &mut Transceiver<H, S>,
    ) -> CatResponse {
        let params = frame.params();
        let mut response = CatResponse::new();

        let opcode = match Opcode::try_from(frame.opcode()) {
            Ok(opcode) => opcode,
            Err(code) => {
                debug!("CAT: unknown opcode {=u8:#x}", code);
                push(&mut response, &[ACK]);
                return response;
            }
        };
        trace!("CAT: {}", opcode);

        match opcode {
            Opcode::SetFrequency => {
                match bcd::decode_frequency(params) {
                    Some(hz) => radio.set_frequency(hz),
                    None => warn!("CAT: malformed frequency"),
                }
                push(&mut response, &[ACK]);
            }
            Opcode::SplitOn => {
                radio.split_enable();
                push(&mut response, &[ACK]);
            }
            Opcode::SplitOff => {
                radio.split_disable();
                push(&mut response, &[ACK]);
            }
            Opcode::ReadFrequencyMode => {
                let state = radio.state();
                push(&mut response, &bcd::encode_frequency(state.frequency().as_hz()));
                let mode = if state.is_usb() {
                    MODE_REPORT_USB
                } else {
                    MODE_REPORT_LSB
                };
                push(&mut response, &[mode]);
            }
            Opcode::SetMode => {
                let sideband = match params[0] {
                    MODE_LSB | MODE_CW_R => Sideband::Lsb,
                    _ => Sideband::Usb,
                };
                radio.sideband_set(sideband);
                push(&mut response, &[ACK]);
            }
            Opcode::PttOn => {
                if radio.state().in_tx() {
                    push(&mut response, &[NAK_ALREADY_TX]);
                } else {
                    self.tx_cat = true;
                    radio.tx_start(TxMode::Ssb);
                    push(&mut response, &[ACK]);
                }
            }
            Opcode::PttOff => {
                if radio.state().in_tx() {
                    radio.tx_stop();
                }
                self.tx_cat = false;
                push(&mut response, &[ACK]);
            }
            Opcode::ToggleVfo => {
                radio.vfo_swap(true);
                push(&mut response, &[ACK]);
            }
            Opcode::ReadEeprom => {
                let address = u16::from_be_bytes([params[0], params[1]]);
                push(&mut response, &eeprom::read(address, radio.state()));
            }
            Opcode::ReadRxStatus => push(&mut response, &[RX_STATUS]),
            Opcode::ReadTxStatus => push(&mut response, &[tx_status(radio.state())]),
        }
        response
    }
}

/// Transmitter status byte
///
/// Bit 7 is set while receiving, bit 6 flags high SWR (never measured),
/// bit 5 reflects split and the low nibble carries a fixed power meter
/// reading.
#[must_use]
pub const fn tx_status(state: &crate::radio::state::RadioState) -> u8 {
    let receiving = !state.in_tx();
    let high_swr = false;
    ((receiving as u8) << 7) | ((high_swr as u8) << 6) | ((state.is_split() as u8) << 5) | 0x08
}

fn push(response: &mut CatResponse, bytes: &[u8]) {
    if response.extend_from_slice(bytes).is_err() {
        error!("CAT: response overflow");
    }
}
