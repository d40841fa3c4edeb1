//! Shared test doubles
//!
//! Recording fakes for every collaborator trait the control core uses.

#![allow(dead_code)]

use std::collections::VecDeque;

use ubitx_firmware::hal::{Clock, Display, OperatorInputs, PaddleSense, RigOutputs, SerialPort};
use ubitx_firmware::radio::settings::{MemoryStore, Settings};
use ubitx_firmware::radio::state::RadioState;
use ubitx_firmware::radio::Transceiver;
use ubitx_firmware::types::{ClockOutput, LpfBand, Paddle};

/// One call made on the rig outputs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RigEvent {
    TxRx(bool),
    CwKey(bool),
    Lpf(LpfBand),
    Osc(ClockOutput, u32),
    Calibrate(i32),
    SidetoneOn(u32),
    SidetoneOff,
}

/// Rig outputs that remember every call and the resulting line levels
#[derive(Debug, Default)]
pub struct FakeRig {
    pub events: Vec<RigEvent>,
    pub tx_line: bool,
    pub cw_key: bool,
    pub lpf: Option<LpfBand>,
    pub oscillators: [u32; 3],
    pub sidetone: Option<u32>,
}

impl FakeRig {
    pub fn osc(&self, output: ClockOutput) -> u32 {
        self.oscillators[usize::from(output.index())]
    }

    pub fn osc_writes(&self, output: ClockOutput) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RigEvent::Osc(o, hz) if *o == output => Some(*hz),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RigOutputs for FakeRig {
    fn set_tx_rx(&mut self, transmit: bool) {
        self.tx_line = transmit;
        self.events.push(RigEvent::TxRx(transmit));
    }

    fn set_cw_key(&mut self, down: bool) {
        self.cw_key = down;
        self.events.push(RigEvent::CwKey(down));
    }

    fn select_lpf(&mut self, band: LpfBand) {
        self.lpf = Some(band);
        self.events.push(RigEvent::Lpf(band));
    }

    fn set_oscillator(&mut self, output: ClockOutput, hz: u32) {
        self.oscillators[usize::from(output.index())] = hz;
        self.events.push(RigEvent::Osc(output, hz));
    }

    fn calibrate(&mut self, master_cal: i32) {
        self.events.push(RigEvent::Calibrate(master_cal));
    }

    fn sidetone_on(&mut self, hz: u32) {
        self.sidetone = Some(hz);
        self.events.push(RigEvent::SidetoneOn(hz));
    }

    fn sidetone_off(&mut self) {
        self.sidetone = None;
        self.events.push(RigEvent::SidetoneOff);
    }
}

pub type TestRadio = Transceiver<FakeRig, MemoryStore>;

/// A radio on factory settings
pub fn radio() -> TestRadio {
    radio_with(Settings::factory())
}

/// A radio on the given settings
pub fn radio_with(settings: Settings) -> TestRadio {
    Transceiver::new(FakeRig::default(), MemoryStore::with_settings(settings), settings)
}

/// Serial port fed from a script, capturing everything written
#[derive(Debug, Default)]
pub struct ScriptedSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl ScriptedSerial {
    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl SerialPort for ScriptedSerial {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }
}

/// Paddle held in one position
#[derive(Debug, Default)]
pub struct HeldPaddle(pub Paddle);

impl PaddleSense for HeldPaddle {
    fn read_paddle(&mut self, _iambic: bool) -> Paddle {
        self.0
    }
}

/// Every input and output of the front panel in one place
#[derive(Debug, Default)]
pub struct Bench {
    pub now_ms: u64,
    pub serial: ScriptedSerial,
    pub paddle: Paddle,
    pub ptt: bool,
    pub clicks: u32,
    pub refreshes: Vec<RadioState>,
}

impl Bench {
    pub fn click(&mut self) {
        self.clicks += 1;
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl SerialPort for Bench {
    fn available(&self) -> usize {
        self.serial.available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.serial.read_byte()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.serial.write(bytes);
    }
}

impl Clock for Bench {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

impl PaddleSense for Bench {
    fn read_paddle(&mut self, _iambic: bool) -> Paddle {
        self.paddle
    }
}

impl OperatorInputs for Bench {
    fn ptt_pressed(&mut self) -> bool {
        self.ptt
    }

    fn button_clicked(&mut self) -> bool {
        if self.clicks > 0 {
            self.clicks -= 1;
            true
        } else {
            false
        }
    }
}

impl Display for Bench {
    fn refresh(&mut self, state: &RadioState) {
        self.refreshes.push(*state);
    }
}
