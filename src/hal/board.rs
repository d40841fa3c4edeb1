//! Board Assembly
//!
//! Binds the peripheral wrappers to the control core's collaborator
//! traits. Bus errors from the synthesizer are logged and dropped; the
//! core treats every hardware write as fire-and-forget.

use embassy_stm32::timer::GeneralInstance4Channel;
use embassy_time::Instant;
use embedded_hal::i2c::I2c;
use embedded_io::{Read, ReadReady, Write};

use crate::drivers::si5351::Si5351;
use crate::hal::adc::KeyerAdc;
use crate::hal::gpio::{FunctionButton, PttInput, RigLines};
use crate::hal::pwm::Sidetone;
use crate::hal::uart::CatUart;
use crate::hal::{Clock, Display, OperatorInputs, PaddleSense, RigOutputs, SerialPort};
use crate::radio::state::RadioState;
use crate::types::{ClockOutput, LpfBand, Paddle};

/// Everything the control core drives
pub struct RigBoard<'d, I, T: GeneralInstance4Channel> {
    synth: Si5351<I>,
    lines: RigLines<'d>,
    sidetone: Sidetone<'d, T>,
}

impl<'d, I: I2c, T: GeneralInstance4Channel> RigBoard<'d, I, T> {
    /// Assemble from initialized parts
    #[must_use]
    pub fn new(synth: Si5351<I>, lines: RigLines<'d>, sidetone: Sidetone<'d, T>) -> Self {
        Self {
            synth,
            lines,
            sidetone,
        }
    }
}

impl<I: I2c, T: GeneralInstance4Channel> RigOutputs for RigBoard<'_, I, T> {
    fn set_tx_rx(&mut self, transmit: bool) {
        self.lines.set_tx_rx(transmit);
    }

    fn set_cw_key(&mut self, down: bool) {
        self.lines.set_cw_key(down);
    }

    fn select_lpf(&mut self, band: LpfBand) {
        self.lines.select_lpf(band);
    }

    fn set_oscillator(&mut self, output: ClockOutput, hz: u32) {
        if self.synth.set_frequency(output, hz).is_err() {
            error!("si5351: write failed for {} at {} Hz", output, hz);
        }
    }

    fn calibrate(&mut self, master_cal: i32) {
        self.synth.calibrate(master_cal);
    }

    fn sidetone_on(&mut self, hz: u32) {
        self.sidetone.on(hz);
    }

    fn sidetone_off(&mut self) {
        self.sidetone.off();
    }
}

/// Everything the control core samples, plus the status readout
pub struct ControlPanel<'d, U, C> {
    cat: CatUart<U>,
    keyer: KeyerAdc<'d, C>,
    ptt: PttInput<'d>,
    button: FunctionButton<'d>,
}

impl<'d, U, C> ControlPanel<'d, U, C>
where
    U: Read + ReadReady + Write,
    C: embassy_stm32::adc::AdcChannel<embassy_stm32::peripherals::ADC2>,
{
    /// Assemble from initialized parts
    #[must_use]
    pub fn new(
        cat: CatUart<U>,
        keyer: KeyerAdc<'d, C>,
        ptt: PttInput<'d>,
        button: FunctionButton<'d>,
    ) -> Self {
        Self {
            cat,
            keyer,
            ptt,
            button,
        }
    }

    /// Pull pending UART bytes into the CAT ring; call before each tick
    pub fn poll(&mut self) {
        self.cat.poll();
    }
}

impl<U: Read + ReadReady + Write, C> SerialPort for ControlPanel<'_, U, C> {
    fn available(&self) -> usize {
        self.cat.available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.cat.read_byte()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.cat.write(bytes);
    }
}

impl<U, C> Clock for ControlPanel<'_, U, C> {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl<U, C> PaddleSense for ControlPanel<'_, U, C>
where
    C: embassy_stm32::adc::AdcChannel<embassy_stm32::peripherals::ADC2>,
{
    fn read_paddle(&mut self, iambic: bool) -> Paddle {
        self.keyer.read_paddle(iambic)
    }
}

impl<U, C> OperatorInputs for ControlPanel<'_, U, C> {
    fn ptt_pressed(&mut self) -> bool {
        self.ptt.update()
    }

    fn button_clicked(&mut self) -> bool {
        self.button.clicked()
    }
}

impl<U, C> Display for ControlPanel<'_, U, C> {
    fn refresh(&mut self, state: &RadioState) {
        info!(
            "{} {} {} {}{}",
            state.active_vfo(),
            state.frequency(),
            state.sideband(),
            if state.in_tx() { "TX" } else { "RX" },
            if state.is_split() {
                " SPL"
            } else if state.is_rit() {
                " RIT"
            } else {
                ""
            }
        );
    }
}
