//! `Si5351A` Clock Synthesizer Driver
//!
//! Generates the carrier (CLK0), second LO (CLK1) and first LO (CLK2).
//!
//! PLL A runs at a fixed integer multiple of the 25 MHz crystal, trimmed
//! by the master calibration value. Each output is then set with a
//! fractional multisynth divider, so retuning never touches the PLL and
//! never glitches the other outputs.

use embedded_hal::i2c::I2c;

use crate::config::{SI5351_I2C_ADDR, SI5351_PLL_MULT, SI5351_XTAL_FREQ};
use crate::types::ClockOutput;

/// `Si5351A` register addresses
mod reg {
    pub const OUTPUT_ENABLE: u8 = 3;
    pub const CLK0_CONTROL: u8 = 16;
    pub const PLLA_PARAMS: u8 = 26;
    pub const MS0_PARAMS: u8 = 42;
    pub const SPREAD_SPECTRUM: u8 = 149;
    pub const PLL_RESET: u8 = 177;
    pub const CRYSTAL_LOAD: u8 = 183;
}

/// Lowest output the multisynth can produce without an R divider
const MIN_OUTPUT_HZ: u32 = 500_000;

/// Highest output the fractional multisynth can produce
const MAX_OUTPUT_HZ: u32 = 109_000_000;

/// Multisynth denominator must fit in 20 bits
const DENOMINATOR_MASK: u64 = 0xFFF0_0000;

/// Drive strength setting
#[derive(Clone, Copy, Debug, Default)]
pub enum DriveStrength {
    /// 2mA drive
    Drive2mA,
    /// 4mA drive
    Drive4mA,
    /// 6mA drive
    Drive6mA,
    /// 8mA drive (maximum)
    #[default]
    Drive8mA,
}

impl DriveStrength {
    const fn as_reg(self) -> u8 {
        match self {
            Self::Drive2mA => 0,
            Self::Drive4mA => 1,
            Self::Drive6mA => 2,
            Self::Drive8mA => 3,
        }
    }
}

/// Crystal load capacitance
#[derive(Clone, Copy, Debug, Default)]
pub enum CrystalLoad {
    /// 6 pF load
    Load6pF,
    /// 8 pF load
    Load8pF,
    /// 10 pF load
    #[default]
    Load10pF,
}

impl CrystalLoad {
    const fn as_reg(self) -> u8 {
        match self {
            Self::Load6pF => 0b0100_0000,
            Self::Load8pF => 0b1000_0000,
            Self::Load10pF => 0b1100_0000,
        }
    }
}

/// Packed multisynth parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MsParams {
    p1: u32,
    p2: u32,
    p3: u32,
}

impl MsParams {
    /// Divide `vco` down to `fout` with a fractional divider
    fn for_output(vco: u64, fout: u32) -> Self {
        let fout = u64::from(fout);
        let a = vco / fout;
        let mut b = vco % fout;
        let mut c = fout;
        while c & DENOMINATOR_MASK != 0 {
            b >>= 1;
            c >>= 1;
        }
        let p1 = 128 * a + (128 * b) / c - 512;
        let p2 = 128 * b - ((128 * b) / c) * c;
        Self {
            p1: (p1 & 0x3_FFFF) as u32,
            p2: (p2 & 0xF_FFFF) as u32,
            p3: (c & 0xF_FFFF) as u32,
        }
    }

    fn registers(self) -> [u8; 8] {
        let Self { p1, p2, p3 } = self;
        [
            (p3 >> 8) as u8,
            p3 as u8,
            ((p1 >> 16) & 0x03) as u8,
            (p1 >> 8) as u8,
            p1 as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            (p2 >> 8) as u8,
            p2 as u8,
        ]
    }
}

/// `Si5351A` driver
pub struct Si5351<I> {
    i2c: I,
    vco_hz: u64,
    output_disable: u8,
    drive: DriveStrength,
}

impl<I: I2c> Si5351<I> {
    /// Create a driver; call [`Self::init`] before use
    #[must_use]
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            vco_hz: u64::from(SI5351_XTAL_FREQ) * u64::from(SI5351_PLL_MULT),
            output_disable: 0xFF,
            drive: DriveStrength::default(),
        }
    }

    /// Configure the crystal and start PLL A with every output off
    ///
    /// # Errors
    ///
    /// Returns the bus error of the first failed write.
    pub fn init(&mut self, load: CrystalLoad) -> Result<(), I::Error> {
        self.write_reg(reg::SPREAD_SPECTRUM, 0)?;
        self.write_reg(reg::OUTPUT_ENABLE, self.output_disable)?;
        self.write_reg(reg::CRYSTAL_LOAD, load.as_reg())?;

        let p1 = 128 * SI5351_PLL_MULT - 512;
        let pll = [0, 1, ((p1 >> 16) & 0x03) as u8, (p1 >> 8) as u8, p1 as u8, 0, 0, 0];
        self.write_regs(reg::PLLA_PARAMS, &pll)?;
        self.write_reg(reg::PLL_RESET, 0x20)
    }

    /// Trim the assumed VCO frequency by the calibration offset
    pub fn calibrate(&mut self, master_cal: i32) {
        let nominal = i64::from(SI5351_XTAL_FREQ) * i64::from(SI5351_PLL_MULT);
        self.vco_hz = u64::try_from(nominal + i64::from(master_cal)).unwrap_or(0);
    }

    /// Set an output frequency; outputs outside the usable range are turned off
    ///
    /// # Errors
    ///
    /// Returns the bus error of the first failed write.
    pub fn set_frequency(&mut self, output: ClockOutput, hz: u32) -> Result<(), I::Error> {
        let bit = 1 << output.index();
        if (MIN_OUTPUT_HZ..=MAX_OUTPUT_HZ).contains(&hz) && self.vco_hz > 0 {
            let ms = MsParams::for_output(self.vco_hz, hz);
            let base = reg::MS0_PARAMS + output.index() * 8;
            self.write_regs(base, &ms.registers())?;
            self.write_reg(reg::CLK0_CONTROL + output.index(), 0x0C | self.drive.as_reg())?;
            self.output_disable &= !bit;
        } else {
            self.output_disable |= bit;
        }
        self.write_reg(reg::OUTPUT_ENABLE, self.output_disable)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(SI5351_I2C_ADDR, &[reg, value])
    }

    fn write_regs(&mut self, base: u8, values: &[u8; 8]) -> Result<(), I::Error> {
        let mut buf = [0u8; 9];
        buf[0] = base;
        buf[1..].copy_from_slice(values);
        self.i2c.write(SI5351_I2C_ADDR, &buf)
    }
}
