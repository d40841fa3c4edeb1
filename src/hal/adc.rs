//! Analog Keyer Input
//!
//! The paddle contacts share one ADC pin through a resistor ladder.
//! The ladder thresholds are on a 10-bit scale, so 12-bit conversions are
//! shifted down before classification.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC2;

use crate::hal::PaddleSense;
use crate::types::Paddle;

/// Analog paddle reader
pub struct KeyerAdc<'d, C> {
    adc: Adc<'d, ADC2>,
    channel: C,
}

impl<'d, C: AdcChannel<ADC2>> KeyerAdc<'d, C> {
    /// Bits dropped to get from 12-bit conversions to the ladder scale
    const SCALE_SHIFT: u8 = 2;

    /// Create the reader on an ADC2 channel
    #[must_use]
    pub fn new(mut adc: Adc<'d, ADC2>, channel: C) -> Self {
        adc.set_sample_time(SampleTime::CYCLES47_5);
        Self { adc, channel }
    }

    /// Latest raw 10-bit level
    pub fn level(&mut self) -> u16 {
        self.adc.blocking_read(&mut self.channel) >> Self::SCALE_SHIFT
    }
}

impl<C: AdcChannel<ADC2>> PaddleSense for KeyerAdc<'_, C> {
    fn read_paddle(&mut self, iambic: bool) -> Paddle {
        Paddle::from_adc(self.level(), iambic)
    }
}
