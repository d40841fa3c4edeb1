//! Sidetone Output
//!
//! A square wave on a timer channel. The timer frequency is retuned on
//! every key-down so pitch changes take effect immediately.

use embassy_stm32::time::Hertz;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_stm32::timer::{Channel, GeneralInstance4Channel};

/// Sidetone generator
pub struct Sidetone<'d, T: GeneralInstance4Channel> {
    pwm: SimplePwm<'d, T>,
    channel: Channel,
    sounding: bool,
}

impl<'d, T: GeneralInstance4Channel> Sidetone<'d, T> {
    /// Create a silent sidetone on `channel`
    #[must_use]
    pub fn new(mut pwm: SimplePwm<'d, T>, channel: Channel) -> Self {
        pwm.channel(channel).disable();
        Self {
            pwm,
            channel,
            sounding: false,
        }
    }

    /// Start a tone at `hz`
    pub fn on(&mut self, hz: u32) {
        if hz == 0 {
            self.off();
            return;
        }
        self.pwm.set_frequency(Hertz(hz));
        let mut ch = self.pwm.channel(self.channel);
        ch.set_duty_cycle_fraction(1, 2);
        ch.enable();
        self.sounding = true;
    }

    /// Silence the tone
    pub fn off(&mut self) {
        if self.sounding {
            self.pwm.channel(self.channel).disable();
            self.sounding = false;
        }
    }
}
