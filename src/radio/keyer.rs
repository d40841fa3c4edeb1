//! CW Keyer Module
//!
//! Straight key and iambic (Mode A and B) keying driven by a polled
//! tick. Nothing here blocks: element timing, the pre-key guard and the
//! TX hang time are deadlines compared against the millisecond clock.
//!
//! # Iambic Keying
//!
//! Iambic keyers use squeeze paddles where pressing both paddles
//! alternates between dit and dah. Paddles are latched during the gap
//! after each element; Mode B also latches while the element is sent.
//!
//! # Hang time
//!
//! Every key transition pushes the CW timeout `cw_delay_time * 10` ms
//! into the future. Once the keyer is idle past that deadline it drops
//! the radio back to receive.

use crate::config::{CW_PREKEY_GUARD_MS, KEYER_MAX_STEPS};
use crate::hal::{PaddleSense, RigOutputs};
use crate::radio::settings::SettingsStore;
use crate::radio::transceiver::Transceiver;
use crate::types::{IambicMode, Paddle, TxMode};

/// Latched paddle contacts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PaddleLatch {
    /// Dit paddle seen
    pub dit: bool,
    /// Dah paddle seen
    pub dah: bool,
    /// The element being sent is a dit
    pub dit_in_progress: bool,
}

impl PaddleLatch {
    /// Latch any closed contact (latches are only cleared explicitly)
    pub fn update(&mut self, paddle: Paddle) {
        self.dit |= paddle.dot();
        self.dah |= paddle.dash();
    }

    /// Either paddle latched
    #[must_use]
    pub const fn any(&self) -> bool {
        self.dit || self.dah
    }
}

/// CW element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// Short element (1 unit)
    Dit,
    /// Long element (3 units)
    Dah,
}

impl Element {
    /// Key-down duration for a dit length
    #[must_use]
    pub const fn duration_ms(self, dit_ms: u32) -> u64 {
        match self {
            Self::Dit => dit_ms as u64,
            Self::Dah => dit_ms as u64 * 3,
        }
    }
}

/// Iambic keyer state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyerState {
    /// Waiting for a paddle
    #[default]
    Idle,
    /// Dit has priority
    CheckDit,
    /// Dah if latched
    CheckDah,
    /// Switch to TX (once per session) and key down
    KeyedPrep(Element),
    /// Element being sent
    Keyed,
    /// One unit of silence after the element
    InterElement,
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::CheckDit => defmt::write!(f, "CHK_DIT"),
            Self::CheckDah => defmt::write!(f, "CHK_DAH"),
            Self::KeyedPrep(Element::Dit) => defmt::write!(f, "PREP(dit)"),
            Self::KeyedPrep(Element::Dah) => defmt::write!(f, "PREP(dah)"),
            Self::Keyed => defmt::write!(f, "KEYED"),
            Self::InterElement => defmt::write!(f, "GAP"),
        }
    }
}

/// CW keyer
#[derive(Clone, Debug, Default)]
pub struct Keyer {
    state: KeyerState,
    latch: PaddleLatch,
    /// End of the current element or gap
    deadline_ms: u64,
    /// End of the pre-key guard after switching to TX
    guard_until: Option<u64>,
    /// TX hang deadline; set for the whole CW session
    cw_timeout: Option<u64>,
    key_down: bool,
}

impl Keyer {
    /// Create an idle keyer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: KeyerState::Idle,
            latch: PaddleLatch {
                dit: false,
                dah: false,
                dit_in_progress: false,
            },
            deadline_ms: 0,
            guard_until: None,
            cw_timeout: None,
            key_down: false,
        }
    }

    /// Current iambic state
    #[must_use]
    pub const fn state(&self) -> KeyerState {
        self.state
    }

    /// Carrier is keyed
    #[must_use]
    pub const fn is_key_down(&self) -> bool {
        self.key_down
    }

    /// Pending hang deadline
    #[must_use]
    pub const fn cw_timeout(&self) -> Option<u64> {
        self.cw_timeout
    }

    /// A CW transmit session is open (PTT is ignored meanwhile)
    #[must_use]
    pub const fn in_session(&self) -> bool {
        self.cw_timeout.is_some()
    }

    /// Run one keyer tick
    pub fn tick<H, S, P>(&mut self, now_ms: u64, paddle: &mut P, radio: &mut Transceiver<H, S>)
    where
        H: RigOutputs,
        S: SettingsStore,
        P: PaddleSense,
    {
        match radio.state().iambic_mode() {
            IambicMode::Straight => self.tick_straight(now_ms, paddle, radio),
            mode @ (IambicMode::IambicA | IambicMode::IambicB) => {
                self.tick_iambic(now_ms, mode == IambicMode::IambicB, paddle, radio);
            }
        }
    }

    fn tick_straight<H, S, P>(&mut self, now_ms: u64, paddle: &mut P, radio: &mut Transceiver<H, S>)
    where
        H: RigOutputs,
        S: SettingsStore,
        P: PaddleSense,
    {
        if paddle.read_paddle(false) == Paddle::Dot {
            if !self.key_down && self.prepare_tx(now_ms, radio) {
                self.set_key(true, now_ms, radio);
            }
        } else {
            if self.key_down {
                self.set_key(false, now_ms, radio);
            }
            self.guard_until = None;
            self.check_timeout(now_ms, radio);
        }
    }

    fn tick_iambic<H, S, P>(
        &mut self,
        now_ms: u64,
        iambic_b: bool,
        paddle: &mut P,
        radio: &mut Transceiver<H, S>,
    ) where
        H: RigOutputs,
        S: SettingsStore,
        P: PaddleSense,
    {
        let dit_ms = radio.state().settings().cw_speed;

        for _ in 0..KEYER_MAX_STEPS {
            match self.state {
                KeyerState::Idle => {
                    let sample = paddle.read_paddle(true);
                    if !sample.is_pressed() && !self.latch.any() {
                        self.check_timeout(now_ms, radio);
                        return;
                    }
                    self.latch.update(sample);
                    self.state = KeyerState::CheckDit;
                }
                KeyerState::CheckDit => {
                    if self.latch.dit {
                        self.latch.dit_in_progress = true;
                        self.state = KeyerState::KeyedPrep(Element::Dit);
                    } else {
                        self.state = KeyerState::CheckDah;
                    }
                }
                KeyerState::CheckDah => {
                    self.state = if self.latch.dah {
                        KeyerState::KeyedPrep(Element::Dah)
                    } else {
                        KeyerState::Idle
                    };
                }
                KeyerState::KeyedPrep(element) => {
                    if !self.prepare_tx(now_ms, radio) {
                        return;
                    }
                    self.deadline_ms = now_ms + element.duration_ms(dit_ms);
                    self.latch.dit = false;
                    self.latch.dah = false;
                    self.state = KeyerState::Keyed;
                    self.set_key(true, now_ms, radio);
                }
                KeyerState::Keyed => {
                    if now_ms < self.deadline_ms {
                        if iambic_b {
                            self.latch.update(paddle.read_paddle(true));
                        }
                        return;
                    }
                    self.set_key(false, now_ms, radio);
                    self.deadline_ms = now_ms + u64::from(dit_ms);
                    self.state = KeyerState::InterElement;
                }
                KeyerState::InterElement => {
                    self.latch.update(paddle.read_paddle(true));
                    if now_ms < self.deadline_ms {
                        return;
                    }
                    if self.latch.dit_in_progress {
                        self.latch.dit = false;
                        self.latch.dit_in_progress = false;
                        self.state = KeyerState::CheckDah;
                    } else {
                        self.latch.dah = false;
                        // squeeze keeps alternating without passing through idle
                        self.state = if self.latch.any() {
                            KeyerState::CheckDit
                        } else {
                            KeyerState::Idle
                        };
                    }
                }
            }
        }
    }

    /// Enter TX for a CW session and wait out the pre-key guard
    ///
    /// Returns true once keying may begin.
    fn prepare_tx<H: RigOutputs, S: SettingsStore>(
        &mut self,
        now_ms: u64,
        radio: &mut Transceiver<H, S>,
    ) -> bool {
        if let Some(until) = self.guard_until {
            if now_ms < until {
                return false;
            }
            self.guard_until = None;
            return true;
        }
        if radio.state().in_tx() {
            return true;
        }
        self.key_down = false;
        self.cw_timeout = Some(now_ms + radio.state().settings().cw_delay_ms());
        radio.tx_start(TxMode::Cw);
        self.guard_until = Some(now_ms + CW_PREKEY_GUARD_MS);
        trace!("cw session opened");
        false
    }

    fn set_key<H: RigOutputs, S: SettingsStore>(
        &mut self,
        down: bool,
        now_ms: u64,
        radio: &mut Transceiver<H, S>,
    ) {
        self.key_down = down;
        radio.cw_key(down);
        self.cw_timeout = Some(now_ms + radio.state().settings().cw_delay_ms());
    }

    /// Drop out of TX once the hang time has passed with the key up
    ///
    /// Polled every tick while idle.
    pub fn check_timeout<H: RigOutputs, S: SettingsStore>(
        &mut self,
        now_ms: u64,
        radio: &mut Transceiver<H, S>,
    ) {
        match self.cw_timeout {
            Some(deadline) if !self.key_down && now_ms > deadline => {
                self.cw_timeout = None;
                self.guard_until = None;
                if radio.state().in_tx() {
                    radio.tx_stop();
                }
                debug!("cw session closed");
            }
            _ => {}
        }
    }

    /// Abandon any element in progress and release the key
    pub fn reset<H: RigOutputs, S: SettingsStore>(&mut self, radio: &mut Transceiver<H, S>) {
        if self.key_down {
            radio.cw_key(false);
        }
        *self = Self::new();
    }
}
