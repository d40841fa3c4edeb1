//! Application Loop
//!
//! [`Radio`] owns the control core and runs one cooperative tick:
//! CAT first, then the keyer, then whatever the current [`AppMode`]
//! does with the operator controls. The display is redrawn at the end
//! of a tick only if something marked the state dirty.

use crate::config::limits;
use crate::drivers::encoder::PulseCounter;
use crate::hal::{Clock, Display, OperatorInputs, PaddleSense, RigOutputs, SerialPort};
use crate::protocol::CatEngine;
use crate::radio::keyer::Keyer;
use crate::radio::ptt::{self, PttLockout};
use crate::radio::settings::SettingsStore;
use crate::radio::Transceiver;
use crate::types::ClockOutput;

/// What the operator controls currently drive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Knob tunes, PTT keys, button opens the menu
    #[default]
    Tuning,
    /// Knob and button belong to the menu
    Menu,
    /// Stopped after a settings reset; only a power cycle leaves this
    Halted,
}

#[cfg(feature = "embedded")]
impl defmt::Format for AppMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tuning => defmt::write!(f, "TUNING"),
            Self::Menu => defmt::write!(f, "MENU"),
            Self::Halted => defmt::write!(f, "HALTED"),
        }
    }
}

/// Operator input handed to the menu each tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MenuInput {
    /// Function button clicked
    pub clicked: bool,
    /// Encoder pulses since the last tick
    pub pulses: i32,
}

/// Menu progress
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuStatus {
    /// Keep routing input to the menu
    Active,
    /// Return to tuning
    Done,
    /// Stop the radio until power is cycled
    Halt,
}

/// Menu collaborator
pub trait Menu<H, S> {
    /// Called once when the menu is opened
    fn open(&mut self) {}

    /// Handle one tick of operator input
    fn tick(&mut self, radio: &mut Transceiver<H, S>, input: MenuInput) -> MenuStatus;
}

/// Quick menu entries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    /// Band select: the knob moves in 100 kHz steps until the next click
    Band,
    /// RIT on/off
    Rit,
    /// Split on/off
    Split,
    /// LSB/USB
    Sideband,
    /// Swap VFO A and B
    VfoSwap,
    /// Copy the dial into both VFOs
    VfoCopy,
    /// Keyer speed in WPM
    CwSpeed,
    /// Sidetone pitch
    CwTone,
    /// TX hang time
    CwDelay,
    /// Straight key, iambic A or iambic B
    CwKey,
    /// Block or allow keying the transmitter
    TxInhibit,
    /// BFO frequency
    Carrier,
    /// Synthesizer calibration
    Calibration,
    /// Write factory defaults and halt
    ResetSettings,
    /// Leave the menu
    Exit,
}

impl MenuItem {
    const ALL: [Self; 15] = [
        Self::Band,
        Self::Rit,
        Self::Split,
        Self::Sideband,
        Self::VfoSwap,
        Self::VfoCopy,
        Self::CwSpeed,
        Self::CwTone,
        Self::CwDelay,
        Self::CwKey,
        Self::TxInhibit,
        Self::Carrier,
        Self::Calibration,
        Self::ResetSettings,
        Self::Exit,
    ];

    /// Knob range and step for entries that edit a value
    fn knob(self) -> Option<Knob> {
        let (min, max, step) = match self {
            Self::CwSpeed => (i64::from(limits::CW_WPM.0), i64::from(limits::CW_WPM.1), 1),
            Self::CwTone => (
                i64::from(limits::CW_TONE_HZ.0),
                i64::from(limits::CW_TONE_HZ.1),
                10,
            ),
            Self::CwDelay => (
                i64::from(limits::CW_DELAY_TIME.0),
                i64::from(limits::CW_DELAY_TIME.1),
                5,
            ),
            Self::CwKey => (0, 2, 1),
            Self::Carrier => (
                i64::from(limits::USB_CARRIER_HZ.0),
                i64::from(limits::USB_CARRIER_HZ.1),
                1,
            ),
            Self::Calibration => (
                i64::from(limits::MASTER_CAL.0),
                i64::from(limits::MASTER_CAL.1),
                10,
            ),
            _ => return None,
        };
        Some(Knob { min, max, step })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Knob {
    min: i64,
    max: i64,
    step: i64,
}

impl Knob {
    fn turn(self, value: i64, pulses: i32) -> i64 {
        (value + i64::from(pulses) * self.step).clamp(self.min, self.max)
    }
}

/// What the knob drives while an entry is open
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Adjust {
    Band,
    Value { item: MenuItem, knob: Knob, value: i64 },
}

fn narrow(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Built-in menu of the everyday toggles and the keyer/BFO setup
///
/// The knob scrolls, a click runs the highlighted entry and returns to
/// tuning. Band select and the value entries hold the menu open and give
/// the knob to that entry until the next click, which commits the value.
/// Tone, carrier and calibration are heard live while adjusting.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuickMenu {
    index: usize,
    adjust: Option<Adjust>,
}

impl QuickMenu {
    /// Create a menu positioned on the first entry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index: 0,
            adjust: None,
        }
    }

    /// Highlighted entry
    #[must_use]
    pub const fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.index]
    }

    /// Value under adjustment, if a value entry is open
    #[must_use]
    pub fn adjusting(&self) -> Option<i64> {
        match self.adjust {
            Some(Adjust::Value { value, .. }) => Some(value),
            _ => None,
        }
    }

    fn scroll(&mut self, pulses: i32) {
        let len = MenuItem::ALL.len();
        let step = usize::try_from(pulses.unsigned_abs()).unwrap_or(0) % len;
        self.index = if pulses > 0 {
            (self.index + step) % len
        } else {
            (self.index + len - step) % len
        };
    }

    fn begin<H: RigOutputs, S: SettingsStore>(&mut self, radio: &Transceiver<H, S>) {
        let item = self.selected();
        let Some(knob) = item.knob() else {
            return;
        };
        let settings = radio.state().settings();
        let value = match item {
            MenuItem::CwSpeed => i64::from(settings.cw_wpm()),
            MenuItem::CwTone => i64::from(settings.cw_side_tone),
            MenuItem::CwDelay => i64::from(settings.cw_delay_time),
            MenuItem::CwKey => i64::from(radio.state().iambic_mode().index()),
            MenuItem::Carrier => i64::from(settings.usb_carrier),
            MenuItem::Calibration => i64::from(settings.master_cal),
            _ => return,
        };
        self.adjust = Some(Adjust::Value {
            item,
            knob,
            value: value.clamp(knob.min, knob.max),
        });
    }
}

fn preview<H: RigOutputs, S: SettingsStore>(
    radio: &mut Transceiver<H, S>,
    item: MenuItem,
    value: i64,
) {
    match item {
        MenuItem::CwTone => radio.hardware_mut().sidetone_on(narrow(value)),
        MenuItem::Carrier => radio
            .hardware_mut()
            .set_oscillator(ClockOutput::Carrier, narrow(value)),
        MenuItem::Calibration => {
            radio
                .hardware_mut()
                .calibrate(i32::try_from(value).unwrap_or_default());
            let hz = radio.state().frequency().as_hz();
            radio.set_frequency(hz);
        }
        _ => {}
    }
    radio.mark_dirty();
}

fn commit<H: RigOutputs, S: SettingsStore>(
    radio: &mut Transceiver<H, S>,
    item: MenuItem,
    value: i64,
) {
    match item {
        MenuItem::CwSpeed => radio.cw_wpm_set(narrow(value)),
        MenuItem::CwTone => {
            radio.hardware_mut().sidetone_off();
            radio.cw_tone_set(narrow(value));
        }
        MenuItem::CwDelay => radio.cw_delay_time_set(narrow(value)),
        MenuItem::CwKey => radio.iambic_key_set(u8::try_from(value).unwrap_or_default()),
        MenuItem::Carrier => radio.set_usb_carrier(narrow(value)),
        MenuItem::Calibration => radio.set_master_cal(i32::try_from(value).unwrap_or_default()),
        _ => {}
    }
}

impl<H: RigOutputs, S: SettingsStore> Menu<H, S> for QuickMenu {
    fn open(&mut self) {
        *self = Self::new();
    }

    fn tick(&mut self, radio: &mut Transceiver<H, S>, input: MenuInput) -> MenuStatus {
        match self.adjust {
            Some(Adjust::Band) => {
                if input.pulses != 0 {
                    radio.band_step(input.pulses > 0);
                }
                if input.clicked {
                    self.adjust = None;
                    return MenuStatus::Done;
                }
                return MenuStatus::Active;
            }
            Some(Adjust::Value { item, knob, value }) => {
                if input.clicked {
                    self.adjust = None;
                    commit(radio, item, value);
                    return MenuStatus::Done;
                }
                if input.pulses != 0 {
                    let value = knob.turn(value, input.pulses);
                    self.adjust = Some(Adjust::Value { item, knob, value });
                    preview(radio, item, value);
                }
                return MenuStatus::Active;
            }
            None => {}
        }

        if input.pulses != 0 {
            self.scroll(input.pulses);
            radio.mark_dirty();
        }
        if !input.clicked {
            return MenuStatus::Active;
        }

        match self.selected() {
            MenuItem::Band => {
                radio.rit_disable();
                self.adjust = Some(Adjust::Band);
                return MenuStatus::Active;
            }
            MenuItem::CwSpeed
            | MenuItem::CwTone
            | MenuItem::CwDelay
            | MenuItem::CwKey
            | MenuItem::Carrier
            | MenuItem::Calibration => {
                self.begin(radio);
                radio.mark_dirty();
                return MenuStatus::Active;
            }
            MenuItem::Rit => radio.rit_toggle(),
            MenuItem::Split => radio.split_toggle(),
            MenuItem::Sideband => radio.sideband_toggle(),
            MenuItem::VfoSwap => radio.vfo_swap(true),
            MenuItem::VfoCopy => radio.vfo_copy(true),
            MenuItem::TxInhibit => radio.tx_inhibit_set(!radio.state().tx_inhibit()),
            MenuItem::ResetSettings => {
                radio.factory_reset();
                return MenuStatus::Halt;
            }
            MenuItem::Exit => {}
        }
        MenuStatus::Done
    }
}

/// The whole radio: control core plus its protocol and keying engines
pub struct Radio<H, S> {
    transceiver: Transceiver<H, S>,
    cat: CatEngine,
    keyer: Keyer,
    mode: AppMode,
}

impl<H: RigOutputs, S: SettingsStore> Radio<H, S> {
    /// Wrap a running transceiver
    #[must_use]
    pub const fn new(transceiver: Transceiver<H, S>) -> Self {
        Self {
            transceiver,
            cat: CatEngine::new(),
            keyer: Keyer::new(),
            mode: AppMode::Tuning,
        }
    }

    /// Control core
    #[must_use]
    pub const fn transceiver(&self) -> &Transceiver<H, S> {
        &self.transceiver
    }

    /// Control core (mutable)
    pub fn transceiver_mut(&mut self) -> &mut Transceiver<H, S> {
        &mut self.transceiver
    }

    /// CAT engine
    #[must_use]
    pub const fn cat(&self) -> &CatEngine {
        &self.cat
    }

    /// CW keyer
    #[must_use]
    pub const fn keyer(&self) -> &Keyer {
        &self.keyer
    }

    /// Current application mode
    #[must_use]
    pub const fn mode(&self) -> AppMode {
        self.mode
    }

    /// Run one pass of the control loop
    ///
    /// Does nothing once halted.
    pub fn tick<B, M>(&mut self, board: &mut B, menu: &mut M, pulses: &PulseCounter)
    where
        B: SerialPort + Clock + PaddleSense + OperatorInputs + Display,
        M: Menu<H, S>,
    {
        if self.mode == AppMode::Halted {
            return;
        }
        let now_ms = board.now_ms();

        self.cat.tick(now_ms, board, &mut self.transceiver);
        self.keyer.tick(now_ms, board, &mut self.transceiver);

        let delta = pulses.take_pulse_delta();
        self.mode = match self.mode {
            AppMode::Tuning => self.tick_tuning(board, menu, delta),
            AppMode::Menu => {
                let input = MenuInput {
                    clicked: board.button_clicked(),
                    pulses: delta,
                };
                match menu.tick(&mut self.transceiver, input) {
                    MenuStatus::Active => AppMode::Menu,
                    MenuStatus::Done => {
                        debug!("menu closed");
                        self.transceiver.mark_dirty();
                        AppMode::Tuning
                    }
                    MenuStatus::Halt => {
                        self.halt();
                        AppMode::Halted
                    }
                }
            }
            AppMode::Halted => AppMode::Halted,
        };

        if self.transceiver.take_dirty() {
            board.refresh(self.transceiver.state());
        }
    }

    fn tick_tuning<B, M>(&mut self, board: &mut B, menu: &mut M, delta: i32) -> AppMode
    where
        B: OperatorInputs,
        M: Menu<H, S>,
    {
        let lockout = PttLockout {
            cw_session: self.keyer.in_session(),
            cat_owns_tx: self.cat.owns_tx(),
        };
        ptt::check_ptt(board.ptt_pressed(), lockout, &mut self.transceiver);

        if board.button_clicked() {
            if self.transceiver.state().in_tx() {
                self.keyer.reset(&mut self.transceiver);
                self.transceiver.tx_stop();
                return AppMode::Tuning;
            }
            debug!("menu opened");
            menu.open();
            self.transceiver.mark_dirty();
            return AppMode::Menu;
        }

        self.transceiver.tune(delta);
        AppMode::Tuning
    }

    fn halt(&mut self) {
        self.keyer.reset(&mut self.transceiver);
        if self.transceiver.state().in_tx() {
            self.transceiver.tx_stop();
        }
        self.transceiver.mark_dirty();
        error!("halted, power cycle to restart");
    }
}
