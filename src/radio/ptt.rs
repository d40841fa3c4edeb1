//! PTT Handling
//!
//! The microphone PTT keys SSB transmission. It is ignored while a CW
//! session is open and while CAT owns the transmitter, so that neither
//! the keyer's hang time nor a remote PTT is cut short by an idle switch.

use crate::hal::RigOutputs;
use crate::radio::settings::SettingsStore;
use crate::radio::transceiver::Transceiver;
use crate::types::TxMode;

/// Who currently may not be overridden by the PTT line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PttLockout {
    /// The keyer has a CW session open
    pub cw_session: bool,
    /// A CAT command started transmission
    pub cat_owns_tx: bool,
}

impl PttLockout {
    /// PTT may drive the sequencer
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        !self.cw_session && !self.cat_owns_tx
    }
}

/// Follow the (debounced) PTT level
pub fn check_ptt<H, S>(pressed: bool, lockout: PttLockout, radio: &mut Transceiver<H, S>)
where
    H: RigOutputs,
    S: SettingsStore,
{
    if !lockout.is_clear() {
        return;
    }
    let in_tx = radio.state().in_tx();
    if pressed && !in_tx {
        radio.tx_start(TxMode::Ssb);
    } else if !pressed && in_tx {
        radio.tx_stop();
    }
}
