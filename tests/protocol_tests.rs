//! CAT protocol tests
//!
//! Framing, dispatch and response encoding of the FT-817 command set.

mod common;

use common::{radio, ScriptedSerial, TestRadio};
use ubitx_firmware::config::CAT_RECEIVE_TIMEOUT_MS;
use ubitx_firmware::protocol::bcd::{decode_frequency, encode_frequency};
use ubitx_firmware::protocol::cat::{ACK, NAK_ALREADY_TX, RX_STATUS};
use ubitx_firmware::protocol::{CatEngine, Opcode};
use ubitx_firmware::types::{TxMode, VfoSelect};

const PTT_ON: [u8; 5] = [0x00, 0x00, 0x00, 0x00, 0x08];
const PTT_OFF: [u8; 5] = [0x00, 0x00, 0x00, 0x00, 0x88];

struct Harness {
    cat: CatEngine,
    port: ScriptedSerial,
    radio: TestRadio,
    now_ms: u64,
}

impl Harness {
    fn new() -> Self {
        Self {
            cat: CatEngine::new(),
            port: ScriptedSerial::default(),
            radio: radio(),
            now_ms: 0,
        }
    }

    /// Send one frame and return the response
    fn command(&mut self, frame: [u8; 5]) -> Vec<u8> {
        self.port.push(&frame);
        self.tick();
        self.port.take_tx()
    }

    fn tick(&mut self) {
        self.cat.tick(self.now_ms, &mut self.port, &mut self.radio);
    }
}

// ============================================================================
// BCD codec
// ============================================================================

#[test]
fn bcd_round_trip_across_range() {
    for hz in [
        1_000_000, 3_573_000, 7_074_010, 14_074_000, 21_000_990, 29_999_990, 30_000_000,
    ] {
        assert_eq!(decode_frequency(encode_frequency(hz)), Some(hz), "{hz}");
    }
}

#[test]
fn bcd_is_big_endian_tens_of_hz() {
    assert_eq!(encode_frequency(7_074_000), [0x00, 0x70, 0x74, 0x00]);
    assert_eq!(encode_frequency(28_123_450), [0x02, 0x81, 0x23, 0x45]);
}

// ============================================================================
// Framing
// ============================================================================

#[test]
fn split_frame_within_timeout_is_assembled() {
    let mut h = Harness::new();

    h.port.push(&[0x00, 0x00]);
    h.tick();
    h.now_ms = 400;
    h.port.push(&[0x00, 0x00]);
    h.tick();
    h.now_ms = 800;
    h.port.push(&[0xE7]);
    h.tick();

    assert_eq!(h.port.take_tx(), vec![RX_STATUS]);
}

#[test]
fn stale_partial_frame_is_discarded() {
    let mut h = Harness::new();

    h.port.push(&[0x00, 0x70, 0x74]);
    h.tick();
    h.now_ms = CAT_RECEIVE_TIMEOUT_MS + 1;
    h.tick();
    assert_eq!(h.port.rx.len(), 0);

    h.port.push(&[0x00, 0x01, 0x00]);
    h.tick();
    assert!(h.port.tx.is_empty());
    assert_eq!(h.port.rx.len(), 3);
    assert_eq!(h.radio.state().frequency().as_hz(), 3_573_000);
}

#[test]
fn late_bytes_do_not_complete_a_stale_frame() {
    let mut h = Harness::new();

    h.port.push(&[0x00, 0x00, 0x00]);
    h.tick();
    h.now_ms = CAT_RECEIVE_TIMEOUT_MS + 100;
    h.port.push(&[0x00, 0x08, 0x00]);
    h.tick();

    assert!(h.port.tx.is_empty());
    assert!(!h.radio.state().in_tx());
}

#[test]
fn frame_captured_during_dispatch_is_dropped() {
    let mut h = Harness::new();

    h.port.push(&[0x00, 0x70, 0x74, 0x00, 0x01]);
    let first = h.cat.receive(0, &mut h.port).unwrap();
    assert!(h.cat.is_busy());

    h.port.push(&PTT_ON);
    assert!(h.cat.receive(1, &mut h.port).is_none());
    assert_eq!(h.port.rx.len(), 0);

    h.cat.execute(first, &mut h.port, &mut h.radio);
    assert!(!h.cat.is_busy());
    assert_eq!(h.port.take_tx(), vec![ACK]);
    assert_eq!(h.radio.state().frequency().as_hz(), 7_074_000);
    assert!(!h.radio.state().in_tx());
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn ptt_on_twice_reports_busy() {
    let mut h = Harness::new();

    assert_eq!(h.command(PTT_ON), vec![ACK]);
    assert!(h.radio.state().in_tx());
    assert!(h.cat.owns_tx());

    h.radio.hardware_mut().clear();
    assert_eq!(h.command(PTT_ON), vec![NAK_ALREADY_TX]);
    assert!(h.radio.state().in_tx());
    assert!(h.radio.hardware().events.is_empty());
}

#[test]
fn ptt_off_returns_to_receive() {
    let mut h = Harness::new();
    h.command(PTT_ON);

    assert_eq!(h.command(PTT_OFF), vec![ACK]);
    assert!(!h.radio.state().in_tx());
    assert!(!h.cat.owns_tx());

    assert_eq!(h.command(PTT_OFF), vec![ACK]);
}

#[test]
fn ptt_off_releases_ownership_even_when_receiving() {
    let mut h = Harness::new();
    h.command(PTT_ON);
    h.radio.tx_stop();

    h.command(PTT_OFF);
    assert!(!h.cat.owns_tx());
}

#[test]
fn set_and_read_frequency() {
    let mut h = Harness::new();

    assert_eq!(h.command([0x01, 0x40, 0x74, 0x00, 0x01]), vec![ACK]);
    assert_eq!(h.radio.state().frequency().as_hz(), 14_074_000);

    assert_eq!(
        h.command([0x00, 0x00, 0x00, 0x00, 0x03]),
        vec![0x01, 0x40, 0x74, 0x00, 0x01]
    );
}

#[test]
fn malformed_frequency_is_acknowledged_and_ignored() {
    let mut h = Harness::new();
    assert_eq!(h.command([0x0F, 0x00, 0x00, 0x00, 0x01]), vec![ACK]);
    assert_eq!(h.radio.state().frequency().as_hz(), 3_573_000);
}

#[test]
fn set_mode_maps_to_sideband() {
    let mut h = Harness::new();

    for (mode, usb) in [
        (0x00, false),
        (0x01, true),
        (0x03, false),
        (0x02, true),
        (0x42, true),
    ] {
        assert_eq!(h.command([mode, 0x00, 0x00, 0x00, 0x07]), vec![ACK]);
        assert_eq!(h.radio.state().is_usb(), usb, "mode byte {mode:#04x}");
    }

    h.command([0x00, 0x00, 0x00, 0x00, 0x07]);
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0x03])[4], 0x00);
}

#[test]
fn split_commands_acknowledge() {
    let mut h = Harness::new();

    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0x02]), vec![ACK]);
    assert!(h.radio.state().is_split());
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0x82]), vec![ACK]);
    assert!(!h.radio.state().is_split());
}

#[test]
fn toggle_vfo() {
    let mut h = Harness::new();
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0x81]), vec![ACK]);
    assert_eq!(h.radio.state().active_vfo(), VfoSelect::B);
    assert_eq!(h.radio.store().writes(), 2);
}

#[test]
fn status_replies() {
    let mut h = Harness::new();

    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0xE7]), vec![RX_STATUS]);
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0xF7]), vec![0x88]);

    h.radio.split_enable();
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0xF7]), vec![0xA8]);

    h.radio.tx_start(TxMode::Ssb);
    assert_eq!(h.command([0x00, 0x00, 0x00, 0x00, 0xF7]), vec![0x28]);
}

#[test]
fn eeprom_read_tracks_live_state() {
    let mut h = Harness::new();

    assert_eq!(h.command([0x00, 0x55, 0x00, 0x00, 0xBB]), vec![0x80, 0x00]);
    h.command([0x00, 0x00, 0x00, 0x00, 0x81]);
    assert_eq!(h.command([0x00, 0x55, 0x00, 0x00, 0xBB]), vec![0x81, 0x00]);

    assert_eq!(h.command([0x00, 0x78, 0x00, 0x00, 0xBB]), vec![0x20, 0x00]);
    h.radio.split_enable();
    assert_eq!(h.command([0x00, 0x7A, 0x00, 0x00, 0xBB]), vec![0xFF, 0x00]);
    assert_eq!(h.command([0x03, 0x45, 0x00, 0x00, 0xBB]), vec![0x00, 0xD0]);
}

#[test]
fn unknown_opcode_gets_zero_byte() {
    let mut h = Harness::new();
    assert_eq!(h.command([0x12, 0x34, 0x56, 0x78, 0x55]), vec![0x00]);
}

#[test]
fn opcode_codes_round_trip() {
    for code in [0x01u8, 0x02, 0x03, 0x07, 0x08, 0x81, 0x82, 0x88, 0xBB, 0xE7, 0xF7] {
        let opcode = Opcode::try_from(code).unwrap();
        assert_eq!(opcode.code(), code);
    }
    assert_eq!(Opcode::try_from(0x00u8), Err(0x00));
}
