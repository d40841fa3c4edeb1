//! CW keyer tests
//!
//! Drives the keyer with a held paddle and a hand-advanced clock.

mod common;

use common::{radio, HeldPaddle, RigEvent, TestRadio};
use ubitx_firmware::config::CW_PREKEY_GUARD_MS;
use ubitx_firmware::radio::keyer::{Element, Keyer, KeyerState};
use ubitx_firmware::types::Paddle;

const DIT_MS: u64 = 100;
const HANG_MS: u64 = 600;

fn keyer_radio(mode: u8) -> TestRadio {
    let mut radio = radio();
    radio.iambic_key_set(mode);
    radio
}

/// Tick every 10 ms over `[from, to)`, returning the key level at each tick
fn run(
    keyer: &mut Keyer,
    paddle: &mut HeldPaddle,
    radio: &mut TestRadio,
    from: u64,
    to: u64,
) -> Vec<bool> {
    (from..to)
        .step_by(10)
        .map(|t| {
            keyer.tick(t, paddle, radio);
            keyer.is_key_down()
        })
        .collect()
}

// ============================================================================
// Straight key
// ============================================================================

#[test]
fn straight_key_waits_out_guard_before_keying() {
    let mut radio = keyer_radio(0);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    assert!(radio.state().in_tx());
    assert!(!keyer.is_key_down());

    keyer.tick(CW_PREKEY_GUARD_MS - 10, &mut paddle, &mut radio);
    assert!(!keyer.is_key_down());

    keyer.tick(CW_PREKEY_GUARD_MS, &mut paddle, &mut radio);
    assert!(keyer.is_key_down());
    assert!(radio.hardware().cw_key);
    assert!(radio.hardware().sidetone.is_some());
}

#[test]
fn straight_key_hangs_then_returns_to_receive() {
    let mut radio = keyer_radio(0);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    keyer.tick(CW_PREKEY_GUARD_MS, &mut paddle, &mut radio);

    paddle.0 = Paddle::None;
    keyer.tick(200, &mut paddle, &mut radio);
    assert!(!keyer.is_key_down());
    assert!(!radio.hardware().cw_key);
    assert!(radio.state().in_tx());
    assert_eq!(keyer.cw_timeout(), Some(200 + HANG_MS));

    keyer.tick(200 + HANG_MS, &mut paddle, &mut radio);
    assert!(radio.state().in_tx());

    keyer.tick(200 + HANG_MS + 1, &mut paddle, &mut radio);
    assert!(!radio.state().in_tx());
    assert!(!keyer.in_session());
}

#[test]
fn straight_key_rekeys_within_hang_without_new_tx_start() {
    let mut radio = keyer_radio(0);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    keyer.tick(100, &mut paddle, &mut radio);
    paddle.0 = Paddle::None;
    keyer.tick(150, &mut paddle, &mut radio);
    radio.hardware_mut().clear();

    paddle.0 = Paddle::Dot;
    keyer.tick(300, &mut paddle, &mut radio);
    assert!(keyer.is_key_down());
    assert!(!radio.hardware().events.contains(&RigEvent::TxRx(true)));
}

// ============================================================================
// Iambic
// ============================================================================

#[test]
fn single_dit_timing() {
    let mut radio = keyer_radio(1);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    assert_eq!(keyer.state(), KeyerState::KeyedPrep(Element::Dit));
    paddle.0 = Paddle::None;

    let levels = run(&mut keyer, &mut paddle, &mut radio, 10, 400);
    let down = levels.iter().filter(|&&d| d).count() as u64;
    assert_eq!(down * 10, DIT_MS);
    assert_eq!(keyer.state(), KeyerState::Idle);
    assert!(radio.state().in_tx());
}

#[test]
fn dah_is_three_dits() {
    let mut radio = keyer_radio(1);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dash);

    keyer.tick(0, &mut paddle, &mut radio);
    paddle.0 = Paddle::None;

    let levels = run(&mut keyer, &mut paddle, &mut radio, 10, 800);
    let down = levels.iter().filter(|&&d| d).count() as u64;
    assert_eq!(down * 10, 3 * DIT_MS);
}

#[test]
fn iambic_session_ends_after_hang() {
    let mut radio = keyer_radio(1);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    paddle.0 = Paddle::None;
    run(&mut keyer, &mut paddle, &mut radio, 10, 400);
    assert!(keyer.in_session());

    // key-up at 200 ms
    run(&mut keyer, &mut paddle, &mut radio, 400, 200 + HANG_MS + 20);
    assert!(!radio.state().in_tx());
    assert!(!keyer.in_session());
}

#[test]
fn squeeze_alternates_without_idling() {
    let mut radio = keyer_radio(2);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Both);

    let mut edges = 0;
    let mut was_down = false;
    let mut run_lengths = Vec::new();
    let mut run_len = 0;

    for t in (0..5_000).step_by(10) {
        keyer.tick(t, &mut paddle, &mut radio);
        assert_ne!(keyer.state(), KeyerState::Idle, "idle at {t} ms");
        assert!(radio.state().in_tx());

        let down = keyer.is_key_down();
        if down {
            run_len += 10;
        }
        if down && !was_down {
            edges += 1;
        }
        if !down && was_down {
            run_lengths.push(run_len);
            run_len = 0;
        }
        was_down = down;
    }

    assert!(edges >= 10);
    for pair in run_lengths.windows(2) {
        assert_ne!(pair[0], pair[1], "elements must alternate");
    }
    assert_eq!(run_lengths[0], DIT_MS);
    assert_eq!(run_lengths[1], 3 * DIT_MS);
}

/// Key-down run lengths in ms for a paddle that follows `script`
fn key_down_runs(mode: u8, script: impl Fn(u64) -> Paddle, until: u64) -> Vec<u64> {
    let mut radio = keyer_radio(mode);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::None);
    let mut runs = Vec::new();
    let mut run_len = 0;

    for t in (0..until).step_by(10) {
        paddle.0 = script(t);
        keyer.tick(t, &mut paddle, &mut radio);
        if keyer.is_key_down() {
            run_len += 10;
        } else if run_len > 0 {
            runs.push(run_len);
            run_len = 0;
        }
    }
    runs
}

/// Dit pressed at 0 ms, dah tapped while the dit is being sent
fn dah_tap_during_dit(t: u64) -> Paddle {
    match t {
        0..=90 => Paddle::Dot,
        120..=140 => Paddle::Dash,
        _ => Paddle::None,
    }
}

#[test]
fn iambic_a_ignores_paddle_during_element() {
    assert_eq!(key_down_runs(1, dah_tap_during_dit, 1_000), vec![DIT_MS]);
}

#[test]
fn iambic_b_latches_paddle_during_element() {
    assert_eq!(
        key_down_runs(2, dah_tap_during_dit, 1_000),
        vec![DIT_MS, 3 * DIT_MS]
    );
}

#[test]
fn reset_releases_the_key() {
    let mut radio = keyer_radio(1);
    let mut keyer = Keyer::new();
    let mut paddle = HeldPaddle(Paddle::Dot);

    keyer.tick(0, &mut paddle, &mut radio);
    keyer.tick(100, &mut paddle, &mut radio);
    assert!(keyer.is_key_down());

    keyer.reset(&mut radio);
    assert!(!keyer.is_key_down());
    assert!(!radio.hardware().cw_key);
    assert_eq!(keyer.state(), KeyerState::Idle);
}
