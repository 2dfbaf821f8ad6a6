// NanoLoop - Board Control Core & Simulation Bench
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Whole-stack event-loop scenarios: bring-up on the modeled board, then
//! the cooperative loop against the simulated transport.

use nanoloop_board::{Board, SimTransport};
use nanoloop_core::coalescer::{RequestKind, RequestState};
use nanoloop_core::driver::EventLoop;
use nanoloop_core::message::{BlinkSetting, CTRL_E};
use nanoloop_core::SpinPolicy;

fn setup() -> (Board, EventLoop, SimTransport) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();

    let mut board = Board::new();
    board.bringup(SpinPolicy::Bounded(10_000)).unwrap();
    let event_loop = EventLoop::new(board.latch.clone());
    (board, event_loop, SimTransport::new())
}

fn tick(board: &mut Board, ev: &mut EventLoop, transport: &mut SimTransport) {
    ev.tick(&mut board.bus, transport);
}

fn text(transport: &SimTransport) -> String {
    String::from_utf8_lossy(&transport.transcript()).into_owned()
}

#[test]
fn test_banner_is_the_first_transmission() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);

    let out = text(&transport);
    assert!(out.starts_with("\x1b[0m\x1b[2J\x1b[1;1H"));
    assert!(out.contains("NanoLoop"));
    assert!(out.contains("On-board button: [Released]"));
}

#[test]
fn test_press_then_release_before_one_poll_shows_release_only() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);
    let banner_len = transport.transcript().len();

    // Both edges land before the loop polls the latch once.
    board.press_button();
    board.release_button();
    tick(&mut board, &mut ev, &mut transport);

    let after = String::from_utf8_lossy(&transport.transcript()[banner_len..]).into_owned();
    assert!(after.contains("Released]"));
    assert!(!after.contains("Pressed]"), "overwritten, not queued");
}

#[test]
fn test_three_busy_ticks_then_exactly_one_submission() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);
    let sent_before = transport.sent_frames().len();

    board.press_button();
    transport.force_busy(4);

    // Three iterations against a busy transmitter: the request stays
    // parked, nothing is generated twice, nothing is sent.
    for _ in 0..3 {
        tick(&mut board, &mut ev, &mut transport);
        assert_eq!(transport.sent_frames().len(), sent_before);
        assert_eq!(
            ev.request_state(RequestKind::Update),
            RequestState::Pending
        );
    }

    // Fourth iteration: transmitter free, exactly one submission.
    tick(&mut board, &mut ev, &mut transport);
    assert_eq!(transport.sent_frames().len(), sent_before + 1);
    assert_eq!(ev.request_state(RequestKind::Update), RequestState::Idle);
}

#[test]
fn test_banner_class_outranks_a_pending_update() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);
    let sent_before = transport.sent_frames().len();

    // Raise both classes while the transmitter is held busy.
    transport.force_busy(2);
    board.press_button();
    transport.queue_rx(&[CTRL_E]);
    tick(&mut board, &mut ev, &mut transport);
    assert_eq!(transport.sent_frames().len(), sent_before);

    tick(&mut board, &mut ev, &mut transport);
    let new = &transport.sent_frames()[sent_before..];
    assert_eq!(new.len(), 2);
    assert!(
        new[0].concat().starts_with(b"\x1b[0m\x1b[2J"),
        "banner first"
    );
    let update = String::from_utf8_lossy(&new[1].concat()).into_owned();
    assert!(update.contains("Pressed]"));
}

#[test]
fn test_directional_input_saturates_at_both_bounds() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);

    for _ in 0..7 {
        transport.queue_rx(b">");
        tick(&mut board, &mut ev, &mut transport);
    }
    assert_eq!(ev.setting(), BlinkSetting::Fast);
    assert!(text(&transport).contains("[  FAST  ]"));

    for _ in 0..7 {
        transport.queue_rx(b"a");
        tick(&mut board, &mut ev, &mut transport);
    }
    assert_eq!(ev.setting(), BlinkSetting::Off);
    assert!(text(&transport).contains("[   OFF  ]"));
}

#[test]
fn test_unrecognized_bytes_echo_as_hexdump() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);

    transport.queue_rx(b"AB");
    tick(&mut board, &mut ev, &mut transport);

    assert!(text(&transport).contains("41 42 "));
}

#[test]
fn test_quiescent_ticks_are_idempotent() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);

    let snapshot = ev.snapshot();
    let transcript = transport.transcript();
    let board_snapshot = board.snapshot();

    for _ in 0..10 {
        tick(&mut board, &mut ev, &mut transport);
    }

    assert_eq!(ev.snapshot(), snapshot);
    assert_eq!(transport.transcript(), transcript);
    assert_eq!(board.snapshot(), board_snapshot);
}

#[test]
fn test_ctrl_e_repaints_the_banner() {
    let (mut board, mut ev, mut transport) = setup();
    tick(&mut board, &mut ev, &mut transport);
    let sent_before = transport.sent_frames().len();

    transport.queue_rx(&[CTRL_E]);
    tick(&mut board, &mut ev, &mut transport);

    let new = &transport.sent_frames()[sent_before..];
    assert_eq!(new.len(), 1);
    assert!(new[0].concat().starts_with(b"\x1b[0m\x1b[2J"));
}
