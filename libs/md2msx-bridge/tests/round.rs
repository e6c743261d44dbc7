mod sim;

use md2msx_bridge::{CycleOutcome, RoundEnd};
use md2msx_input::{Button, ControllerType};

use sim::{bridge, Setup, Which};

const LR: u8 = 0b1_1000;

#[test]
fn fast_host_advances_without_sampling() {
    let (mut bridge, board) = bridge(Setup {
        flips: vec![2],
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(0), CycleOutcome::Advanced);
    assert_eq!(board.pad_toggles(), 0);
    assert_eq!(bridge.samples().cursor(), 0);
}

#[test]
fn strobe_already_moved_returns_at_once() {
    let (mut bridge, board) = bridge(Setup::default());

    // Strobe low is the host having left cycle 1.
    assert_eq!(bridge.run_cycle(1), CycleOutcome::Advanced);
    assert_eq!(board.strobe_reads(), 1);
    assert_eq!(board.pad_toggles(), 0);
}

#[test]
fn watchdog_stops_detection_cycle() {
    let (mut bridge, board) = bridge(Setup {
        watchdog: 0,
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(2), CycleOutcome::TimedOut);
    assert_eq!(board.pad_toggles(), 0);
}

#[test]
fn watchdog_stops_detection_after_pending_pass() {
    let (mut bridge, board) = bridge(Setup {
        watchdog: 0,
        cadence: 1000,
        ..Setup::default()
    });
    board.expire(Which::Cadence);

    // The due pass over the pad runs to completion; the watchdog is only
    // consulted once the next pass has to wait.
    assert_eq!(bridge.run_cycle(2), CycleOutcome::TimedOut);
    assert_eq!(board.pad_toggles(), 8);
    assert_eq!(bridge.samples().cursor(), 0);
    assert_eq!(board.resets(Which::Cadence), 1);
}

#[test]
fn host_is_checked_before_watchdog() {
    let (mut bridge, _board) = bridge(Setup {
        flips: vec![2],
        watchdog: 0,
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(2), CycleOutcome::Advanced);
}

#[test]
fn priming_cycles_ignore_watchdog() {
    let (mut bridge, board) = bridge(Setup {
        flips: vec![30],
        watchdog: 0,
        cadence: 5,
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(0), CycleOutcome::Advanced);
    assert!(board.pad_toggles() > 0);
    assert!(board.strobe_reads() >= 30);
}

#[test]
fn stalled_host_abandons_round_at_cycle_2() {
    let (mut bridge, board) = bridge(Setup {
        flips: vec![2, 4],
        watchdog: 50,
        ..Setup::default()
    });

    assert_eq!(bridge.run_round(), RoundEnd::Abandoned(2));
    assert_eq!(board.resets(Which::Watchdog), 1);
    assert_eq!(board.pad_toggles(), 0);
}

#[test]
fn quiet_host_releases_steady_state() {
    // Cycles 0-7, then 8 9 8 9, each answered on its second strobe read.
    let flips = (1..=12).map(|n| n * 2).collect();
    let (mut bridge, board) = bridge(Setup {
        flips,
        watchdog: 500,
        ..Setup::default()
    });

    assert_eq!(bridge.run_round(), RoundEnd::Released(8));
    assert!(board.strobe_reads() > 24);
}

#[test]
fn background_sampling_fills_slots_in_order() {
    let mut frames = [0x3f; 8];
    frames[0] = 0x3f & !Button::Up.mask();
    frames[3] = 0x3f & !(Button::A.mask() | Button::Start.mask());
    frames[5] = 0x3f & !LR;

    let (mut bridge, board) = bridge(Setup {
        frames,
        flips: vec![60],
        cadence: 4,
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(0), CycleOutcome::Advanced);

    let toggles = board.pad_toggles();
    assert!(toggles >= 8, "only {} samples", toggles);
    assert_eq!(bridge.samples().cursor(), toggles % 8);
    assert_eq!(bridge.samples().slots(), &frames);

    let state = bridge.state();
    assert_eq!(state.controller_type(), ControllerType::SixButton);
    assert_eq!(
        state.iter_down().collect::<Vec<_>>(),
        vec![Button::Up, Button::A, Button::Start]
    );

    // Cycle 0 presents slot 0 on the MSX lines.
    assert_eq!(board.host_output(), frames[0]);
}

#[test]
fn pins_start_idle() {
    let (bridge, board) = bridge(Setup::default());
    let roles = bridge.config().roles;

    assert_eq!(board.latch(roles.pad_strobe), Some(true));
    assert_eq!(board.host_output(), 0x3f);
    assert_eq!(bridge.samples().classify(), ControllerType::None);
}

#[test]
fn each_cycle_presents_its_slot() {
    let frames = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x3e, 0x3d];
    let (mut bridge, board) = bridge(Setup {
        frames,
        flips: vec![60],
        cadence: 4,
        ..Setup::default()
    });

    assert_eq!(bridge.run_cycle(0), CycleOutcome::Advanced);
    assert_eq!(bridge.samples().slots(), &frames);
    assert_eq!(board.host_output(), frames[0]);

    // Detection cycles, then the steady state where 8 and 9 stand for
    // slots 0 and 1.
    for &cycle in [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 8, 9].iter() {
        board.flip_after(3);
        assert_eq!(bridge.run_cycle(cycle), CycleOutcome::Advanced);
        assert_eq!(
            board.host_output(),
            frames[(cycle & 7) as usize],
            "cycle {}",
            cycle
        );
    }

    // Sampling carried on in the gaps without disturbing the slots.
    assert_eq!(bridge.samples().slots(), &frames);
}
