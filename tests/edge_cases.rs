//! Edge case and invariant tests for the intersection controller

use rs_tunnel::{hal::MockIo, Color, Config, Head, IntersectionController};

const TICK_MS: u64 = 50;

fn quiet_board() -> MockIo {
    let mut board = MockIo::new();
    board.set_distances(Some(60.0), Some(60.0), Some(60.0));
    board.button_a = Some(false);
    board.button_b = Some(false);
    board.light_level = Some(900);
    board
}

fn run_ticks(controller: &mut IntersectionController<MockIo>, start_ms: u64, ticks: u64) -> u64 {
    let mut now = start_ms;
    for _ in 0..ticks {
        controller.tick(now).unwrap();
        now += TICK_MS;
    }
    now
}

/// A head may go dark mid-flash, but two aspects lit at once is a fault.
fn assert_at_most_one_color(controller: &IntersectionController<MockIo>, now_ms: u64) {
    for head in [Head::Approach, Head::Portal, Head::Crossing, Head::Exit] {
        let lit = head
            .slots()
            .iter()
            .filter(|&&slot| controller.lights().is_set(slot))
            .count();
        assert!(lit <= 1, "{head:?} shows {lit} colors at {now_ms} ms");
    }
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn every_head_shows_exactly_one_color_under_load() {
    let mut board = quiet_board();
    board.entry_cm = Some(15.0);
    board.light_level = Some(200);
    let mut controller = IntersectionController::new(board, Config::default());

    // Entry sequence, a crossing call, a vehicle at the exit, and an
    // overheight vehicle at the mouth, all overlapping.
    let mut now = run_ticks(&mut controller, 0, 10);
    controller.board_mut().button_a = Some(true);
    controller.tick(now).unwrap();
    now += TICK_MS;
    controller.board_mut().button_a = Some(false);
    controller.board_mut().exit_cm = Some(10.0);
    controller.board_mut().tunnel_cm = Some(12.0);

    for _ in 0..400 {
        controller.tick(now).unwrap();
        assert_at_most_one_color(&controller, now);
        now += TICK_MS;
    }

    // Clear everything and let the complex settle.
    controller.board_mut().set_distances(Some(60.0), Some(80.0), Some(60.0));
    for _ in 0..800 {
        controller.tick(now).unwrap();
        assert_at_most_one_color(&controller, now);
        now += TICK_MS;
    }
}

#[test]
fn flushes_only_when_something_changed() {
    let mut board = quiet_board();
    board.entry_cm = Some(15.0);
    let mut controller = IntersectionController::new(board, Config::default());

    // Reach the both-red hold, then land between two flasher toggles.
    run_ticks(&mut controller, 0, 43);
    let before = controller.board().flushes.len();

    // Ticks at 2150..2550: heads frozen, next flasher change is at 2600.
    run_ticks(&mut controller, 2150, 9);
    assert_eq!(controller.board().flushes.len(), before);

    controller.tick(2600).unwrap();
    assert_eq!(controller.board().flushes.len(), before + 1);
}

#[test]
fn tone_commands_are_not_repeated() {
    let mut board = quiet_board();
    board.entry_cm = Some(15.0);
    let mut controller = IntersectionController::new(board, Config::default());

    run_ticks(&mut controller, 0, 100);

    // One Set(600) at the trigger, nothing since.
    assert_eq!(controller.board().tones.len(), 1);
}

// ============================================================================
// Crossing Edge Cases
// ============================================================================

#[test]
fn second_press_during_cooldown_is_ignored() {
    let mut controller = IntersectionController::new(quiet_board(), Config::default());
    controller.tick(0).unwrap();

    controller.board_mut().button_b = Some(true);
    controller.tick(50).unwrap();
    controller.board_mut().button_b = Some(false);
    assert!(controller.status().crossing_active);

    // Full cycle is 9s; run well past it.
    let now = run_ticks(&mut controller, 100, 200);
    assert!(!controller.status().crossing_active);

    // 10s into the 30s cooldown: ignored.
    controller.board_mut().button_b = Some(true);
    controller.tick(now).unwrap();
    controller.board_mut().button_b = Some(false);
    assert!(!controller.status().crossing_active);

    // Past the cooldown: accepted.
    let now = run_ticks(&mut controller, now + TICK_MS, 620);
    controller.board_mut().button_b = Some(true);
    controller.tick(now).unwrap();
    assert!(controller.status().crossing_active);
}

#[test]
fn button_dropout_never_fakes_a_press() {
    let mut controller = IntersectionController::new(quiet_board(), Config::default());

    // Button stuck high with intermittent reads: one edge, one cycle.
    controller.board_mut().button_a = Some(true);
    controller.tick(0).unwrap();
    assert!(controller.status().crossing_active);

    let mut now = 50;
    for tick in 0..200u64 {
        controller.board_mut().button_a = if tick % 3 == 0 { None } else { Some(true) };
        controller.tick(now).unwrap();
        now += TICK_MS;
    }
    // Cycle finished; the held button cannot retrigger without a release.
    assert!(!controller.status().crossing_active);
}

// ============================================================================
// Sensor Noise
// ============================================================================

#[test]
fn single_outlier_reading_does_not_trigger() {
    let mut controller = IntersectionController::new(quiet_board(), Config::default());
    let now = run_ticks(&mut controller, 0, 10);

    // One wild 5cm echo in a stream of 60s: the mean never crosses 20cm.
    controller.board_mut().entry_cm = Some(5.0);
    let now = run_ticks(&mut controller, now, 1);
    controller.board_mut().entry_cm = Some(60.0);
    run_ticks(&mut controller, now, 20);

    assert!(!controller.status().entry_active);
    assert_eq!(
        controller.lights().head_color(Head::Approach),
        Some(Color::Green)
    );
}

#[test]
fn echo_timeouts_leave_the_complex_untouched() {
    let mut controller = IntersectionController::new(quiet_board(), Config::default());
    run_ticks(&mut controller, 0, 5);

    controller.board_mut().set_distances(None, None, None);
    controller.board_mut().light_level = None;
    run_ticks(&mut controller, 250, 100);

    let status = controller.status();
    assert!(!status.entry_active);
    assert!(!status.exit_active);
    assert!(!status.guard_active);
    assert!(!status.entry_override);
    assert!(!status.crossing_override);
}
