//! Scripted desktop simulation of the tunnel approach complex.
//!
//! Runs the controller against the mock board through a day in the life of
//! the intersection: an overheight vehicle is stopped at the entry, turned
//! around, and released at the exit; a pedestrian crosses; and a vehicle
//! that sneaks up to the tunnel mouth trips the guard and both overrides.
//!
//! ```text
//! RUST_LOG=info cargo run --example desktop_sim
//! ```

use anyhow::anyhow;

use rs_tunnel::config::Config;
use rs_tunnel::controller::IntersectionController;
use rs_tunnel::hal::{MockClock, MockIo};
use rs_tunnel::traits::Clock;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut board = MockIo::new();
    board.set_distances(Some(60.0), Some(60.0), Some(60.0));
    board.button_a = Some(false);
    board.button_b = Some(false);
    board.light_level = Some(900);

    let config = Config::default();
    let tick_ms = config.timing.tick_ms;
    let mut controller = IntersectionController::new(board, config);
    let mut clock = MockClock::new();

    let step = |controller: &mut IntersectionController<MockIo>,
                    clock: &mut MockClock,
                    ticks: u64|
     -> anyhow::Result<()> {
        for _ in 0..ticks {
            controller
                .tick(clock.now_ms())
                .map_err(|_| anyhow!("board i/o failed"))?;
            clock.advance(tick_ms);
        }
        Ok(())
    };

    log::info!("--- normal flow ---");
    step(&mut controller, &mut clock, 20)?;

    log::info!("--- overheight vehicle arrives at the entry ---");
    controller.board_mut().entry_cm = Some(15.0);
    step(&mut controller, &mut clock, 10)?;
    log::info!(
        "entry sequence running: {}, tone: {:?}",
        controller.status().entry_active,
        controller.status().tone_hz
    );

    log::info!("--- vehicle backs away during the hold ---");
    controller.board_mut().entry_cm = Some(60.0);
    // Sit out the 30 s hold plus the clearance second.
    step(&mut controller, &mut clock, 700)?;
    log::info!(
        "entry sequence running: {}",
        controller.status().entry_active
    );

    log::info!("--- pedestrian presses the call button at night ---");
    controller.board_mut().light_level = Some(200);
    controller.board_mut().button_a = Some(true);
    step(&mut controller, &mut clock, 1)?;
    controller.board_mut().button_a = Some(false);
    step(&mut controller, &mut clock, 90)?;
    log::info!(
        "walk cycle running: {}",
        controller.status().crossing_active
    );
    step(&mut controller, &mut clock, 110)?;

    log::info!("--- overheight vehicle reaches the tunnel mouth ---");
    controller.board_mut().tunnel_cm = Some(12.0);
    step(&mut controller, &mut clock, 20)?;
    let status = controller.status();
    log::info!(
        "guard: {}, entry override: {}, crossing override: {}",
        status.guard_active,
        status.entry_override,
        status.crossing_override
    );

    log::info!("--- vehicle is towed clear ---");
    controller.board_mut().tunnel_cm = Some(60.0);
    step(&mut controller, &mut clock, 20)?;
    let status = controller.status();
    log::info!(
        "guard: {}, entry override: {}",
        status.guard_active,
        status.entry_override
    );

    controller
        .shutdown()
        .map_err(|_| anyhow!("board i/o failed"))?;
    log::info!("simulation complete after {} ms", clock.now_ms());
    Ok(())
}
