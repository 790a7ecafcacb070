//! Fixed-period tick loop for hosted targets.
//!
//! Drives an [`IntersectionController`] at its configured tick period until
//! a stop flag is raised, then shuts the complex down cleanly. Embedded
//! targets call [`IntersectionController::tick`] from their own timer
//! instead.

use core::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::controller::IntersectionController;
use crate::traits::{Clock, IntersectionIo};

/// Run the control loop until `stop` is set.
///
/// Each iteration ticks the controller once, then sleeps out the remainder
/// of the period. A tick that overruns its period starts the next one
/// immediately; the loop never tries to catch up on missed ticks.
pub fn run<B, C>(
    controller: &mut IntersectionController<B>,
    clock: &C,
    stop: &AtomicBool,
) -> Result<(), B::Error>
where
    B: IntersectionIo,
    C: Clock,
{
    let tick_ms = controller.config().timing.tick_ms;
    log::info!("control loop started, period {tick_ms} ms");

    while !stop.load(Ordering::Relaxed) {
        let started = clock.now_ms();
        controller.tick(started)?;

        let elapsed = clock.now_ms().saturating_sub(started);
        if elapsed < tick_ms {
            std::thread::sleep(Duration::from_millis(tick_ms - elapsed));
        } else {
            log::warn!("tick overran its period: {elapsed} ms");
        }
    }

    log::info!("stop requested, shutting down");
    controller.shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, TimingConfig};
    use crate::hal::{MockIo, StdClock};

    #[test]
    fn stop_flag_ends_loop_with_shutdown() {
        let mut board = MockIo::new();
        board.set_distances(Some(60.0), Some(60.0), Some(60.0));
        let config = Config::default().with_timing(TimingConfig::default().with_tick_ms(1));
        let mut controller = IntersectionController::new(board, config);

        let stop = AtomicBool::new(true);
        run(&mut controller, &StdClock::new(), &stop).unwrap();

        // Pre-set stop: the loop exits before ticking, but still shuts down.
        let flushed = controller.board().last_flush().unwrap();
        assert!(flushed.iter().all(|on| !on));
    }
}
