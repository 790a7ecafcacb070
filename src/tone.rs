//! Idempotent buzzer control.
//!
//! Subsystems declare a *desired* tone each tick (the last writer wins,
//! with the override arbiter writing last). The [`ToneLatch`] reconciles
//! that desire against what the buzzer is already doing and only talks to
//! the hardware on an actual change, so a sequence holding a steady 600 Hz
//! tone issues exactly one `set_tone`.

use crate::traits::IntersectionIo;

/// Tracks the last tone command issued to the hardware.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToneLatch {
    current: Option<u16>,
}

impl ToneLatch {
    /// Creates a latch with the buzzer assumed silent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the desired tone with the hardware.
    ///
    /// `Some(hz)` starts or retunes the buzzer, `None` silences it; in both
    /// cases the command is suppressed when it would repeat the current
    /// state.
    pub fn apply<B: IntersectionIo>(
        &mut self,
        io: &mut B,
        desired: Option<u16>,
    ) -> Result<(), B::Error> {
        if desired == self.current {
            return Ok(());
        }
        match desired {
            Some(hz) => io.set_tone(hz)?,
            None => io.stop_tone()?,
        }
        self.current = desired;
        Ok(())
    }

    /// The frequency last issued, if the buzzer is playing.
    pub fn current(&self) -> Option<u16> {
        self.current
    }
}
