//! Timestamp-driven flash patterns for warning lights.
//!
//! Two patterns exist in the complex:
//!
//! - [`WarningFlasher`]: the two-terminal A/B alternating pattern used by
//!   the entry and tunnel warning lights (A lit, then B lit, then restart,
//!   one period per phase).
//! - [`Blinker`]: a plain on/off toggle used by the exit head's green flash
//!   and the pedestrian-lantern flash.
//!
//! Both are pure state machines over a millisecond timestamp; they are
//! advanced once per control tick and write into the shared
//! [`IndicatorBank`](crate::outputs::IndicatorBank).

use crate::outputs::{Indicator, IndicatorBank};

/// Phase of the A/B alternating pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlashPhase {
    /// Next tick lights terminal A.
    Start,
    /// Terminal A lit, waiting out the period.
    AOn,
    /// Terminal B lit, waiting out the period.
    BOn,
}

/// Three-phase alternating flasher for a two-terminal warning light.
///
/// Runs concurrently with whatever sequence owns it and is reset
/// independently on re-entry or external reset.
#[derive(Clone, Debug)]
pub struct WarningFlasher {
    phase: FlashPhase,
    phase_start_ms: u64,
}

impl WarningFlasher {
    /// Creates a flasher at the start of its cycle.
    pub fn new() -> Self {
        Self {
            phase: FlashPhase::Start,
            phase_start_ms: 0,
        }
    }

    /// Advance one tick, driving terminals `a` and `b`.
    pub fn tick(
        &mut self,
        lights: &mut IndicatorBank,
        a: Indicator,
        b: Indicator,
        period_ms: u64,
        now_ms: u64,
    ) {
        match self.phase {
            FlashPhase::Start => {
                lights.set(a, true);
                lights.set(b, false);
                self.phase_start_ms = now_ms;
                self.phase = FlashPhase::AOn;
            }
            FlashPhase::AOn => {
                if now_ms.saturating_sub(self.phase_start_ms) >= period_ms {
                    lights.set(a, false);
                    lights.set(b, true);
                    self.phase_start_ms = now_ms;
                    self.phase = FlashPhase::BOn;
                }
            }
            FlashPhase::BOn => {
                if now_ms.saturating_sub(self.phase_start_ms) >= period_ms {
                    self.phase = FlashPhase::Start;
                }
            }
        }
    }

    /// Return to the start of the cycle.
    ///
    /// Does not touch the terminals; the owner clears them.
    pub fn reset(&mut self) {
        self.phase = FlashPhase::Start;
        self.phase_start_ms = 0;
    }
}

impl Default for WarningFlasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-period on/off toggle.
#[derive(Clone, Debug)]
pub struct Blinker {
    on: bool,
    last_toggle_ms: u64,
}

impl Blinker {
    /// Creates a blinker in the "on" half of its cycle, anchored at `now_ms`.
    pub fn start(now_ms: u64) -> Self {
        Self {
            on: true,
            last_toggle_ms: now_ms,
        }
    }

    /// Advance one tick; returns whether the output should currently be lit.
    pub fn tick(&mut self, period_ms: u64, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_toggle_ms) >= period_ms {
            self.on = !self.on;
            self.last_toggle_ms = now_ms;
        }
        self.on
    }
}
