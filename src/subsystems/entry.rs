//! Overheight detection at the tunnel approach.
//!
//! When the entry sensor sees a vehicle taller than the clearance limit,
//! this subsystem walks the approach and portal heads through a staged
//! stop sequence, holds both red long enough for the driver to be turned
//! around, and re-checks for presence before handing the road back.
//!
//! Triggering uses the smoothed distance so a single noisy echo cannot
//! start the sequence. The presence re-checks at the end of the hold use
//! the raw per-tick reading, so one clean tick is enough to release.

use crate::config::Config;
use crate::flash::WarningFlasher;
use crate::inputs::DistanceReading;
use crate::outputs::{Color, Head, Indicator, IndicatorBank};

// ============================================================================
// State
// ============================================================================

/// Phase of the entry stop sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryState {
    /// No overheight vehicle. Approach and portal show green.
    Idle,
    /// Approach head is yellow; portal still green.
    YellowToRed,
    /// Approach red, portal yellow.
    Handoff,
    /// Both heads red. After the hold expires, presence is re-checked
    /// every tick until the vehicle is gone.
    HoldRed,
    /// Approach back to green; portal follows after one more clear check.
    ClearanceCheck,
}

// ============================================================================
// Controller
// ============================================================================

/// State machine for the entry stop sequence.
#[derive(Debug)]
pub struct EntryController {
    state: EntryState,
    phase_start_ms: u64,
    flasher: WarningFlasher,
}

impl EntryController {
    /// Create an idle entry controller.
    pub fn new() -> Self {
        Self {
            state: EntryState::Idle,
            phase_start_ms: 0,
            flasher: WarningFlasher::new(),
        }
    }

    /// Current phase.
    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Whether a stop sequence is in progress.
    pub fn is_active(&self) -> bool {
        self.state != EntryState::Idle
    }

    /// Advance one tick. Returns the tone this subsystem wants audible,
    /// or `None` for silence.
    pub fn advance(
        &mut self,
        entry: DistanceReading,
        lights: &mut IndicatorBank,
        config: &Config,
        now_ms: u64,
    ) -> Option<u16> {
        let timing = &config.timing;

        match self.state {
            EntryState::Idle => {
                if config.detection.entry_overheight(entry.smoothed_cm) {
                    if let Some(cm) = entry.smoothed_cm {
                        log::warn!(
                            "overheight vehicle at entry: {:.2} m, starting stop sequence",
                            config.detection.vehicle_height_m(cm)
                        );
                    }
                    lights.set_head(Head::Approach, Color::Yellow);
                    self.phase_start_ms = now_ms;
                    self.state = EntryState::YellowToRed;
                    self.run_flasher(lights, timing.flash_ms, now_ms);
                    Some(config.tones.sequence_hz)
                } else {
                    None
                }
            }

            EntryState::YellowToRed => {
                self.run_flasher(lights, timing.flash_ms, now_ms);
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.entry_yellow_ms {
                    lights.set_head(Head::Approach, Color::Red);
                    lights.set_head(Head::Portal, Color::Yellow);
                    self.phase_start_ms = now_ms;
                    self.state = EntryState::Handoff;
                }
                Some(config.tones.sequence_hz)
            }

            EntryState::Handoff => {
                self.run_flasher(lights, timing.flash_ms, now_ms);
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.entry_handoff_ms {
                    lights.set_head(Head::Portal, Color::Red);
                    self.phase_start_ms = now_ms;
                    self.state = EntryState::HoldRed;
                }
                Some(config.tones.sequence_hz)
            }

            EntryState::HoldRed => {
                self.run_flasher(lights, timing.flash_ms, now_ms);
                if now_ms.saturating_sub(self.phase_start_ms) < timing.entry_hold_ms {
                    return Some(config.tones.sequence_hz);
                }
                // Hold expired: the vehicle should be gone by now.
                if config.detection.entry_overheight(entry.raw_cm) {
                    Some(config.tones.stuck_vehicle_hz)
                } else {
                    lights.set_head(Head::Approach, Color::Green);
                    self.phase_start_ms = now_ms;
                    self.state = EntryState::ClearanceCheck;
                    None
                }
            }

            EntryState::ClearanceCheck => {
                self.run_flasher(lights, timing.flash_ms, now_ms);
                let elapsed = now_ms.saturating_sub(self.phase_start_ms);
                if elapsed >= timing.entry_clearance_ms
                    && !config.detection.entry_overheight(entry.raw_cm)
                {
                    log::info!("entry stop sequence complete, approach reopened");
                    self.finish(lights);
                }
                None
            }
        }
    }

    /// Keep the approach warning lights alternating.
    ///
    /// Split out so the override path can keep the flasher running while
    /// the rest of the sequence is suspended, including from idle. The
    /// override release clears the terminals through [`reset`](Self::reset).
    pub fn run_flasher(&mut self, lights: &mut IndicatorBank, flash_ms: u64, now_ms: u64) {
        self.flasher.tick(
            lights,
            Indicator::EntryWarnA,
            Indicator::EntryWarnB,
            flash_ms,
            now_ms,
        );
    }

    /// Abort any sequence in progress and restore the go state.
    pub fn reset(&mut self, lights: &mut IndicatorBank) {
        if self.is_active() {
            log::info!("entry stop sequence reset");
        }
        self.finish(lights);
    }

    fn finish(&mut self, lights: &mut IndicatorBank) {
        lights.set_head(Head::Approach, Color::Green);
        lights.set_head(Head::Portal, Color::Green);
        lights.set(Indicator::EntryWarnA, false);
        lights.set(Indicator::EntryWarnB, false);
        self.flasher.reset();
        self.state = EntryState::Idle;
    }
}

impl Default for EntryController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
