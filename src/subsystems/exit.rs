//! Exit-side release sequence and floodlight control.
//!
//! The exit sensor watches the far portal. A vehicle inside its detection
//! band gets a yellow-then-green release; if it is still loitering when the
//! green window closes, the green flashes until it finally moves on. The
//! yellow and green dwells always run to completion; departure is only
//! checked once the green window closes, and against the smoothed distance,
//! so a dropped echo cannot cut the release short. When the vehicle clears,
//! the exit head returns to red and, if the entry subsystem is still
//! mid-sequence for that vehicle, the clearance resets it so the approach
//! reopens immediately.
//!
//! While a vehicle is engaged here at night, both tunnel floodlights are
//! driven on so the exit camera can see it.

use crate::config::Config;
use crate::flash::Blinker;
use crate::inputs::DistanceReading;
use crate::outputs::{Color, Head, Indicator, IndicatorBank};

// ============================================================================
// State
// ============================================================================

/// Phase of the exit release sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitState {
    /// No vehicle at the exit. Exit head red, floodlights off.
    Idle,
    /// Exit head yellow while the vehicle positions itself.
    Yellow,
    /// Exit head green for the release window.
    Green,
    /// Green window closed but the vehicle is still present; green flashes.
    Flash,
}

// ============================================================================
// Controller
// ============================================================================

/// State machine for the exit release sequence.
#[derive(Debug)]
pub struct ExitController {
    state: ExitState,
    phase_start_ms: u64,
    blinker: Blinker,
    /// One entry reset is owed per vehicle passing through the tunnel.
    /// Armed at startup and on every new exit engagement, spent when the
    /// clearance fires.
    reset_armed: bool,
}

impl ExitController {
    /// Create an idle exit controller with the entry reset armed.
    pub fn new() -> Self {
        Self {
            state: ExitState::Idle,
            phase_start_ms: 0,
            blinker: Blinker::start(0),
            reset_armed: true,
        }
    }

    /// Current phase.
    pub fn state(&self) -> ExitState {
        self.state
    }

    /// Whether a release sequence is in progress.
    pub fn is_active(&self) -> bool {
        self.state != ExitState::Idle
    }

    /// Advance one tick. Returns `true` when the clearance should reset
    /// the entry subsystem.
    pub fn advance(
        &mut self,
        exit: DistanceReading,
        light_level: Option<u16>,
        lights: &mut IndicatorBank,
        config: &Config,
        now_ms: u64,
    ) -> bool {
        let timing = &config.timing;
        let detected = config.detection.exit_overheight(exit.smoothed_cm);

        let reset_entry = match self.state {
            ExitState::Idle => {
                if detected {
                    log::info!("vehicle at exit, starting release sequence");
                    lights.set_head(Head::Exit, Color::Yellow);
                    self.phase_start_ms = now_ms;
                    self.state = ExitState::Yellow;
                    self.reset_armed = true;
                }
                false
            }

            ExitState::Yellow => {
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.exit_yellow_ms {
                    lights.set_head(Head::Exit, Color::Green);
                    self.phase_start_ms = now_ms;
                    self.state = ExitState::Green;
                }
                false
            }

            ExitState::Green => {
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.exit_green_ms {
                    if detected {
                        log::warn!("vehicle loitering at exit, flashing green");
                        self.blinker = Blinker::start(now_ms);
                        self.state = ExitState::Flash;
                        false
                    } else {
                        self.finish(lights)
                    }
                } else {
                    false
                }
            }

            ExitState::Flash => {
                if detected {
                    let on = self.blinker.tick(timing.flash_ms, now_ms);
                    lights.set(Indicator::ExitGreen, on);
                    false
                } else {
                    self.finish(lights)
                }
            }
        };

        self.drive_floodlights(detected, light_level, lights, config);
        reset_entry
    }

    /// Floodlights follow presence and darkness while engaged; forced off
    /// once idle.
    fn drive_floodlights(
        &self,
        detected: bool,
        light_level: Option<u16>,
        lights: &mut IndicatorBank,
        config: &Config,
    ) {
        let on = self.is_active() && detected && config.detection.is_night(light_level);
        lights.set(Indicator::Floodlight1, on);
        lights.set(Indicator::Floodlight2, on);
    }

    fn finish(&mut self, lights: &mut IndicatorBank) -> bool {
        log::info!("exit clear, release sequence complete");
        lights.set_head(Head::Exit, Color::Red);
        self.state = ExitState::Idle;
        if self.reset_armed {
            self.reset_armed = false;
            true
        } else {
            false
        }
    }
}

impl Default for ExitController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
