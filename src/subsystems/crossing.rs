//! Pedestrian crossing call sequence.
//!
//! A rising edge on either call button starts a fixed walk cycle: a short
//! standby, yellow, a walk window with the lanterns green, then a flashing
//! don't-walk warning before the road reopens. Completed crossings stamp a
//! cooldown; presses inside the cooldown, during an active cycle, or while
//! the crossing head is overridden are ignored.

use crate::config::Config;
use crate::flash::Blinker;
use crate::outputs::{Color, Head, Indicator, IndicatorBank};

// ============================================================================
// State
// ============================================================================

/// Phase of the walk cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossingState {
    /// No call in progress. Crossing head green, lanterns red.
    Idle,
    /// Call accepted; traffic still flowing while pedestrians wait.
    Standby,
    /// Crossing head yellow.
    Yellow,
    /// Crossing head red, lanterns green.
    Walk,
    /// Lanterns flash red to clear stragglers before traffic resumes.
    FlashWarn,
}

// ============================================================================
// Controller
// ============================================================================

/// State machine for the pedestrian walk cycle.
#[derive(Debug)]
pub struct CrossingController {
    state: CrossingState,
    phase_start_ms: u64,
    prev_a: bool,
    prev_b: bool,
    last_finish_ms: Option<u64>,
    blinker: Blinker,
}

impl CrossingController {
    /// Create an idle crossing controller.
    pub fn new() -> Self {
        Self {
            state: CrossingState::Idle,
            phase_start_ms: 0,
            prev_a: false,
            prev_b: false,
            last_finish_ms: None,
            blinker: Blinker::start(0),
        }
    }

    /// Current phase.
    pub fn state(&self) -> CrossingState {
        self.state
    }

    /// Whether a walk cycle is in progress.
    pub fn is_active(&self) -> bool {
        self.state != CrossingState::Idle
    }

    /// Advance one tick.
    ///
    /// `blocked` suppresses new calls while an override holds the
    /// crossing head red; a cycle already past standby still finishes.
    pub fn advance(
        &mut self,
        button_a: Option<bool>,
        button_b: Option<bool>,
        blocked: bool,
        lights: &mut IndicatorBank,
        config: &Config,
        now_ms: u64,
    ) {
        let pressed = self.button_edge(button_a, button_b);
        let timing = &config.timing;

        match self.state {
            CrossingState::Idle => {
                if !pressed {
                    return;
                }
                if blocked {
                    log::debug!("crossing call ignored: head overridden");
                    return;
                }
                if let Some(finished) = self.last_finish_ms {
                    if now_ms.saturating_sub(finished) < timing.crossing_cooldown_ms {
                        log::debug!("crossing call ignored: in cooldown");
                        return;
                    }
                }
                log::info!("crossing call accepted");
                lights.set_head(Head::Crossing, Color::Green);
                self.set_lanterns(lights, Color::Red);
                self.phase_start_ms = now_ms;
                self.state = CrossingState::Standby;
            }

            CrossingState::Standby => {
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.crossing_standby_ms {
                    lights.set_head(Head::Crossing, Color::Yellow);
                    self.phase_start_ms = now_ms;
                    self.state = CrossingState::Yellow;
                }
            }

            CrossingState::Yellow => {
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.crossing_yellow_ms {
                    lights.set_head(Head::Crossing, Color::Red);
                    self.set_lanterns(lights, Color::Green);
                    self.phase_start_ms = now_ms;
                    self.state = CrossingState::Walk;
                }
            }

            CrossingState::Walk => {
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.crossing_walk_ms {
                    lights.set(Indicator::PedAGreen, false);
                    lights.set(Indicator::PedBGreen, false);
                    self.blinker = Blinker::start(now_ms);
                    lights.set(Indicator::PedARed, true);
                    lights.set(Indicator::PedBRed, true);
                    self.phase_start_ms = now_ms;
                    self.state = CrossingState::FlashWarn;
                }
            }

            CrossingState::FlashWarn => {
                let on = self.blinker.tick(timing.flash_ms, now_ms);
                lights.set(Indicator::PedARed, on);
                lights.set(Indicator::PedBRed, on);
                if now_ms.saturating_sub(self.phase_start_ms) >= timing.crossing_flash_ms {
                    self.set_lanterns(lights, Color::Red);
                    lights.set_head(Head::Crossing, Color::Green);
                    self.last_finish_ms = Some(now_ms);
                    self.state = CrossingState::Idle;
                    log::info!("crossing cycle complete");
                }
            }
        }
    }

    /// Rising-edge detection over both buttons. A missing reading keeps
    /// the previous level, so a dropout cannot fake a press.
    fn button_edge(&mut self, button_a: Option<bool>, button_b: Option<bool>) -> bool {
        let mut pressed = false;
        if let Some(a) = button_a {
            pressed |= a && !self.prev_a;
            self.prev_a = a;
        }
        if let Some(b) = button_b {
            pressed |= b && !self.prev_b;
            self.prev_b = b;
        }
        pressed
    }

    fn set_lanterns(&self, lights: &mut IndicatorBank, color: Color) {
        let green = color == Color::Green;
        lights.set(Indicator::PedAGreen, green);
        lights.set(Indicator::PedARed, !green);
        lights.set(Indicator::PedBGreen, green);
        lights.set(Indicator::PedBRed, !green);
    }
}

impl Default for CrossingController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
