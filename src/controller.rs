//! Top-level intersection controller.
//!
//! One controller owns the board, the four subsystems, and the override
//! arbiter. [`IntersectionController::tick`] advances the whole complex by
//! one control period: it samples every sensor once, lets each subsystem
//! write the indicators it owns, applies the override corrections last so
//! they win every conflict, and then pushes the coalesced indicator state
//! and buzzer tone to the hardware.
//!
//! # Example
//!
//! ```rust
//! use rs_tunnel::controller::IntersectionController;
//! use rs_tunnel::config::Config;
//! use rs_tunnel::hal::MockIo;
//!
//! let mut controller = IntersectionController::new(MockIo::new(), Config::default());
//! controller.tick(0).unwrap();
//! controller.tick(50).unwrap();
//! controller.shutdown().unwrap();
//! ```

use crate::arbiter::OverrideArbiter;
use crate::config::Config;
use crate::inputs::{DistanceReading, TickInputs};
use crate::outputs::{Color, Head, IndicatorBank, INDICATOR_COUNT};
use crate::smoothing::DistanceFilter;
use crate::subsystems::{
    CrossingController, CrossingState, EntryController, EntryState, ExitController, ExitState,
    TunnelGuard,
};
use crate::tone::ToneLatch;
use crate::traits::{CrossingButton, IntersectionIo, RangeSensor};

// ============================================================================
// Status snapshot
// ============================================================================

/// Point-in-time view of the whole complex, for logging and telemetry.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionStatus {
    /// Commanded state of all indicator slots.
    pub indicators: [bool; INDICATOR_COUNT],
    /// Frequency currently sent to the buzzer, if any.
    pub tone_hz: Option<u16>,
    /// Phase of the entry stop sequence.
    pub entry_state: EntryState,
    /// Phase of the pedestrian walk cycle.
    pub crossing_state: CrossingState,
    /// Phase of the exit release sequence.
    pub exit_state: ExitState,
    /// Entry stop sequence in progress.
    pub entry_active: bool,
    /// Pedestrian walk cycle in progress.
    pub crossing_active: bool,
    /// Exit release sequence in progress.
    pub exit_active: bool,
    /// Tunnel guard holding the tunnel closed.
    pub guard_active: bool,
    /// Entry subsystem suspended by override.
    pub entry_override: bool,
    /// Crossing head forced red by override.
    pub crossing_override: bool,
    /// Smoothed entry distance in centimeters.
    pub entry_cm: Option<f32>,
    /// Smoothed exit distance in centimeters.
    pub exit_cm: Option<f32>,
    /// Smoothed tunnel-height distance in centimeters.
    pub tunnel_cm: Option<f32>,
}

// ============================================================================
// Controller
// ============================================================================

/// Single-owner controller for the tunnel approach complex.
pub struct IntersectionController<B: IntersectionIo> {
    board: B,
    config: Config,
    entry_filter: DistanceFilter,
    exit_filter: DistanceFilter,
    tunnel_filter: DistanceFilter,
    entry: EntryController,
    crossing: CrossingController,
    exit: ExitController,
    guard: TunnelGuard,
    arbiter: OverrideArbiter,
    lights: IndicatorBank,
    tone: ToneLatch,
}

impl<B: IntersectionIo> IntersectionController<B> {
    /// Create a controller in the normal-flow state.
    ///
    /// Nothing touches the hardware until the first [`tick`], which
    /// flushes the initial indicator pattern.
    ///
    /// [`tick`]: IntersectionController::tick
    pub fn new(board: B, config: Config) -> Self {
        let window = config.detection.smoothing_window;
        Self {
            entry_filter: DistanceFilter::new(window),
            exit_filter: DistanceFilter::new(window),
            tunnel_filter: DistanceFilter::new(window),
            entry: EntryController::new(),
            crossing: CrossingController::new(),
            exit: ExitController::new(),
            guard: TunnelGuard::new(&config.debounce),
            arbiter: OverrideArbiter::new(&config.debounce),
            lights: IndicatorBank::normal_flow(),
            tone: ToneLatch::new(),
            board,
            config,
        }
    }

    /// Advance the whole complex by one control period.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), B::Error> {
        let inputs = self.sample()?;
        let overheight = self
            .config
            .detection
            .tunnel_overheight(inputs.tunnel.smoothed_cm);

        let edges = self.arbiter.update(overheight);

        // A release only clears the suspended entry sequence when neither
        // height sensor still sees the vehicle; otherwise the sequence
        // resumes exactly where the override froze it. An idle entry is
        // reset regardless, which clears the warning lights the override
        // ran on its behalf.
        if edges.entry.released() {
            let at_entry = self
                .config
                .detection
                .entry_overheight(inputs.entry.smoothed_cm);
            let at_exit = self
                .config
                .detection
                .exit_overheight(inputs.exit.smoothed_cm);
            if (!at_entry && !at_exit) || !self.entry.is_active() {
                self.entry.reset(&mut self.lights);
            }
        }

        let desired_tone = if self.arbiter.entry_override_active() {
            // Entry is frozen, but its warning lights keep alternating.
            self.entry
                .run_flasher(&mut self.lights, self.config.timing.flash_ms, now_ms);
            Some(self.config.tones.override_hz)
        } else {
            self.entry
                .advance(inputs.entry, &mut self.lights, &self.config, now_ms)
        };

        if self.exit.advance(
            inputs.exit,
            inputs.light_level,
            &mut self.lights,
            &self.config,
            now_ms,
        ) {
            self.entry.reset(&mut self.lights);
        }

        self.guard
            .advance(overheight, &mut self.lights, &self.config, now_ms);

        let blocked = self.arbiter.crossing_override_active();
        self.crossing.advance(
            inputs.button_a,
            inputs.button_b,
            blocked,
            &mut self.lights,
            &self.config,
            now_ms,
        );

        // Corrections run after every subsystem so overrides win the tick.
        if self.arbiter.entry_override_active() {
            self.lights.set_head(Head::Approach, Color::Red);
            self.lights.set_head(Head::Portal, Color::Red);
        }
        if self.arbiter.crossing_override_active() || self.guard.is_active() {
            self.lights.set_head(Head::Crossing, Color::Red);
        } else if !self.crossing.is_active() {
            self.lights.set_head(Head::Crossing, Color::Green);
        }

        self.tone.apply(&mut self.board, desired_tone)?;
        self.lights.flush(&mut self.board)?;
        Ok(())
    }

    /// Silence the buzzer and turn every indicator off.
    pub fn shutdown(&mut self) -> Result<(), B::Error> {
        log::info!("controller shutdown, all indicators off");
        self.tone.apply(&mut self.board, None)?;
        self.lights.all_off();
        self.lights.flush(&mut self.board)?;
        Ok(())
    }

    /// Snapshot the current state of the complex.
    pub fn status(&self) -> IntersectionStatus {
        IntersectionStatus {
            indicators: *self.lights.bits(),
            tone_hz: self.tone.current(),
            entry_state: self.entry.state(),
            crossing_state: self.crossing.state(),
            exit_state: self.exit.state(),
            entry_active: self.entry.is_active(),
            crossing_active: self.crossing.is_active(),
            exit_active: self.exit.is_active(),
            guard_active: self.guard.is_active(),
            entry_override: self.arbiter.entry_override_active(),
            crossing_override: self.arbiter.crossing_override_active(),
            entry_cm: self.entry_filter.mean(),
            exit_cm: self.exit_filter.mean(),
            tunnel_cm: self.tunnel_filter.mean(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Commanded indicator state.
    pub fn lights(&self) -> &IndicatorBank {
        &self.lights
    }

    /// The underlying board.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable access to the underlying board.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    fn sample(&mut self) -> Result<TickInputs, B::Error> {
        let entry_raw = self.board.read_distance_cm(RangeSensor::Entry)?;
        let exit_raw = self.board.read_distance_cm(RangeSensor::Exit)?;
        let tunnel_raw = self.board.read_distance_cm(RangeSensor::TunnelHeight)?;
        Ok(TickInputs {
            entry: DistanceReading {
                raw_cm: entry_raw,
                smoothed_cm: self.entry_filter.update(entry_raw),
            },
            exit: DistanceReading {
                raw_cm: exit_raw,
                smoothed_cm: self.exit_filter.update(exit_raw),
            },
            tunnel: DistanceReading {
                raw_cm: tunnel_raw,
                smoothed_cm: self.tunnel_filter.update(tunnel_raw),
            },
            button_a: self.board.read_button(CrossingButton::A)?,
            button_b: self.board.read_button(CrossingButton::B)?,
            light_level: self.board.read_light_level()?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
