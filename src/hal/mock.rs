//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware traits, enabling
//! development and testing on desktop without a physical board.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockIo`] | [`IntersectionIo`] | Scripted sensor values, captured flushes and tones |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//!
//! # Example
//!
//! ```rust
//! use rs_tunnel::hal::MockIo;
//! use rs_tunnel::traits::{IntersectionIo, RangeSensor};
//!
//! let mut io = MockIo::new();
//! io.entry_cm = Some(15.0);
//!
//! assert_eq!(io.read_distance_cm(RangeSensor::Entry).unwrap(), Some(15.0));
//! assert_eq!(io.read_distance_cm(RangeSensor::Exit).unwrap(), None);
//! ```
//!
//! [`IntersectionIo`]: crate::traits::IntersectionIo
//! [`Clock`]: crate::traits::Clock

use crate::outputs::INDICATOR_COUNT;
use crate::traits::{Clock, CrossingButton, IntersectionIo, RangeSensor};

extern crate alloc;
use alloc::vec::Vec;

/// A buzzer command captured by [`MockIo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneEvent {
    /// `set_tone(freq_hz)` was issued.
    Set(u16),
    /// `stop_tone()` was issued.
    Stop,
}

/// Mock I/O board for testing.
///
/// Sensor readings are plain public fields: a test sets them before a tick
/// and the controller reads them during it. Every indicator flush and tone
/// command is recorded for verification.
///
/// # Example
///
/// ```rust
/// use rs_tunnel::hal::{MockIo, ToneEvent};
/// use rs_tunnel::traits::IntersectionIo;
///
/// let mut io = MockIo::new();
/// io.set_tone(600).unwrap();
/// io.stop_tone().unwrap();
///
/// assert_eq!(io.tones, vec![ToneEvent::Set(600), ToneEvent::Stop]);
/// ```
#[derive(Debug, Default)]
pub struct MockIo {
    /// Entry sensor reading in centimeters (`None` = echo timeout).
    pub entry_cm: Option<f32>,
    /// Exit sensor reading in centimeters.
    pub exit_cm: Option<f32>,
    /// Tunnel-height sensor reading in centimeters.
    pub tunnel_cm: Option<f32>,
    /// Button A level (`None` = read unavailable).
    pub button_a: Option<bool>,
    /// Button B level.
    pub button_b: Option<bool>,
    /// Ambient light level.
    pub light_level: Option<u16>,
    /// Every indicator vector that was flushed, in order.
    pub flushes: Vec<[bool; INDICATOR_COUNT]>,
    /// Every buzzer command, in order.
    pub tones: Vec<ToneEvent>,
}

impl MockIo {
    /// Creates a mock board with no readings available.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last flushed indicator vector, if any flush happened.
    pub fn last_flush(&self) -> Option<&[bool; INDICATOR_COUNT]> {
        self.flushes.last()
    }

    /// The frequency the buzzer is currently playing, if any.
    pub fn playing(&self) -> Option<u16> {
        match self.tones.last() {
            Some(ToneEvent::Set(hz)) => Some(*hz),
            _ => None,
        }
    }

    /// Set all three distance readings at once.
    pub fn set_distances(&mut self, entry: Option<f32>, exit: Option<f32>, tunnel: Option<f32>) {
        self.entry_cm = entry;
        self.exit_cm = exit;
        self.tunnel_cm = tunnel;
    }
}

impl IntersectionIo for MockIo {
    type Error = ();

    fn read_distance_cm(&mut self, sensor: RangeSensor) -> Result<Option<f32>, ()> {
        Ok(match sensor {
            RangeSensor::Entry => self.entry_cm,
            RangeSensor::Exit => self.exit_cm,
            RangeSensor::TunnelHeight => self.tunnel_cm,
        })
    }

    fn read_button(&mut self, button: CrossingButton) -> Result<Option<bool>, ()> {
        Ok(match button {
            CrossingButton::A => self.button_a,
            CrossingButton::B => self.button_b,
        })
    }

    fn read_light_level(&mut self) -> Result<Option<u16>, ()> {
        Ok(self.light_level)
    }

    fn write_indicators(&mut self, bits: &[bool; INDICATOR_COUNT]) -> Result<(), ()> {
        self.flushes.push(*bits);
        Ok(())
    }

    fn set_tone(&mut self, freq_hz: u16) -> Result<(), ()> {
        self.tones.push(ToneEvent::Set(freq_hz));
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), ()> {
        self.tones.push(ToneEvent::Stop);
        Ok(())
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing dwell and flash timing.
///
/// # Example
///
/// ```rust
/// use rs_tunnel::hal::MockClock;
/// use rs_tunnel::traits::Clock;
///
/// let mut clock = MockClock::new();
/// clock.set(1_000);
/// assert_eq!(clock.now_ms(), 1_000);
///
/// clock.advance(50);
/// assert_eq!(clock.now_ms(), 1_050);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: u64,
}

impl MockClock {
    /// Creates a mock clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.current_ms = ms;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&mut self, ms: u64) {
        self.current_ms += ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_io_default_has_no_readings() {
        let mut io = MockIo::new();
        assert_eq!(io.read_distance_cm(RangeSensor::Entry).unwrap(), None);
        assert_eq!(io.read_button(CrossingButton::A).unwrap(), None);
        assert_eq!(io.read_light_level().unwrap(), None);
        assert!(io.flushes.is_empty());
        assert!(io.tones.is_empty());
    }

    #[test]
    fn mock_io_routes_sensors() {
        let mut io = MockIo::new();
        io.set_distances(Some(15.0), Some(18.0), None);
        assert_eq!(io.read_distance_cm(RangeSensor::Entry).unwrap(), Some(15.0));
        assert_eq!(io.read_distance_cm(RangeSensor::Exit).unwrap(), Some(18.0));
        assert_eq!(io.read_distance_cm(RangeSensor::TunnelHeight).unwrap(), None);
    }

    #[test]
    fn mock_io_records_flushes() {
        let mut io = MockIo::new();
        let mut bits = [false; INDICATOR_COUNT];
        bits[0] = true;
        io.write_indicators(&bits).unwrap();
        assert_eq!(io.flushes.len(), 1);
        assert_eq!(io.last_flush(), Some(&bits));
    }

    #[test]
    fn mock_io_tracks_playing_tone() {
        let mut io = MockIo::new();
        assert_eq!(io.playing(), None);

        io.set_tone(600).unwrap();
        assert_eq!(io.playing(), Some(600));

        io.set_tone(2700).unwrap();
        assert_eq!(io.playing(), Some(2700));

        io.stop_tone().unwrap();
        assert_eq!(io.playing(), None);
    }

    #[test]
    fn mock_clock_set_and_advance() {
        let mut clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.set(500);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 750);
    }
}
