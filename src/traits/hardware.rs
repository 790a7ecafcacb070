//! Hardware abstraction traits for the intersection I/O board.
//!
//! The control core never touches pins, sonar timing, or shift registers.
//! It consumes abstract sensor readings and produces abstract output-bit
//! assignments through [`IntersectionIo`]; how those are physically moved
//! belongs to the implementation.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`IntersectionIo`] | Distance/button/light reads, bulk indicator write, buzzer |
//! | [`Clock`] | Monotonic time source for `no_std` environments |
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`].

use crate::outputs::INDICATOR_COUNT;

/// One of the three ultrasonic distance sensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RangeSensor {
    /// Facing the approach lane before the tunnel entry (US1).
    Entry,
    /// Facing the exit lane past the tunnel (US3).
    Exit,
    /// Mounted under the tunnel ceiling, measuring clearance (US2).
    TunnelHeight,
}

/// One of the two momentary pedestrian-crossing buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrossingButton {
    /// Near-side button.
    A,
    /// Far-side button.
    B,
}

/// I/O board trait - everything the controller reads and writes.
///
/// Implement this for your transport to the microcontroller. All reads
/// return `Ok(None)` for a timed-out or unavailable reading; that is a
/// normal condition, never an error. The associated `Error` is reserved
/// for genuine transport failures.
///
/// # Implementation Notes
///
/// - `read_distance_cm` must not block beyond the sensor's own timeout.
/// - `write_indicators` receives the full vector every time; the caller
///   already coalesces writes, so every call represents a real change.
/// - `set_tone` is only invoked when the frequency changes and `stop_tone`
///   only when a tone is playing; implementations need no dedup of their own.
pub trait IntersectionIo {
    /// Error type for transport failures.
    type Error;

    /// Latest distance reading in centimeters, `None` on echo timeout.
    fn read_distance_cm(&mut self, sensor: RangeSensor) -> Result<Option<f32>, Self::Error>;

    /// Current button level, `None` when the read is unavailable.
    fn read_button(&mut self, button: CrossingButton) -> Result<Option<bool>, Self::Error>;

    /// Ambient light level from the LDR, `None` when unavailable.
    ///
    /// Lower values mean darker; the nighttime threshold lives in
    /// [`DetectionConfig`](crate::config::DetectionConfig).
    fn read_light_level(&mut self) -> Result<Option<u16>, Self::Error>;

    /// Bulk write of the full indicator vector.
    fn write_indicators(&mut self, bits: &[bool; INDICATOR_COUNT]) -> Result<(), Self::Error>;

    /// Start (or retune) the buzzer at the given frequency.
    fn set_tone(&mut self, freq_hz: u16) -> Result<(), Self::Error>;

    /// Silence the buzzer.
    fn stop_tone(&mut self) -> Result<(), Self::Error>;
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for dwell and flash timing.
/// On desktop this can wrap `std::time::Instant`; on embedded, use a
/// hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_tunnel::traits::Clock;
/// use rs_tunnel::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(50);
/// assert_eq!(clock.now_ms(), 50);
/// ```
pub trait Clock {
    /// Current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_sensor_copy_and_eq() {
        let s = RangeSensor::TunnelHeight;
        let copied = s;
        assert_eq!(s, copied);
        assert_ne!(RangeSensor::Entry, RangeSensor::Exit);
    }

    #[test]
    fn crossing_button_debug() {
        assert_eq!(format!("{:?}", CrossingButton::A), "A");
        assert_eq!(format!("{:?}", CrossingButton::B), "B");
    }
}
