//! Per-tick input snapshot.
//!
//! The controller samples every sensor exactly once per tick and hands the
//! subsystems this snapshot, so all of them see the same instant.

/// A distance-sensor sample with its smoothed companion.
///
/// Triggers evaluate the smoothed value; presence re-checks inside a running
/// sequence evaluate the raw value, so a single failed echo lets a hold
/// release without waiting for the filter to drain.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceReading {
    /// This tick's raw echo in centimeters, if the sensor answered.
    pub raw_cm: Option<f32>,
    /// Moving-average output after folding in this tick's echo.
    pub smoothed_cm: Option<f32>,
}

/// Everything sampled at the top of a tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInputs {
    /// Entry (approach) height sensor.
    pub entry: DistanceReading,
    /// Exit sensor.
    pub exit: DistanceReading,
    /// Tunnel-mouth height sensor.
    pub tunnel: DistanceReading,
    /// Crossing call button A, if readable this tick.
    pub button_a: Option<bool>,
    /// Crossing call button B, if readable this tick.
    pub button_b: Option<bool>,
    /// Ambient light level, if readable this tick.
    pub light_level: Option<u16>,
}
