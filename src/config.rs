//! Tunable constants for detection, timing, debounce, and tones.
//!
//! Every threshold and dwell in the complex is data, not code, so a site
//! with a taller clearance or a slower crossing only touches this module.
//!
//! # Example
//!
//! ```rust
//! use rs_tunnel::config::{Config, DetectionConfig, TimingConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_detection(DetectionConfig::default().with_max_height_m(0.25))
//!     .with_timing(TimingConfig::default().with_hold_ms(45_000));
//! ```

// ============================================================================
// Main Config
// ============================================================================

/// Complete controller configuration.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Detection thresholds and sensor conditioning.
    pub detection: DetectionConfig,
    /// Dwell durations, flash periods, cooldowns.
    pub timing: TimingConfig,
    /// Debounce thresholds for the guard and override gates.
    pub debounce: DebounceConfig,
    /// Buzzer frequencies.
    pub tones: ToneConfig,
}

impl Config {
    /// Set detection configuration.
    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    /// Set timing configuration.
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set debounce configuration.
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set tone configuration.
    pub fn with_tones(mut self, tones: ToneConfig) -> Self {
        self.tones = tones;
        self
    }
}

// ============================================================================
// Detection Config
// ============================================================================

/// Detection thresholds and the predicates built on them.
///
/// Heights are measured inversely: the sonar looks down, so a *smaller*
/// distance means a *taller* vehicle. `vehicle_height_m` converts via
/// `height = sensor_offset − distance`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionConfig {
    /// Maximum legal vehicle height in meters.
    pub max_height_m: f32,
    /// Height of the entry sensor above the roadway in meters.
    pub sensor_offset_m: f32,
    /// Detection band for the exit sensor in centimeters (scaled rig).
    pub exit_band_cm: f32,
    /// LDR readings below this count as nighttime.
    pub night_threshold: u16,
    /// Moving-average window for the distance filters.
    pub smoothing_window: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_height_m: 0.2,
            sensor_offset_m: 0.6,
            exit_band_cm: 20.0,
            night_threshold: 700,
            smoothing_window: 5,
        }
    }
}

impl DetectionConfig {
    /// Set the maximum legal vehicle height.
    pub fn with_max_height_m(mut self, m: f32) -> Self {
        self.max_height_m = m;
        self
    }

    /// Set the entry sensor's mounting height.
    pub fn with_sensor_offset_m(mut self, m: f32) -> Self {
        self.sensor_offset_m = m;
        self
    }

    /// Set the exit detection band.
    pub fn with_exit_band_cm(mut self, cm: f32) -> Self {
        self.exit_band_cm = cm;
        self
    }

    /// Set the nighttime light threshold.
    pub fn with_night_threshold(mut self, level: u16) -> Self {
        self.night_threshold = level;
        self
    }

    /// Set the smoothing window size.
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Whether an entry-sensor distance indicates an overheight vehicle.
    ///
    /// The reading is in centimeters; the comparison is in meters:
    /// `distance ≤ max height` means the vehicle's roof is too close to
    /// the sensor. `None` is never a detection.
    pub fn entry_overheight(&self, distance_cm: Option<f32>) -> bool {
        match distance_cm {
            Some(cm) if cm > 0.0 => cm / 100.0 <= self.max_height_m,
            _ => false,
        }
    }

    /// Whether an exit-sensor distance falls inside the detection band.
    pub fn exit_overheight(&self, distance_cm: Option<f32>) -> bool {
        match distance_cm {
            Some(cm) => cm > 0.0 && cm < self.exit_band_cm,
            None => false,
        }
    }

    /// Whether a tunnel-height distance indicates an overheight vehicle.
    pub fn tunnel_overheight(&self, distance_cm: Option<f32>) -> bool {
        match distance_cm {
            Some(cm) => cm > 0.0 && cm < self.max_height_m * 100.0,
            None => false,
        }
    }

    /// Vehicle height implied by an entry-sensor distance in centimeters.
    pub fn vehicle_height_m(&self, distance_cm: f32) -> f32 {
        self.sensor_offset_m - distance_cm / 100.0
    }

    /// Whether an ambient light reading counts as nighttime.
    ///
    /// An unavailable reading counts as daytime (floodlights stay off).
    pub fn is_night(&self, light_level: Option<u16>) -> bool {
        match light_level {
            Some(level) => level < self.night_threshold,
            None => false,
        }
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Dwell durations, flash periods, and cooldowns, all in milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Control loop period.
    pub tick_ms: u64,
    /// Warning-light and lantern flash period.
    pub flash_ms: u64,

    /// Entry sequence: approach-yellow dwell.
    pub entry_yellow_ms: u64,
    /// Entry sequence: handoff (approach red, portal yellow) dwell.
    pub entry_handoff_ms: u64,
    /// Entry sequence: both-red hold before the clearance re-check starts.
    pub entry_hold_ms: u64,
    /// Entry sequence: approach-green dwell before the portal follows.
    pub entry_clearance_ms: u64,

    /// Crossing sequence: standby dwell before yellow.
    pub crossing_standby_ms: u64,
    /// Crossing sequence: yellow dwell.
    pub crossing_yellow_ms: u64,
    /// Crossing sequence: walk dwell.
    pub crossing_walk_ms: u64,
    /// Crossing sequence: lantern-flash dwell.
    pub crossing_flash_ms: u64,
    /// Minimum time between completed crossings.
    pub crossing_cooldown_ms: u64,

    /// Exit sequence: yellow dwell.
    pub exit_yellow_ms: u64,
    /// Exit sequence: green hold before the presence re-check.
    pub exit_green_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            flash_ms: 500,
            entry_yellow_ms: 1_000,
            entry_handoff_ms: 1_000,
            entry_hold_ms: 30_000,
            entry_clearance_ms: 1_000,
            crossing_standby_ms: 2_000,
            crossing_yellow_ms: 2_000,
            crossing_walk_ms: 3_000,
            crossing_flash_ms: 2_000,
            crossing_cooldown_ms: 30_000,
            exit_yellow_ms: 2_000,
            exit_green_ms: 5_000,
        }
    }
}

impl TimingConfig {
    /// Set the control loop period.
    pub fn with_tick_ms(mut self, ms: u64) -> Self {
        self.tick_ms = ms;
        self
    }

    /// Set the flash period.
    pub fn with_flash_ms(mut self, ms: u64) -> Self {
        self.flash_ms = ms;
        self
    }

    /// Set the entry both-red hold.
    pub fn with_hold_ms(mut self, ms: u64) -> Self {
        self.entry_hold_ms = ms;
        self
    }

    /// Set the crossing cooldown.
    pub fn with_crossing_cooldown_ms(mut self, ms: u64) -> Self {
        self.crossing_cooldown_ms = ms;
        self
    }
}

// ============================================================================
// Debounce Config
// ============================================================================

/// Consecutive-tick thresholds for the debounced gates.
///
/// The guard and the entry override share the same detection signal but own
/// separate counters, so the two effects can desynchronize if their
/// thresholds ever differ. The crossing override defaults to 1/1: it follows
/// the tunnel-height band immediately.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebounceConfig {
    /// Tunnel guard: ticks of detection before engaging.
    pub guard_trigger: u32,
    /// Tunnel guard: ticks of clearance before releasing.
    pub guard_clear: u32,
    /// Entry override: ticks of detection before engaging.
    pub entry_override_trigger: u32,
    /// Entry override: ticks of clearance before releasing.
    pub entry_override_clear: u32,
    /// Crossing-head override: ticks of detection before engaging.
    pub crossing_override_trigger: u32,
    /// Crossing-head override: ticks of clearance before releasing.
    pub crossing_override_clear: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            guard_trigger: 8,
            guard_clear: 8,
            entry_override_trigger: 8,
            entry_override_clear: 8,
            crossing_override_trigger: 1,
            crossing_override_clear: 1,
        }
    }
}

impl DebounceConfig {
    /// Set both guard thresholds.
    pub fn with_guard_thresholds(mut self, trigger: u32, clear: u32) -> Self {
        self.guard_trigger = trigger;
        self.guard_clear = clear;
        self
    }

    /// Set both entry-override thresholds.
    pub fn with_entry_override_thresholds(mut self, trigger: u32, clear: u32) -> Self {
        self.entry_override_trigger = trigger;
        self.entry_override_clear = clear;
        self
    }

    /// Set both crossing-override thresholds.
    pub fn with_crossing_override_thresholds(mut self, trigger: u32, clear: u32) -> Self {
        self.crossing_override_trigger = trigger;
        self.crossing_override_clear = clear;
        self
    }
}

// ============================================================================
// Tone Config
// ============================================================================

/// Buzzer frequencies for the three audible conditions.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneConfig {
    /// Steady tone while the entry sequence runs.
    pub sequence_hz: u16,
    /// Elevated tone while the tunnel guard overrides the entry subsystem.
    pub override_hz: u16,
    /// Alert tone when a vehicle is still present after the hold expires.
    pub stuck_vehicle_hz: u16,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sequence_hz: 600,
            override_hz: 1_200,
            stuck_vehicle_hz: 2_700,
        }
    }
}

impl ToneConfig {
    /// Set the entry-sequence tone.
    pub fn with_sequence_hz(mut self, hz: u16) -> Self {
        self.sequence_hz = hz;
        self
    }

    /// Set the override tone.
    pub fn with_override_hz(mut self, hz: u16) -> Self {
        self.override_hz = hz;
        self
    }

    /// Set the stuck-vehicle alert tone.
    pub fn with_stuck_vehicle_hz(mut self, hz: u16) -> Self {
        self.stuck_vehicle_hz = hz;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.timing.tick_ms, 50);
        assert_eq!(config.timing.entry_hold_ms, 30_000);
        assert_eq!(config.debounce.guard_trigger, 8);
        assert_eq!(config.tones.sequence_hz, 600);
        assert_eq!(config.detection.smoothing_window, 5);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_detection(DetectionConfig::default().with_max_height_m(0.25))
            .with_timing(TimingConfig::default().with_hold_ms(45_000))
            .with_debounce(DebounceConfig::default().with_guard_thresholds(4, 6))
            .with_tones(ToneConfig::default().with_override_hz(1_500));

        assert_eq!(config.detection.max_height_m, 0.25);
        assert_eq!(config.timing.entry_hold_ms, 45_000);
        assert_eq!(config.debounce.guard_trigger, 4);
        assert_eq!(config.debounce.guard_clear, 6);
        assert_eq!(config.tones.override_hz, 1_500);
    }

    #[test]
    fn entry_overheight_boundary() {
        let det = DetectionConfig::default();
        // 20cm = 0.2m = exactly the max height: detected (<=).
        assert!(det.entry_overheight(Some(20.0)));
        assert!(det.entry_overheight(Some(15.0)));
        assert!(!det.entry_overheight(Some(20.1)));
        assert!(!det.entry_overheight(Some(0.0)));
        assert!(!det.entry_overheight(Some(-1.0)));
        assert!(!det.entry_overheight(None));
    }

    #[test]
    fn exit_band_is_exclusive() {
        let det = DetectionConfig::default();
        assert!(det.exit_overheight(Some(19.9)));
        assert!(!det.exit_overheight(Some(20.0)));
        assert!(!det.exit_overheight(Some(0.0)));
        assert!(!det.exit_overheight(None));
    }

    #[test]
    fn tunnel_band_scales_from_max_height() {
        let det = DetectionConfig::default();
        assert!(det.tunnel_overheight(Some(19.9)));
        assert!(!det.tunnel_overheight(Some(20.0)));
        assert!(!det.tunnel_overheight(None));

        let taller = DetectionConfig::default().with_max_height_m(0.3);
        assert!(taller.tunnel_overheight(Some(25.0)));
    }

    #[test]
    fn vehicle_height_from_distance() {
        let det = DetectionConfig::default();
        // Sensor 0.6m up, roof 15cm away: vehicle is 0.45m tall.
        assert!((det.vehicle_height_m(15.0) - 0.45).abs() < 1e-6);
    }

    #[test]
    fn night_detection() {
        let det = DetectionConfig::default();
        assert!(det.is_night(Some(699)));
        assert!(!det.is_night(Some(700)));
        assert!(!det.is_night(None));
    }
}
