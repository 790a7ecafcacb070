//! Counter-based hysteresis for noisy binary detections.
//!
//! The tunnel-height sonar is the noisiest sensor in the complex, so a
//! single qualifying reading must never flip an override. A
//! [`DebouncedGate`] requires N consecutive qualifying ticks to engage and
//! M consecutive non-qualifying ticks to release; anything shorter is
//! absorbed.
//!
//! # Example
//!
//! ```rust
//! use rs_tunnel::debounce::DebouncedGate;
//!
//! let mut gate = DebouncedGate::new(8, 8);
//!
//! // Seven qualifying ticks: still inactive.
//! for _ in 0..7 {
//!     gate.update(true);
//! }
//! assert!(!gate.is_active());
//!
//! // The eighth flips it.
//! assert!(gate.update(true).engaged());
//! assert!(gate.is_active());
//! ```

/// Edge produced by one gate update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEdge {
    /// No state change this tick.
    None,
    /// The gate flipped inactive -> active.
    Engaged,
    /// The gate flipped active -> inactive.
    Released,
}

impl GateEdge {
    /// Whether this tick engaged the gate.
    pub fn engaged(self) -> bool {
        matches!(self, GateEdge::Engaged)
    }

    /// Whether this tick released the gate.
    pub fn released(self) -> bool {
        matches!(self, GateEdge::Released)
    }
}

/// Debounced binary detector with independent trigger and clear thresholds.
///
/// Each update with a qualifying signal increments the trigger counter and
/// zeroes the clear counter (and vice versa), so only unbroken runs count.
/// Thresholds of 1 make the gate follow the signal immediately.
#[derive(Clone, Debug)]
pub struct DebouncedGate {
    trigger_threshold: u32,
    clear_threshold: u32,
    trigger_count: u32,
    clear_count: u32,
    active: bool,
}

impl DebouncedGate {
    /// Creates an inactive gate. Thresholds below 1 are treated as 1.
    pub fn new(trigger_threshold: u32, clear_threshold: u32) -> Self {
        Self {
            trigger_threshold: trigger_threshold.max(1),
            clear_threshold: clear_threshold.max(1),
            trigger_count: 0,
            clear_count: 0,
            active: false,
        }
    }

    /// Feed one tick's detection and report any resulting edge.
    pub fn update(&mut self, detected: bool) -> GateEdge {
        if detected {
            self.trigger_count = self.trigger_count.saturating_add(1);
            self.clear_count = 0;
        } else {
            self.clear_count = self.clear_count.saturating_add(1);
            self.trigger_count = 0;
        }

        if !self.active && self.trigger_count >= self.trigger_threshold {
            self.active = true;
            GateEdge::Engaged
        } else if self.active && self.clear_count >= self.clear_threshold {
            self.active = false;
            GateEdge::Released
        } else {
            GateEdge::None
        }
    }

    /// Current debounced state.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drop back to inactive and zero both counters.
    pub fn reset(&mut self) {
        self.trigger_count = 0;
        self.clear_count = 0;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engages_exactly_at_threshold() {
        let mut gate = DebouncedGate::new(8, 8);
        for i in 1..=7 {
            assert_eq!(gate.update(true), GateEdge::None, "tick {}", i);
        }
        assert_eq!(gate.update(true), GateEdge::Engaged);
        // Stays active without further edges.
        assert_eq!(gate.update(true), GateEdge::None);
        assert!(gate.is_active());
    }

    #[test]
    fn releases_exactly_at_threshold() {
        let mut gate = DebouncedGate::new(8, 8);
        for _ in 0..8 {
            gate.update(true);
        }
        for i in 1..=7 {
            assert_eq!(gate.update(false), GateEdge::None, "tick {}", i);
        }
        assert_eq!(gate.update(false), GateEdge::Released);
        assert!(!gate.is_active());
    }

    #[test]
    fn interrupted_run_starts_over() {
        let mut gate = DebouncedGate::new(8, 8);
        for _ in 0..7 {
            gate.update(true);
        }
        gate.update(false); // breaks the run
        for _ in 0..7 {
            assert!(!gate.update(true).engaged());
        }
        assert!(gate.update(true).engaged());
    }

    #[test]
    fn threshold_one_follows_signal() {
        let mut gate = DebouncedGate::new(1, 1);
        assert!(gate.update(true).engaged());
        assert!(gate.update(false).released());
        assert!(gate.update(true).engaged());
    }

    #[test]
    fn reset_clears_state_and_counters() {
        let mut gate = DebouncedGate::new(2, 2);
        gate.update(true);
        gate.update(true);
        assert!(gate.is_active());

        gate.reset();
        assert!(!gate.is_active());
        assert_eq!(gate.update(true), GateEdge::None); // needs a fresh run
        assert!(gate.update(true).engaged());
    }

    #[test]
    fn zero_threshold_behaves_as_one() {
        let mut gate = DebouncedGate::new(0, 0);
        assert!(gate.update(true).engaged());
    }
}
