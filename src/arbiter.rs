//! Override arbitration for the tunnel-height signal.
//!
//! The tunnel-mouth sensor feeds two overrides on top of the guard itself:
//! one suspends the entry subsystem with both approach heads forced red,
//! the other forces the crossing head red so traffic cannot be stopped in
//! front of a blocked tunnel. Each override owns its own debounce counters,
//! so their thresholds can differ and their edges can land on different
//! ticks even though they watch the same signal.

use crate::config::DebounceConfig;
use crate::debounce::{DebouncedGate, GateEdge};

/// Edges produced by one arbiter update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverrideEdges {
    /// Entry-suspension override edge this tick.
    pub entry: GateEdge,
    /// Crossing-head override edge this tick.
    pub crossing: GateEdge,
}

/// Independent debounced gates for the two overrides.
#[derive(Debug)]
pub struct OverrideArbiter {
    entry_gate: DebouncedGate,
    crossing_gate: DebouncedGate,
}

impl OverrideArbiter {
    /// Create an arbiter with the configured debounce thresholds.
    pub fn new(debounce: &DebounceConfig) -> Self {
        Self {
            entry_gate: DebouncedGate::new(
                debounce.entry_override_trigger,
                debounce.entry_override_clear,
            ),
            crossing_gate: DebouncedGate::new(
                debounce.crossing_override_trigger,
                debounce.crossing_override_clear,
            ),
        }
    }

    /// Feed this tick's overheight verdict to both gates.
    pub fn update(&mut self, overheight: bool) -> OverrideEdges {
        let entry = self.entry_gate.update(overheight);
        let crossing = self.crossing_gate.update(overheight);

        if entry.engaged() {
            log::warn!("entry override engaged, approach heads forced red");
        }
        if entry.released() {
            log::info!("entry override released");
        }
        if crossing.engaged() {
            log::warn!("crossing override engaged, crossing head forced red");
        }
        if crossing.released() {
            log::info!("crossing override released");
        }

        OverrideEdges { entry, crossing }
    }

    /// Whether the entry subsystem is currently suspended.
    pub fn entry_override_active(&self) -> bool {
        self.entry_gate.is_active()
    }

    /// Whether the crossing head is currently forced red.
    pub fn crossing_override_active(&self) -> bool {
        self.crossing_gate.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_engage_on_their_own_thresholds() {
        let mut arbiter = OverrideArbiter::new(&DebounceConfig::default());

        // Crossing override follows the signal immediately.
        let edges = arbiter.update(true);
        assert!(edges.crossing.engaged());
        assert!(!edges.entry.engaged());
        assert!(arbiter.crossing_override_active());
        assert!(!arbiter.entry_override_active());

        // Entry override needs its full streak.
        for _ in 2..8 {
            assert!(!arbiter.update(true).entry.engaged());
        }
        assert!(arbiter.update(true).entry.engaged());
        assert!(arbiter.entry_override_active());
    }

    #[test]
    fn release_edges_are_reported_once() {
        let mut arbiter = OverrideArbiter::new(&DebounceConfig::default());
        for _ in 0..8 {
            arbiter.update(true);
        }

        for _ in 0..7 {
            let edges = arbiter.update(false);
            assert!(!edges.entry.released());
        }
        let edges = arbiter.update(false);
        assert!(edges.entry.released());
        assert!(!arbiter.update(false).entry.released());
    }

    #[test]
    fn custom_thresholds() {
        let debounce = DebounceConfig::default()
            .with_entry_override_thresholds(3, 2)
            .with_crossing_override_thresholds(5, 5);
        let mut arbiter = OverrideArbiter::new(&debounce);

        arbiter.update(true);
        arbiter.update(true);
        assert!(arbiter.update(true).entry.engaged());
        assert!(!arbiter.crossing_override_active());
        arbiter.update(true);
        assert!(arbiter.update(true).crossing.engaged());
    }
}
