//! Tunnel-mouth overheight guard.
//!
//! A height sensor just inside the tunnel mouth catches anything the entry
//! sequence missed. Detection is debounced over consecutive ticks; while
//! engaged, the tunnel head holds red and the tunnel warning lights
//! alternate. The crossing head is also forced red while the guard is
//! engaged, but that arbitration lives in the controller.

use crate::config::{Config, DebounceConfig};
use crate::debounce::DebouncedGate;
use crate::flash::WarningFlasher;
use crate::outputs::{Indicator, IndicatorBank};

/// Debounced last-chance stop at the tunnel mouth.
#[derive(Debug)]
pub struct TunnelGuard {
    gate: DebouncedGate,
    flasher: WarningFlasher,
}

impl TunnelGuard {
    /// Create a guard with the configured debounce thresholds.
    pub fn new(debounce: &DebounceConfig) -> Self {
        Self {
            gate: DebouncedGate::new(debounce.guard_trigger, debounce.guard_clear),
            flasher: WarningFlasher::new(),
        }
    }

    /// Whether the guard currently holds the tunnel closed.
    pub fn is_active(&self) -> bool {
        self.gate.is_active()
    }

    /// Advance one tick with this tick's overheight verdict.
    pub fn advance(
        &mut self,
        overheight: bool,
        lights: &mut IndicatorBank,
        config: &Config,
        now_ms: u64,
    ) {
        let edge = self.gate.update(overheight);

        if edge.engaged() {
            log::warn!("overheight vehicle at tunnel mouth, closing tunnel");
            lights.set(Indicator::TunnelGreen, false);
            lights.set(Indicator::TunnelRed, true);
        }

        if self.gate.is_active() {
            self.flasher.tick(
                lights,
                Indicator::TunnelWarnA,
                Indicator::TunnelWarnB,
                config.timing.flash_ms,
                now_ms,
            );
        }

        if edge.released() {
            log::info!("tunnel mouth clear, reopening tunnel");
            lights.set(Indicator::TunnelRed, false);
            lights.set(Indicator::TunnelGreen, true);
            lights.set(Indicator::TunnelWarnA, false);
            lights.set(Indicator::TunnelWarnB, false);
            self.flasher.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engages_after_debounce() {
        let config = Config::default();
        let mut guard = TunnelGuard::new(&config.debounce);
        let mut lights = IndicatorBank::normal_flow();

        for tick in 1..=7 {
            guard.advance(true, &mut lights, &config, tick * 50);
            assert!(!guard.is_active(), "engaged early at tick {tick}");
        }
        guard.advance(true, &mut lights, &config, 400);
        assert!(guard.is_active());
        assert!(lights.is_set(Indicator::TunnelRed));
        assert!(!lights.is_set(Indicator::TunnelGreen));
    }

    #[test]
    fn releases_after_clear_streak() {
        let config = Config::default();
        let mut guard = TunnelGuard::new(&config.debounce);
        let mut lights = IndicatorBank::normal_flow();

        for tick in 1..=8 {
            guard.advance(true, &mut lights, &config, tick * 50);
        }
        assert!(guard.is_active());

        // An interrupted clear streak starts over.
        for tick in 9..=12 {
            guard.advance(false, &mut lights, &config, tick * 50);
        }
        guard.advance(true, &mut lights, &config, 650);
        for tick in 14..=20 {
            guard.advance(false, &mut lights, &config, tick * 50);
        }
        assert!(guard.is_active());

        guard.advance(false, &mut lights, &config, 1_050);
        assert!(!guard.is_active());
        assert!(lights.is_set(Indicator::TunnelGreen));
        assert!(!lights.is_set(Indicator::TunnelWarnA));
        assert!(!lights.is_set(Indicator::TunnelWarnB));
    }

    #[test]
    fn warning_lights_alternate_while_engaged() {
        let config = Config::default();
        let mut guard = TunnelGuard::new(&config.debounce);
        let mut lights = IndicatorBank::normal_flow();

        for tick in 1..=8u64 {
            guard.advance(true, &mut lights, &config, tick * 50);
        }
        assert!(lights.is_set(Indicator::TunnelWarnA));
        assert!(!lights.is_set(Indicator::TunnelWarnB));

        guard.advance(true, &mut lights, &config, 900);
        assert!(!lights.is_set(Indicator::TunnelWarnA));
        assert!(lights.is_set(Indicator::TunnelWarnB));
    }
}
