//! Output state buffer for the 24-slot indicator vector.
//!
//! Every light in the complex is one slot in a fixed-order bit vector that is
//! written to the hardware in bulk. Subsystems write into an [`IndicatorBank`]
//! during a tick; the controller flushes it once at the end of the tick, and
//! only when something actually changed.
//!
//! # Write coalescing
//!
//! Setting a slot to the value it already holds does not mark the bank dirty,
//! so a steady state produces zero hardware writes:
//!
//! ```rust
//! use rs_tunnel::outputs::{Indicator, IndicatorBank};
//!
//! let mut bank = IndicatorBank::new();
//! bank.set(Indicator::ApproachGreen, true);
//! assert!(bank.is_dirty());
//!
//! bank.clear_dirty();
//! bank.set(Indicator::ApproachGreen, true); // no change
//! assert!(!bank.is_dirty());
//! ```
//!
//! # Head invariant
//!
//! For the four three-color heads, [`IndicatorBank::set_head`] asserts the new
//! color and clears the other two in the same call, so a flushed frame never
//! shows two colors on one head.

use crate::traits::IntersectionIo;

/// Number of slots in the indicator vector.
pub const INDICATOR_COUNT: usize = 24;

/// One physical indicator, in the fixed shift-register order.
///
/// The discriminant is the slot index in the output vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Indicator {
    /// Approach head, green aspect.
    ApproachGreen = 0,
    /// Approach head, yellow aspect.
    ApproachYellow = 1,
    /// Approach head, red aspect.
    ApproachRed = 2,
    /// Portal head, green aspect.
    PortalGreen = 3,
    /// Portal head, yellow aspect.
    PortalYellow = 4,
    /// Portal head, red aspect.
    PortalRed = 5,
    /// Crossing traffic head, green aspect.
    CrossingGreen = 6,
    /// Crossing traffic head, yellow aspect.
    CrossingYellow = 7,
    /// Crossing traffic head, red aspect.
    CrossingRed = 8,
    /// Pedestrian lantern A, walk.
    PedAGreen = 9,
    /// Pedestrian lantern A, stand.
    PedARed = 10,
    /// Pedestrian lantern B, walk.
    PedBGreen = 11,
    /// Pedestrian lantern B, stand.
    PedBRed = 12,
    /// Exit head, green aspect.
    ExitGreen = 13,
    /// Exit head, yellow aspect.
    ExitYellow = 14,
    /// Exit head, red aspect.
    ExitRed = 15,
    /// Tunnel interior head, green aspect (two-aspect head).
    TunnelGreen = 16,
    /// Tunnel interior head, red aspect.
    TunnelRed = 17,
    /// Entry warning flasher, terminal A.
    EntryWarnA = 18,
    /// Entry warning flasher, terminal B.
    EntryWarnB = 19,
    /// Floodlight 1.
    Floodlight1 = 20,
    /// Floodlight 2.
    Floodlight2 = 21,
    /// Tunnel warning flasher, terminal A.
    TunnelWarnA = 22,
    /// Tunnel warning flasher, terminal B.
    TunnelWarnB = 23,
}

impl Indicator {
    /// Slot index in the output vector.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the four three-color traffic heads.
///
/// The tunnel interior head has only green and red aspects and is driven
/// through its raw [`Indicator`] slots instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Head {
    /// Approach head before the tunnel entry (TL1 in the wiring plan).
    Approach,
    /// Portal head at the tunnel mouth (TL2).
    Portal,
    /// Crossing traffic head at the pedestrian crossing (TL4).
    Crossing,
    /// Exit head past the tunnel (TL5).
    Exit,
}

impl Head {
    /// The (green, yellow, red) slots of this head.
    pub const fn slots(self) -> [Indicator; 3] {
        match self {
            Head::Approach => [
                Indicator::ApproachGreen,
                Indicator::ApproachYellow,
                Indicator::ApproachRed,
            ],
            Head::Portal => [
                Indicator::PortalGreen,
                Indicator::PortalYellow,
                Indicator::PortalRed,
            ],
            Head::Crossing => [
                Indicator::CrossingGreen,
                Indicator::CrossingYellow,
                Indicator::CrossingRed,
            ],
            Head::Exit => [
                Indicator::ExitGreen,
                Indicator::ExitYellow,
                Indicator::ExitRed,
            ],
        }
    }
}

/// Aspect color of a traffic head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Color {
    /// Proceed.
    Green,
    /// Prepare to stop.
    Yellow,
    /// Stop.
    Red,
}

/// In-memory copy of the indicator vector with change tracking.
///
/// All subsystems write here; nothing touches the hardware until
/// [`flush`](Self::flush) runs at the end of a tick. Mutation is strictly
/// sequential within a tick, so a later subsystem overwriting an earlier
/// one's slot is the arbitration mechanism, not a race.
#[derive(Clone, Debug)]
pub struct IndicatorBank {
    bits: [bool; INDICATOR_COUNT],
    dirty: bool,
}

impl IndicatorBank {
    /// All slots off, clean.
    pub fn new() -> Self {
        Self {
            bits: [false; INDICATOR_COUNT],
            dirty: false,
        }
    }

    /// The normal traffic-flow configuration: approach, portal, crossing and
    /// tunnel heads green, pedestrian lanterns red, exit head red.
    ///
    /// Marked dirty so the first flush pushes it out.
    pub fn normal_flow() -> Self {
        let mut bank = Self::new();
        bank.set(Indicator::ApproachGreen, true);
        bank.set(Indicator::PortalGreen, true);
        bank.set(Indicator::CrossingGreen, true);
        bank.set(Indicator::PedARed, true);
        bank.set(Indicator::PedBRed, true);
        bank.set(Indicator::ExitRed, true);
        bank.set(Indicator::TunnelGreen, true);
        bank
    }

    /// Set one slot. Marks the bank dirty only when the value changes.
    pub fn set(&mut self, indicator: Indicator, on: bool) {
        let slot = &mut self.bits[indicator.index()];
        if *slot != on {
            *slot = on;
            self.dirty = true;
        }
    }

    /// Current value of one slot.
    #[inline]
    pub fn is_set(&self, indicator: Indicator) -> bool {
        self.bits[indicator.index()]
    }

    /// Assert exactly one color on a three-color head.
    ///
    /// The other two aspects are cleared in the same call, so the head never
    /// leaves this function with more than one color asserted.
    pub fn set_head(&mut self, head: Head, color: Color) {
        let [green, yellow, red] = head.slots();
        self.set(green, matches!(color, Color::Green));
        self.set(yellow, matches!(color, Color::Yellow));
        self.set(red, matches!(color, Color::Red));
    }

    /// The color currently asserted on a head, if exactly one is.
    pub fn head_color(&self, head: Head) -> Option<Color> {
        let [green, yellow, red] = head.slots();
        match (self.is_set(green), self.is_set(yellow), self.is_set(red)) {
            (true, false, false) => Some(Color::Green),
            (false, true, false) => Some(Color::Yellow),
            (false, false, true) => Some(Color::Red),
            _ => None,
        }
    }

    /// Clear every slot. Used by the shutdown path.
    pub fn all_off(&mut self) {
        for i in 0..INDICATOR_COUNT {
            if self.bits[i] {
                self.bits[i] = false;
                self.dirty = true;
            }
        }
    }

    /// Whether any slot changed since the last flush.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drop the dirty flag without writing. Test helper.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Raw view of the vector.
    pub fn bits(&self) -> &[bool; INDICATOR_COUNT] {
        &self.bits
    }

    /// Write the vector to the hardware if anything changed.
    ///
    /// Returns `Ok(true)` when a write was issued, `Ok(false)` when the bank
    /// was clean and the call was a no-op.
    pub fn flush<B: IntersectionIo>(&mut self, io: &mut B) -> Result<bool, B::Error> {
        if !self.dirty {
            return Ok(false);
        }
        io.write_indicators(&self.bits)?;
        self.dirty = false;
        Ok(true)
    }
}

impl Default for IndicatorBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockIo;

    #[test]
    fn new_bank_is_clean_and_dark() {
        let bank = IndicatorBank::new();
        assert!(!bank.is_dirty());
        assert!(bank.bits().iter().all(|b| !b));
    }

    #[test]
    fn set_marks_dirty_only_on_change() {
        let mut bank = IndicatorBank::new();
        bank.set(Indicator::ExitRed, true);
        assert!(bank.is_dirty());

        bank.clear_dirty();
        bank.set(Indicator::ExitRed, true);
        assert!(!bank.is_dirty());

        bank.set(Indicator::ExitRed, false);
        assert!(bank.is_dirty());
    }

    #[test]
    fn set_head_asserts_exactly_one_color() {
        let mut bank = IndicatorBank::new();
        bank.set(Indicator::ApproachGreen, true);
        bank.set(Indicator::ApproachYellow, true); // corrupt on purpose

        bank.set_head(Head::Approach, Color::Red);
        assert_eq!(bank.head_color(Head::Approach), Some(Color::Red));
        assert!(!bank.is_set(Indicator::ApproachGreen));
        assert!(!bank.is_set(Indicator::ApproachYellow));
    }

    #[test]
    fn normal_flow_defaults() {
        let bank = IndicatorBank::normal_flow();
        assert_eq!(bank.head_color(Head::Approach), Some(Color::Green));
        assert_eq!(bank.head_color(Head::Portal), Some(Color::Green));
        assert_eq!(bank.head_color(Head::Crossing), Some(Color::Green));
        assert_eq!(bank.head_color(Head::Exit), Some(Color::Red));
        assert!(bank.is_set(Indicator::TunnelGreen));
        assert!(bank.is_set(Indicator::PedARed));
        assert!(bank.is_set(Indicator::PedBRed));
        assert!(!bank.is_set(Indicator::Floodlight1));
        assert!(bank.is_dirty());
    }

    #[test]
    fn flush_noop_when_clean() {
        let mut io = MockIo::new();
        let mut bank = IndicatorBank::new();

        assert!(!bank.flush(&mut io).unwrap());
        assert_eq!(io.flushes.len(), 0);

        bank.set(Indicator::Floodlight1, true);
        assert!(bank.flush(&mut io).unwrap());
        assert_eq!(io.flushes.len(), 1);
        assert!(io.flushes[0][Indicator::Floodlight1.index()]);

        // Clean again after flushing
        assert!(!bank.flush(&mut io).unwrap());
        assert_eq!(io.flushes.len(), 1);
    }

    #[test]
    fn all_off_clears_everything() {
        let mut bank = IndicatorBank::normal_flow();
        bank.clear_dirty();
        bank.all_off();
        assert!(bank.is_dirty());
        assert!(bank.bits().iter().all(|b| !b));
    }

    #[test]
    fn all_off_on_dark_bank_stays_clean() {
        let mut bank = IndicatorBank::new();
        bank.all_off();
        assert!(!bank.is_dirty());
    }
}
