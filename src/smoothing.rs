//! Moving-average conditioning for noisy distance readings.
//!
//! Ultrasonic sonar is jittery: single readings bounce by several
//! centimeters and time out entirely when the echo is lost. Each sensor
//! owns a [`DistanceFilter`] that low-passes its readings with a trailing
//! window average.
//!
//! The filter never fails. A missing or non-positive reading falls back to
//! the mean of whatever is buffered; only a cold start with no valid
//! reading yet produces "unknown".
//!
//! # Example
//!
//! ```rust
//! use rs_tunnel::smoothing::DistanceFilter;
//!
//! let mut filter = DistanceFilter::new(5);
//!
//! // Constant input converges to exactly that constant.
//! for _ in 0..5 {
//!     assert_eq!(filter.update(Some(15.0)), Some(15.0));
//! }
//!
//! // Dropout returns the buffered mean, not None.
//! assert_eq!(filter.update(None), Some(15.0));
//! ```

use heapless::Deque;

/// Upper bound on the smoothing window; the runtime size is configurable
/// below this.
pub const MAX_WINDOW: usize = 16;

/// Trailing moving-average filter over recent valid distance readings.
#[derive(Debug)]
pub struct DistanceFilter {
    buffer: Deque<f32, MAX_WINDOW>,
    window: usize,
}

impl DistanceFilter {
    /// Creates a filter averaging over the last `window` valid readings.
    ///
    /// The window is clamped to `1..=MAX_WINDOW`.
    pub fn new(window: usize) -> Self {
        Self {
            buffer: Deque::new(),
            window: window.clamp(1, MAX_WINDOW),
        }
    }

    /// Feed one raw reading and get the smoothed value.
    ///
    /// A present, positive reading enters the window (evicting the oldest
    /// when full) and the new mean is returned. A missing or non-positive
    /// reading leaves the window untouched and returns the current mean,
    /// or `None` when nothing has been buffered yet.
    pub fn update(&mut self, raw_cm: Option<f32>) -> Option<f32> {
        if let Some(raw) = raw_cm {
            if raw > 0.0 {
                if self.buffer.len() >= self.window {
                    let _ = self.buffer.pop_front();
                }
                // Capacity is never exceeded: window <= MAX_WINDOW.
                let _ = self.buffer.push_back(raw);
            }
        }
        self.mean()
    }

    /// Current mean of the buffered readings, `None` when empty.
    pub fn mean(&self) -> Option<f32> {
        if self.buffer.is_empty() {
            return None;
        }
        let sum: f32 = self.buffer.iter().sum();
        Some(sum / self.buffer.len() as f32)
    }

    /// Number of readings currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no valid reading has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
