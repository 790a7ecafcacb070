//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits defined in
//! [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: test implementations for desktop development
//! - [`StdClock`]: wall clock backed by `std::time::Instant` (requires `std`)

pub mod mock;

pub use mock::*;

#[cfg(feature = "std")]
mod std_clock {
    use crate::traits::Clock;
    use std::time::Instant;

    /// Monotonic clock backed by `std::time::Instant`.
    #[derive(Debug)]
    pub struct StdClock {
        start: Instant,
    }

    impl StdClock {
        /// Creates a clock whose epoch is now.
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for StdClock {
        fn now_ms(&self) -> u64 {
            self.start.elapsed().as_millis() as u64
        }
    }
}

#[cfg(feature = "std")]
pub use std_clock::StdClock;
