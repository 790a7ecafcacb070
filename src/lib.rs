//! # rs-tunnel
//!
//! Traffic-control coordinator for a height-restricted tunnel approach:
//! overheight detection at the entry, a pedestrian crossing, an exit-side
//! release sequence, and a last-chance guard at the tunnel mouth, all
//! multiplexed onto one bank of 24 indicator outputs and a buzzer.
//!
//! The crate is hardware-agnostic. Everything the controller touches goes
//! through the [`traits::IntersectionIo`] trait, so the same control logic
//! runs against a desktop mock or a real sensor board. The control model is
//! a single-threaded fixed-period tick: no subsystem sleeps or blocks, and
//! every state machine advances exactly once per tick.
//!
//! # Quick Start
//!
//! ```rust
//! use rs_tunnel::config::Config;
//! use rs_tunnel::controller::IntersectionController;
//! use rs_tunnel::hal::MockIo;
//!
//! let mut board = MockIo::new();
//! board.set_distances(Some(60.0), Some(60.0), Some(60.0));
//!
//! let mut controller = IntersectionController::new(board, Config::default());
//! for tick in 0..10u64 {
//!     controller.tick(tick * 50).unwrap();
//! }
//! assert!(!controller.status().entry_active);
//! controller.shutdown().unwrap();
//! ```
//!
//! # Feature Flags
//!
//! - `std` (default): the [`scheduler`] loop and [`hal::StdClock`].
//! - `serde`: serialization for config and status types.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod arbiter;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod flash;
pub mod hal;
pub mod inputs;
pub mod outputs;
#[cfg(feature = "std")]
pub mod scheduler;
pub mod smoothing;
pub mod subsystems;
pub mod tone;
pub mod traits;

pub use config::Config;
pub use controller::{IntersectionController, IntersectionStatus};
pub use outputs::{Color, Head, Indicator, IndicatorBank, INDICATOR_COUNT};
pub use traits::{Clock, CrossingButton, IntersectionIo, RangeSensor};
