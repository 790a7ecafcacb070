//! Trait definitions for hardware abstraction.
//!
//! This module defines the seams that let the control core run against
//! different backends:
//!
//! - `hardware`: the I/O board contract and the monotonic clock
//!
//! The core is written entirely against these traits; see [`crate::hal`]
//! for the mock implementations used in tests and desktop simulation.

pub mod hardware;

pub use hardware::*;
