//! The four cooperating subsystems of the intersection complex.
//!
//! Each subsystem owns its own state machine and the indicators it is
//! responsible for. None of them sleeps or loops: every state machine is
//! advanced once per tick by [`crate::controller::IntersectionController`],
//! which also arbitrates between them when their outputs would conflict.

pub mod crossing;
pub mod entry;
pub mod exit;
pub mod tunnel;

pub use crossing::{CrossingController, CrossingState};
pub use entry::{EntryController, EntryState};
pub use exit::{ExitController, ExitState};
pub use tunnel::TunnelGuard;
