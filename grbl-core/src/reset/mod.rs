//! Reset sequencer
//!
//! A reset never edits the previous cycle in place. The few values that
//! survive are computed by [`preserve`], and everything else is rebuilt
//! through [`CycleState::fresh`]. The kernel then runs the fixed sequence
//! in [`crate::Kernel::reset`].

mod sequencer;

pub use sequencer::{preserve, CycleState, Preserved, ResetCause};
