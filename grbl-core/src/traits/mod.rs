//! Collaborator traits
//!
//! These traits define the narrow interface between the kernel and the
//! subsystems it coordinates but does not implement: g-code parser, planner,
//! stepper driver, spindle/coolant outputs and the operator report channel.

pub mod accessory;
pub mod motion;
pub mod report;
pub mod subsystem;

pub use accessory::{Accessories, Coolant};
pub use motion::{AbortOutcome, MotionControl};
pub use report::{Feedback, Report, Reporter, StatusSnapshot};
pub use subsystem::{Subsystem, Subsystems, SyncTarget, RESET_ORDER};

use crate::kernel::Kernel;

/// Everything the kernel drives
pub trait Machine: Subsystems + MotionControl + Accessories + Reporter {}

impl<T: Subsystems + MotionControl + Accessories + Reporter> Machine for T {}

/// Collaborator-owned command dispatch loop
///
/// Reads program lines, feeds the parser and planner, and calls
/// [`Kernel::execute_realtime`] at every opportunity. Returns when that call
/// reports [`Control::Abort`](crate::kernel::Control::Abort); the kernel then
/// runs the reset sequence and enters the loop again.
pub trait MainLoop<M: Machine> {
    fn run(&mut self, kernel: &mut Kernel<'_, M>);
}
