//! Planner / stepper control surface

use crate::motion::{AxisMask, JogRequest};
use crate::overrides::Overrides;

/// How motion ended after an abort request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortOutcome {
    /// Decelerated to a stop; step position is exact
    Stopped,
    /// Pulses were cut mid-move; step position can not be trusted
    PositionLost,
}

/// Motion collaborator driven by the state machine
pub trait MotionControl {
    /// Check if the planner holds blocks ready to execute
    fn blocks_queued(&self) -> bool;

    /// Begin or resume executing the planner buffer
    fn start_cycle(&mut self);

    /// Decelerate to a stop; completion is signalled through cycle stop
    fn feed_hold(&mut self);

    /// Stop the current jog or probing move and discard what is left of it
    fn cancel_motion(&mut self);

    /// Stop all motion for a reset
    fn abort_motion(&mut self) -> AbortOutcome;

    /// Start a jog; completion is signalled through cycle stop
    fn start_jog(&mut self, request: &JogRequest);

    /// Start the homing cycle on `axes`; the result comes back through
    /// [`Kernel::homing_complete`](crate::Kernel::homing_complete)
    fn start_homing(&mut self, axes: AxisMask);

    /// Apply new override percentages to planned and future motion
    fn apply_overrides(&mut self, overrides: &Overrides);

    /// Make the current position the work origin on `axes`
    fn set_work_zero(&mut self, axes: AxisMask);
}
