//! Machine and probe position tracking
//!
//! The kernel is the single source of truth for where the machine physically
//! is, in integer steps. The parser and planner keep their own copies, which
//! are overwritten from here after every reset and homing cycle.

pub mod jog;
pub mod position;

pub use jog::JogRequest;
pub use position::{
    Axis, AxisMask, Position, PositionTracker, ProbeHandle, ProbeOutcome, ProbeState,
    StepperHandle, N_AXIS,
};
