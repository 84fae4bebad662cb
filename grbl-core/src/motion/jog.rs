//! Jog requests handed to the motion collaborator

use super::position::{AxisMask, Position};

/// A single bounded manual motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogRequest {
    /// Move by a step delta per axis
    Relative(Position),
    /// Return the selected axes to their work origin
    ToWorkZero(AxisMask),
}

impl JogRequest {
    /// Check if executing this request would not move anything
    pub fn is_empty(&self) -> bool {
        match self {
            JogRequest::Relative(delta) => delta.iter().all(|d| *d == 0),
            JogRequest::ToWorkZero(axes) => axes.is_empty(),
        }
    }
}
