//! Subsystem lifecycle and position synchronisation

use crate::motion::Position;

/// Subsystems reinitialised by the reset sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subsystem {
    /// Serial receive buffer
    SerialBuffer,
    /// G-code parser modal state
    Parser,
    Spindle,
    Coolant,
    /// Limit switch inputs
    Limits,
    /// Probe input
    Probe,
    /// Idle sleep timer
    SleepTimer,
    /// Planner block buffer
    Planner,
    /// Stepper segment buffer and pulse generator
    Stepper,
}

/// Order in which subsystems are reset
///
/// Planner and stepper come last: they consume parser and limit state.
pub const RESET_ORDER: [Subsystem; 9] = [
    Subsystem::SerialBuffer,
    Subsystem::Parser,
    Subsystem::Spindle,
    Subsystem::Coolant,
    Subsystem::Limits,
    Subsystem::Probe,
    Subsystem::SleepTimer,
    Subsystem::Planner,
    Subsystem::Stepper,
];

/// Collaborators that keep their own copy of the machine position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncTarget {
    Planner,
    Parser,
}

/// Lifecycle hooks of every subsystem
pub trait Subsystems {
    /// Configure the subsystem; must be idempotent
    fn initialize(&mut self, subsystem: Subsystem);

    /// Clear the subsystem's transient state
    fn reset(&mut self, subsystem: Subsystem);

    /// Adopt `position` as the authoritative machine position
    fn synchronize_position(&mut self, target: SyncTarget, position: &Position);
}
