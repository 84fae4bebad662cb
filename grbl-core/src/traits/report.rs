//! Operator reports
//!
//! The kernel guarantees that state and alarm are current whenever a report
//! is emitted; formatting belongs to the report collaborator.

use crate::motion::Position;
use crate::overrides::Overrides;
use crate::state::{AlarmCode, OperatingState};

/// Point-in-time view for a status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub state: OperatingState,
    pub alarm: Option<AlarmCode>,
    pub machine_position: Position,
    pub overrides: Overrides,
    pub spindle_stopped: bool,
}

/// One-off operator messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feedback {
    /// Alarm lock cleared without homing
    Unlocked,
    /// Reset is needed to leave a critical alarm
    ResetToContinue,
    /// Resume refused while the door is open
    CheckDoor,
    /// Check mode toggled
    CheckMode(bool),
}

/// Report emitted by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Initialisation finished; `homing_locked` when a homing cycle is required
    Welcome { homing_locked: bool },
    /// The operating state changed
    State(OperatingState),
    /// An alarm was latched
    Alarm(AlarmCode),
    Status(StatusSnapshot),
    /// A probing cycle ended
    Probe { position: Position, contact: bool },
    Feedback(Feedback),
}

/// Report sink
pub trait Reporter {
    fn report(&mut self, report: Report);
}
