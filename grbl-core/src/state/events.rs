//! Events that trigger state transitions

use super::alarm::AlarmCode;

/// Events that can trigger state transitions
///
/// The kernel derives these from drained realtime flags, operator commands
/// and collaborator completion callbacks. Guards that need collaborator
/// state (queued blocks, door switch) are evaluated before the event is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Program execution
    /// Cycle start / resume; `queued` is true if the planner holds blocks
    CycleStart { queued: bool },
    /// Feed-hold deceleration finished
    HoldComplete,
    /// Motion ran out: program buffer drained or jog finished
    CycleComplete,

    // Safety
    /// Safety door opened
    SafetyDoor,
    /// An alarm was latched
    AlarmRaised(AlarmCode),
    /// Operator killed the alarm lock
    Unlock,

    // Operator-initiated cycles
    HomingStarted,
    HomingComplete,
    JogStarted,
    /// Toggle g-code check mode
    CheckMode,
    SleepRequested,

    /// Reset sequencer pass
    Reset,
}
