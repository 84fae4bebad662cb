//! State machine definition
//!
//! Command admissibility is a function of the current state; every change
//! of state is a function of the current state and an event.

use super::events::Event;

/// Machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingState {
    /// Ready, no motion
    Idle,
    /// Executing planned program motion
    Run,
    /// Feed hold completed, motion stopped and resumable
    Hold,
    /// Executing a single bounded jog
    Jog,
    /// Homing cycle in progress
    Homing,
    /// Locked out; only unlock, homing or reset leave
    Alarm,
    /// G-code check mode, parser runs without motion
    Check,
    /// Safety door open; motion and accessories suspended
    Door,
    /// Outputs disabled; only reset leaves
    Sleep,
}

impl OperatingState {
    /// Check if the parser may accept program lines that queue motion
    pub fn accepts_program(&self) -> bool {
        matches!(
            self,
            OperatingState::Idle
                | OperatingState::Run
                | OperatingState::Hold
                | OperatingState::Check
        )
    }

    /// Check if override requests take effect
    pub fn overrides_enabled(&self) -> bool {
        !self.is_locked()
    }

    /// Check if a motion collaborator is actively moving the machine
    pub fn is_motion_active(&self) -> bool {
        matches!(
            self,
            OperatingState::Run | OperatingState::Jog | OperatingState::Homing
        )
    }

    /// Check if this is a lock-out state that refuses motion commands
    pub fn is_locked(&self) -> bool {
        matches!(self, OperatingState::Alarm | OperatingState::Sleep)
    }

    /// Process an event and return the next state
    ///
    /// This is the only place a state changes.
    pub fn transition(self, event: Event) -> Self {
        use OperatingState::*;

        match (self, event) {
            // Alarms preempt everything
            (_, Event::AlarmRaised(_)) => Alarm,

            // Reset keeps lock-out states locked, everything else idles
            (Alarm | Sleep, Event::Reset) => Alarm,
            (_, Event::Reset) => Idle,

            // Idle transitions
            (Idle, Event::CycleStart { queued: true }) => Run,
            (Idle, Event::JogStarted) => Jog,
            (Idle, Event::HomingStarted) => Homing,
            (Idle, Event::CheckMode) => Check,

            // Run transitions
            (Run, Event::HoldComplete) => Hold,
            (Run, Event::CycleComplete) => Idle,

            // Hold transitions
            (Hold, Event::CycleStart { .. }) => Run,

            // Jog transitions
            (Jog, Event::CycleComplete) => Idle,

            // Homing transitions
            (Homing, Event::HomingComplete) => Idle,

            // Door transitions; the door-closed guard is checked by the caller
            (Door, Event::CycleStart { queued: true }) => Run,
            (Door, Event::CycleStart { queued: false }) => Idle,
            (Idle | Run | Hold | Jog, Event::SafetyDoor) => Door,

            // Alarm transitions
            (Alarm, Event::Unlock) => Idle,
            (Alarm, Event::HomingStarted) => Homing,

            // Check mode transitions
            (Check, Event::CheckMode) => Idle,

            // Sleep only from a stopped machine
            (Idle | Alarm | Hold | Door, Event::SleepRequested) => Sleep,

            // Default: stay in current state
            _ => self,
        }
    }
}
