use crate::config::KernelConfig;
use crate::state::{AlarmCode, Event, OperatingState};

/// Why the reset sequence is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    /// Cold boot
    PowerUp,
    /// The main loop returned after a reset request
    Abort,
}

/// Values carried from one cycle into the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Preserved {
    pub state: OperatingState,
    pub alarm: Option<AlarmCode>,
    /// Motion stays locked until a homing cycle succeeds
    pub homing_locked: bool,
}

/// Decide what survives a reset
///
/// `pending` is the alarm drained from the alarm register at the start of
/// the sequence. It always forces `Alarm`. An alarm already latched in
/// `Alarm` keeps its code until unlock.
pub fn preserve(
    cause: ResetCause,
    current: OperatingState,
    latched: Option<AlarmCode>,
    pending: Option<AlarmCode>,
    config: &KernelConfig,
    homed: bool,
) -> Preserved {
    let mut state = match cause {
        ResetCause::PowerUp => config.power_up_state(),
        ResetCause::Abort => current.transition(Event::Reset),
    };

    let mut alarm = match (cause, state) {
        (ResetCause::Abort, OperatingState::Alarm) => latched,
        _ => None,
    };

    if let Some(code) = pending {
        state = state.transition(Event::AlarmRaised(code));
        alarm = alarm.or(Some(code));
    }

    let homing_locked = config.homing.required() && !homed;
    if homing_locked {
        state = OperatingState::Alarm;
    }

    Preserved {
        state,
        alarm,
        homing_locked,
    }
}

/// Per-cycle kernel state
///
/// Rebuilt from scratch on every reset.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleState {
    pub state: OperatingState,
    pub alarm: Option<AlarmCode>,
    /// Feed hold requested, waiting for the motion to stop
    pub hold_pending: bool,
    /// Door opened with a program in progress; resume it once closed
    pub resume_after_door: bool,
    /// Reset requested and motion already told to stop
    pub aborting: bool,
}

impl CycleState {
    /// Fresh cycle starting in `state` with `alarm` latched
    pub fn fresh(state: OperatingState, alarm: Option<AlarmCode>) -> Self {
        Self {
            state,
            alarm,
            hold_pending: false,
            resume_after_door: false,
            aborting: false,
        }
    }
}

impl From<Preserved> for CycleState {
    fn from(preserved: Preserved) -> Self {
        Self::fresh(preserved.state, preserved.alarm)
    }
}
