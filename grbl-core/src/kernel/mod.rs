//! Kernel aggregate
//!
//! One `Kernel` is owned by the main loop. It holds the operating state,
//! the latched alarm, the override percentages and the homed flag, and
//! drives the collaborators through a single [`Machine`] value. Interrupt
//! contexts never see it; they write into the shared [`Realtime`] registers
//! through their narrow handles.
//!
//! ```text
//! power_up ──► reset(PowerUp) ──► MainLoop::run ──┐
//!                    ▲                            │ Control::Abort
//!                    └──────── reset(Abort) ◄─────┘
//! ```

mod commands;
mod execute;

use crate::config::KernelConfig;
use crate::fmt::{info, warning};
use crate::motion::{Position, ProbeState};
use crate::overrides::{OverrideController, Overrides};
use crate::realtime::{ExecState, Realtime};
use crate::reset::{self, CycleState, ResetCause};
use crate::state::{AlarmCode, Event, OperatingState};
use crate::traits::{
    AbortOutcome, Feedback, Machine, MainLoop, Report, StatusSnapshot, RESET_ORDER,
};

/// What the main loop should do after a realtime poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    /// Keep running
    Continue,
    /// A reset was requested; return so the reset sequence can run
    Abort,
}

/// Why an operator command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// Alarm lock is active
    AlarmLocked,
    /// Another cycle is running
    Busy,
    /// Safety door is open
    DoorOpen,
    /// Homing is not enabled in the configuration
    HomingDisabled,
    /// Sleeping; only reset leaves
    Sleeping,
    /// A probing cycle is already armed or triggered
    ProbeActive,
}

impl Rejected {
    /// Rejection for a command that needs a state other than `state`
    fn from_state(state: OperatingState) -> Self {
        match state {
            OperatingState::Alarm => Rejected::AlarmLocked,
            OperatingState::Sleep => Rejected::Sleeping,
            OperatingState::Door => Rejected::DoorOpen,
            _ => Rejected::Busy,
        }
    }
}

/// Realtime coordination kernel
pub struct Kernel<'a, M: Machine> {
    rt: &'a Realtime,
    machine: M,
    config: KernelConfig,
    cycle: CycleState,
    overrides: OverrideController,
    /// A homing cycle has succeeded since the position was last lost
    homed: bool,
    homing_locked: bool,
}

impl<'a, M: Machine> Kernel<'a, M> {
    /// Cold boot: build the kernel and run the reset sequence once
    ///
    /// An inconsistent `config` is replaced by the defaults.
    pub fn power_up(rt: &'a Realtime, config: KernelConfig, machine: M) -> Self {
        let config = if config.is_valid() {
            config
        } else {
            warning!("invalid configuration, restoring defaults");
            KernelConfig::default()
        };
        let mut kernel = Self {
            rt,
            machine,
            cycle: CycleState::fresh(config.power_up_state(), None),
            overrides: OverrideController::new(config.overrides),
            config,
            homed: false,
            homing_locked: false,
        };
        kernel.reset(ResetCause::PowerUp);
        kernel
    }

    /// Run the reset sequence
    pub fn reset(&mut self, cause: ResetCause) {
        // 1. Decide what survives
        let pending = self.rt.alarm.take();
        if pending.is_some_and(|code| code.invalidates_position()) {
            self.homed = false;
        }
        let kept = reset::preserve(
            cause,
            self.cycle.state,
            self.cycle.alarm,
            pending,
            &self.config,
            self.homed,
        );

        // 2. Rebuild transient state
        self.cycle = CycleState::from(kept);
        self.homing_locked = kept.homing_locked;
        self.rt.discard_pending();
        let clear_position = cause == ResetCause::PowerUp || self.config.clear_position_on_abort;
        self.rt.tracker.clear(clear_position);

        // 3. Override defaults
        self.overrides.reset();

        // 4. Collaborators, upstream first
        for subsystem in RESET_ORDER {
            self.machine.initialize(subsystem);
            self.machine.reset(subsystem);
        }

        // 5. Parser and planner adopt the machine position
        self.rt.tracker.synchronize(&mut self.machine);

        // 6. Greet the operator
        info!("reset ({}): {}", cause, kept.state);
        self.machine.report(Report::Welcome {
            homing_locked: kept.homing_locked,
        });
        if let Some(code) = kept.alarm {
            self.machine.report(Report::Alarm(code));
        }

        // The door interrupt is edge triggered; catch a door still open
        if self.cycle.state == OperatingState::Idle && self.machine.door_ajar() {
            self.door_opened();
        }
    }

    /// One main-loop pass followed by the reset sequence
    pub fn cycle<L: MainLoop<M>>(&mut self, main_loop: &mut L) {
        main_loop.run(self);
        self.reset(ResetCause::Abort);
    }

    /// Run the main loop forever, resetting after every abort
    pub fn run<L: MainLoop<M>>(&mut self, main_loop: &mut L) -> ! {
        loop {
            self.cycle(main_loop);
        }
    }

    pub fn state(&self) -> OperatingState {
        self.cycle.state
    }

    /// Latched alarm, cleared by unlock or a successful homing cycle
    pub fn alarm(&self) -> Option<AlarmCode> {
        self.cycle.alarm
    }

    pub fn overrides(&self) -> Overrides {
        self.overrides.values()
    }

    pub fn spindle_stopped(&self) -> bool {
        self.overrides.spindle_stopped()
    }

    pub fn machine_position(&self) -> Position {
        self.rt.tracker.machine_position()
    }

    pub fn probe_position(&self) -> Position {
        self.rt.tracker.probe_position()
    }

    pub fn probe_state(&self) -> ProbeState {
        self.rt.tracker.probe_state()
    }

    /// Check if a homing cycle has established the machine position
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Check if motion is locked until the machine is homed
    pub fn is_homing_locked(&self) -> bool {
        self.homing_locked
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Shared realtime registers
    pub fn realtime(&self) -> &'a Realtime {
        self.rt
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Consistent snapshot for a status report
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.cycle.state,
            alarm: self.cycle.alarm,
            machine_position: self.rt.tracker.machine_position(),
            overrides: self.overrides.values(),
            spindle_stopped: self.overrides.spindle_stopped(),
        }
    }

    /// Apply `event` and report the new state if it changed
    fn apply(&mut self, event: Event) {
        let next = self.cycle.state.transition(event);
        if next == self.cycle.state {
            return;
        }
        info!("state {} -> {}", self.cycle.state, next);
        if self.cycle.state == OperatingState::Run {
            self.cycle.hold_pending = false;
        }
        self.cycle.state = next;
        self.machine.report(Report::State(next));
    }

    /// Stop any active motion, then latch `code` and enter `Alarm`
    fn latch_alarm(&mut self, code: AlarmCode) {
        if self.cycle.state.is_motion_active() && !self.cycle.aborting {
            self.halt_motion();
        }
        self.record_alarm(code);
    }

    /// Latch `code` for motion that has already ended
    ///
    /// The first alarm of a cycle is kept; later ones are logged only.
    fn record_alarm(&mut self, code: AlarmCode) {
        warning!("alarm {}", code);
        if code.invalidates_position() {
            self.homed = false;
        }
        if self.cycle.alarm.is_some() {
            return;
        }
        self.cycle.alarm = Some(code);
        self.apply(Event::AlarmRaised(code));
        self.machine.report(Report::Alarm(code));
        if code.is_critical() {
            self.machine.report(Report::Feedback(Feedback::ResetToContinue));
        }
    }

    /// Kill motion mid-move and request a reset
    fn halt_motion(&mut self) {
        self.cycle.aborting = true;
        if self.machine.abort_motion() == AbortOutcome::PositionLost {
            self.homed = false;
        }
        self.rt.commands().set(ExecState::RESET);
    }
}

#[cfg(test)]
mod mock;
