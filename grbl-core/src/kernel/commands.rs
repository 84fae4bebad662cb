//! Operator and collaborator commands
//!
//! Called from the main loop between realtime polls. Commands that are not
//! admissible in the current state return [`Rejected`] and change nothing.

use grbl_protocol::SystemCommand;

use crate::fmt::{info, warning};
use crate::motion::{AxisMask, JogRequest};
use crate::realtime::ExecState;
use crate::state::{AlarmCode, Event, OperatingState};
use crate::traits::{Feedback, Machine, Report};

use super::{Kernel, Rejected};

impl<M: Machine> Kernel<'_, M> {
    /// Dispatch a `$` system command
    pub fn system_command(&mut self, command: SystemCommand) -> Result<(), Rejected> {
        let result = match command {
            SystemCommand::Unlock => self.unlock(),
            SystemCommand::Home => self.request_homing(),
            SystemCommand::CheckMode => self.toggle_check_mode(),
            SystemCommand::Sleep => self.sleep(),
        };
        if let Err(_rejected) = result {
            warning!("{} rejected: {}", command, _rejected);
        }
        result
    }

    /// Check if the parser may accept a program line that queues motion
    pub fn admit_program(&self) -> Result<(), Rejected> {
        if self.cycle.state.accepts_program() {
            Ok(())
        } else {
            Err(Rejected::from_state(self.cycle.state))
        }
    }

    /// Kill the alarm lock without homing
    pub fn unlock(&mut self) -> Result<(), Rejected> {
        match self.cycle.state {
            OperatingState::Alarm => {
                if self.machine.door_ajar() {
                    self.machine.report(Report::Feedback(Feedback::CheckDoor));
                    return Err(Rejected::DoorOpen);
                }
                info!("alarm lock cleared");
                self.cycle.alarm = None;
                self.homing_locked = false;
                self.apply(Event::Unlock);
                self.machine.report(Report::Feedback(Feedback::Unlocked));
                Ok(())
            }
            OperatingState::Sleep => Err(Rejected::Sleeping),
            _ => Ok(()),
        }
    }

    /// Start a homing cycle on every axis from `Idle` or `Alarm`
    pub fn request_homing(&mut self) -> Result<(), Rejected> {
        self.request_homing_axes(AxisMask::all())
    }

    /// Start a homing cycle on `axes` only
    ///
    /// Success on any subset counts as homed, as with a full cycle.
    pub fn request_homing_axes(&mut self, axes: AxisMask) -> Result<(), Rejected> {
        if !self.config.homing.enabled {
            return Err(Rejected::HomingDisabled);
        }
        match self.cycle.state {
            OperatingState::Idle | OperatingState::Alarm => {}
            state => return Err(Rejected::from_state(state)),
        }

        self.cycle.alarm = None;
        self.machine.start_homing(axes);
        self.apply(Event::HomingStarted);
        Ok(())
    }

    /// Homing collaborator finished; an error carries the failure alarm
    pub fn homing_complete(&mut self, result: Result<(), AlarmCode>) {
        if self.cycle.state != OperatingState::Homing {
            return;
        }
        match result {
            Ok(()) => {
                self.homed = true;
                self.homing_locked = false;
                self.rt.tracker.synchronize(&mut self.machine);
                self.apply(Event::HomingComplete);
            }
            Err(code) => self.record_alarm(code),
        }
    }

    /// Start or queue a jog
    pub fn jog(&mut self, request: JogRequest) -> Result<(), Rejected> {
        match self.cycle.state {
            OperatingState::Idle | OperatingState::Jog => {}
            state => return Err(Rejected::from_state(state)),
        }
        if request.is_empty() {
            return Ok(());
        }

        self.machine.start_jog(&request);
        self.apply(Event::JogStarted);
        Ok(())
    }

    /// Enter or leave g-code check mode
    ///
    /// Leaving check mode requests a reset so the parser drops the state
    /// built up while checking.
    pub fn toggle_check_mode(&mut self) -> Result<(), Rejected> {
        match self.cycle.state {
            OperatingState::Idle => {
                self.apply(Event::CheckMode);
                self.machine.report(Report::Feedback(Feedback::CheckMode(true)));
                Ok(())
            }
            OperatingState::Check => {
                self.apply(Event::CheckMode);
                self.machine.report(Report::Feedback(Feedback::CheckMode(false)));
                self.rt.commands().set(ExecState::RESET);
                Ok(())
            }
            state => Err(Rejected::from_state(state)),
        }
    }

    /// Arm the probe ahead of a probing move
    ///
    /// Arming while a capture is still armed or unconsumed latches
    /// [`AlarmCode::ProbeFailInitial`]. In check mode nothing moves, so
    /// nothing is armed.
    pub fn arm_probe(&mut self) -> Result<(), Rejected> {
        self.admit_program()?;
        if self.cycle.state == OperatingState::Check {
            return Ok(());
        }
        if !self.rt.tracker.arm_probe() {
            self.latch_alarm(AlarmCode::ProbeFailInitial);
            return Err(Rejected::ProbeActive);
        }
        Ok(())
    }

    /// Latch an alarm detected by a main-loop collaborator (soft limits)
    pub fn raise_alarm(&mut self, code: AlarmCode) {
        self.latch_alarm(code);
    }

    /// Disable outputs and park in `Sleep`
    pub fn sleep(&mut self) -> Result<(), Rejected> {
        match self.cycle.state {
            OperatingState::Sleep => Ok(()),
            OperatingState::Idle
            | OperatingState::Alarm
            | OperatingState::Hold
            | OperatingState::Door => {
                self.machine.sleep();
                self.apply(Event::SleepRequested);
                Ok(())
            }
            _ => Err(Rejected::Busy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{Call, MockMachine};
    use super::*;
    use crate::config::{HomingPolicy, KernelConfig};
    use crate::motion::ProbeState;
    use crate::realtime::Realtime;
    use crate::Control;

    fn config(homing: bool) -> KernelConfig {
        KernelConfig {
            homing: HomingPolicy {
                enabled: homing,
                lock_until_homed: true,
            },
            ..KernelConfig::default()
        }
    }

    #[test]
    fn test_unlock_clears_alarm() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());
        kernel.raise_alarm(AlarmCode::SoftLimit);
        assert_eq!(kernel.admit_program(), Err(Rejected::AlarmLocked));

        assert_eq!(kernel.system_command(SystemCommand::Unlock), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Idle);
        assert_eq!(kernel.alarm(), None);
        assert!(kernel.machine().reported(Report::Feedback(Feedback::Unlocked)));
        assert_eq!(kernel.admit_program(), Ok(()));
    }

    #[test]
    fn test_unlock_refused_with_door_open() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());
        kernel.raise_alarm(AlarmCode::HardLimit);
        kernel.machine_mut().door_ajar = true;

        assert_eq!(kernel.unlock(), Err(Rejected::DoorOpen));
        assert_eq!(kernel.state(), OperatingState::Alarm);
    }

    #[test]
    fn test_homing_lock_rejects_cycle_start() {
        let rt = Realtime::new();
        let mut machine = MockMachine::new();
        machine.queued = true;
        let mut kernel = Kernel::power_up(&rt, config(true), machine);
        assert_eq!(kernel.state(), OperatingState::Alarm);

        rt.serial().receive(b'~');
        kernel.execute_realtime();
        assert_eq!(kernel.state(), OperatingState::Alarm);
        assert!(!kernel.machine().called(Call::StartCycle));
        assert_eq!(kernel.jog(JogRequest::Relative([1, 0, 0])), Err(Rejected::AlarmLocked));

        assert_eq!(kernel.system_command(SystemCommand::Home), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Homing);
        assert!(kernel.machine().called(Call::StartHoming(AxisMask::all())));
        kernel.homing_complete(Ok(()));
        assert_eq!(kernel.state(), OperatingState::Idle);
        assert!(kernel.is_homed());
        assert!(!kernel.is_homing_locked());

        rt.serial().receive(b'~');
        kernel.execute_realtime();
        assert_eq!(kernel.state(), OperatingState::Run);
    }

    #[test]
    fn test_homing_failure_latches_alarm() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(true), MockMachine::new());
        kernel.request_homing().unwrap();
        kernel.homing_complete(Err(AlarmCode::HomingFailApproach));

        assert_eq!(kernel.state(), OperatingState::Alarm);
        assert_eq!(kernel.alarm(), Some(AlarmCode::HomingFailApproach));
        assert!(!kernel.is_homed());

        // Late completion after the alarm changes nothing
        kernel.homing_complete(Ok(()));
        assert!(!kernel.is_homed());
    }

    #[test]
    fn test_homing_disabled() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());
        assert_eq!(kernel.request_homing(), Err(Rejected::HomingDisabled));
        assert_eq!(kernel.state(), OperatingState::Idle);
    }

    #[test]
    fn test_homing_syncs_position() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(true), MockMachine::new());
        kernel.request_homing().unwrap();
        rt.stepper().set_position(crate::motion::Axis::X, -5);
        kernel.machine_mut().clear();

        kernel.homing_complete(Ok(()));
        assert_eq!(
            &kernel.machine().calls[..2],
            [
                Call::Sync(crate::traits::SyncTarget::Planner, [-5, 0, 0]),
                Call::Sync(crate::traits::SyncTarget::Parser, [-5, 0, 0]),
            ]
        );
    }

    #[test]
    fn test_jog_admission() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());

        assert_eq!(kernel.jog(JogRequest::Relative([0, 0, 0])), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Idle);

        assert_eq!(kernel.jog(JogRequest::Relative([4, 0, 0])), Ok(()));
        assert_eq!(kernel.jog(JogRequest::Relative([0, 4, 0])), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Jog);
        assert_eq!(kernel.admit_program(), Err(Rejected::Busy));

        assert_eq!(kernel.sleep(), Err(Rejected::Busy));
    }

    #[test]
    fn test_check_mode_round_trip() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());

        assert_eq!(kernel.system_command(SystemCommand::CheckMode), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Check);
        assert_eq!(kernel.admit_program(), Ok(()));
        assert!(kernel
            .machine()
            .reported(Report::Feedback(Feedback::CheckMode(true))));

        // Probing in check mode arms nothing
        assert_eq!(kernel.arm_probe(), Ok(()));
        assert_eq!(kernel.probe_state(), ProbeState::Inactive);

        assert_eq!(kernel.toggle_check_mode(), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Idle);
        assert_eq!(kernel.execute_realtime(), Control::Abort);
    }

    #[test]
    fn test_probe_rearm_fails() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());

        assert_eq!(kernel.arm_probe(), Ok(()));
        assert_eq!(kernel.arm_probe(), Err(Rejected::ProbeActive));
        assert_eq!(kernel.alarm(), Some(AlarmCode::ProbeFailInitial));
        assert_eq!(kernel.state(), OperatingState::Alarm);
        assert_eq!(kernel.arm_probe(), Err(Rejected::AlarmLocked));
    }

    #[test]
    fn test_sleep_only_reset_leaves() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());

        assert_eq!(kernel.system_command(SystemCommand::Sleep), Ok(()));
        assert_eq!(kernel.state(), OperatingState::Sleep);
        assert_eq!(kernel.unlock(), Err(Rejected::Sleeping));
        assert_eq!(kernel.admit_program(), Err(Rejected::Sleeping));

        kernel.reset(crate::reset::ResetCause::Abort);
        assert_eq!(kernel.state(), OperatingState::Alarm);
    }

    #[test]
    fn test_first_alarm_wins() {
        let rt = Realtime::new();
        let mut kernel = Kernel::power_up(&rt, config(false), MockMachine::new());
        kernel.raise_alarm(AlarmCode::SoftLimit);
        kernel.raise_alarm(AlarmCode::HardLimit);
        assert_eq!(kernel.alarm(), Some(AlarmCode::SoftLimit));
    }
}
