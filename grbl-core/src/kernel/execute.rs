//! Realtime register drain
//!
//! Every poll handles whatever subset of bits is pending in one canonical
//! order: alarm, reset, state commands, motion overrides, accessory
//! overrides, probe completion, pendant jog, pendant buttons.

use crate::fmt::debug;
use crate::motion::{AxisMask, JogRequest, ProbeOutcome, ProbeState};
use crate::realtime::{AccessoryOverride, ExecState, MotionOverride, PositionRequest};
use crate::state::{AlarmCode, Event, OperatingState};
use crate::traits::{AbortOutcome, Coolant, Feedback, Machine, Report};

use super::{Control, Kernel};

impl<M: Machine> Kernel<'_, M> {
    /// Drain the realtime registers once
    ///
    /// Returns [`Control::Abort`] as soon as a reset is pending. The reset
    /// bit and everything after it stay pending for the reset sequence to
    /// discard.
    pub fn execute_realtime(&mut self) -> Control {
        if let Some(code) = self.rt.alarm.take() {
            self.latch_alarm(code);
        }

        let commands = self.rt.state.peek();
        if commands.contains(ExecState::RESET) {
            self.abort_motion();
            return Control::Abort;
        }
        if !commands.is_empty() {
            self.rt.state.clear(commands);
            self.execute_commands(commands);
        }

        let motion = self.rt.motion_override.take();
        if !motion.is_empty() {
            self.motion_overrides(motion);
        }

        let accessory = self.rt.accessory_override.take();
        if !accessory.is_empty() {
            self.accessory_overrides(accessory);
        }

        if let Some(position) = self.rt.tracker.take_contact() {
            self.machine.report(Report::Probe {
                position,
                contact: true,
            });
        }

        self.pendant_jog();
        self.pendant_buttons();

        Control::Continue
    }

    /// Stop active motion ahead of a reset
    fn abort_motion(&mut self) {
        if self.cycle.aborting {
            return;
        }
        self.cycle.aborting = true;

        match self.cycle.state {
            OperatingState::Homing => {
                self.machine.abort_motion();
                self.latch_alarm(AlarmCode::HomingFailReset);
            }
            state if state.is_motion_active() => {
                if self.machine.abort_motion() == AbortOutcome::PositionLost {
                    self.latch_alarm(AlarmCode::AbortCycle);
                }
            }
            _ => {}
        }
    }

    fn execute_commands(&mut self, commands: ExecState) {
        if commands.contains(ExecState::FEED_HOLD) {
            self.feed_hold();
        }
        if commands.contains(ExecState::SAFETY_DOOR) {
            self.door_opened();
        }
        if commands.contains(ExecState::MOTION_CANCEL) {
            self.motion_cancel();
        }
        if commands.contains(ExecState::CYCLE_START) {
            self.cycle_start();
        }
        if commands.contains(ExecState::CYCLE_STOP) {
            self.cycle_stop();
        }
        if commands.contains(ExecState::SLEEP) {
            if let Err(_rejected) = self.sleep() {
                debug!("sleep rejected: {}", _rejected);
            }
        }
        if commands.contains(ExecState::STATUS_REPORT) {
            let status = self.status();
            self.machine.report(Report::Status(status));
        }
    }

    fn feed_hold(&mut self) {
        match self.cycle.state {
            OperatingState::Run if !self.cycle.hold_pending => {
                self.cycle.hold_pending = true;
                self.machine.feed_hold();
            }
            OperatingState::Jog => self.machine.cancel_motion(),
            _ => {}
        }
    }

    pub(super) fn door_opened(&mut self) {
        let state = self.cycle.state;
        match state {
            OperatingState::Homing => self.latch_alarm(AlarmCode::HomingFailDoor),
            OperatingState::Idle
            | OperatingState::Run
            | OperatingState::Hold
            | OperatingState::Jog => {
                match state {
                    OperatingState::Run if !self.cycle.hold_pending => self.machine.feed_hold(),
                    OperatingState::Jog => self.machine.cancel_motion(),
                    _ => {}
                }
                self.cycle.resume_after_door =
                    matches!(state, OperatingState::Run | OperatingState::Hold);
                self.machine.suspend();
                self.apply(Event::SafetyDoor);
            }
            _ => {}
        }
    }

    fn motion_cancel(&mut self) {
        match self.cycle.state {
            OperatingState::Jog => self.machine.cancel_motion(),
            // Probe contact ends the probing move early
            OperatingState::Run if self.rt.tracker.probe_state() == ProbeState::Triggered => {
                self.machine.cancel_motion()
            }
            _ => {}
        }
    }

    fn cycle_start(&mut self) {
        match self.cycle.state {
            OperatingState::Idle => {
                let queued = self.machine.blocks_queued();
                if queued {
                    self.machine.start_cycle();
                }
                self.apply(Event::CycleStart { queued });
            }
            OperatingState::Hold => {
                if self.overrides.spindle_stopped() {
                    self.overrides.toggle_spindle_stop();
                    self.machine.set_spindle_stop(false);
                }
                self.machine.start_cycle();
                self.apply(Event::CycleStart { queued: true });
            }
            OperatingState::Door => {
                if self.machine.door_ajar() {
                    self.machine.report(Report::Feedback(Feedback::CheckDoor));
                    return;
                }
                self.machine.restore();
                let queued = self.cycle.resume_after_door && self.machine.blocks_queued();
                self.cycle.resume_after_door = false;
                if queued {
                    self.machine.start_cycle();
                }
                self.apply(Event::CycleStart { queued });
            }
            _ => {}
        }
    }

    fn cycle_stop(&mut self) {
        match self.cycle.state {
            OperatingState::Run if self.cycle.hold_pending => self.apply(Event::HoldComplete),
            OperatingState::Run => match self.rt.tracker.finish_probe() {
                ProbeOutcome::Missed => {
                    let position = self.rt.tracker.machine_position();
                    self.machine.report(Report::Probe {
                        position,
                        contact: false,
                    });
                    self.record_alarm(AlarmCode::ProbeFailContact);
                }
                ProbeOutcome::Contact(position) => {
                    self.machine.report(Report::Probe {
                        position,
                        contact: true,
                    });
                    self.apply(Event::CycleComplete);
                }
                ProbeOutcome::Idle => self.apply(Event::CycleComplete),
            },
            OperatingState::Jog => self.apply(Event::CycleComplete),
            _ => {}
        }
    }

    fn motion_overrides(&mut self, request: MotionOverride) {
        if !self.cycle.state.overrides_enabled() {
            debug!("motion override ignored in {}", self.cycle.state);
            return;
        }
        if self.overrides.apply_motion(request) {
            let values = self.overrides.values();
            self.machine.apply_overrides(&values);
        }
    }

    fn accessory_overrides(&mut self, request: AccessoryOverride) {
        let state = self.cycle.state;
        if !state.overrides_enabled() {
            debug!("accessory override ignored in {}", state);
            return;
        }

        if self.overrides.apply_spindle(request) {
            let values = self.overrides.values();
            self.machine.apply_overrides(&values);
        }

        if request.contains(AccessoryOverride::SPINDLE_STOP) && state == OperatingState::Hold {
            let stopped = self.overrides.toggle_spindle_stop();
            self.machine.set_spindle_stop(stopped);
        }

        if matches!(
            state,
            OperatingState::Idle | OperatingState::Run | OperatingState::Hold
        ) {
            if request.contains(AccessoryOverride::COOLANT_FLOOD) {
                self.machine.toggle_coolant(Coolant::Flood);
            }
            if request.contains(AccessoryOverride::COOLANT_MIST) {
                self.machine.toggle_coolant(Coolant::Mist);
            }
        }
    }

    /// Turn accumulated pendant clicks into one jog
    ///
    /// While a jog is running the deltas stay pending and coalesce into the
    /// next one. Outside `Idle` and `Jog` they are consumed and dropped.
    fn pendant_jog(&mut self) {
        let axes = self.rt.axis.peek();
        if axes.is_empty() || self.cycle.state == OperatingState::Jog {
            return;
        }

        // Clear before taking so a click landing in between re-flags itself
        self.rt.axis.clear(axes);
        let delta = self.rt.jog.take();

        if self.cycle.state != OperatingState::Idle {
            debug!("pendant jog dropped in {}", self.cycle.state);
            return;
        }
        if let Err(_rejected) = self.jog(JogRequest::Relative(delta)) {
            debug!("pendant jog rejected: {}", _rejected);
        }
    }

    fn pendant_buttons(&mut self) {
        let requests = self.rt.position.take();
        if requests.is_empty() {
            return;
        }

        let mut zero = AxisMask::empty();
        zero.set(AxisMask::X, requests.contains(PositionRequest::ZERO_X));
        zero.set(AxisMask::Y, requests.contains(PositionRequest::ZERO_Y));
        zero.set(AxisMask::Z, requests.contains(PositionRequest::ZERO_Z));
        if !zero.is_empty() {
            if self.cycle.state == OperatingState::Idle {
                self.machine.set_work_zero(zero);
            } else {
                debug!("pendant zero dropped in {}", self.cycle.state);
            }
        }

        let mut home = AxisMask::empty();
        home.set(
            AxisMask::X | AxisMask::Y,
            requests.contains(PositionRequest::HOME_XY),
        );
        home.set(AxisMask::Z, requests.contains(PositionRequest::HOME_Z));
        if !home.is_empty() {
            if let Err(_rejected) = self.request_homing_axes(home) {
                debug!("pendant homing rejected: {}", _rejected);
            }
        }

        if requests.contains(PositionRequest::GO_TO_ZERO) {
            let request = JogRequest::ToWorkZero(AxisMask::X | AxisMask::Y);
            if let Err(_rejected) = self.jog(request) {
                debug!("pendant go-to-zero rejected: {}", _rejected);
            }
        }
    }
}
