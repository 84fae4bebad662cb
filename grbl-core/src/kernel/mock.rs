//! Recording machine used by the kernel unit tests

use std::vec::Vec;

use crate::motion::{AxisMask, JogRequest, Position};
use crate::overrides::Overrides;
use crate::traits::{
    AbortOutcome, Accessories, Coolant, MotionControl, Report, Reporter, Subsystem, Subsystems,
    SyncTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Initialize(Subsystem),
    Reset(Subsystem),
    Sync(SyncTarget, Position),
    StartCycle,
    FeedHold,
    CancelMotion,
    AbortMotion,
    StartJog(JogRequest),
    StartHoming(AxisMask),
    ApplyOverrides(Overrides),
    SetWorkZero(AxisMask),
    Suspend,
    Restore,
    SpindleStop(bool),
    Coolant(Coolant),
    Sleep,
}

pub struct MockMachine {
    pub calls: Vec<Call>,
    pub reports: Vec<Report>,
    pub queued: bool,
    pub door_ajar: bool,
    pub abort_outcome: AbortOutcome,
}

impl MockMachine {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            reports: Vec::new(),
            queued: false,
            door_ajar: false,
            abort_outcome: AbortOutcome::Stopped,
        }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.reports.clear();
    }

    pub fn called(&self, call: Call) -> bool {
        self.calls.contains(&call)
    }

    pub fn reported(&self, report: Report) -> bool {
        self.reports.contains(&report)
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl Subsystems for MockMachine {
    fn initialize(&mut self, subsystem: Subsystem) {
        self.calls.push(Call::Initialize(subsystem));
    }

    fn reset(&mut self, subsystem: Subsystem) {
        self.calls.push(Call::Reset(subsystem));
    }

    fn synchronize_position(&mut self, target: SyncTarget, position: &Position) {
        self.calls.push(Call::Sync(target, *position));
    }
}

impl MotionControl for MockMachine {
    fn blocks_queued(&self) -> bool {
        self.queued
    }

    fn start_cycle(&mut self) {
        self.calls.push(Call::StartCycle);
    }

    fn feed_hold(&mut self) {
        self.calls.push(Call::FeedHold);
    }

    fn cancel_motion(&mut self) {
        self.calls.push(Call::CancelMotion);
    }

    fn abort_motion(&mut self) -> AbortOutcome {
        self.calls.push(Call::AbortMotion);
        self.abort_outcome
    }

    fn start_jog(&mut self, request: &JogRequest) {
        self.calls.push(Call::StartJog(*request));
    }

    fn start_homing(&mut self, axes: AxisMask) {
        self.calls.push(Call::StartHoming(axes));
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        self.calls.push(Call::ApplyOverrides(*overrides));
    }

    fn set_work_zero(&mut self, axes: AxisMask) {
        self.calls.push(Call::SetWorkZero(axes));
    }
}

impl Accessories for MockMachine {
    fn door_ajar(&self) -> bool {
        self.door_ajar
    }

    fn suspend(&mut self) {
        self.calls.push(Call::Suspend);
    }

    fn restore(&mut self) {
        self.calls.push(Call::Restore);
    }

    fn set_spindle_stop(&mut self, stopped: bool) {
        self.calls.push(Call::SpindleStop(stopped));
    }

    fn toggle_coolant(&mut self, coolant: Coolant) {
        self.calls.push(Call::Coolant(coolant));
    }

    fn sleep(&mut self) {
        self.calls.push(Call::Sleep);
    }
}

impl Reporter for MockMachine {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }
}
