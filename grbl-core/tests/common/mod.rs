//! Recording stand-in for the collaborators

#![allow(dead_code)]

use grbl_core::config::KernelConfig;
use grbl_core::motion::{AxisMask, JogRequest, Position};
use grbl_core::overrides::Overrides;
use grbl_core::traits::{
    AbortOutcome, Accessories, Coolant, MotionControl, Report, Reporter, Subsystem, Subsystems,
    SyncTarget,
};
use grbl_core::{Kernel, Realtime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Initialize(Subsystem),
    Reset(Subsystem),
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

/// Records every call; parser and planner keep their own position copy
pub struct Bench {
    pub calls: Vec<Call>,
    pub reports: Vec<Report>,
    pub parser_position: Option<Position>,
    pub planner_position: Option<Position>,
    pub queued: bool,
    pub door_ajar: bool,
    pub abort_outcome: AbortOutcome,
    /// Runs inside `Subsystems::reset`, standing in for an interrupt
    pub on_reset: Option<fn(Subsystem)>,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            reports: Vec::new(),
            parser_position: None,
            planner_position: None,
            queued: true,
            door_ajar: false,
            abort_outcome: AbortOutcome::Stopped,
            on_reset: None,
        }
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn jogs(&self) -> Vec<JogRequest> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::StartJog(request) => Some(*request),
                _ => None,
            })
            .collect()
    }
}

impl Subsystems for Bench {
    fn initialize(&mut self, subsystem: Subsystem) {
        self.calls.push(Call::Initialize(subsystem));
    }

    fn reset(&mut self, subsystem: Subsystem) {
        match subsystem {
            Subsystem::Parser => self.parser_position = None,
            Subsystem::Planner => self.planner_position = None,
            _ => {}
        }
        self.calls.push(Call::Reset(subsystem));
        if let Some(interrupt) = self.on_reset {
            interrupt(subsystem);
        }
    }

    fn synchronize_position(&mut self, target: SyncTarget, position: &Position) {
        match target {
            SyncTarget::Parser => self.parser_position = Some(*position),
            SyncTarget::Planner => self.planner_position = Some(*position),
        }
    }
}

impl MotionControl for Bench {
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

impl Accessories for Bench {
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

impl Reporter for Bench {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }
}

pub fn boot(rt: &Realtime, config: KernelConfig) -> Kernel<'_, Bench> {
    Kernel::power_up(rt, config, Bench::new())
}
