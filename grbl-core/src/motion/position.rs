//! Position tracker
//!
//! Writer discipline:
//!
//! - machine position: written only by the stepper tick ([`StepperHandle`])
//!   and cleared by the reset sequencer while steppers are idle
//! - probe state / probe position: `Armed` and `Inactive` are written by the
//!   main loop, `Triggered` and the captured position only by the probe edge
//!   handler ([`ProbeHandle`])
//!
//! One writer per field means plain atomic loads and stores are enough; no
//! wider locking is needed.

use bitflags::bitflags;
use portable_atomic::{AtomicI32, AtomicU8, Ordering};

use crate::realtime::{ExecState, FlagSetter};
use crate::traits::{Subsystems, SyncTarget};

/// Number of machine axes
pub const N_AXIS: usize = 3;

/// Per-axis step counts
pub type Position = [i32; N_AXIS];

/// Machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; N_AXIS] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into a [`Position`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn mask(self) -> AxisMask {
        match self {
            Axis::X => AxisMask::X,
            Axis::Y => AxisMask::Y,
            Axis::Z => AxisMask::Z,
        }
    }
}

bitflags! {
    /// Set of axes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisMask: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AxisMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:#05b}", self.bits());
    }
}

/// Probe capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ProbeState {
    /// No probing move in progress
    Inactive = 0,
    /// Probing move running, waiting for contact
    Armed = 1,
    /// Contact seen, position captured, waiting for the main loop
    Triggered = 2,
}

impl ProbeState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ProbeState::Armed,
            2 => ProbeState::Triggered,
            _ => ProbeState::Inactive,
        }
    }
}

/// Result of closing a probing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeOutcome {
    /// No cycle was running
    Idle,
    /// Contact made at the captured position
    Contact(Position),
    /// The cycle ended without contact
    Missed,
}

/// Authoritative machine position and probe capture
pub struct PositionTracker {
    steps: [AtomicI32; N_AXIS],
    probe: [AtomicI32; N_AXIS],
    probe_state: AtomicU8,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionTracker {
    pub const fn new() -> Self {
        Self {
            steps: [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)],
            probe: [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)],
            probe_state: AtomicU8::new(ProbeState::Inactive as u8),
        }
    }

    /// Current machine position in steps
    pub fn machine_position(&self) -> Position {
        load_all(&self.steps)
    }

    /// Last captured probe position in steps
    ///
    /// Only meaningful after a probing cycle ended in contact.
    pub fn probe_position(&self) -> Position {
        load_all(&self.probe)
    }

    pub fn probe_state(&self) -> ProbeState {
        ProbeState::from_u8(self.probe_state.load(Ordering::Acquire))
    }

    /// Push the machine position into the planner and then the parser
    pub fn synchronize<S: Subsystems + ?Sized>(&self, subsystems: &mut S) -> Position {
        let position = self.machine_position();
        subsystems.synchronize_position(SyncTarget::Planner, &position);
        subsystems.synchronize_position(SyncTarget::Parser, &position);
        position
    }

    /// Arm the probe for a probing move; fails unless inactive
    pub(crate) fn arm_probe(&self) -> bool {
        self.probe_state
            .compare_exchange(
                ProbeState::Inactive as u8,
                ProbeState::Armed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Consume a completed capture, leaving the probe inactive
    ///
    /// Returns `None` while the probe is still armed or was never armed.
    pub(crate) fn take_contact(&self) -> Option<Position> {
        if self.probe_state() != ProbeState::Triggered {
            return None;
        }
        let position = self.probe_position();
        self.probe_state
            .store(ProbeState::Inactive as u8, Ordering::Release);
        Some(position)
    }

    /// Close the probing cycle after its move has ended
    pub(crate) fn finish_probe(&self) -> ProbeOutcome {
        // Disarm atomically so a contact racing the end of travel is kept
        match self.probe_state.compare_exchange(
            ProbeState::Armed as u8,
            ProbeState::Inactive as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => ProbeOutcome::Missed,
            Err(_) => match self.take_contact() {
                Some(position) => ProbeOutcome::Contact(position),
                None => ProbeOutcome::Idle,
            },
        }
    }

    /// Reset-time clear of the probe capture and, if asked, the machine position
    pub(crate) fn clear(&self, machine_position: bool) {
        self.probe_state
            .store(ProbeState::Inactive as u8, Ordering::Release);
        for axis in &self.probe {
            axis.store(0, Ordering::Relaxed);
        }
        if machine_position {
            for axis in &self.steps {
                axis.store(0, Ordering::Relaxed);
            }
        }
    }
}

fn load_all(axes: &[AtomicI32; N_AXIS]) -> Position {
    let mut position = [0; N_AXIS];
    for (slot, axis) in position.iter_mut().zip(axes) {
        *slot = axis.load(Ordering::Acquire);
    }
    position
}

/// Stepper tick handle
#[derive(Clone, Copy)]
pub struct StepperHandle<'a> {
    tracker: &'a PositionTracker,
    commands: FlagSetter<'a, ExecState>,
}

impl<'a> StepperHandle<'a> {
    pub(crate) fn new(tracker: &'a PositionTracker, commands: FlagSetter<'a, ExecState>) -> Self {
        Self { tracker, commands }
    }

    /// Record one step pulse on `axis`
    pub fn step(&self, axis: Axis, forward: bool) {
        let slot = &self.tracker.steps[axis.index()];
        // Single writer: load/store avoids a CAS loop on cores without one
        let steps = slot.load(Ordering::Relaxed);
        let next = if forward {
            steps.wrapping_add(1)
        } else {
            steps.wrapping_sub(1)
        };
        slot.store(next, Ordering::Release);
    }

    /// Overwrite the position of `axis` (homing pull-off, absolute set)
    pub fn set_position(&self, axis: Axis, steps: i32) {
        self.tracker.steps[axis.index()].store(steps, Ordering::Release);
    }

    /// Motion stopped: segment buffer drained, hold or jog finished
    pub fn cycle_stop(&self) {
        self.commands.set(ExecState::CYCLE_STOP);
    }
}

/// Probe edge handle
#[derive(Clone, Copy)]
pub struct ProbeHandle<'a> {
    tracker: &'a PositionTracker,
    commands: FlagSetter<'a, ExecState>,
}

impl<'a> ProbeHandle<'a> {
    pub(crate) fn new(tracker: &'a PositionTracker, commands: FlagSetter<'a, ExecState>) -> Self {
        Self { tracker, commands }
    }

    /// Probe contact detected
    ///
    /// Captures the step position immediately, before any further pulse, then
    /// publishes `Triggered` and asks the main loop to stop the move. Contact
    /// while the probe is not armed is ignored.
    pub fn trigger(&self) -> bool {
        if self.tracker.probe_state() != ProbeState::Armed {
            return false;
        }
        for (captured, axis) in self.tracker.probe.iter().zip(&self.tracker.steps) {
            captured.store(axis.load(Ordering::Acquire), Ordering::Relaxed);
        }
        self.tracker
            .probe_state
            .store(ProbeState::Triggered as u8, Ordering::Release);
        self.commands.set(ExecState::MOTION_CANCEL);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::Realtime;

    #[test]
    fn test_stepper_counts_steps() {
        let rt = Realtime::new();
        let stepper = rt.stepper();
        for _ in 0..5 {
            stepper.step(Axis::X, true);
        }
        stepper.step(Axis::Z, false);
        assert_eq!(rt.tracker().machine_position(), [5, 0, -1]);

        stepper.set_position(Axis::Y, 400);
        assert_eq!(rt.tracker().machine_position(), [5, 400, -1]);
    }

    #[test]
    fn test_probe_capture_flow() {
        let rt = Realtime::new();
        let tracker = rt.tracker();
        let stepper = rt.stepper();
        let probe = rt.probe();

        // Not armed: contact ignored
        assert!(!probe.trigger());
        assert_eq!(tracker.probe_state(), ProbeState::Inactive);

        assert!(tracker.arm_probe());
        assert!(!tracker.arm_probe());
        stepper.step(Axis::Z, false);
        stepper.step(Axis::Z, false);
        assert!(probe.trigger());
        // Pulses after contact do not move the capture
        stepper.step(Axis::Z, false);

        assert_eq!(tracker.probe_state(), ProbeState::Triggered);
        assert!(rt.state.peek().contains(ExecState::MOTION_CANCEL));
        assert_eq!(tracker.finish_probe(), ProbeOutcome::Contact([0, 0, -2]));
        assert_eq!(tracker.probe_state(), ProbeState::Inactive);
        assert_eq!(tracker.finish_probe(), ProbeOutcome::Idle);
    }

    #[test]
    fn test_probe_miss() {
        let rt = Realtime::new();
        let tracker = rt.tracker();
        assert!(tracker.arm_probe());
        assert_eq!(tracker.take_contact(), None);
        assert_eq!(tracker.finish_probe(), ProbeOutcome::Missed);
        assert_eq!(tracker.probe_state(), ProbeState::Inactive);
    }

    #[test]
    fn test_clear_keeps_position_on_request() {
        let rt = Realtime::new();
        let tracker = rt.tracker();
        rt.stepper().set_position(Axis::X, 12);
        tracker.arm_probe();
        rt.probe().trigger();

        tracker.clear(false);
        assert_eq!(tracker.machine_position(), [12, 0, 0]);
        assert_eq!(tracker.probe_position(), [0; N_AXIS]);
        assert_eq!(tracker.probe_state(), ProbeState::Inactive);

        tracker.clear(true);
        assert_eq!(tracker.machine_position(), [0; N_AXIS]);
    }

    #[test]
    fn test_axis_helpers() {
        assert_eq!(Axis::Z.index(), 2);
        assert_eq!(Axis::Y.mask(), AxisMask::Y);
    }
}
