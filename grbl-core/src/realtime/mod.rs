//! Realtime flag registers
//!
//! Everything an interrupt context may write lives in [`Realtime`], which is
//! meant to be placed in a `static`. Interrupt handlers never get the whole
//! struct; they get a narrow handle for the signals they own:
//!
//! | Context            | Handle                 | Writes                              |
//! |--------------------|------------------------|-------------------------------------|
//! | serial RX          | [`SerialHandle`]       | command and override bits           |
//! | limit switch edge  | [`LimitHandle`]        | hard-limit alarm + reset            |
//! | stepper tick       | [`StepperHandle`]      | machine position, cycle stop        |
//! | probe edge         | [`ProbeHandle`]        | probe state and probe position      |
//! | pendant timer      | [`PendantPort`]        | jog deltas, axis and button bits    |
//!
//! The [`Kernel`](crate::Kernel) is the only reader and clearer.

pub mod flags;
pub mod register;

use portable_atomic::{AtomicI32, Ordering};

use grbl_protocol::RealtimeCommand;

use crate::motion::{Axis, Position, PositionTracker, ProbeHandle, StepperHandle, N_AXIS};
use crate::state::AlarmCode;

pub use flags::{AccessoryOverride, AxisRequest, ExecState, MotionOverride, PositionRequest};
pub use register::{AlarmRegister, AlarmSetter, FlagRegister, FlagSetter};

/// Interrupt-writable kernel state
pub struct Realtime {
    pub(crate) state: FlagRegister<ExecState>,
    pub(crate) alarm: AlarmRegister,
    pub(crate) motion_override: FlagRegister<MotionOverride>,
    pub(crate) accessory_override: FlagRegister<AccessoryOverride>,
    pub(crate) axis: FlagRegister<AxisRequest>,
    pub(crate) position: FlagRegister<PositionRequest>,
    pub(crate) jog: JogDeltas,
    pub(crate) tracker: PositionTracker,
}

impl Default for Realtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Realtime {
    pub const fn new() -> Self {
        Self {
            state: FlagRegister::new(),
            alarm: AlarmRegister::new(),
            motion_override: FlagRegister::new(),
            accessory_override: FlagRegister::new(),
            axis: FlagRegister::new(),
            position: FlagRegister::new(),
            jog: JogDeltas::new(),
            tracker: PositionTracker::new(),
        }
    }

    /// Handle for the serial receive interrupt
    pub fn serial(&self) -> SerialHandle<'_> {
        SerialHandle {
            state: self.state.setter(),
            motion_override: self.motion_override.setter(),
            accessory_override: self.accessory_override.setter(),
        }
    }

    /// Handle for the limit switch interrupt
    pub fn limits(&self) -> LimitHandle<'_> {
        LimitHandle {
            alarm: self.alarm.setter(),
            state: self.state.setter(),
        }
    }

    /// Handle for the stepper tick
    pub fn stepper(&self) -> StepperHandle<'_> {
        StepperHandle::new(&self.tracker, self.state.setter())
    }

    /// Handle for the probe edge interrupt
    pub fn probe(&self) -> ProbeHandle<'_> {
        ProbeHandle::new(&self.tracker, self.state.setter())
    }

    /// Handle for the pendant sampling timer
    pub fn pendant(&self) -> PendantPort<'_> {
        PendantPort {
            jog: &self.jog,
            axis: self.axis.setter(),
            position: self.position.setter(),
        }
    }

    /// Set-only access to the command register for other signal sources
    /// (sleep timer, door switch)
    pub fn commands(&self) -> FlagSetter<'_, ExecState> {
        self.state.setter()
    }

    /// Raise-only access to the alarm register
    pub fn alarms(&self) -> AlarmSetter<'_> {
        self.alarm.setter()
    }

    /// Read-only view of the position tracker
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Swap every command register and jog accumulator to zero
    ///
    /// The alarm register is left alone; the reset sequencer drains it
    /// separately so an alarm raised mid-sequence stays pending.
    pub(crate) fn discard_pending(&self) {
        self.state.take();
        self.motion_override.take();
        self.accessory_override.take();
        self.axis.take();
        self.position.take();
        self.jog.clear();
    }
}

/// Serial receive handle
///
/// Each realtime command byte sets exactly one bit.
#[derive(Clone, Copy)]
pub struct SerialHandle<'a> {
    state: FlagSetter<'a, ExecState>,
    motion_override: FlagSetter<'a, MotionOverride>,
    accessory_override: FlagSetter<'a, AccessoryOverride>,
}

impl SerialHandle<'_> {
    /// Handle a received byte
    ///
    /// Returns true if the byte was a realtime command and must not be
    /// forwarded to the line buffer.
    pub fn receive(&self, byte: u8) -> bool {
        match RealtimeCommand::from_byte(byte) {
            Some(cmd) => {
                self.command(cmd);
                true
            }
            None => false,
        }
    }

    /// Signal a decoded realtime command
    pub fn command(&self, cmd: RealtimeCommand) {
        use RealtimeCommand::*;

        match cmd {
            StatusReport => self.state.set(ExecState::STATUS_REPORT),
            CycleStart => self.state.set(ExecState::CYCLE_START),
            FeedHold => self.state.set(ExecState::FEED_HOLD),
            Reset => self.state.set(ExecState::RESET),
            SafetyDoor => self.state.set(ExecState::SAFETY_DOOR),
            JogCancel => self.state.set(ExecState::MOTION_CANCEL),
            FeedOverrideReset => self.motion_override.set(MotionOverride::FEED_RESET),
            FeedOverrideCoarsePlus => self.motion_override.set(MotionOverride::FEED_COARSE_PLUS),
            FeedOverrideCoarseMinus => self.motion_override.set(MotionOverride::FEED_COARSE_MINUS),
            FeedOverrideFinePlus => self.motion_override.set(MotionOverride::FEED_FINE_PLUS),
            FeedOverrideFineMinus => self.motion_override.set(MotionOverride::FEED_FINE_MINUS),
            RapidOverrideReset => self.motion_override.set(MotionOverride::RAPID_RESET),
            RapidOverrideMedium => self.motion_override.set(MotionOverride::RAPID_MEDIUM),
            RapidOverrideLow => self.motion_override.set(MotionOverride::RAPID_LOW),
            SpindleOverrideReset => self.accessory_override.set(AccessoryOverride::SPINDLE_RESET),
            SpindleOverrideCoarsePlus => {
                self.accessory_override.set(AccessoryOverride::SPINDLE_COARSE_PLUS)
            }
            SpindleOverrideCoarseMinus => {
                self.accessory_override.set(AccessoryOverride::SPINDLE_COARSE_MINUS)
            }
            SpindleOverrideFinePlus => {
                self.accessory_override.set(AccessoryOverride::SPINDLE_FINE_PLUS)
            }
            SpindleOverrideFineMinus => {
                self.accessory_override.set(AccessoryOverride::SPINDLE_FINE_MINUS)
            }
            SpindleStop => self.accessory_override.set(AccessoryOverride::SPINDLE_STOP),
            CoolantFloodToggle => self.accessory_override.set(AccessoryOverride::COOLANT_FLOOD),
            CoolantMistToggle => self.accessory_override.set(AccessoryOverride::COOLANT_MIST),
        }
    }
}

/// Limit switch handle
#[derive(Clone, Copy)]
pub struct LimitHandle<'a> {
    alarm: AlarmSetter<'a>,
    state: FlagSetter<'a, ExecState>,
}

impl LimitHandle<'_> {
    /// Hard limit tripped: latch the alarm and request an abort
    pub fn trip(&self) {
        self.alarm.raise(AlarmCode::HardLimit);
        self.state.set(ExecState::RESET);
    }
}

/// Per-axis pendant deltas in steps
///
/// The pendant timer adds to an axis, the main loop swaps it to zero. Clicks
/// that arrive before the main loop consumes the delta are folded into it.
pub struct JogDeltas {
    steps: [AtomicI32; N_AXIS],
}

impl JogDeltas {
    pub const fn new() -> Self {
        Self {
            steps: [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)],
        }
    }

    fn add(&self, axis: Axis, steps: i32) {
        self.steps[axis.index()].fetch_add(steps, Ordering::AcqRel);
    }

    /// Pending delta for `axis` without consuming it
    pub fn peek(&self, axis: Axis) -> i32 {
        self.steps[axis.index()].load(Ordering::Acquire)
    }

    /// Consume the pending delta on every axis
    pub(crate) fn take(&self) -> Position {
        Axis::ALL.map(|axis| self.steps[axis.index()].swap(0, Ordering::AcqRel))
    }

    pub(crate) fn clear(&self) {
        self.take();
    }
}

impl Default for JogDeltas {
    fn default() -> Self {
        Self::new()
    }
}

/// Pendant timer handle
#[derive(Clone, Copy)]
pub struct PendantPort<'a> {
    jog: &'a JogDeltas,
    axis: FlagSetter<'a, AxisRequest>,
    position: FlagSetter<'a, PositionRequest>,
}

impl PendantPort<'_> {
    /// Accumulate `steps` on `axis` and flag it
    ///
    /// The delta is published before the flag so the main loop never sees
    /// the flag without the matching steps.
    pub fn push_delta(&self, axis: Axis, steps: i32) {
        if steps == 0 {
            return;
        }
        self.jog.add(axis, steps);
        let flag = match axis {
            Axis::X => AxisRequest::X,
            Axis::Y => AxisRequest::Y,
            Axis::Z => AxisRequest::Z,
        };
        self.axis.set(flag);
    }

    /// Signal a pendant button request
    pub fn request(&self, request: PositionRequest) {
        self.position.set(request);
    }

    /// Pending delta on `axis`
    pub fn pending(&self, axis: Axis) -> i32 {
        self.jog.peek(axis)
    }
}
