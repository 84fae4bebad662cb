//! Bit definitions for each realtime register
//!
//! Each register is its own atomic byte so that unrelated signal classes
//! never contend on the same word.

use bitflags::bitflags;

bitflags! {
    /// System state commands (serial RX, stepper, limits, probe, sleep timer)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExecState: u8 {
        const STATUS_REPORT = 1 << 0;
        const CYCLE_START = 1 << 1;
        /// Motion stopped: buffer drained, hold deceleration done or jog done
        const CYCLE_STOP = 1 << 2;
        const FEED_HOLD = 1 << 3;
        const RESET = 1 << 4;
        const SAFETY_DOOR = 1 << 5;
        /// Stop the current jog or probing move, keep the rest of the program
        const MOTION_CANCEL = 1 << 6;
        const SLEEP = 1 << 7;
    }
}

bitflags! {
    /// Feed and rapid override requests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MotionOverride: u8 {
        const FEED_RESET = 1 << 0;
        const FEED_COARSE_PLUS = 1 << 1;
        const FEED_COARSE_MINUS = 1 << 2;
        const FEED_FINE_PLUS = 1 << 3;
        const FEED_FINE_MINUS = 1 << 4;
        const RAPID_RESET = 1 << 5;
        const RAPID_MEDIUM = 1 << 6;
        const RAPID_LOW = 1 << 7;
    }
}

bitflags! {
    /// Spindle override and coolant requests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessoryOverride: u8 {
        const SPINDLE_RESET = 1 << 0;
        const SPINDLE_COARSE_PLUS = 1 << 1;
        const SPINDLE_COARSE_MINUS = 1 << 2;
        const SPINDLE_FINE_PLUS = 1 << 3;
        const SPINDLE_FINE_MINUS = 1 << 4;
        const SPINDLE_STOP = 1 << 5;
        const COOLANT_FLOOD = 1 << 6;
        const COOLANT_MIST = 1 << 7;
    }
}

bitflags! {
    /// Pendant jog axes with a pending delta
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisRequest: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

bitflags! {
    /// Pendant button requests
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PositionRequest: u8 {
        /// Set the X work origin to the current position
        const ZERO_X = 1 << 0;
        const ZERO_Y = 1 << 1;
        const ZERO_Z = 1 << 2;
        /// Home the X and Y axes
        const HOME_XY = 1 << 3;
        /// Home the Z axis
        const HOME_Z = 1 << 4;
        /// Jog back to the X/Y work origin
        const GO_TO_ZERO = 1 << 5;

        const ZERO_XY = Self::ZERO_X.bits() | Self::ZERO_Y.bits();
    }
}

#[cfg(feature = "defmt")]
macro_rules! impl_format_bits {
    ($($flags:ty),*) => {
        $(
            impl defmt::Format for $flags {
                fn format(&self, f: defmt::Formatter) {
                    defmt::write!(f, "{=u8:#010b}", self.bits());
                }
            }
        )*
    };
}

#[cfg(feature = "defmt")]
impl_format_bits!(ExecState, MotionOverride, AccessoryOverride, AxisRequest, PositionRequest);
