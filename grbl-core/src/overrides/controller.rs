//! Override controller
//!
//! Out-of-range requests saturate at the bound; they are never errors.

use serde::{Deserialize, Serialize};

use crate::realtime::{AccessoryOverride, MotionOverride};

/// Default percentage for every override, restored on each reset
pub const DEFAULT_OVERRIDE: u8 = 100;

/// Current override percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Overrides {
    pub feed: u8,
    pub rapid: u8,
    pub spindle: u8,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            feed: DEFAULT_OVERRIDE,
            rapid: DEFAULT_OVERRIDE,
            spindle: DEFAULT_OVERRIDE,
        }
    }
}

/// Bounds and increments for each override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverrideLimits {
    pub feed_min: u8,
    pub feed_max: u8,
    pub feed_coarse: u8,
    pub feed_fine: u8,
    /// Rapid override levels selectable below 100%
    pub rapid_medium: u8,
    pub rapid_low: u8,
    pub spindle_min: u8,
    pub spindle_max: u8,
    pub spindle_coarse: u8,
    pub spindle_fine: u8,
}

impl Default for OverrideLimits {
    fn default() -> Self {
        Self {
            feed_min: 10,
            feed_max: 200,
            feed_coarse: 10,
            feed_fine: 1,
            rapid_medium: 50,
            rapid_low: 25,
            spindle_min: 10,
            spindle_max: 200,
            spindle_coarse: 10,
            spindle_fine: 1,
        }
    }
}

impl OverrideLimits {
    /// Check that every bound brackets the default and rapid levels are ordered
    pub fn is_valid(&self) -> bool {
        let brackets =
            |min: u8, max: u8| min > 0 && min <= DEFAULT_OVERRIDE && DEFAULT_OVERRIDE <= max;

        brackets(self.feed_min, self.feed_max)
            && brackets(self.spindle_min, self.spindle_max)
            && self.rapid_low > 0
            && self.rapid_low <= self.rapid_medium
            && self.rapid_medium <= DEFAULT_OVERRIDE
    }
}

/// Increment / decrement set of one continuous override
struct Adjust {
    reset: bool,
    coarse_plus: bool,
    coarse_minus: bool,
    fine_plus: bool,
    fine_minus: bool,
}

impl Adjust {
    /// Apply in the fixed order reset, coarse+, coarse-, fine+, fine-,
    /// saturating after every step
    fn apply(&self, value: u8, min: u8, max: u8, coarse: u8, fine: u8) -> u8 {
        // Inverted bounds saturate at `max` instead of panicking
        let clamp = |v: i16| v.max(min as i16).min(max as i16) as u8;

        let mut v = value;
        if self.reset {
            v = clamp(DEFAULT_OVERRIDE as i16);
        }
        if self.coarse_plus {
            v = clamp(v as i16 + coarse as i16);
        }
        if self.coarse_minus {
            v = clamp(v as i16 - coarse as i16);
        }
        if self.fine_plus {
            v = clamp(v as i16 + fine as i16);
        }
        if self.fine_minus {
            v = clamp(v as i16 - fine as i16);
        }
        v
    }
}

/// Bounded override state
#[derive(Debug, Clone)]
pub struct OverrideController {
    values: Overrides,
    limits: OverrideLimits,
    spindle_stopped: bool,
}

impl OverrideController {
    pub fn new(limits: OverrideLimits) -> Self {
        Self {
            values: Overrides::default(),
            limits,
            spindle_stopped: false,
        }
    }

    /// Current percentages
    pub fn values(&self) -> Overrides {
        self.values
    }

    pub fn limits(&self) -> &OverrideLimits {
        &self.limits
    }

    /// Check if the spindle-stop override is engaged
    pub fn spindle_stopped(&self) -> bool {
        self.spindle_stopped
    }

    /// Restore every override to its default
    pub fn reset(&mut self) {
        self.values = Overrides::default();
        self.spindle_stopped = false;
    }

    /// Apply feed and rapid requests; returns true if a value changed
    pub fn apply_motion(&mut self, request: MotionOverride) -> bool {
        let before = self.values;
        let l = &self.limits;

        let feed = Adjust {
            reset: request.contains(MotionOverride::FEED_RESET),
            coarse_plus: request.contains(MotionOverride::FEED_COARSE_PLUS),
            coarse_minus: request.contains(MotionOverride::FEED_COARSE_MINUS),
            fine_plus: request.contains(MotionOverride::FEED_FINE_PLUS),
            fine_minus: request.contains(MotionOverride::FEED_FINE_MINUS),
        };
        self.values.feed = feed.apply(
            self.values.feed,
            l.feed_min,
            l.feed_max,
            l.feed_coarse,
            l.feed_fine,
        );

        // Discrete levels; the lowest requested level wins
        if request.contains(MotionOverride::RAPID_RESET) {
            self.values.rapid = DEFAULT_OVERRIDE;
        }
        if request.contains(MotionOverride::RAPID_MEDIUM) {
            self.values.rapid = l.rapid_medium;
        }
        if request.contains(MotionOverride::RAPID_LOW) {
            self.values.rapid = l.rapid_low;
        }

        self.values != before
    }

    /// Apply spindle speed requests; returns true if the value changed
    ///
    /// Spindle stop and coolant bits in `request` are ignored here.
    pub fn apply_spindle(&mut self, request: AccessoryOverride) -> bool {
        let before = self.values.spindle;
        let l = &self.limits;

        let spindle = Adjust {
            reset: request.contains(AccessoryOverride::SPINDLE_RESET),
            coarse_plus: request.contains(AccessoryOverride::SPINDLE_COARSE_PLUS),
            coarse_minus: request.contains(AccessoryOverride::SPINDLE_COARSE_MINUS),
            fine_plus: request.contains(AccessoryOverride::SPINDLE_FINE_PLUS),
            fine_minus: request.contains(AccessoryOverride::SPINDLE_FINE_MINUS),
        };
        self.values.spindle = spindle.apply(
            self.values.spindle,
            l.spindle_min,
            l.spindle_max,
            l.spindle_coarse,
            l.spindle_fine,
        );

        self.values.spindle != before
    }

    /// Flip the spindle-stop override; returns the new setting
    pub fn toggle_spindle_stop(&mut self) -> bool {
        self.spindle_stopped = !self.spindle_stopped;
        self.spindle_stopped
    }
}
