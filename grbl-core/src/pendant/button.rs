//! Debounced pendant buttons

use crate::motion::Axis;

/// Pendant buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Set the X/Y work origin
    ZeroXy,
    /// Set the Z work origin
    ZeroZ,
    /// Per-encoder zero: set the X work origin
    ZeroX,
    /// Per-encoder zero: set the Y work origin
    ZeroY,
    /// Home X and Y
    HomeXy,
    /// Home Z
    HomeZ,
    /// Return to the X/Y work origin
    GoToZero,
    /// Cycle the jog step size
    StepSize,
    XPlus,
    XMinus,
    YPlus,
    YMinus,
    ZPlus,
    ZMinus,
}

impl Button {
    pub const COUNT: usize = 14;
    pub const ALL: [Button; Button::COUNT] = [
        Button::ZeroXy,
        Button::ZeroZ,
        Button::ZeroX,
        Button::ZeroY,
        Button::HomeXy,
        Button::HomeZ,
        Button::GoToZero,
        Button::StepSize,
        Button::XPlus,
        Button::XMinus,
        Button::YPlus,
        Button::YMinus,
        Button::ZPlus,
        Button::ZMinus,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Axis and direction of a single-step jog button
    pub fn jog(self) -> Option<(Axis, i32)> {
        match self {
            Button::XPlus => Some((Axis::X, 1)),
            Button::XMinus => Some((Axis::X, -1)),
            Button::YPlus => Some((Axis::Y, 1)),
            Button::YMinus => Some((Axis::Y, -1)),
            Button::ZPlus => Some((Axis::Z, 1)),
            Button::ZMinus => Some((Axis::Z, -1)),
            _ => None,
        }
    }
}

/// Debounced level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Consecutive-sample debouncer
///
/// The debounced level only changes after `threshold` consecutive samples
/// disagree with it; any agreeing sample restarts the count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    pressed: bool,
    count: u8,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            count: 0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn update(&mut self, raw_pressed: bool, threshold: u8) -> Option<Edge> {
        if raw_pressed == self.pressed {
            self.count = 0;
            return None;
        }

        self.count = self.count.saturating_add(1);
        if self.count < threshold.max(1) {
            return None;
        }

        self.pressed = raw_pressed;
        self.count = 0;
        Some(if raw_pressed {
            Edge::Pressed
        } else {
            Edge::Released
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_after_threshold() {
        let mut db = Debouncer::new();
        assert_eq!(db.update(true, 3), None);
        assert_eq!(db.update(true, 3), None);
        assert_eq!(db.update(true, 3), Some(Edge::Pressed));
        assert!(db.is_pressed());
        assert_eq!(db.update(true, 3), None);
    }

    #[test]
    fn test_bounce_restarts_count() {
        let mut db = Debouncer::new();
        db.update(true, 3);
        db.update(true, 3);
        // Bounce back to released
        assert_eq!(db.update(false, 3), None);
        assert_eq!(db.update(true, 3), None);
        assert_eq!(db.update(true, 3), None);
        assert_eq!(db.update(true, 3), Some(Edge::Pressed));
    }

    #[test]
    fn test_release_edge() {
        let mut db = Debouncer::new();
        db.update(true, 1);
        assert_eq!(db.update(false, 1), Some(Edge::Released));
    }

    #[test]
    fn test_zero_threshold_acts_as_one() {
        let mut db = Debouncer::new();
        assert_eq!(db.update(true, 0), Some(Edge::Pressed));
    }

    #[test]
    fn test_button_bits_are_distinct() {
        let mut seen = 0u16;
        for (i, button) in Button::ALL.into_iter().enumerate() {
            assert_eq!(button.index(), i);
            assert_eq!(seen & button.bit(), 0);
            seen |= button.bit();
        }
    }

    #[test]
    fn test_jog_buttons() {
        assert_eq!(Button::ZMinus.jog(), Some((Axis::Z, -1)));
        assert_eq!(Button::XPlus.jog(), Some((Axis::X, 1)));
        assert_eq!(Button::HomeZ.jog(), None);
    }
}
