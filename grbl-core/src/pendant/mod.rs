//! Manual jog pendant
//!
//! Two quadrature encoders (X and Y) and a bank of buttons, sampled from a
//! periodic timer interrupt rather than on every edge so the interrupt load is
//! bounded. Accepted clicks and jog-button presses become step deltas in the
//! shared jog accumulators; zero, home and go-to-zero presses become position
//! request bits. The main loop picks both up through the realtime registers.

pub mod button;
pub mod pins;
pub mod quadrature;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::motion::Axis;
use crate::realtime::{PendantPort, PositionRequest};

pub use button::{Button, Debouncer, Edge};
pub use pins::PendantPins;
pub use quadrature::{Phase, QuadratureDecoder, Step};

/// Number of quadrature encoders
pub const ENCODERS: usize = 2;

/// Axis driven by each encoder
const ENCODER_AXES: [Axis; ENCODERS] = [Axis::X, Axis::Y];

/// Maximum number of selectable step sizes
pub const MAX_STEP_SIZES: usize = 4;

/// Default debounce threshold in samples
pub const DEFAULT_DEBOUNCE_SAMPLES: u8 = 4;

/// Pendant tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendantConfig {
    /// Steps moved per encoder click, cycled by the step-size button
    pub step_sizes: Vec<i32, MAX_STEP_SIZES>,
    /// Consecutive samples before a button level change is accepted
    pub debounce_samples: u8,
    /// Reverse the X encoder direction
    pub invert_x: bool,
    /// Reverse the Y encoder direction
    pub invert_y: bool,
}

impl Default for PendantConfig {
    fn default() -> Self {
        let mut step_sizes = Vec::new();
        for size in [1, 10, 100] {
            let _ = step_sizes.push(size);
        }
        Self {
            step_sizes,
            debounce_samples: DEFAULT_DEBOUNCE_SAMPLES,
            invert_x: false,
            invert_y: false,
        }
    }
}

impl PendantConfig {
    /// At least one step size, all of them positive
    pub fn is_valid(&self) -> bool {
        !self.step_sizes.is_empty() && self.step_sizes.iter().all(|s| *s > 0)
    }
}

/// One timer-tick snapshot of the pendant inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendantSample {
    /// X and Y encoder phases
    pub encoders: [Phase; ENCODERS],
    /// Raw pressed buttons, one [`Button::bit`] each
    pub pressed: u16,
}

impl PendantSample {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed & button.bit() != 0
    }
}

/// Pendant sampler, owned by the pendant timer interrupt
pub struct Pendant<'a> {
    port: PendantPort<'a>,
    config: PendantConfig,
    encoders: [QuadratureDecoder; ENCODERS],
    buttons: [Debouncer; Button::COUNT],
    step_index: usize,
}

impl<'a> Pendant<'a> {
    pub fn new(port: PendantPort<'a>, config: PendantConfig) -> Self {
        Self {
            port,
            config,
            encoders: [QuadratureDecoder::new(), QuadratureDecoder::new()],
            buttons: [Debouncer::new(); Button::COUNT],
            step_index: 0,
        }
    }

    /// Steps per click at the selected step size
    pub fn steps_per_click(&self) -> i32 {
        self.config
            .step_sizes
            .get(self.step_index)
            .copied()
            .unwrap_or(1)
    }

    /// Skipped-phase transitions ignored on `encoder` so far
    pub fn invalid_transitions(&self, encoder: usize) -> u16 {
        self.encoders
            .get(encoder)
            .map_or(0, QuadratureDecoder::invalid_transitions)
    }

    /// Read the pins and process the snapshot
    pub fn sample_pins<P: grbl_hal::InputPin>(&mut self, pins: &mut PendantPins<P>) {
        let sample = pins.snapshot();
        self.sample(&sample);
    }

    /// Process one snapshot
    pub fn sample(&mut self, sample: &PendantSample) {
        for (i, axis) in ENCODER_AXES.into_iter().enumerate() {
            let clicks = self.encoders[i].update(sample.encoders[i]).clicks();
            if clicks == 0 {
                continue;
            }
            let inverted = match axis {
                Axis::X => self.config.invert_x,
                _ => self.config.invert_y,
            };
            let clicks = if inverted { -clicks } else { clicks };
            self.port
                .push_delta(axis, clicks.saturating_mul(self.steps_per_click()));
        }

        for button in Button::ALL {
            let edge = self.buttons[button.index()]
                .update(sample.is_pressed(button), self.config.debounce_samples);
            if edge == Some(Edge::Pressed) {
                self.on_press(button);
            }
        }
    }

    fn on_press(&mut self, button: Button) {
        if let Some((axis, direction)) = button.jog() {
            self.port.push_delta(axis, direction * self.steps_per_click());
            return;
        }
        match button {
            Button::ZeroXy => self.port.request(PositionRequest::ZERO_XY),
            Button::ZeroZ => self.port.request(PositionRequest::ZERO_Z),
            Button::ZeroX => self.port.request(PositionRequest::ZERO_X),
            Button::ZeroY => self.port.request(PositionRequest::ZERO_Y),
            Button::HomeXy => self.port.request(PositionRequest::HOME_XY),
            Button::HomeZ => self.port.request(PositionRequest::HOME_Z),
            Button::GoToZero => self.port.request(PositionRequest::GO_TO_ZERO),
            Button::StepSize => {
                let count = self.config.step_sizes.len().max(1);
                self.step_index = (self.step_index + 1) % count;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::{AxisRequest, Realtime};

    fn sample_x(bits: u8) -> PendantSample {
        PendantSample {
            encoders: [Phase::from_bits(bits), Phase::default()],
            pressed: 0,
        }
    }

    fn press(pendant: &mut Pendant<'_>, button: Button) {
        let down = PendantSample {
            pressed: button.bit(),
            ..PendantSample::default()
        };
        for _ in 0..DEFAULT_DEBOUNCE_SAMPLES {
            pendant.sample(&down);
        }
        for _ in 0..DEFAULT_DEBOUNCE_SAMPLES {
            pendant.sample(&PendantSample::default());
        }
    }

    #[test]
    fn test_clicks_scale_by_step_size() {
        let rt = Realtime::new();
        let mut pendant = Pendant::new(rt.pendant(), PendantConfig::default());

        for bits in [0b00, 0b01, 0b11] {
            pendant.sample(&sample_x(bits));
        }
        assert_eq!(rt.pendant().pending(Axis::X), 2);
        assert!(rt.axis.peek().contains(AxisRequest::X));
        assert!(!rt.axis.peek().contains(AxisRequest::Y));
    }

    #[test]
    fn test_step_size_button_cycles() {
        let rt = Realtime::new();
        let mut pendant = Pendant::new(rt.pendant(), PendantConfig::default());
        assert_eq!(pendant.steps_per_click(), 1);

        press(&mut pendant, Button::StepSize);
        assert_eq!(pendant.steps_per_click(), 10);
        press(&mut pendant, Button::StepSize);
        assert_eq!(pendant.steps_per_click(), 100);
        press(&mut pendant, Button::StepSize);
        assert_eq!(pendant.steps_per_click(), 1);

        // Local only: no request bits
        assert!(rt.position.peek().is_empty());
    }

    #[test]
    fn test_buttons_raise_requests_once() {
        let rt = Realtime::new();
        let mut pendant = Pendant::new(rt.pendant(), PendantConfig::default());

        press(&mut pendant, Button::HomeZ);
        assert_eq!(rt.position.take(), PositionRequest::HOME_Z);

        // Still held: no repeat
        let held = PendantSample {
            pressed: Button::ZeroXy.bit(),
            ..PendantSample::default()
        };
        for _ in 0..10 {
            pendant.sample(&held);
        }
        assert_eq!(rt.position.take(), PositionRequest::ZERO_XY);
    }

    #[test]
    fn test_inverted_axis() {
        let rt = Realtime::new();
        let config = PendantConfig {
            invert_x: true,
            ..PendantConfig::default()
        };
        let mut pendant = Pendant::new(rt.pendant(), config);
        pendant.sample(&sample_x(0b00));
        pendant.sample(&sample_x(0b01));
        assert_eq!(rt.pendant().pending(Axis::X), -1);
    }

    #[test]
    fn test_jog_buttons_step_once_per_press() {
        let rt = Realtime::new();
        let mut pendant = Pendant::new(rt.pendant(), PendantConfig::default());
        press(&mut pendant, Button::StepSize);

        press(&mut pendant, Button::ZMinus);
        press(&mut pendant, Button::ZMinus);
        press(&mut pendant, Button::XPlus);

        assert_eq!(rt.axis.peek(), AxisRequest::X | AxisRequest::Z);
        assert_eq!(rt.jog.take(), [10, 0, -20]);
        assert!(rt.position.peek().is_empty());
    }

    #[test]
    fn test_zero_buttons_map_to_axes() {
        let rt = Realtime::new();
        let mut pendant = Pendant::new(rt.pendant(), PendantConfig::default());
        press(&mut pendant, Button::ZeroX);
        press(&mut pendant, Button::ZeroZ);
        press(&mut pendant, Button::HomeXy);
        assert_eq!(
            rt.position.take(),
            PositionRequest::ZERO_X | PositionRequest::ZERO_Z | PositionRequest::HOME_XY
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(PendantConfig::default().is_valid());
        let empty = PendantConfig {
            step_sizes: Vec::new(),
            ..PendantConfig::default()
        };
        assert!(!empty.is_valid());
    }
}
