//! Pin sampling for the pendant

use grbl_hal::{ActiveLow, InputPin};

use super::button::Button;
use super::quadrature::Phase;
use super::PendantSample;

/// Encoder channels and buttons, all on pulled-up inputs
pub struct PendantPins<P> {
    pub x_a: P,
    pub x_b: P,
    pub y_a: P,
    pub y_b: P,
    /// Indexed by [`Button::index`]
    pub buttons: [ActiveLow<P>; Button::COUNT],
}

impl<P: InputPin> PendantPins<P> {
    /// Read every pendant input once
    pub fn snapshot(&mut self) -> PendantSample {
        let x = Phase::from_pins(self.x_a.is_high(), self.x_b.is_high());
        let y = Phase::from_pins(self.y_a.is_high(), self.y_b.is_high());

        let mut pressed = 0u16;
        for button in Button::ALL {
            if self.buttons[button.index()].is_asserted() {
                pressed |= button.bit();
            }
        }

        PendantSample {
            encoders: [x, y],
            pressed,
        }
    }
}
