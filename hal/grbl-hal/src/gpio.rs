//! Digital input abstractions
//!
//! Pendant encoders and buttons are wired to pulled-up inputs, so a closed
//! contact reads low. [`ActiveLow`] flips that back into "asserted = true".

/// Digital input pin
///
/// Sampling takes `&mut self` so that `embedded-hal` inputs, which may need
/// exclusive access to read, can be adapted without interior mutability.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Input that reports `true` when the physical line is pulled low
///
/// Used for buttons wired between the pin and ground with the internal
/// pull-up enabled.
#[derive(Debug)]
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> ActiveLow<P> {
    /// Whether the contact is closed
    pub fn is_asserted(&mut self) -> bool {
        self.0.is_low()
    }
}

/// Adapter from an `embedded-hal` 1.0 digital input
///
/// A read error is reported as high, which for pulled-up inputs is the
/// released / idle level.
#[derive(Debug)]
pub struct HalInput<T>(pub T);

impl<T: embedded_hal::digital::InputPin> InputPin for HalInput<T> {
    fn is_high(&mut self) -> bool {
        self.0.is_high().unwrap_or(true)
    }
}
