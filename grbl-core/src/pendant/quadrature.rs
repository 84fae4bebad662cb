//! Quadrature decoding
//!
//! Phase is the two-bit value `(A << 1) | B`. Moving forward walks the Gray
//! sequence `00 → 01 → 11 → 10 → 00`; every single-bit change is one click.
//! A two-bit change means a sample was skipped, the direction is unknown and
//! the transition is ignored.

/// Two-bit encoder phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase(u8);

impl Phase {
    pub fn from_pins(a: bool, b: bool) -> Self {
        Phase(((a as u8) << 1) | b as u8)
    }

    pub fn from_bits(bits: u8) -> Self {
        Phase(bits & 0b11)
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Decoded movement for one phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    None,
    Forward,
    Reverse,
    Invalid,
}

impl Step {
    /// Signed click count
    pub fn clicks(self) -> i32 {
        match self {
            Step::Forward => 1,
            Step::Reverse => -1,
            Step::None | Step::Invalid => 0,
        }
    }
}

/// Transition table indexed by `(last << 2) | current`
const TRANSITIONS: [Step; 16] = {
    use Step::*;
    [
        // last = 00
        None, Forward, Reverse, Invalid,
        // last = 01
        Reverse, None, Invalid, Forward,
        // last = 10
        Forward, Invalid, None, Reverse,
        // last = 11
        Invalid, Reverse, Forward, None,
    ]
};

/// Decoder for one encoder
#[derive(Debug, Clone, Default)]
pub struct QuadratureDecoder {
    last: Option<Phase>,
    invalid: u16,
}

impl QuadratureDecoder {
    pub const fn new() -> Self {
        Self {
            last: None,
            invalid: 0,
        }
    }

    /// Feed one sampled phase
    ///
    /// The first sample only latches the starting phase. After an invalid
    /// transition the decoder resynchronises on the new phase.
    pub fn update(&mut self, phase: Phase) -> Step {
        let step = match self.last {
            Some(last) => TRANSITIONS[((last.bits() << 2) | phase.bits()) as usize],
            None => Step::None,
        };
        if step == Step::Invalid {
            self.invalid = self.invalid.saturating_add(1);
        }
        self.last = Some(phase);
        step
    }

    /// Number of skipped-phase transitions seen
    pub fn invalid_transitions(&self) -> u16 {
        self.invalid
    }
}
