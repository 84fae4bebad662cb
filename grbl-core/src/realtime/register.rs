//! Atomic flag registers
//!
//! Writer and clearer roles are fixed:
//!
//! - Interrupt contexts only OR bits in, through a [`FlagSetter`].
//! - The main loop is the only clearer. It either peeks and then clears
//!   exactly the bits it processed, or swaps the whole register to zero.
//!   Both clears are a single atomic operation, so a bit set between the
//!   read and the clear is never lost.

use core::marker::PhantomData;

use bitflags::Flags;
use portable_atomic::{AtomicU8, Ordering};

use crate::state::AlarmCode;

/// One realtime register holding a set of `F` flags
pub struct FlagRegister<F> {
    bits: AtomicU8,
    _flags: PhantomData<fn() -> F>,
}

impl<F: Flags<Bits = u8> + Copy> Default for FlagRegister<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Flags<Bits = u8> + Copy> FlagRegister<F> {
    /// Create an empty register
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
            _flags: PhantomData,
        }
    }

    /// Interrupt-side handle that can only set bits
    pub fn setter(&self) -> FlagSetter<'_, F> {
        FlagSetter { register: self }
    }

    /// Read the pending flags without clearing them
    pub fn peek(&self) -> F {
        F::from_bits_retain(self.bits.load(Ordering::Acquire))
    }

    /// Clear exactly the `processed` bits, leaving any others pending
    pub fn clear(&self, processed: F) {
        self.bits.fetch_and(!processed.bits(), Ordering::AcqRel);
    }

    /// Take every pending flag, leaving the register empty
    pub fn take(&self) -> F {
        F::from_bits_retain(self.bits.swap(0, Ordering::AcqRel))
    }

    fn set(&self, flags: F) {
        self.bits.fetch_or(flags.bits(), Ordering::AcqRel);
    }
}

/// Set-only view of a [`FlagRegister`] handed to an interrupt context
pub struct FlagSetter<'a, F> {
    register: &'a FlagRegister<F>,
}

impl<F> Clone for FlagSetter<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSetter<'_, F> {}

impl<F: Flags<Bits = u8> + Copy> FlagSetter<'_, F> {
    /// Atomically OR `flags` into the register
    pub fn set(&self, flags: F) {
        self.register.set(flags);
    }
}

/// Alarm code register
///
/// Holds at most one [`AlarmCode`]; zero means no alarm. The first alarm
/// raised since the last drain wins, later ones are dropped until the main
/// loop has taken the first.
pub struct AlarmRegister {
    code: AtomicU8,
}

impl Default for AlarmRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmRegister {
    pub const fn new() -> Self {
        Self {
            code: AtomicU8::new(0),
        }
    }

    /// Interrupt-side handle that can only raise alarms
    pub fn setter(&self) -> AlarmSetter<'_> {
        AlarmSetter { register: self }
    }

    /// Pending alarm, if any, without clearing it
    pub fn peek(&self) -> Option<AlarmCode> {
        AlarmCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Take the pending alarm, leaving the register empty
    pub fn take(&self) -> Option<AlarmCode> {
        AlarmCode::from_u8(self.code.swap(0, Ordering::AcqRel))
    }

    fn raise(&self, code: AlarmCode) -> bool {
        self.code
            .compare_exchange(0, code as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Raise-only view of the [`AlarmRegister`]
#[derive(Clone, Copy)]
pub struct AlarmSetter<'a> {
    register: &'a AlarmRegister,
}

impl AlarmSetter<'_> {
    /// Raise `code`; returns false if another alarm is already pending
    pub fn raise(&self, code: AlarmCode) -> bool {
        self.register.raise(code)
    }
}
