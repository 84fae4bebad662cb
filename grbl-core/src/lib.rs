//! Realtime coordination kernel for a CNC motion controller
//!
//! This crate contains the layer that makes the motion subsystems cooperate
//! safely. It does not parse g-code, plan velocity profiles or generate step
//! pulses; those are collaborators reached through [`traits`].
//!
//! - Realtime flag registers written from interrupts, drained by the main loop
//! - Manual pendant input (quadrature encoders and debounced buttons)
//! - Feed / rapid / spindle override percentages
//! - Machine and probe position tracking
//! - The operating state machine
//! - The power-up / abort reset sequence
//!
//! ```text
//!  ISRs ──set──► Realtime (atomics) ──drain──► Kernel ──► Machine collaborators
//!   stepper, limits, probe,                     │
//!   pendant timer, serial RX                    └──► MainLoop collaborator
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

mod fmt;

pub mod config;
pub mod kernel;
pub mod motion;
pub mod overrides;
pub mod pendant;
pub mod realtime;
pub mod reset;
pub mod state;
pub mod traits;

pub use kernel::{Control, Kernel};
pub use realtime::Realtime;
pub use state::{AlarmCode, OperatingState};
