//! Hardware abstraction for the kernel's pendant inputs
//!
//! The kernel never touches chip registers. Board crates hand it pins that
//! implement [`gpio::InputPin`], either directly or through the
//! [`gpio::HalInput`] adapter for any `embedded-hal` 1.0 input.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  grbl-core (pendant sampler)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  grbl-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board HAL / embedded-hal pins          │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{ActiveLow, HalInput, InputPin};
