//! Operator command vocabulary
//!
//! Two kinds of operator input reach the kernel from the serial link:
//!
//! - **Realtime commands**: single bytes picked out of the receive stream by
//!   the serial interrupt, never buffered with program lines. Each one maps to
//!   exactly one realtime flag bit in the kernel.
//! - **System commands**: `$`-prefixed lines (`$X`, `$H`, `$C`, `$SLP`) handled
//!   by the main loop between program lines.
//!
//! ```text
//!  serial RX ISR ──byte──► RealtimeCommand::from_byte ──► flag register
//!  line reader ──"$H"───► SystemCommand::parse ──────────► Kernel
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod realtime;
pub mod system;

pub use realtime::RealtimeCommand;
pub use system::SystemCommand;
