//! Operating state machine
//!
//! A single enumerated system state decides which commands are admissible.
//! All transitions go through [`OperatingState::transition`].

pub mod alarm;
pub mod events;
pub mod machine;

pub use alarm::AlarmCode;
pub use events::Event;
pub use machine::OperatingState;
