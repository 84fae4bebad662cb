//! Runtime override percentages
//!
//! Feed, rapid and spindle overrides scale commanded motion at runtime. They
//! only change in response to override request bits and always stay inside
//! their configured bounds.

pub mod controller;

pub use controller::{OverrideController, OverrideLimits, Overrides, DEFAULT_OVERRIDE};
