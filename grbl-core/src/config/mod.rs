//! Kernel configuration
//!
//! Configuration is stored by the settings collaborator as a framed
//! postcard blob (see [`settings`]).

pub mod settings;
pub mod types;

pub use settings::{SettingsError, SETTINGS_MAGIC, SETTINGS_VERSION};
pub use types::*;
