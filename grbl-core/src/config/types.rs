//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::overrides::OverrideLimits;
use crate::pendant::PendantConfig;
use crate::state::OperatingState;

/// Homing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingPolicy {
    /// A homing cycle is available
    pub enabled: bool,
    /// Lock motion after every reset until a homing cycle has succeeded
    pub lock_until_homed: bool,
}

impl HomingPolicy {
    /// Check if resets must force `Alarm` until homed
    pub fn required(&self) -> bool {
        self.enabled && self.lock_until_homed
    }
}

/// Kernel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KernelConfig {
    pub homing: HomingPolicy,
    /// Enter `Alarm` on every cold boot regardless of homing
    pub force_alarm_at_power_up: bool,
    /// Zero the machine position on aborts too, not only at power-up
    pub clear_position_on_abort: bool,
    pub overrides: OverrideLimits,
    pub pendant: PendantConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            homing: HomingPolicy {
                enabled: false,
                lock_until_homed: true,
            },
            force_alarm_at_power_up: false,
            clear_position_on_abort: false,
            overrides: OverrideLimits::default(),
            pendant: PendantConfig::default(),
        }
    }
}

impl KernelConfig {
    /// State entered on a cold boot, before the homing lock is applied
    pub fn power_up_state(&self) -> OperatingState {
        if self.force_alarm_at_power_up {
            OperatingState::Alarm
        } else {
            OperatingState::Idle
        }
    }

    /// Check every nested section for consistency
    pub fn is_valid(&self) -> bool {
        self.overrides.is_valid() && self.pendant.is_valid()
    }
}
