//! Alarm reasons

/// Why the machine entered `Alarm`
///
/// Discriminants match the numeric codes reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AlarmCode {
    /// Hard limit switch tripped during motion
    HardLimit = 1,
    /// Programmed target exceeds machine travel
    SoftLimit = 2,
    /// Reset while in motion lost steps
    AbortCycle = 3,
    /// Probe was not in the expected state when the cycle started
    ProbeFailInitial = 4,
    /// Probing move finished its travel without contact
    ProbeFailContact = 5,
    /// Reset during the homing cycle
    HomingFailReset = 6,
    /// Safety door opened during the homing cycle
    HomingFailDoor = 7,
    /// Pull-off failed to clear the limit switch
    HomingFailPulloff = 8,
    /// Limit switch not found within the search travel
    HomingFailApproach = 9,
}

impl AlarmCode {
    /// Decode a register value; zero and unknown values are "no alarm"
    pub fn from_u8(value: u8) -> Option<Self> {
        use AlarmCode::*;

        let code = match value {
            1 => HardLimit,
            2 => SoftLimit,
            3 => AbortCycle,
            4 => ProbeFailInitial,
            5 => ProbeFailContact,
            6 => HomingFailReset,
            7 => HomingFailDoor,
            8 => HomingFailPulloff,
            9 => HomingFailApproach,
            _ => return None,
        };
        Some(code)
    }

    /// The machine position can no longer be trusted after this alarm
    pub fn invalidates_position(&self) -> bool {
        matches!(
            self,
            AlarmCode::HardLimit | AlarmCode::SoftLimit | AlarmCode::AbortCycle
        ) || self.is_homing_failure()
    }

    pub fn is_homing_failure(&self) -> bool {
        matches!(
            self,
            AlarmCode::HomingFailReset
                | AlarmCode::HomingFailDoor
                | AlarmCode::HomingFailPulloff
                | AlarmCode::HomingFailApproach
        )
    }

    /// Check if only a reset may leave this alarm
    pub fn is_critical(&self) -> bool {
        matches!(self, AlarmCode::HardLimit | AlarmCode::SoftLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_values() {
        assert_eq!(AlarmCode::from_u8(0), None);
        assert_eq!(AlarmCode::from_u8(1), Some(AlarmCode::HardLimit));
        assert_eq!(AlarmCode::from_u8(9), Some(AlarmCode::HomingFailApproach));
        assert_eq!(AlarmCode::from_u8(10), None);

        for value in 1..=9u8 {
            let code = AlarmCode::from_u8(value).unwrap();
            assert_eq!(code as u8, value);
        }
    }

    #[test]
    fn test_classification() {
        assert!(AlarmCode::HardLimit.invalidates_position());
        assert!(AlarmCode::HomingFailDoor.invalidates_position());
        assert!(!AlarmCode::ProbeFailContact.invalidates_position());
        assert!(AlarmCode::SoftLimit.is_critical());
        assert!(!AlarmCode::ProbeFailInitial.is_critical());
        assert!(!AlarmCode::AbortCycle.is_homing_failure());
    }
}
