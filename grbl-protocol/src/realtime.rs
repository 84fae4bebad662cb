//! Realtime control characters

/// Commands carried by a single control character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RealtimeCommand {
    /// `?` - request a status report
    StatusReport,
    /// `~` - cycle start / resume
    CycleStart,
    /// `!` - feed hold
    FeedHold,
    /// Ctrl-X - soft reset
    Reset,
    /// Safety door opened (software door switch)
    SafetyDoor,
    /// Cancel the active jog
    JogCancel,
    FeedOverrideReset,
    FeedOverrideCoarsePlus,
    FeedOverrideCoarseMinus,
    FeedOverrideFinePlus,
    FeedOverrideFineMinus,
    RapidOverrideReset,
    RapidOverrideMedium,
    RapidOverrideLow,
    SpindleOverrideReset,
    SpindleOverrideCoarsePlus,
    SpindleOverrideCoarseMinus,
    SpindleOverrideFinePlus,
    SpindleOverrideFineMinus,
    /// Toggle spindle stop (only honoured during a feed hold)
    SpindleStop,
    /// Toggle flood coolant
    CoolantFloodToggle,
    /// Toggle mist coolant
    CoolantMistToggle,
}

// Wire format values
const CMD_STATUS_REPORT: u8 = b'?';
const CMD_CYCLE_START: u8 = b'~';
const CMD_FEED_HOLD: u8 = b'!';
const CMD_RESET: u8 = 0x18;
const CMD_SAFETY_DOOR: u8 = 0x84;
const CMD_JOG_CANCEL: u8 = 0x85;
const CMD_FEED_OVR_RESET: u8 = 0x90;
const CMD_FEED_OVR_COARSE_PLUS: u8 = 0x91;
const CMD_FEED_OVR_COARSE_MINUS: u8 = 0x92;
const CMD_FEED_OVR_FINE_PLUS: u8 = 0x93;
const CMD_FEED_OVR_FINE_MINUS: u8 = 0x94;
const CMD_RAPID_OVR_RESET: u8 = 0x95;
const CMD_RAPID_OVR_MEDIUM: u8 = 0x96;
const CMD_RAPID_OVR_LOW: u8 = 0x97;
const CMD_SPINDLE_OVR_RESET: u8 = 0x99;
const CMD_SPINDLE_OVR_COARSE_PLUS: u8 = 0x9A;
const CMD_SPINDLE_OVR_COARSE_MINUS: u8 = 0x9B;
const CMD_SPINDLE_OVR_FINE_PLUS: u8 = 0x9C;
const CMD_SPINDLE_OVR_FINE_MINUS: u8 = 0x9D;
const CMD_SPINDLE_OVR_STOP: u8 = 0x9E;
const CMD_COOLANT_FLOOD_TOGGLE: u8 = 0xA0;
const CMD_COOLANT_MIST_TOGGLE: u8 = 0xA1;

impl RealtimeCommand {
    /// Parse a received byte
    ///
    /// Returns `None` for bytes that belong to the normal line stream.
    pub fn from_byte(byte: u8) -> Option<Self> {
        use RealtimeCommand::*;

        let cmd = match byte {
            CMD_STATUS_REPORT => StatusReport,
            CMD_CYCLE_START => CycleStart,
            CMD_FEED_HOLD => FeedHold,
            CMD_RESET => Reset,
            CMD_SAFETY_DOOR => SafetyDoor,
            CMD_JOG_CANCEL => JogCancel,
            CMD_FEED_OVR_RESET => FeedOverrideReset,
            CMD_FEED_OVR_COARSE_PLUS => FeedOverrideCoarsePlus,
            CMD_FEED_OVR_COARSE_MINUS => FeedOverrideCoarseMinus,
            CMD_FEED_OVR_FINE_PLUS => FeedOverrideFinePlus,
            CMD_FEED_OVR_FINE_MINUS => FeedOverrideFineMinus,
            CMD_RAPID_OVR_RESET => RapidOverrideReset,
            CMD_RAPID_OVR_MEDIUM => RapidOverrideMedium,
            CMD_RAPID_OVR_LOW => RapidOverrideLow,
            CMD_SPINDLE_OVR_RESET => SpindleOverrideReset,
            CMD_SPINDLE_OVR_COARSE_PLUS => SpindleOverrideCoarsePlus,
            CMD_SPINDLE_OVR_COARSE_MINUS => SpindleOverrideCoarseMinus,
            CMD_SPINDLE_OVR_FINE_PLUS => SpindleOverrideFinePlus,
            CMD_SPINDLE_OVR_FINE_MINUS => SpindleOverrideFineMinus,
            CMD_SPINDLE_OVR_STOP => SpindleStop,
            CMD_COOLANT_FLOOD_TOGGLE => CoolantFloodToggle,
            CMD_COOLANT_MIST_TOGGLE => CoolantMistToggle,
            _ => return None,
        };
        Some(cmd)
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        use RealtimeCommand::*;

        match self {
            StatusReport => CMD_STATUS_REPORT,
            CycleStart => CMD_CYCLE_START,
            FeedHold => CMD_FEED_HOLD,
            Reset => CMD_RESET,
            SafetyDoor => CMD_SAFETY_DOOR,
            JogCancel => CMD_JOG_CANCEL,
            FeedOverrideReset => CMD_FEED_OVR_RESET,
            FeedOverrideCoarsePlus => CMD_FEED_OVR_COARSE_PLUS,
            FeedOverrideCoarseMinus => CMD_FEED_OVR_COARSE_MINUS,
            FeedOverrideFinePlus => CMD_FEED_OVR_FINE_PLUS,
            FeedOverrideFineMinus => CMD_FEED_OVR_FINE_MINUS,
            RapidOverrideReset => CMD_RAPID_OVR_RESET,
            RapidOverrideMedium => CMD_RAPID_OVR_MEDIUM,
            RapidOverrideLow => CMD_RAPID_OVR_LOW,
            SpindleOverrideReset => CMD_SPINDLE_OVR_RESET,
            SpindleOverrideCoarsePlus => CMD_SPINDLE_OVR_COARSE_PLUS,
            SpindleOverrideCoarseMinus => CMD_SPINDLE_OVR_COARSE_MINUS,
            SpindleOverrideFinePlus => CMD_SPINDLE_OVR_FINE_PLUS,
            SpindleOverrideFineMinus => CMD_SPINDLE_OVR_FINE_MINUS,
            SpindleStop => CMD_SPINDLE_OVR_STOP,
            CoolantFloodToggle => CMD_COOLANT_FLOOD_TOGGLE,
            CoolantMistToggle => CMD_COOLANT_MIST_TOGGLE,
        }
    }
}
