//! `$`-prefixed system commands that drive state transitions

/// System commands the kernel acts on
///
/// Settings and report queries (`$$`, `$#`, ...) are handled by the settings
/// and report collaborators and are not part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemCommand {
    /// `$X` - kill alarm lock
    Unlock,
    /// `$H` - run the homing cycle
    Home,
    /// `$C` - toggle g-code check mode
    CheckMode,
    /// `$SLP` - enter sleep
    Sleep,
}

impl SystemCommand {
    /// Parse a command line, ignoring surrounding whitespace and case
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let body = line.strip_prefix('$')?;

        if body.eq_ignore_ascii_case("X") {
            Some(SystemCommand::Unlock)
        } else if body.eq_ignore_ascii_case("H") {
            Some(SystemCommand::Home)
        } else if body.eq_ignore_ascii_case("C") {
            Some(SystemCommand::CheckMode)
        } else if body.eq_ignore_ascii_case("SLP") {
            Some(SystemCommand::Sleep)
        } else {
            None
        }
    }

}
