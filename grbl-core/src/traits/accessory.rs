//! Spindle, coolant, door and sleep outputs

/// Coolant output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Coolant {
    Flood,
    Mist,
}

/// Accessory collaborator
pub trait Accessories {
    /// Check if the safety door input reads open
    fn door_ajar(&self) -> bool;

    /// Turn spindle and coolant off, remembering their state
    fn suspend(&mut self);

    /// Restore spindle and coolant to the state saved by [`suspend`](Self::suspend)
    fn restore(&mut self);

    /// Spindle-stop override during a feed hold
    fn set_spindle_stop(&mut self, stopped: bool);

    fn toggle_coolant(&mut self, coolant: Coolant);

    /// Disable steppers, spindle and coolant
    fn sleep(&mut self);
}
