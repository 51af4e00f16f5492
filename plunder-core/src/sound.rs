//! Sound events fired by container side effects.

/// A container sound event.
///
/// The core only decides *when* a sound plays; translating the event into
/// actual audio is up to the level implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    /// A chest lid opening.
    ChestOpen,
    /// A chest lid closing.
    ChestClose,
    /// A barrel opening.
    BarrelOpen,
    /// A barrel closing.
    BarrelClose,
}
