//! Concrete loot container kinds.

mod barrel;
mod chest;

pub use barrel::{BARREL_SLOTS, BarrelBlockEntity};
pub use chest::{CHEST_SLOTS, ChestBlockEntity, ChestType};
