//! Per-player instanced loot containers.
//!
//! A shared world container (a chest, a barrel) presents a different,
//! independently mutable inventory to every player who opens it, while
//! still behaving as one physical object for sounds, open/close viewer
//! counting, and persistence. This crate is that core: the per-player
//! view cache, the viewer-count state machine, the opened-player set,
//! and the NBT persistence for all of it. Rendering, placement geometry,
//! loot generation, and packet framing stay behind the [`LevelAccess`]
//! and [`LootRoller`] seams.

pub mod block_entity;
pub mod inventory;

mod error;
mod item_stack;
mod level;
mod sound;
mod tick_scheduler;

pub use error::LootError;
pub use item_stack::ItemStack;
pub use level::{GameMode, LevelAccess, LootRoller, PlayerProfile};
pub use sound::SoundEvent;
pub use tick_scheduler::{ContainerTickScheduler, ScheduledContainerTick};
