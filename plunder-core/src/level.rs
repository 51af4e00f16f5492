//! Seams to the surrounding world.
//!
//! The core treats the world as an opaque collaborator: it asks it to
//! play sounds, re-broadcast block state, answer "is this player still
//! viewing this instance", and schedule recheck ticks. Everything else
//! (rendering, packets, placement) lives on the other side of
//! [`LevelAccess`].

use plunder_utils::{BlockPos, math::Vector3};
use uuid::Uuid;

use crate::block_entity::LootTableRef;
use crate::inventory::InstanceId;
use crate::item_stack::ItemStack;
use crate::sound::SoundEvent;

/// How a player interacts with the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Regular play.
    Survival,
    /// Creative play.
    Creative,
    /// Limited interaction.
    Adventure,
    /// Passive observation only; spectators never count as viewers.
    Spectator,
}

/// Identity and mode of a player interacting with a container.
///
/// Only the [`Uuid`] is identity; the display name is never used for
/// equality or as a cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    /// Stable unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current game mode.
    pub game_mode: GameMode,
}

impl PlayerProfile {
    /// Creates a profile.
    pub fn new(id: Uuid, name: impl Into<String>, game_mode: GameMode) -> Self {
        Self {
            id,
            name: name.into(),
            game_mode,
        }
    }

    /// Returns whether this player is a passive observer.
    #[must_use]
    pub fn is_spectator(&self) -> bool {
        self.game_mode == GameMode::Spectator
    }
}

/// World-side services a container needs for its side effects.
pub trait LevelAccess {
    /// Plays a sound at a point in the world.
    fn play_sound(&self, at: Vector3<f64>, sound: SoundEvent);

    /// Forces a re-broadcast of the block's state to nearby observers.
    ///
    /// Requesting a broadcast for state that is already correct is
    /// harmless; implementations must tolerate redundant calls.
    fn update_listeners(&self, pos: BlockPos);

    /// Returns whether `player` currently has a UI open that is backed
    /// by the instanced inventory identified by `instance`.
    ///
    /// A composite menu (the two halves of a double chest) answers true
    /// for either half's instance.
    fn is_viewing_instance(&self, player: Uuid, instance: InstanceId) -> bool;

    /// Asks the host scheduler to tick the container at `pos` again
    /// after `delay` game ticks. The core holds no timers of its own.
    fn schedule_container_tick(&self, pos: BlockPos, delay: u32);
}

/// The loot-table collaborator.
///
/// Rolls an unrolled table reference into concrete template contents.
/// The algorithm itself is external; the core only requests a roll when
/// unpacking a deferred reference.
pub trait LootRoller {
    /// Rolls `table` into exactly `size` slots of template contents.
    fn roll(&self, table: &LootTableRef, size: usize) -> Vec<ItemStack>;
}
