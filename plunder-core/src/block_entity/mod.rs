//! Loot container block entities and their shared instancing state.

mod common;
pub mod entities;
mod loot_table;
mod opened_players;
mod viewer_count;

pub use common::{LootContainerCommon, VIEWER_RECHECK_INTERVAL};
pub use loot_table::LootTableRef;
pub use opened_players::OpenedPlayerSet;
pub use viewer_count::{ContainerHooks, ViewerChange, ViewerCountTracker};

use plunder_utils::BlockPos;
use simdnbt::owned::NbtCompound;
use uuid::Uuid;

use crate::error::LootError;
use crate::inventory::InstancedInventory;
use crate::level::{LevelAccess, LootRoller, PlayerProfile};

/// The capability every instanced container kind exposes.
///
/// Chests, barrels, and any future shape implement this one interface;
/// placement geometry and rendering differ per kind, the instancing
/// contract does not. Placement and presentation code should depend on
/// this trait, never on a concrete kind.
pub trait LootContainerEntity {
    /// Where the container sits in the world.
    fn pos(&self) -> BlockPos;

    /// Returns whether the container has been removed from the world.
    fn is_removed(&self) -> bool;

    /// Marks the container as removed; all further open/close/tick
    /// calls become no-ops.
    fn set_removed(&mut self);

    /// The fixed slot count of this container.
    fn capacity(&self) -> usize;

    /// Translation key of the container's display name.
    fn container_name(&self) -> &str;

    /// Handles a player opening the container.
    fn on_open(&mut self, player: &PlayerProfile, level: &dyn LevelAccess);

    /// Handles a player closing the container.
    fn on_close(&mut self, player: &PlayerProfile, level: &dyn LevelAccess);

    /// Periodic viewer-count reconciliation, driven by the host
    /// scheduler.
    fn on_scheduled_tick(&mut self, level: &dyn LevelAccess);

    /// Returns the player's private view, materializing it from the
    /// container's template on first open.
    fn instanced_inventory_for(
        &mut self,
        player: &PlayerProfile,
    ) -> Result<&mut InstancedInventory, LootError>;

    /// Read-only lookup of an already-materialized view.
    fn instanced_inventory(&self, player: Uuid) -> Option<&InstancedInventory>;

    /// Snapshot of every materialized view, e.g. for dropping all
    /// instanced contents when the container breaks.
    fn all_instanced_inventories(&self) -> Vec<&InstancedInventory>;

    /// Returns whether the player has ever been granted this
    /// container's loot.
    fn has_player_opened(&self, player: Uuid) -> bool;

    /// Empties every instanced view. The opened-player memory survives.
    fn clear_instanced(&mut self);

    /// The pending loot-table reference, if any.
    fn loot_table(&self) -> Option<&LootTableRef>;

    /// Attaches an unrolled loot table to roll on first use.
    fn set_loot_table(&mut self, loot: LootTableRef);

    /// Rolls a pending loot table into the container's template via the
    /// external collaborator. A no-op when no table is pending.
    fn unpack_loot_table(&mut self, roller: &dyn LootRoller);

    /// Serializes the container into a durable record.
    fn save_nbt(&self, nbt: &mut NbtCompound);

    /// Rebuilds the container from a durable record.
    fn load_nbt(&mut self, nbt: &NbtCompound);

    /// Returns whether the container needs persisting.
    fn is_dirty(&self) -> bool;

    /// Lowers the dirty flag after a successful save.
    fn clear_dirty(&mut self);
}
