//! Shared per-player instancing state composed into every container kind.

use plunder_utils::BlockPos;
use simdnbt::owned::{NbtCompound, NbtList, NbtTag};
use uuid::Uuid;

use crate::error::LootError;
use crate::inventory::{InstancedInventory, InventoryCache};
use crate::item_stack::ItemStack;
use crate::level::{LevelAccess, LootRoller, PlayerProfile};

use super::loot_table::LootTableRef;
use super::opened_players::OpenedPlayerSet;
use super::viewer_count::{ContainerHooks, ViewerChange, ViewerCountTracker};

/// Namespace key holding all instanced state in a container's record.
const NBT_KEY: &str = "plunder";
const ITEMS_KEY: &str = "Items";
const SLOT_KEY: &str = "Slot";
const PLAYERS_KEY: &str = "players";

/// How often a viewed container re-validates its viewer set, in game
/// ticks.
pub const VIEWER_RECHECK_INTERVAL: u32 = 5;

/// Encodes all non-empty slots as a list of item compounds tagged with
/// their slot index. Empty slots are omitted, not written as
/// placeholders.
pub(crate) fn encode_slots(items: &[ItemStack]) -> NbtList {
    let mut entries = Vec::new();
    for (slot, stack) in items.iter().enumerate() {
        if stack.is_empty() {
            continue;
        }
        let mut item_nbt = stack.to_nbt();
        item_nbt.insert(SLOT_KEY, slot as i8);
        entries.push(item_nbt);
    }
    NbtList::Compound(entries)
}

/// Decodes a slot list into `size` slots, skipping malformed entries
/// and indices outside the container instead of erroring.
pub(crate) fn decode_slots(entries: &[NbtCompound], size: usize) -> Vec<ItemStack> {
    let mut items: Vec<ItemStack> = (0..size).map(|_| ItemStack::empty()).collect();
    for entry in entries {
        let slot = match entry.get(SLOT_KEY) {
            Some(NbtTag::Byte(slot)) => usize::from(*slot as u8),
            _ => continue,
        };
        if slot >= size {
            log::warn!("Skipping persisted item in out-of-range slot {slot} (container has {size} slots)");
            continue;
        }
        if let Some(stack) = ItemStack::from_nbt(entry) {
            items[slot] = stack;
        }
    }
    items
}

/// The per-player instancing state of one physical container.
///
/// Owns exactly one view cache, one opened-player set, and one viewer
/// tracker, plus the container's dirty flag and any pending loot-table
/// reference. Every concrete container kind (chest, barrel) composes one
/// of these and supplies its own side-effect hooks.
///
/// Not thread-safe by contract: all mutation happens on the simulation
/// thread; other layers read snapshots.
#[derive(Debug)]
pub struct LootContainerCommon {
    cache: InventoryCache,
    opened: OpenedPlayerSet,
    viewers: ViewerCountTracker,
    loot_table: Option<LootTableRef>,
    dirty: bool,
}

impl LootContainerCommon {
    /// Creates instancing state for a container with `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: InventoryCache::new(capacity),
            opened: OpenedPlayerSet::new(),
            viewers: ViewerCountTracker::new(),
            loot_table: None,
            dirty: false,
        }
    }

    /// The fixed slot count of every instanced view.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Returns the player's private view, materializing it from
    /// `template` on first open.
    ///
    /// Fails loudly when the loot table has not been rolled yet or the
    /// template does not fit the container; silently producing an empty
    /// view would look like a legitimately empty container to the
    /// player.
    pub fn get_or_create_instanced_inventory(
        &mut self,
        player: &PlayerProfile,
        template: &[ItemStack],
    ) -> Result<&mut InstancedInventory, LootError> {
        if let Some(loot) = &self.loot_table {
            return Err(LootError::UnrolledLootTable {
                table: loot.table.clone(),
            });
        }
        self.cache.get_or_create(player.id, template)
    }

    /// Read-only view lookup.
    #[must_use]
    pub fn instanced_inventory(&self, player: Uuid) -> Option<&InstancedInventory> {
        self.cache.get(player)
    }

    /// Mutable view lookup, no materialization.
    pub fn instanced_inventory_mut(&mut self, player: Uuid) -> Option<&mut InstancedInventory> {
        self.cache.get_mut(player)
    }

    /// Snapshot of every materialized view.
    #[must_use]
    pub fn all_instanced_inventories(&self) -> Vec<&InstancedInventory> {
        self.cache.all()
    }

    /// Returns whether the player has ever been granted this container's
    /// loot.
    #[must_use]
    pub fn has_player_opened(&self, player: Uuid) -> bool {
        self.opened.has_opened(player)
    }

    /// The current number of viewers.
    #[must_use]
    pub fn viewer_count(&self) -> u32 {
        self.viewers.viewer_count()
    }

    /// Empties the view cache. The opened-player memory deliberately
    /// survives a contents wipe.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// The pending loot-table reference, if the table has not been
    /// rolled yet.
    #[must_use]
    pub fn loot_table(&self) -> Option<&LootTableRef> {
        self.loot_table.as_ref()
    }

    /// Attaches an unrolled loot table.
    pub fn set_loot_table(&mut self, loot: LootTableRef) {
        self.loot_table = Some(loot);
        self.dirty = true;
    }

    /// Rolls a pending loot table into template contents and clears the
    /// reference. Returns `None` when no table was pending.
    pub fn unpack_loot_table(&mut self, roller: &dyn LootRoller) -> Option<Vec<ItemStack>> {
        let loot = self.loot_table.take()?;
        let items = roller.roll(&loot, self.cache.capacity());
        self.dirty = true;
        Some(items)
    }

    /// Handles a player opening the container.
    ///
    /// Spectators never count as viewers, but every opener (spectators
    /// included) is recorded in the opened set; the first-ever open
    /// raises the dirty flag and forces a state re-broadcast so nearby
    /// observers see the "already looted" appearance immediately.
    pub fn on_open(
        &mut self,
        player: &PlayerProfile,
        level: &dyn LevelAccess,
        pos: BlockPos,
        hooks: &dyn ContainerHooks,
    ) {
        if !player.is_spectator() {
            let change = self.viewers.open(player.id);
            Self::fire(change, hooks, level, pos);
            if change.container_opened() {
                level.schedule_container_tick(pos, VIEWER_RECHECK_INTERVAL);
            }
        }

        if self.opened.mark_opened(player.id) {
            self.dirty = true;
            level.update_listeners(pos);
        }
    }

    /// Handles a player closing the container. Unknown players and
    /// spectators are no-ops.
    pub fn on_close(
        &mut self,
        player: &PlayerProfile,
        level: &dyn LevelAccess,
        pos: BlockPos,
        hooks: &dyn ContainerHooks,
    ) {
        if player.is_spectator() {
            return;
        }
        let change = self.viewers.close(player.id);
        Self::fire(change, hooks, level, pos);
    }

    /// Periodic reconciliation of the viewer count.
    ///
    /// A player stays counted only while the level reports a UI backed
    /// by *this container's own* instanced inventory for that player; a
    /// UI of the same shape backed by some other inventory does not
    /// count. Players who vanished without a close call are dropped
    /// here, firing the close hook if that empties the container.
    pub fn on_scheduled_tick(
        &mut self,
        level: &dyn LevelAccess,
        pos: BlockPos,
        hooks: &dyn ContainerHooks,
    ) {
        let cache = &self.cache;
        let change = self.viewers.retain_viewing(|player| {
            cache
                .instance_id(player)
                .is_some_and(|instance| level.is_viewing_instance(player, instance))
        });
        Self::fire(change, hooks, level, pos);

        if change.new_count > 0 {
            level.schedule_container_tick(pos, VIEWER_RECHECK_INTERVAL);
        }
    }

    fn fire(
        change: ViewerChange,
        hooks: &dyn ContainerHooks,
        level: &dyn LevelAccess,
        pos: BlockPos,
    ) {
        if change.container_opened() {
            hooks.on_container_open(level, pos);
        }
        if change.container_closed() {
            hooks.on_container_close(level, pos);
        }
        if change.changed() {
            hooks.on_viewer_count_changed(level, pos, change.old_count, change.new_count);
        }
    }

    /// Returns whether the record needs persisting.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Raises the dirty flag.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Lowers the dirty flag; called after a successful save.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Folds per-view changed flags into the dirty flag, returning
    /// whether the record currently needs persisting.
    pub fn sweep_changed(&mut self) -> bool {
        if self.cache.sweep_changed() {
            self.dirty = true;
        }
        self.dirty
    }

    /// Writes all instanced state under the namespace key.
    ///
    /// When an unrolled loot table is pending, only the table reference
    /// is written and per-player state is skipped entirely.
    pub fn write_nbt(&self, nbt: &mut NbtCompound) {
        if LootTableRef::serialize(self.loot_table.as_ref(), nbt) {
            return;
        }

        let mut root = NbtCompound::new();
        for (player, view) in self.cache.iter() {
            let mut sub = NbtCompound::new();
            sub.insert(ITEMS_KEY, encode_slots(view.items()));
            root.insert(player.to_string(), NbtTag::Compound(sub));
        }

        let opened: Vec<simdnbt::Mutf8String> =
            self.opened.iter().map(|player| player.to_string().into()).collect();
        root.insert(PLAYERS_KEY, NbtTag::List(NbtList::String(opened)));

        nbt.insert(NBT_KEY, NbtTag::Compound(root));
    }

    /// Rebuilds all instanced state from a durable record.
    ///
    /// Existing cache, opened set, and viewers are dropped first (no
    /// viewer survives a reload). Unknown keys are ignored, out-of-range
    /// slots are skipped, and a missing namespace reads as "no cache, no
    /// opened set". A stored loot-table reference takes precedence and
    /// skips reconstruction entirely.
    pub fn read_nbt(&mut self, nbt: &NbtCompound) {
        self.cache.clear();
        self.opened.clear();
        self.viewers.reset();

        if let Some(loot) = LootTableRef::deserialize(nbt) {
            self.loot_table = Some(loot);
            return;
        }
        self.loot_table = None;

        let Some(NbtTag::Compound(root)) = nbt.get(NBT_KEY) else {
            return;
        };

        for (key, tag) in root.iter() {
            let key = key.to_str();
            if key == PLAYERS_KEY {
                continue;
            }
            let Ok(player) = Uuid::parse_str(&key) else {
                log::warn!("Ignoring unknown key {key:?} in container record");
                continue;
            };
            let NbtTag::Compound(sub) = tag else {
                continue;
            };

            let items = match sub.get(ITEMS_KEY) {
                Some(NbtTag::List(NbtList::Compound(entries))) => {
                    decode_slots(entries, self.cache.capacity())
                }
                _ => decode_slots(&[], self.cache.capacity()),
            };
            self.cache
                .insert_loaded(player, InstancedInventory::from_items(items));
        }

        if let Some(NbtTag::List(NbtList::String(players))) = root.get(PLAYERS_KEY) {
            for raw in players {
                match Uuid::parse_str(&raw.to_str()) {
                    Ok(player) => {
                        self.opened.mark_opened(player);
                    }
                    Err(_) => log::warn!("Ignoring malformed player id {raw:?} in container record"),
                }
            }
        }
    }
}
