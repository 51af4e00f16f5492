//! Barrel loot containers.
//!
//! Same instancing contract as the chest, without the composite-half
//! handling: a barrel is always a single block.

use plunder_utils::BlockPos;
use simdnbt::owned::{NbtCompound, NbtList, NbtTag};
use uuid::Uuid;

use crate::block_entity::common::{decode_slots, encode_slots};
use crate::block_entity::{ContainerHooks, LootContainerCommon, LootContainerEntity, LootTableRef};
use crate::error::LootError;
use crate::inventory::InstancedInventory;
use crate::item_stack::ItemStack;
use crate::level::{LevelAccess, LootRoller, PlayerProfile};
use crate::sound::SoundEvent;

/// Number of slots in a barrel.
pub const BARREL_SLOTS: usize = 27;

const ITEMS_KEY: &str = "Items";

struct BarrelSounds;

impl ContainerHooks for BarrelSounds {
    fn on_container_open(&self, level: &dyn LevelAccess, pos: BlockPos) {
        level.play_sound(pos.center(), SoundEvent::BarrelOpen);
    }

    fn on_container_close(&self, level: &dyn LevelAccess, pos: BlockPos) {
        level.play_sound(pos.center(), SoundEvent::BarrelClose);
    }
}

/// A barrel presenting per-player instanced contents.
#[derive(Debug)]
pub struct BarrelBlockEntity {
    pos: BlockPos,
    removed: bool,
    template: Vec<ItemStack>,
    common: LootContainerCommon,
}

impl BarrelBlockEntity {
    /// Creates an empty barrel at the given position.
    #[must_use]
    pub fn new(pos: BlockPos) -> Self {
        Self {
            pos,
            removed: false,
            template: (0..BARREL_SLOTS).map(|_| ItemStack::empty()).collect(),
            common: LootContainerCommon::new(BARREL_SLOTS),
        }
    }

    /// The canonical template contents.
    #[must_use]
    pub fn template(&self) -> &[ItemStack] {
        &self.template
    }

    /// Replaces the template contents.
    pub fn set_template(&mut self, items: Vec<ItemStack>) -> Result<(), LootError> {
        if items.len() != BARREL_SLOTS {
            return Err(LootError::MisconfiguredTemplate {
                expected: BARREL_SLOTS,
                found: items.len(),
            });
        }
        self.template = items;
        self.common.mark_dirty();
        Ok(())
    }
}

impl LootContainerEntity for BarrelBlockEntity {
    fn pos(&self) -> BlockPos {
        self.pos
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn set_removed(&mut self) {
        self.removed = true;
    }

    fn capacity(&self) -> usize {
        BARREL_SLOTS
    }

    fn container_name(&self) -> &str {
        "container.loot_barrel"
    }

    fn on_open(&mut self, player: &PlayerProfile, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_open(player, level, self.pos, &BarrelSounds);
    }

    fn on_close(&mut self, player: &PlayerProfile, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_close(player, level, self.pos, &BarrelSounds);
    }

    fn on_scheduled_tick(&mut self, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_scheduled_tick(level, self.pos, &BarrelSounds);
    }

    fn instanced_inventory_for(
        &mut self,
        player: &PlayerProfile,
    ) -> Result<&mut InstancedInventory, LootError> {
        self.common
            .get_or_create_instanced_inventory(player, &self.template)
    }

    fn instanced_inventory(&self, player: Uuid) -> Option<&InstancedInventory> {
        self.common.instanced_inventory(player)
    }

    fn all_instanced_inventories(&self) -> Vec<&InstancedInventory> {
        self.common.all_instanced_inventories()
    }

    fn has_player_opened(&self, player: Uuid) -> bool {
        self.common.has_player_opened(player)
    }

    fn clear_instanced(&mut self) {
        self.common.clear();
    }

    fn loot_table(&self) -> Option<&LootTableRef> {
        self.common.loot_table()
    }

    fn set_loot_table(&mut self, loot: LootTableRef) {
        self.common.set_loot_table(loot);
    }

    fn unpack_loot_table(&mut self, roller: &dyn LootRoller) {
        if let Some(items) = self.common.unpack_loot_table(roller) {
            self.template = items;
        }
    }

    fn save_nbt(&self, nbt: &mut NbtCompound) {
        if self.common.loot_table().is_some() {
            self.common.write_nbt(nbt);
            return;
        }
        nbt.insert(ITEMS_KEY, encode_slots(&self.template));
        self.common.write_nbt(nbt);
    }

    fn load_nbt(&mut self, nbt: &NbtCompound) {
        self.common.read_nbt(nbt);
        if self.common.loot_table().is_some() {
            return;
        }
        self.template = match nbt.get(ITEMS_KEY) {
            Some(NbtTag::List(NbtList::Compound(entries))) => decode_slots(entries, BARREL_SLOTS),
            _ => (0..BARREL_SLOTS).map(|_| ItemStack::empty()).collect(),
        };
    }

    fn is_dirty(&self) -> bool {
        self.common.is_dirty()
    }

    fn clear_dirty(&mut self) {
        self.common.clear_dirty();
    }
}
