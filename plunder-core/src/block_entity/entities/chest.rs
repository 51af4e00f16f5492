//! Chest loot containers.

use plunder_utils::{BlockPos, Direction};
use simdnbt::owned::{NbtCompound, NbtList, NbtTag};
use uuid::Uuid;

use crate::block_entity::common::{decode_slots, encode_slots};
use crate::block_entity::{ContainerHooks, LootContainerCommon, LootContainerEntity, LootTableRef};
use crate::error::LootError;
use crate::inventory::InstancedInventory;
use crate::item_stack::ItemStack;
use crate::level::{LevelAccess, LootRoller, PlayerProfile};
use crate::sound::SoundEvent;

/// Number of slots in a single chest.
pub const CHEST_SLOTS: usize = 27;

const ITEMS_KEY: &str = "Items";

/// Which half of a possibly-double chest a block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChestType {
    /// A lone chest.
    #[default]
    Single,
    /// The left half of a double chest. Never the sound source.
    Left,
    /// The right half of a double chest; the canonical half.
    Right,
}

/// Sound side effects for a chest.
#[derive(Debug, Clone, Copy)]
struct ChestSounds {
    chest_type: ChestType,
    facing: Direction,
}

impl ChestSounds {
    fn play(&self, level: &dyn LevelAccess, pos: BlockPos, sound: SoundEvent) {
        // One logical double container must not trigger twice: the left
        // half stays silent and the right half centers the sound on the
        // seam between the halves.
        if self.chest_type == ChestType::Left {
            return;
        }
        let mut at = pos.center();
        if self.chest_type == ChestType::Right {
            let (dx, _, dz) = self.facing.counter_clockwise().offset();
            at.x += f64::from(dx) * 0.5;
            at.z += f64::from(dz) * 0.5;
        }
        level.play_sound(at, sound);
    }
}

impl ContainerHooks for ChestSounds {
    fn on_container_open(&self, level: &dyn LevelAccess, pos: BlockPos) {
        self.play(level, pos, SoundEvent::ChestOpen);
    }

    fn on_container_close(&self, level: &dyn LevelAccess, pos: BlockPos) {
        self.play(level, pos, SoundEvent::ChestClose);
    }
}

/// A chest presenting per-player instanced contents.
///
/// The template holds the canonical post-loot-roll contents every
/// player's first view is cloned from; the template itself is never
/// handed to a player.
#[derive(Debug)]
pub struct ChestBlockEntity {
    pos: BlockPos,
    sounds: ChestSounds,
    removed: bool,
    template: Vec<ItemStack>,
    common: LootContainerCommon,
}

impl ChestBlockEntity {
    /// Creates an empty chest at the given position.
    #[must_use]
    pub fn new(pos: BlockPos, chest_type: ChestType, facing: Direction) -> Self {
        Self {
            pos,
            sounds: ChestSounds { chest_type, facing },
            removed: false,
            template: (0..CHEST_SLOTS).map(|_| ItemStack::empty()).collect(),
            common: LootContainerCommon::new(CHEST_SLOTS),
        }
    }

    /// Which half of a double chest this block is.
    #[must_use]
    pub fn chest_type(&self) -> ChestType {
        self.sounds.chest_type
    }

    /// The direction the chest front faces.
    #[must_use]
    pub fn facing(&self) -> Direction {
        self.sounds.facing
    }

    /// The canonical template contents.
    #[must_use]
    pub fn template(&self) -> &[ItemStack] {
        &self.template
    }

    /// Replaces the template contents, e.g. after an external loot roll.
    pub fn set_template(&mut self, items: Vec<ItemStack>) -> Result<(), LootError> {
        if items.len() != CHEST_SLOTS {
            return Err(LootError::MisconfiguredTemplate {
                expected: CHEST_SLOTS,
                found: items.len(),
            });
        }
        self.template = items;
        self.common.mark_dirty();
        Ok(())
    }
}

impl LootContainerEntity for ChestBlockEntity {
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
        CHEST_SLOTS
    }

    fn container_name(&self) -> &str {
        "container.loot_chest"
    }

    fn on_open(&mut self, player: &PlayerProfile, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_open(player, level, self.pos, &self.sounds);
    }

    fn on_close(&mut self, player: &PlayerProfile, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_close(player, level, self.pos, &self.sounds);
    }

    fn on_scheduled_tick(&mut self, level: &dyn LevelAccess) {
        if self.removed {
            return;
        }
        self.common.on_scheduled_tick(level, self.pos, &self.sounds);
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
            Some(NbtTag::List(NbtList::Compound(entries))) => decode_slots(entries, CHEST_SLOTS),
            _ => (0..CHEST_SLOTS).map(|_| ItemStack::empty()).collect(),
        };
    }

    fn is_dirty(&self) -> bool {
        self.common.is_dirty()
    }

    fn clear_dirty(&mut self) {
        self.common.clear_dirty();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use plunder_utils::{ResourceLocation, math::Vector3};
    use rustc_hash::FxHashMap;
    use uuid::Uuid;

    use crate::inventory::{Container, InstanceId};
    use crate::level::GameMode;

    use super::*;

    const ALICE: Uuid = Uuid::from_u128(0xA11CE);
    const POS: BlockPos = BlockPos::new(10, 70, 10);

    fn alice() -> PlayerProfile {
        PlayerProfile::new(ALICE, "alice", GameMode::Survival)
    }

    #[derive(Default)]
    struct TestLevel {
        sounds: RefCell<Vec<(Vector3<f64>, SoundEvent)>>,
        viewing: RefCell<FxHashMap<Uuid, InstanceId>>,
    }

    impl LevelAccess for TestLevel {
        fn play_sound(&self, at: Vector3<f64>, sound: SoundEvent) {
            self.sounds.borrow_mut().push((at, sound));
        }

        fn update_listeners(&self, _pos: BlockPos) {}

        fn is_viewing_instance(&self, player: Uuid, instance: InstanceId) -> bool {
            self.viewing.borrow().get(&player) == Some(&instance)
        }

        fn schedule_container_tick(&self, _pos: BlockPos, _delay: u32) {}
    }

    fn template() -> Vec<ItemStack> {
        let mut items = vec![ItemStack::empty(); CHEST_SLOTS];
        items[0] = ItemStack::new(ResourceLocation::vanilla_static("stone"), 3);
        items
    }

    #[test]
    fn test_single_chest_sound_at_center() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        let level = TestLevel::default();

        chest.on_open(&alice(), &level);
        let sounds = level.sounds.borrow();
        assert_eq!(sounds.as_slice(), &[(POS.center(), SoundEvent::ChestOpen)]);
    }

    #[test]
    fn test_left_half_is_silent() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Left, Direction::North);
        let level = TestLevel::default();

        chest.on_open(&alice(), &level);
        chest.on_close(&alice(), &level);
        assert!(level.sounds.borrow().is_empty());
    }

    #[test]
    fn test_right_half_offsets_toward_seam() {
        // A north-facing right half connects to its partner on the west.
        let mut chest = ChestBlockEntity::new(POS, ChestType::Right, Direction::North);
        let level = TestLevel::default();

        chest.on_open(&alice(), &level);
        let expected = Vector3::new(POS.center().x - 0.5, POS.center().y, POS.center().z);
        assert_eq!(level.sounds.borrow()[0].0, expected);
    }

    #[test]
    fn test_removed_chest_ignores_interactions() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        let level = TestLevel::default();

        chest.set_removed();
        chest.on_open(&alice(), &level);
        assert!(level.sounds.borrow().is_empty());
        assert!(!chest.has_player_opened(ALICE));
    }

    #[test]
    fn test_view_materializes_from_template() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        chest.set_template(template()).expect("fits");

        let view = chest.instanced_inventory_for(&alice()).expect("materializes");
        assert_eq!(view.get_item(0).count(), 3);

        // The view is private: emptying it leaves the template intact.
        view.set_item(0, ItemStack::empty());
        assert_eq!(chest.template()[0].count(), 3);
    }

    #[test]
    fn test_template_size_is_enforced() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        let err = chest.set_template(vec![]).expect_err("wrong size");
        assert!(matches!(err, LootError::MisconfiguredTemplate { .. }));
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        let level = TestLevel::default();
        chest.set_template(template()).expect("fits");
        chest.on_open(&alice(), &level);
        chest
            .instanced_inventory_for(&alice())
            .expect("materializes")
            .set_item(5, ItemStack::new(ResourceLocation::vanilla_static("diamond"), 2));

        let mut nbt = NbtCompound::new();
        chest.save_nbt(&mut nbt);

        let mut restored = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        restored.load_nbt(&nbt);

        assert_eq!(restored.template(), chest.template());
        assert!(restored.has_player_opened(ALICE));
        let view = restored.instanced_inventory(ALICE).expect("present");
        assert_eq!(view.get_item(5).count(), 2);
        assert_eq!(view.get_item(0).count(), 3);
    }

    #[test]
    fn test_loot_table_defers_template() {
        let mut chest = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        chest.set_loot_table(LootTableRef::new(
            ResourceLocation::vanilla_static("chests/simple_dungeon"),
            7,
        ));

        // Materializing without rolling is an integration error.
        assert!(chest.instanced_inventory_for(&alice()).is_err());

        // Saving while unrolled stores only the reference.
        let mut nbt = NbtCompound::new();
        chest.save_nbt(&mut nbt);
        assert!(nbt.get(ITEMS_KEY).is_none());

        let mut restored = ChestBlockEntity::new(POS, ChestType::Single, Direction::North);
        restored.load_nbt(&nbt);
        assert_eq!(restored.loot_table(), chest.loot_table());

        struct FixedRoller;
        impl LootRoller for FixedRoller {
            fn roll(&self, _table: &LootTableRef, size: usize) -> Vec<ItemStack> {
                let mut items = vec![ItemStack::empty(); size];
                items[1] = ItemStack::new(ResourceLocation::vanilla_static("emerald"), 5);
                items
            }
        }

        restored.unpack_loot_table(&FixedRoller);
        assert!(restored.loot_table().is_none());
        let view = restored.instanced_inventory_for(&alice()).expect("materializes");
        assert_eq!(view.get_item(1).count(), 5);
    }
}
