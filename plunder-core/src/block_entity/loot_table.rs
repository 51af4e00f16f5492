//! Deferred loot-table references.

use plunder_utils::ResourceLocation;
use simdnbt::owned::{NbtCompound, NbtTag};

const LOOT_TABLE_KEY: &str = "LootTable";
const LOOT_TABLE_SEED_KEY: &str = "LootTableSeed";

/// A loot table that has not been rolled into concrete contents yet.
///
/// While a container holds one of these, its durable record stores only
/// the reference; per-player state does not exist until the loot
/// collaborator rolls the table into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootTableRef {
    /// The loot table to roll.
    pub table: ResourceLocation,
    /// Roll seed; 0 means "pick one at roll time".
    pub seed: i64,
}

impl LootTableRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(table: ResourceLocation, seed: i64) -> Self {
        Self { table, seed }
    }

    /// Writes the reference, if any. Returns true when a reference was
    /// written, in which case the caller must not write contents.
    pub(crate) fn serialize(this: Option<&LootTableRef>, nbt: &mut NbtCompound) -> bool {
        let Some(loot) = this else {
            return false;
        };
        nbt.insert(LOOT_TABLE_KEY, NbtTag::String(loot.table.to_string().into()));
        if loot.seed != 0 {
            nbt.insert(LOOT_TABLE_SEED_KEY, NbtTag::Long(loot.seed));
        }
        true
    }

    /// Reads a reference back, if one is present. A missing seed reads
    /// as 0.
    pub(crate) fn deserialize(nbt: &NbtCompound) -> Option<LootTableRef> {
        let table = match nbt.get(LOOT_TABLE_KEY) {
            Some(NbtTag::String(id)) => id.to_str().parse().ok()?,
            _ => return None,
        };
        let seed = match nbt.get(LOOT_TABLE_SEED_KEY) {
            Some(NbtTag::Long(seed)) => *seed,
            _ => 0,
        };
        Some(LootTableRef { table, seed })
    }
}
