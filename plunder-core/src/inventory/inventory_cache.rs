//! Lazily-materialized per-player inventory views.

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::error::LootError;
use crate::item_stack::ItemStack;

use super::instanced_inventory::{InstanceId, InstancedInventory};

/// Maps player identity to that player's instanced view of one container.
///
/// Entries are created on first open by deep-copying the container's
/// template; an entry exists iff the player has opened the container in
/// its current lifetime. Absent keys are a normal case, not an error.
#[derive(Debug)]
pub struct InventoryCache {
    capacity: usize,
    views: FxHashMap<Uuid, InstancedInventory>,
}

impl InventoryCache {
    /// Creates a cache whose views all have `capacity` slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            views: FxHashMap::default(),
        }
    }

    /// The fixed slot count of every view in this cache.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the player's view, cloning it from `template` first if the
    /// player has never opened this container.
    ///
    /// An existing view is returned unchanged; the template is only read
    /// on a miss, and never mutated. Fails with
    /// [`LootError::MisconfiguredTemplate`] when a view would have to be
    /// materialized from a template of the wrong size.
    pub fn get_or_create(
        &mut self,
        player: Uuid,
        template: &[ItemStack],
    ) -> Result<&mut InstancedInventory, LootError> {
        use std::collections::hash_map::Entry;

        match self.views.entry(player) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                if template.len() != self.capacity {
                    return Err(LootError::MisconfiguredTemplate {
                        expected: self.capacity,
                        found: template.len(),
                    });
                }
                Ok(entry.insert(InstancedInventory::cloned_from_template(template)))
            }
        }
    }

    /// Read-only lookup, no side effect.
    #[must_use]
    pub fn get(&self, player: Uuid) -> Option<&InstancedInventory> {
        self.views.get(&player)
    }

    /// Mutable lookup, no materialization.
    pub fn get_mut(&mut self, player: Uuid) -> Option<&mut InstancedInventory> {
        self.views.get_mut(&player)
    }

    /// The instance id of the player's view, if one exists.
    #[must_use]
    pub fn instance_id(&self, player: Uuid) -> Option<InstanceId> {
        self.views.get(&player).map(InstancedInventory::instance_id)
    }

    /// Snapshot of all current views, for bulk operations such as
    /// dropping every instanced view's contents when the container
    /// breaks.
    #[must_use]
    pub fn all(&self) -> Vec<&InstancedInventory> {
        self.views.values().collect()
    }

    /// Iterates over `(player, view)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &InstancedInventory)> {
        self.views.iter()
    }

    /// Inserts a view rebuilt by deserialization, replacing any existing
    /// entry for that player.
    pub(crate) fn insert_loaded(&mut self, player: Uuid, view: InstancedInventory) {
        self.views.insert(player, view);
    }

    /// Sweeps the per-view changed flags, returning true if any view was
    /// modified since the last sweep.
    pub fn sweep_changed(&mut self) -> bool {
        let mut any = false;
        for view in self.views.values_mut() {
            any |= view.take_changed();
        }
        any
    }

    /// Empties the mapping.
    pub fn clear(&mut self) {
        self.views.clear();
    }

    /// Number of materialized views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns true if no view has been materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
