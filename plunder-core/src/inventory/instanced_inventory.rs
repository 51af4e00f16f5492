//! One player's private view of a shared container.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::item_stack::ItemStack;

use super::Container;

/// Stable identity token for one instanced view.
///
/// Viewer reconciliation compares these instead of live UI object
/// identity: the presentation layer records which instance id backs a
/// player's open menu, and the container checks the id still matches its
/// own cached view for that player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A fixed-capacity inventory holding one player's view of a container.
///
/// The slot count is set at creation and never changes. Mutations flip a
/// `changed` flag that the owning container sweeps to drive its own
/// dirty-marking; there is no back-pointer to the owner.
#[derive(Debug)]
pub struct InstancedInventory {
    id: InstanceId,
    items: Vec<ItemStack>,
    changed: bool,
}

impl InstancedInventory {
    /// Creates an empty view with the given number of slots.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            id: InstanceId::next(),
            items: (0..size).map(|_| ItemStack::empty()).collect(),
            changed: false,
        }
    }

    /// Creates a view by deep-copying every slot of `template`.
    ///
    /// The copy is by value; later changes to the template never reach
    /// this view, and changes to this view never reach the template.
    #[must_use]
    pub fn cloned_from_template(template: &[ItemStack]) -> Self {
        Self {
            id: InstanceId::next(),
            items: template.to_vec(),
            changed: false,
        }
    }

    /// Rebuilds a view from deserialized slots.
    pub(crate) fn from_items(items: Vec<ItemStack>) -> Self {
        Self {
            id: InstanceId::next(),
            items,
            changed: false,
        }
    }

    /// This view's identity token.
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    /// All slots in order.
    #[must_use]
    pub fn items(&self) -> &[ItemStack] {
        &self.items
    }

    /// Returns whether the view has been modified since the last sweep.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Returns the changed flag and clears it.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl Container for InstancedInventory {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn get_item(&self, slot: usize) -> &ItemStack {
        &self.items[slot]
    }

    fn get_item_mut(&mut self, slot: usize) -> &mut ItemStack {
        &mut self.items[slot]
    }

    fn set_item(&mut self, slot: usize, item: ItemStack) {
        self.items[slot] = item;
        self.set_changed();
    }

    fn set_changed(&mut self) {
        self.changed = true;
    }

    fn clear(&mut self) {
        for item in &mut self.items {
            *item = ItemStack::empty();
        }
        self.set_changed();
    }
}
