//! Item stacks stored in container slots.

use plunder_utils::ResourceLocation;
use simdnbt::owned::{NbtCompound, NbtTag};

/// A stack of items: a kind, a count, and optional component data.
///
/// Component data is carried as an opaque NBT compound; this crate never
/// inspects it, only copies and round-trips it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemStack {
    item: Option<ResourceLocation>,
    count: i32,
    components: Option<NbtCompound>,
}

impl ItemStack {
    /// Returns the empty stack.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a stack of `count` items of the given kind.
    #[must_use]
    pub fn new(item: ResourceLocation, count: i32) -> Self {
        Self {
            item: Some(item),
            count,
            components: None,
        }
    }

    /// Creates a stack carrying component data.
    #[must_use]
    pub fn with_components(item: ResourceLocation, count: i32, components: NbtCompound) -> Self {
        Self {
            item: Some(item),
            count,
            components: Some(components),
        }
    }

    /// Returns true if this stack holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item.is_none() || self.count <= 0
    }

    /// The item kind, if any.
    #[must_use]
    pub fn item(&self) -> Option<&ResourceLocation> {
        self.item.as_ref()
    }

    /// The component data, if any.
    #[must_use]
    pub fn components(&self) -> Option<&NbtCompound> {
        self.components.as_ref()
    }

    /// The number of items in the stack.
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Sets the count, collapsing to the empty stack at zero or below.
    pub fn set_count(&mut self, count: i32) {
        self.count = count;
        if self.count <= 0 {
            *self = Self::empty();
        }
    }

    /// Adds `amount` items to the stack.
    pub fn grow(&mut self, amount: i32) {
        self.set_count(self.count + amount);
    }

    /// Removes `amount` items from the stack.
    pub fn shrink(&mut self, amount: i32) {
        self.grow(-amount);
    }

    /// Splits off up to `count` items into a new stack.
    #[must_use]
    pub fn split(&mut self, count: i32) -> ItemStack {
        let take = count.min(self.count);
        if take <= 0 || self.is_empty() {
            return ItemStack::empty();
        }
        let mut result = self.clone();
        result.count = take;
        self.shrink(take);
        result
    }

    /// Takes the whole stack, leaving this slot empty.
    #[must_use]
    pub fn copy_and_clear(&mut self) -> ItemStack {
        std::mem::take(self)
    }

    /// Returns whether two stacks hold the same kind with the same
    /// component data, ignoring counts.
    #[must_use]
    pub fn is_same_item_same_components(a: &ItemStack, b: &ItemStack) -> bool {
        a.item == b.item && a.components == b.components
    }

    /// Serializes this stack into an NBT compound.
    ///
    /// Empty stacks produce an empty compound; callers are expected to
    /// skip them instead.
    #[must_use]
    pub fn to_nbt(&self) -> NbtCompound {
        let mut nbt = NbtCompound::new();
        if let Some(item) = &self.item {
            nbt.insert("id", NbtTag::String(item.to_string().into()));
            nbt.insert("count", NbtTag::Int(self.count));
            if let Some(components) = &self.components {
                nbt.insert("components", NbtTag::Compound(components.clone()));
            }
        }
        nbt
    }

    /// Parses a stack from an NBT compound.
    ///
    /// A missing `count` defaults to 1; a missing or malformed `id`
    /// yields `None`.
    #[must_use]
    pub fn from_nbt(nbt: &NbtCompound) -> Option<ItemStack> {
        let id = match nbt.get("id") {
            Some(NbtTag::String(id)) => id.to_str().to_string(),
            _ => return None,
        };
        let item: ResourceLocation = id.parse().ok()?;

        let count = match nbt.get("count") {
            Some(NbtTag::Int(count)) => *count,
            _ => 1,
        };

        let components = match nbt.get("components") {
            Some(NbtTag::Compound(components)) => Some(components.clone()),
            _ => None,
        };

        Some(ItemStack {
            item: Some(item),
            count,
            components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone(count: i32) -> ItemStack {
        ItemStack::new(ResourceLocation::vanilla_static("stone"), count)
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(ItemStack::empty().is_empty());

        let mut stack = stone(2);
        assert!(!stack.is_empty());
        stack.shrink(2);
        assert!(stack.is_empty());
        assert!(stack.item().is_none());
    }

    #[test]
    fn test_split() {
        let mut stack = stone(10);
        let taken = stack.split(3);
        assert_eq!(taken.count(), 3);
        assert_eq!(stack.count(), 7);

        // Splitting more than available drains the stack.
        let rest = stack.split(64);
        assert_eq!(rest.count(), 7);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_nbt_round_trip() {
        let mut components = NbtCompound::new();
        components.insert("damage", NbtTag::Int(17));
        let stack = ItemStack::with_components(ResourceLocation::vanilla_static("iron_sword"), 1, components);

        let decoded = ItemStack::from_nbt(&stack.to_nbt()).expect("decodes");
        assert_eq!(decoded, stack);
    }

    #[test]
    fn test_nbt_count_defaults_to_one() {
        let mut nbt = NbtCompound::new();
        nbt.insert("id", NbtTag::String("minecraft:egg".into()));
        let decoded = ItemStack::from_nbt(&nbt).expect("decodes");
        assert_eq!(decoded.count(), 1);

        // No id means no stack.
        assert!(ItemStack::from_nbt(&NbtCompound::new()).is_none());
    }
}
