//! Error types.

use plunder_utils::ResourceLocation;
use thiserror::Error;

/// Errors surfaced by instanced-container operations.
///
/// Almost everything in this crate prefers a tolerant default over an
/// error; these are the integration mistakes that must fail loudly
/// instead of silently presenting an empty container to a player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LootError {
    /// The supplied template does not match the container capacity.
    #[error("template has {found} slots, container expects {expected}")]
    MisconfiguredTemplate {
        /// The container's fixed slot count.
        expected: usize,
        /// The slot count the template actually had.
        found: usize,
    },

    /// A view was requested while the container still holds an unrolled
    /// loot table reference. The loot collaborator must roll it first.
    #[error("loot table {table} has not been rolled into a template yet")]
    UnrolledLootTable {
        /// The pending loot table.
        table: ResourceLocation,
    },
}
