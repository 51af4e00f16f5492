//! Tracks which players have been granted a container's initial loot.

use rustc_hash::FxHashSet;
use uuid::Uuid;

/// The set of players who have already received a container's default
/// loot.
///
/// The set only grows during normal play; it is cleared as a whole when
/// the container is rebuilt from a durable record.
#[derive(Debug, Default)]
pub struct OpenedPlayerSet {
    players: FxHashSet<Uuid>,
}

impl OpenedPlayerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the player has been granted loot before.
    #[must_use]
    pub fn has_opened(&self, player: Uuid) -> bool {
        self.players.contains(&player)
    }

    /// Records the player; returns true iff this was the first time.
    pub fn mark_opened(&mut self, player: Uuid) -> bool {
        self.players.insert(player)
    }

    /// Iterates the recorded players in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.players.iter()
    }

    /// Number of recorded players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns true if nobody has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Forgets everyone; only used by the deserialize reset.
    pub fn clear(&mut self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_open_only() {
        let mut set = OpenedPlayerSet::new();
        let player = Uuid::from_u128(7);

        assert!(!set.has_opened(player));
        assert!(set.mark_opened(player));
        assert!(set.has_opened(player));

        // Every later call reports "already granted".
        assert!(!set.mark_opened(player));
        assert!(!set.mark_opened(player));
        assert_eq!(set.len(), 1);
    }
}
