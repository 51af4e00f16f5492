//! Viewer counting for a single physical container.
//!
//! Many players can view their own instanced inventories of one
//! container at the same time, but the container is a single physical
//! object: its open/close sound must play once when viewership goes
//! 0 -> 1 and once when it returns to 0, regardless of how many viewers
//! came and went in between.

use plunder_utils::BlockPos;
use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::level::LevelAccess;

/// Net result of one viewer-count transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerChange {
    /// Count before the transition.
    pub old_count: u32,
    /// Count after the transition.
    pub new_count: u32,
}

impl ViewerChange {
    fn unchanged(count: u32) -> Self {
        Self {
            old_count: count,
            new_count: count,
        }
    }

    /// Returns whether the count moved at all.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.old_count != self.new_count
    }

    /// Returns whether viewership went from empty to non-empty.
    #[must_use]
    pub fn container_opened(&self) -> bool {
        self.old_count == 0 && self.new_count > 0
    }

    /// Returns whether viewership returned to empty.
    #[must_use]
    pub fn container_closed(&self) -> bool {
        self.old_count > 0 && self.new_count == 0
    }
}

/// Side effects fired at viewer-count boundaries.
///
/// Implemented per container kind; a chest plays chest sounds with
/// double-chest handling, a barrel plays barrel sounds.
pub trait ContainerHooks {
    /// Viewership transitioned 0 -> >0.
    fn on_container_open(&self, level: &dyn LevelAccess, pos: BlockPos);

    /// Viewership transitioned >0 -> 0.
    fn on_container_close(&self, level: &dyn LevelAccess, pos: BlockPos);

    /// The count changed; fired on every net change including the
    /// open/close boundaries.
    fn on_viewer_count_changed(
        &self,
        _level: &dyn LevelAccess,
        _pos: BlockPos,
        _old_count: u32,
        _new_count: u32,
    ) {
    }
}

/// Counts the players currently viewing one physical container.
///
/// A player contributes at most 1 to the count no matter how many open
/// calls arrive, the count never goes negative, and closes for unknown
/// players are no-ops. The tracker itself is a pure state machine: each
/// transition returns a [`ViewerChange`] and the caller fires
/// [`ContainerHooks`] from it.
#[derive(Debug, Default)]
pub struct ViewerCountTracker {
    viewers: FxHashSet<Uuid>,
}

impl ViewerCountTracker {
    /// Creates a tracker with no viewers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current number of distinct viewers.
    #[must_use]
    pub fn viewer_count(&self) -> u32 {
        self.viewers.len() as u32
    }

    /// Returns whether the player is currently counted.
    #[must_use]
    pub fn is_counted(&self, player: Uuid) -> bool {
        self.viewers.contains(&player)
    }

    /// Counts a player as viewing. Already-counted players are not
    /// double-counted.
    pub fn open(&mut self, player: Uuid) -> ViewerChange {
        let old_count = self.viewer_count();
        if !self.viewers.insert(player) {
            return ViewerChange::unchanged(old_count);
        }
        ViewerChange {
            old_count,
            new_count: self.viewer_count(),
        }
    }

    /// Stops counting a player. Unknown players are a no-op.
    pub fn close(&mut self, player: Uuid) -> ViewerChange {
        let old_count = self.viewer_count();
        if !self.viewers.remove(&player) {
            return ViewerChange::unchanged(old_count);
        }
        ViewerChange {
            old_count,
            new_count: self.viewer_count(),
        }
    }

    /// Reconciles the count against reality: drops every counted player
    /// for whom `still_viewing` answers false (silent disconnects,
    /// switched UIs). O(current viewer count).
    pub fn retain_viewing(&mut self, mut still_viewing: impl FnMut(Uuid) -> bool) -> ViewerChange {
        let old_count = self.viewer_count();
        self.viewers.retain(|player| still_viewing(*player));
        ViewerChange {
            old_count,
            new_count: self.viewer_count(),
        }
    }

    /// Drops all viewers without reporting a transition; used on load,
    /// since no viewer survives a reload.
    pub fn reset(&mut self) {
        self.viewers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Uuid = Uuid::from_u128(1);
    const BOB: Uuid = Uuid::from_u128(2);

    #[test]
    fn test_open_is_idempotent() {
        let mut tracker = ViewerCountTracker::new();

        let first = tracker.open(ALICE);
        assert!(first.container_opened());
        assert_eq!(first.new_count, 1);

        // Opening again without a close changes nothing and must not
        // re-report the boundary.
        let second = tracker.open(ALICE);
        assert!(!second.changed());
        assert!(!second.container_opened());
        assert_eq!(tracker.viewer_count(), 1);
    }

    #[test]
    fn test_boundary_transitions() {
        let mut tracker = ViewerCountTracker::new();

        assert!(tracker.open(ALICE).container_opened());
        let second = tracker.open(BOB);
        assert!(second.changed());
        assert!(!second.container_opened());

        // First close leaves a viewer behind.
        let close_a = tracker.close(ALICE);
        assert!(close_a.changed());
        assert!(!close_a.container_closed());

        let close_b = tracker.close(BOB);
        assert!(close_b.container_closed());
        assert_eq!(tracker.viewer_count(), 0);
    }

    #[test]
    fn test_close_of_unknown_player_is_noop() {
        let mut tracker = ViewerCountTracker::new();
        let change = tracker.close(ALICE);
        assert!(!change.changed());
        assert_eq!(tracker.viewer_count(), 0);
    }

    #[test]
    fn test_retain_viewing_drops_departed() {
        let mut tracker = ViewerCountTracker::new();
        tracker.open(ALICE);
        tracker.open(BOB);

        // Bob silently switched to an unrelated UI.
        let change = tracker.retain_viewing(|player| player == ALICE);
        assert_eq!(change.new_count, 1);
        assert!(!change.container_closed());

        // Alice disconnects without a close call; this empties the
        // container even though close() never ran.
        let change = tracker.retain_viewing(|_| false);
        assert!(change.container_closed());
    }
}
