//! Host-side scheduling of container rechecks.
//!
//! The container core holds no timers: while a container is being
//! viewed it asks the level to tick it again a few game ticks later, and
//! the host simulation loop drains this scheduler every tick to drive
//! those `on_scheduled_tick` calls.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use plunder_utils::BlockPos;

/// A pending container recheck at a specific position.
#[derive(Debug, Clone)]
pub struct ScheduledContainerTick {
    /// The container position to tick.
    pub pos: BlockPos,
    /// The game tick when this should trigger.
    pub trigger_tick: u64,
    /// Insertion order, used as a FIFO tie-break.
    sequence: u64,
}

impl PartialEq for ScheduledContainerTick {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for ScheduledContainerTick {}

// BinaryHeap is a max-heap; reverse the ordering so the earliest
// trigger_tick pops first, FIFO for equal ticks.
impl Ord for ScheduledContainerTick {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .trigger_tick
            .cmp(&self.trigger_tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for ScheduledContainerTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manages pending container rechecks for one world.
///
/// Uses a priority queue for efficient retrieval of due ticks and a
/// hash set to prevent scheduling the same container twice.
#[derive(Debug, Default)]
pub struct ContainerTickScheduler {
    pending: BinaryHeap<ScheduledContainerTick>,
    scheduled: HashSet<BlockPos>,
    next_sequence: u64,
}

impl ContainerTickScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a recheck at `pos` after `delay` ticks.
    ///
    /// If one is already pending for this position, the call is ignored.
    pub fn schedule(&mut self, pos: BlockPos, current_tick: u64, delay: u32) {
        if !self.scheduled.insert(pos) {
            return;
        }

        let trigger_tick = current_tick + u64::from(delay);
        self.pending.push(ScheduledContainerTick {
            pos,
            trigger_tick,
            sequence: self.next_sequence,
        });
        self.next_sequence = self.next_sequence.wrapping_add(1);

        log::trace!("Scheduled container tick at {pos} for tick {trigger_tick} (delay={delay})");
    }

    /// Removes and returns all ticks due at or before `current_tick`.
    pub fn get_due_ticks(&mut self, current_tick: u64) -> Vec<ScheduledContainerTick> {
        let mut due = Vec::new();

        while let Some(tick) = self.pending.peek() {
            if tick.trigger_tick > current_tick {
                break;
            }
            let tick = self.pending.pop().expect("peek succeeded");
            self.scheduled.remove(&tick.pos);
            due.push(tick);
        }

        due
    }

    /// Checks whether a recheck is already pending for this position.
    #[must_use]
    pub fn is_scheduled(&self, pos: BlockPos) -> bool {
        self.scheduled.contains(&pos)
    }

    /// Number of pending rechecks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Clears all pending rechecks (used when unloading a world).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.scheduled.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use plunder_utils::{Direction, math::Vector3};
    use rustc_hash::FxHashMap;
    use uuid::Uuid;

    use crate::block_entity::LootContainerEntity;
    use crate::block_entity::entities::{ChestBlockEntity, ChestType};
    use crate::inventory::InstanceId;
    use crate::level::{GameMode, LevelAccess, PlayerProfile};
    use crate::sound::SoundEvent;

    use super::*;

    #[test]
    fn test_schedule_and_retrieve() {
        let mut scheduler = ContainerTickScheduler::new();
        let pos1 = BlockPos::new(0, 0, 0);
        let pos2 = BlockPos::new(1, 0, 0);

        scheduler.schedule(pos1, 100, 5);
        scheduler.schedule(pos2, 100, 3);
        assert_eq!(scheduler.len(), 2);

        // At tick 102, nothing is due.
        assert!(scheduler.get_due_ticks(102).is_empty());

        // At tick 103, pos2 is due (delay 3).
        let due = scheduler.get_due_ticks(103);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].pos, pos2);

        // At tick 105, pos1 is due (delay 5).
        let due = scheduler.get_due_ticks(105);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].pos, pos1);

        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut scheduler = ContainerTickScheduler::new();
        let pos = BlockPos::new(0, 0, 0);

        scheduler.schedule(pos, 100, 5);
        scheduler.schedule(pos, 100, 10); // Ignored: already pending.

        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.is_scheduled(pos));
    }

    #[test]
    fn test_reschedule_after_firing() {
        let mut scheduler = ContainerTickScheduler::new();
        let pos = BlockPos::new(4, 64, 4);

        scheduler.schedule(pos, 0, 5);
        assert_eq!(scheduler.get_due_ticks(5).len(), 1);

        // Once fired, the position can be scheduled again.
        scheduler.schedule(pos, 5, 5);
        assert_eq!(scheduler.len(), 1);
    }

    /// Level stub wiring tick requests straight into a scheduler, the
    /// way a host simulation loop does.
    #[derive(Default)]
    struct HostLevel {
        scheduler: RefCell<ContainerTickScheduler>,
        current_tick: Cell<u64>,
        sounds: RefCell<Vec<SoundEvent>>,
        viewing: RefCell<FxHashMap<Uuid, InstanceId>>,
    }

    impl LevelAccess for HostLevel {
        fn play_sound(&self, _at: Vector3<f64>, sound: SoundEvent) {
            self.sounds.borrow_mut().push(sound);
        }

        fn update_listeners(&self, _pos: BlockPos) {}

        fn is_viewing_instance(&self, player: Uuid, instance: InstanceId) -> bool {
            self.viewing.borrow().get(&player) == Some(&instance)
        }

        fn schedule_container_tick(&self, pos: BlockPos, delay: u32) {
            self.scheduler
                .borrow_mut()
                .schedule(pos, self.current_tick.get(), delay);
        }
    }

    #[test]
    fn test_drives_container_rechecks() {
        let level = HostLevel::default();
        let pos = BlockPos::new(3, 64, 3);
        let mut chest = ChestBlockEntity::new(pos, ChestType::Single, Direction::North);
        let alice = PlayerProfile::new(Uuid::from_u128(1), "alice", GameMode::Survival);

        let instance = chest
            .instanced_inventory_for(&alice)
            .expect("materializes")
            .instance_id();
        level.viewing.borrow_mut().insert(alice.id, instance);
        chest.on_open(&alice, &level);
        assert!(level.scheduler.borrow().is_scheduled(pos));

        // Run the simulation loop: while Alice keeps viewing, each due
        // tick re-schedules the next recheck and nothing closes.
        for tick in 1..=20u64 {
            level.current_tick.set(tick);
            let due = level.scheduler.borrow_mut().get_due_ticks(tick);
            for scheduled in due {
                assert_eq!(scheduled.pos, pos);
                chest.on_scheduled_tick(&level);
            }
        }
        assert_eq!(level.sounds.borrow().as_slice(), &[SoundEvent::ChestOpen]);

        // Alice vanishes without closing; the next due recheck notices,
        // fires the close sound, and stops the tick chain.
        level.viewing.borrow_mut().clear();
        for tick in 21..=40u64 {
            level.current_tick.set(tick);
            let due = level.scheduler.borrow_mut().get_due_ticks(tick);
            for _ in due {
                chest.on_scheduled_tick(&level);
            }
        }
        assert_eq!(
            level.sounds.borrow().as_slice(),
            &[SoundEvent::ChestOpen, SoundEvent::ChestClose]
        );
        assert!(level.scheduler.borrow().is_empty());
    }
}
