//! Speed-ordered round scheduler.
//!
//! Each round the queue is rebuilt from the living roster (player first,
//! then enemies in load order) and sorted by speed, highest first. The sort
//! is stable, so equal speeds keep roster order. Entries are consumed front
//! to back; an entry that died earlier in the round is discarded without
//! being granted a turn.

use std::collections::VecDeque;

use hecs::{Entity, World};

use crate::ecs;

/// Coordinates who acts next. Owns no entities; liveness and speed are read
/// from the world on every call.
#[derive(Debug, Clone)]
pub struct TurnSystem {
    round: u32,
    queue: VecDeque<Entity>,
    active: Option<Entity>,
    /// Whether the first round's queue has been built yet
    started: bool,
}

impl TurnSystem {
    pub fn new() -> Self {
        Self {
            round: 1,
            queue: VecDeque::new(),
            active: None,
            started: false,
        }
    }

    /// Current round, starting at 1
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Entity whose turn is in progress, if any
    pub fn active(&self) -> Option<Entity> {
        self.active
    }

    /// Mark the active turn as spent (the player acted).
    pub fn finish_active(&mut self) {
        self.active = None;
    }

    /// Entries still waiting this round, front first
    pub fn pending(&self) -> impl Iterator<Item = Entity> + '_ {
        self.queue.iter().copied()
    }

    /// Replace the queue with the living members of `roster`, fastest first.
    pub fn rebuild(&mut self, world: &World, roster: &[Entity]) {
        self.queue = turn_order(world, roster).into();
        log::debug!("round {}: {} actors queued", self.round, self.queue.len());
    }

    /// Pop the next living actor, rebuilding the queue when it runs dry.
    ///
    /// Returns `None` only when nobody in `roster` is alive.
    pub fn next_actor(&mut self, world: &World, roster: &[Entity]) -> Option<Entity> {
        loop {
            if self.queue.is_empty() {
                if self.started {
                    self.round += 1;
                }
                self.started = true;
                self.rebuild(world, roster);
                if self.queue.is_empty() {
                    self.active = None;
                    return None;
                }
            }

            if let Some(entity) = self.queue.pop_front() {
                if ecs::is_alive(world, entity) {
                    self.active = Some(entity);
                    return Some(entity);
                }
                log::debug!("skipping defeated {:?}", entity);
            }
        }
    }
}

impl Default for TurnSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Living members of `roster` sorted by speed descending (stable).
pub fn turn_order(world: &World, roster: &[Entity]) -> Vec<Entity> {
    let mut living: Vec<(Entity, i32)> = roster
        .iter()
        .filter_map(|&entity| {
            ecs::stats_of(world, entity)
                .filter(|stats| stats.is_alive())
                .map(|stats| (entity, stats.speed))
        })
        .collect();
    living.sort_by(|a, b| b.1.cmp(&a.1));
    living.into_iter().map(|(entity, _)| entity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat::Stats;
    use proptest::prelude::*;

    fn spawn(world: &mut World, speed: i32) -> Entity {
        world.spawn((Stats::new(10, 1, 1, speed),))
    }

    #[test]
    fn first_round_is_one_and_sorted_by_speed() {
        let mut world = World::new();
        let player = spawn(&mut world, 5);
        let slow = spawn(&mut world, 3);
        let fast = spawn(&mut world, 9);
        let roster = [player, slow, fast];

        let mut turns = TurnSystem::new();
        assert_eq!(turns.next_actor(&world, &roster), Some(fast));
        assert_eq!(turns.round(), 1);
        assert_eq!(turns.pending().collect::<Vec<_>>(), vec![player, slow]);
        assert_eq!(turns.next_actor(&world, &roster), Some(player));
        assert_eq!(turns.next_actor(&world, &roster), Some(slow));
        assert_eq!(turns.round(), 1);

        assert_eq!(turns.next_actor(&world, &roster), Some(fast));
        assert_eq!(turns.round(), 2);
    }

    #[test]
    fn ties_keep_roster_order() {
        let mut world = World::new();
        let player = spawn(&mut world, 4);
        let a = spawn(&mut world, 4);
        let b = spawn(&mut world, 4);
        assert_eq!(turn_order(&world, &[player, a, b]), vec![player, a, b]);
        assert_eq!(turn_order(&world, &[b, player, a]), vec![b, player, a]);
    }

    #[test]
    fn dead_entries_never_get_a_turn() {
        let mut world = World::new();
        let player = spawn(&mut world, 9);
        let victim = spawn(&mut world, 5);
        let other = spawn(&mut world, 1);
        let roster = [player, victim, other];

        let mut turns = TurnSystem::new();
        assert_eq!(turns.next_actor(&world, &roster), Some(player));
        // 玩家在本轮击杀了尚未行动的敌人
        world.query_one_mut::<&mut Stats>(victim).unwrap().health = 0;
        assert_eq!(turns.next_actor(&world, &roster), Some(other));
        assert_eq!(turns.active(), Some(other));

        world.despawn(other).unwrap();
        assert_eq!(turns.next_actor(&world, &roster), Some(player));
        assert_eq!(turns.round(), 2);
        assert_eq!(turns.pending().count(), 0);
    }

    #[test]
    fn empty_roster_yields_nobody() {
        let world = World::new();
        let mut turns = TurnSystem::new();
        assert_eq!(turns.next_actor(&world, &[]), None);
        assert_eq!(turns.active(), None);
    }

    proptest! {
        #[test]
        fn rebuilt_queue_has_every_living_entity_sorted(speeds in proptest::collection::vec(-5i32..20, 1..12)) {
            let mut world = World::new();
            let roster: Vec<Entity> = speeds.iter().map(|&s| spawn(&mut world, s)).collect();
            let mut turns = TurnSystem::new();
            turns.rebuild(&world, &roster);
            let queued: Vec<Entity> = turns.pending().collect();
            prop_assert_eq!(queued.len(), roster.len());
            let queued_speeds: Vec<i32> = queued
                .iter()
                .map(|&e| ecs::stats_of(&world, e).unwrap().speed)
                .collect();
            prop_assert!(queued_speeds.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
