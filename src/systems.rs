//! Systems that mutate the world and the grid together.
//!
//! Every system here keeps the two views consistent: an entity's `Position`
//! component always names the cell whose occupant is that entity, and a
//! defeated entity's cell is vacated in the same call that defeats it.

use combat::{Combat, CombatResult, EnemyBrain, Fighter, Intent, Stats};
use dungeon::{CellKind, Grid, PlacementError, Position};
use hecs::{Entity, World};
use rand::Rng;

use crate::ecs::{self, Actor, Role};

/// Side effects of entering a cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrival {
    pub trap_damage: Option<i32>,
    pub defeated: bool,
    pub logs: Vec<String>,
}

pub struct MovementSystem;

impl MovementSystem {
    /// Put an entity onto the grid (level load / spawn).
    pub fn place(
        world: &mut World,
        grid: &mut Grid,
        entity: Entity,
        to: Position,
        trap_damage: i32,
    ) -> Result<Arrival, PlacementError> {
        let kind = grid.place(entity, to)?;
        if let Ok(position) = world.query_one_mut::<&mut Position>(entity) {
            *position = to;
        }
        Ok(Self::arrive(world, grid, entity, to, kind, trap_damage))
    }

    /// Move an entity that is already on the grid. On error nothing changes.
    pub fn relocate(
        world: &mut World,
        grid: &mut Grid,
        entity: Entity,
        to: Position,
        trap_damage: i32,
    ) -> Result<Arrival, PlacementError> {
        let from = ecs::position_of(world, entity).ok_or(PlacementError::NoOccupant)?;
        if grid.occupant(from) != Some(entity) {
            return Err(PlacementError::NoOccupant);
        }
        let kind = grid.relocate(from, to)?;
        if let Ok(position) = world.query_one_mut::<&mut Position>(entity) {
            *position = to;
        }
        log::debug!("{:?} moved {} -> {}", entity, from, to);
        Ok(Self::arrive(world, grid, entity, to, kind, trap_damage))
    }

    fn arrive(
        world: &mut World,
        grid: &mut Grid,
        entity: Entity,
        at: Position,
        kind: CellKind,
        trap_damage: i32,
    ) -> Arrival {
        if kind != CellKind::Trap {
            return Arrival::default();
        }
        let Ok((actor, stats)) = world.query_one_mut::<(&Actor, &mut Stats)>(entity) else {
            return Arrival::default();
        };
        if !stats.is_alive() {
            return Arrival::default();
        }

        stats.apply_damage(trap_damage);
        let defeated = !stats.is_alive();
        let mut logs = vec![format!(
            "{} triggers a trap and takes {} damage!",
            actor.name, trap_damage
        )];
        if defeated {
            logs.push(format!("{} was killed by a trap!", actor.name));
            grid.vacate(at);
        }

        Arrival {
            trap_damage: Some(trap_damage),
            defeated,
            logs,
        }
    }
}

pub struct CombatSystem;

impl CombatSystem {
    /// `attacker` hits `defender` once. Returns `None` if either entity is gone.
    pub fn attack(
        world: &mut World,
        grid: &mut Grid,
        attacker: Entity,
        defender: Entity,
    ) -> Option<CombatResult> {
        let attacker_name = world.get::<&Actor>(attacker).ok()?.name.clone();
        let mut attacker_stats = ecs::stats_of(world, attacker)?;

        let (actor, stats, position) = world
            .query_one_mut::<(&Actor, &mut Stats, &Position)>(defender)
            .ok()?;
        let position = *position;
        let mut target = Fighter::new(&actor.name, stats);
        let result = Combat::resolve_attack(
            &Fighter::new(&attacker_name, &mut attacker_stats),
            &mut target,
        );

        // 被击败的实体立即让出格子，尸体在下一次结算时移出存活集合
        if result.defeated && grid.occupant(position) == Some(defender) {
            grid.vacate(position);
        }
        Some(result)
    }
}

/// What one enemy did on its turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyTurn {
    pub entity: Entity,
    pub intent: Intent,
    pub logs: Vec<String>,
}

pub struct AISystem;

impl AISystem {
    pub fn act<R: Rng + ?Sized>(
        world: &mut World,
        grid: &mut Grid,
        enemy: Entity,
        player: Entity,
        rng: &mut R,
        trap_damage: i32,
    ) -> EnemyTurn {
        let mut turn = EnemyTurn {
            entity: enemy,
            intent: Intent::Wait,
            logs: Vec::new(),
        };

        let vision = match world.get::<&Actor>(enemy).map(|actor| actor.role) {
            Ok(Role::Enemy { vision }) => vision,
            _ => return turn,
        };
        let (Some(me), Some(target)) = (
            ecs::position_of(world, enemy),
            ecs::position_of(world, player),
        ) else {
            return turn;
        };

        turn.intent = EnemyBrain::decide(me, vision, target, grid, rng);
        match turn.intent {
            Intent::Attack => {
                if let Some(result) = CombatSystem::attack(world, grid, enemy, player) {
                    turn.logs.extend(result.logs);
                }
            }
            Intent::MoveTo(to) => {
                match MovementSystem::relocate(world, grid, enemy, to, trap_damage) {
                    Ok(arrival) => turn.logs.extend(arrival.logs),
                    Err(e) => {
                        log::warn!("enemy {:?} could not move to {}: {}", enemy, to, e);
                        turn.intent = Intent::Wait;
                    }
                }
            }
            Intent::Wait => {}
        }
        turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat::EnemySpec;
    use dungeon::MapLegend;
    use hero::Hero;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(map: &str, legend: &MapLegend) -> (World, Grid, Entity, Entity) {
        let mut world = World::new();
        let mut grid = Grid::parse(map, legend).unwrap();
        let player = ecs::spawn_player(&mut world, &Hero::default(), Position::new(1, 1));
        let enemy = ecs::spawn_enemy(
            &mut world,
            &EnemySpec {
                name: "goblin".into(),
                position: Position::new(3, 3),
                stats: Stats::new(20, 5, 2, 3),
                vision: 10,
            },
        );
        MovementSystem::place(&mut world, &mut grid, player, Position::new(1, 1), 10).unwrap();
        MovementSystem::place(&mut world, &mut grid, enemy, Position::new(3, 3), 10).unwrap();
        (world, grid, player, enemy)
    }

    #[test]
    fn relocate_keeps_position_and_cell_in_sync() {
        let (mut world, mut grid, player, _) = setup(".....\n.....\n.....\n.....", &MapLegend::default());
        MovementSystem::relocate(&mut world, &mut grid, player, Position::new(1, 2), 10).unwrap();
        assert_eq!(ecs::position_of(&world, player), Some(Position::new(1, 2)));
        assert_eq!(grid.occupant(Position::new(1, 2)), Some(player));
        assert_eq!(grid.occupant(Position::new(1, 1)), None);
    }

    #[test]
    fn failed_relocate_changes_nothing() {
        let (mut world, mut grid, player, _) = setup(".#...\n.....\n.....\n.....", &MapLegend::default());
        let before = grid.clone();
        assert_eq!(
            MovementSystem::relocate(&mut world, &mut grid, player, Position::new(0, 1), 10),
            Err(PlacementError::Wall)
        );
        assert_eq!(grid, before);
        assert_eq!(ecs::position_of(&world, player), Some(Position::new(1, 1)));
    }

    #[test]
    fn trap_hurts_on_entry() {
        let legend = MapLegend::with_trap('^');
        let (mut world, mut grid, player, _) = setup(".....\n..^..\n.....\n.....", &legend);
        let arrival =
            MovementSystem::relocate(&mut world, &mut grid, player, Position::new(1, 2), 10)
                .unwrap();
        assert_eq!(arrival.trap_damage, Some(10));
        assert!(!arrival.defeated);
        assert_eq!(ecs::stats_of(&world, player).unwrap().health, 40);
    }

    #[test]
    fn lethal_attack_vacates_cell() {
        let (mut world, mut grid, player, enemy) = setup(".....\n.....\n.....\n.....", &MapLegend::default());
        for expected in [12, 4] {
            let result = CombatSystem::attack(&mut world, &mut grid, player, enemy).unwrap();
            assert_eq!(result.damage, 8);
            assert_eq!(ecs::stats_of(&world, enemy).unwrap().health, expected);
        }
        let result = CombatSystem::attack(&mut world, &mut grid, player, enemy).unwrap();
        assert!(result.defeated);
        assert_eq!(grid.occupant(Position::new(3, 3)), None);
        assert!(grid.is_walkable(Position::new(3, 3)));
    }

    #[test]
    fn enemy_in_range_closes_in_then_attacks() {
        let (mut world, mut grid, player, enemy) = setup(".....\n.....\n.....\n.....", &MapLegend::default());
        let mut rng = Pcg32::seed_from_u64(3);

        let turn = AISystem::act(&mut world, &mut grid, enemy, player, &mut rng, 10);
        assert_eq!(turn.intent, Intent::MoveTo(Position::new(2, 2)));
        assert_eq!(grid.occupant(Position::new(2, 2)), Some(enemy));

        let turn = AISystem::act(&mut world, &mut grid, enemy, player, &mut rng, 10);
        assert_eq!(turn.intent, Intent::Attack);
        assert_eq!(ecs::stats_of(&world, player).unwrap().health, 49);
    }
}
