//! ECS components for the session's entity arena.
//!
//! Every actor lives in a `hecs::World`; grid cells only store the `Entity`
//! handle, so removing a defeated enemy can never leave a dangling reference.

use combat::{EnemySpec, Stats};
use dungeon::Position;
use hecs::{Entity, World};
use hero::Hero;

/// 角色类型：玩家没有额外字段，敌人带视野半径
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Player,
    Enemy { vision: i32 },
}

/// Identity component shared by the player and enemies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    /// 首字母作为地图上的显示字符
    pub fn glyph(&self) -> char {
        match self.role {
            Role::Player => '@',
            Role::Enemy { .. } => self.name.chars().next().unwrap_or('E'),
        }
    }
}

/// Read-only snapshot of one actor, handed to the presentation layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityView {
    pub entity: Entity,
    pub name: String,
    pub role: Role,
    pub stats: Stats,
    pub position: Position,
}

impl EntityView {
    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }
}

pub fn spawn_player(world: &mut World, hero: &Hero, position: Position) -> Entity {
    world.spawn((
        Actor {
            name: hero.name.clone(),
            role: Role::Player,
        },
        hero.stats,
        position,
    ))
}

pub fn spawn_enemy(world: &mut World, spec: &EnemySpec) -> Entity {
    world.spawn((
        Actor {
            name: spec.name.clone(),
            role: Role::Enemy {
                vision: spec.vision,
            },
        },
        spec.stats,
        spec.position,
    ))
}

pub fn stats_of(world: &World, entity: Entity) -> Option<Stats> {
    world.get::<&Stats>(entity).ok().map(|stats| *stats)
}

pub fn position_of(world: &World, entity: Entity) -> Option<Position> {
    world.get::<&Position>(entity).ok().map(|pos| *pos)
}

/// 已被移出世界或生命值 ≤0 的实体都不算存活
pub fn is_alive(world: &World, entity: Entity) -> bool {
    stats_of(world, entity).is_some_and(|stats| stats.is_alive())
}

pub fn describe(world: &World, entity: Entity) -> Option<EntityView> {
    let actor = world.get::<&Actor>(entity).ok()?;
    Some(EntityView {
        entity,
        name: actor.name.clone(),
        role: actor.role,
        stats: stats_of(world, entity)?,
        position: position_of(world, entity)?,
    })
}
