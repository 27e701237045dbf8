//! Shared builders for integration tests.
#![allow(dead_code)]

use turn_dungeon::dungeon::{MapLegend, Position};
use turn_dungeon::hero::Hero;
use turn_dungeon::{GameSession, SessionOptions};

pub const OPEN_5X5: &str = ".....\n.....\n.....\n.....\n.....";

pub fn options(seed: u64) -> SessionOptions {
    SessionOptions {
        seed: Some(seed),
        ..SessionOptions::default()
    }
}

/// Session with the default hero at (1, 1) and a fixed seed
pub fn session(map: &str, enemies: &str) -> GameSession {
    session_with(map, enemies, &MapLegend::default(), &options(11))
}

pub fn session_with(
    map: &str,
    enemies: &str,
    legend: &MapLegend,
    options: &SessionOptions,
) -> GameSession {
    GameSession::load(map, enemies, legend, &Hero::default(), options)
        .expect("test level should load")
}

pub fn position_of(session: &GameSession, entity: hecs::Entity) -> Position {
    session.entity(entity).expect("entity should exist").position
}

pub fn health_of(session: &GameSession, entity: hecs::Entity) -> i32 {
    session.entity(entity).expect("entity should exist").stats.health
}
