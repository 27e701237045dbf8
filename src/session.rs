//! Game session: owns the grid, the entity world, the turn scheduler and the
//! observers, and exposes the operations a presentation layer drives.
//!
//! Control flow: the player's turn is caller-driven (`move_player` /
//! `player_turn`), enemy turns are engine-driven and chain automatically
//! inside `advance`. `step` runs one actor at a time for callers that pace
//! enemy actions; pacing never changes the order of state changes.

use std::iter;

use dungeon::{Direction, Grid, MapLegend, Position};
use hecs::{Entity, World};
use hero::Hero;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use error::GameError;

use crate::ecs::{self, Actor, EntityView};
use crate::event_bus::{EventBus, ListenerId};
use crate::level::Level;
use crate::systems::{AISystem, CombatSystem, MovementSystem};
use crate::turn_system::{self, TurnSystem};

/// Damage applied when a living entity enters a trap cell
pub const DEFAULT_TRAP_DAMAGE: i32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    /// Where the player is placed after the enemies
    pub spawn: Position,
    pub trap_damage: i32,
    /// Seed for enemy wandering; `None` draws one from the thread RNG
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            spawn: Position::new(1, 1),
            trap_damage: DEFAULT_TRAP_DAMAGE,
            seed: None,
        }
    }
}

/// 游戏结果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[default]
    Undecided,
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

/// Where the session stands after an engine call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for `move_player`
    PlayerTurn,
    /// One enemy acted; call `step` again to continue
    EnemyActed(Entity),
    Finished(Outcome),
}

/// Comparable picture of everything observable about a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub round: u32,
    pub active: Option<Entity>,
    pub outcome: Outcome,
    pub board: String,
    pub entities: Vec<EntityView>,
}

pub struct GameSession {
    world: World,
    grid: Grid,
    legend: MapLegend,
    player: Entity,
    /// Living enemies in load order
    enemies: Vec<Entity>,
    turns: TurnSystem,
    outcome: Outcome,
    bus: EventBus,
    rng: Pcg32,
    trap_damage: i32,
    messages: Vec<String>,
}

impl GameSession {
    /// Populate a parsed level. Enemies are placed in roster order, then the
    /// player at `options.spawn`; any invalid placement fails the whole load.
    pub fn new(level: Level, hero: &Hero, options: &SessionOptions) -> error::Result<Self> {
        let Level {
            mut grid,
            enemies: roster,
            legend,
        } = level;
        let mut world = World::new();
        let mut messages = Vec::new();

        let mut enemies = Vec::with_capacity(roster.len());
        for spec in &roster {
            let entity = ecs::spawn_enemy(&mut world, spec);
            let arrival = MovementSystem::place(
                &mut world,
                &mut grid,
                entity,
                spec.position,
                options.trap_damage,
            )
            .map_err(|e| placement_error(&spec.name, spec.position, e))?;
            messages.extend(arrival.logs);
            enemies.push(entity);
        }

        let player = ecs::spawn_player(&mut world, hero, options.spawn);
        let arrival = MovementSystem::place(
            &mut world,
            &mut grid,
            player,
            options.spawn,
            options.trap_damage,
        )
        .map_err(|e| placement_error(&hero.name, options.spawn, e))?;
        messages.extend(arrival.logs);

        let seed = options.seed.unwrap_or_else(|| rand::rng().random());
        log::info!(
            "session ready: {}x{} grid, {} enemies, seed {}",
            grid.rows(),
            grid.cols(),
            enemies.len(),
            seed
        );

        Ok(Self {
            world,
            grid,
            legend,
            player,
            enemies,
            turns: TurnSystem::new(),
            outcome: Outcome::Undecided,
            bus: EventBus::new(),
            rng: Pcg32::seed_from_u64(seed),
            trap_damage: options.trap_damage,
            messages,
        })
    }

    /// Parse map and roster text and populate a session in one go.
    pub fn load(
        map: &str,
        enemies: &str,
        legend: &MapLegend,
        hero: &Hero,
        options: &SessionOptions,
    ) -> error::Result<Self> {
        Self::new(Level::parse(map, enemies, legend)?, hero, options)
    }

    /// Announce the loaded state and run until the player's first turn.
    pub fn start(&mut self) -> TurnState {
        self.bus.notify_changed();
        let outcome = self.check_end();
        if outcome.is_terminal() {
            return TurnState::Finished(outcome);
        }
        self.advance()
    }

    /// Run one actor. A player turn returns control to the caller; an enemy
    /// turn is resolved completely, followed by the end check and a change
    /// notification.
    pub fn step(&mut self) -> TurnState {
        if self.outcome.is_terminal() {
            return TurnState::Finished(self.outcome);
        }
        if self.is_player_turn() {
            return TurnState::PlayerTurn;
        }

        let roster = self.roster();
        match self.turns.next_actor(&self.world, &roster) {
            Some(entity) if entity == self.player => TurnState::PlayerTurn,
            Some(enemy) => {
                let turn = AISystem::act(
                    &mut self.world,
                    &mut self.grid,
                    enemy,
                    self.player,
                    &mut self.rng,
                    self.trap_damage,
                );
                log::debug!("round {}: {:?} -> {:?}", self.turns.round(), enemy, turn.intent);
                self.messages.extend(turn.logs);
                self.turns.finish_active();

                let outcome = self.check_end();
                self.bus.notify_changed();
                if outcome.is_terminal() {
                    TurnState::Finished(outcome)
                } else {
                    TurnState::EnemyActed(enemy)
                }
            }
            None => TurnState::Finished(self.check_end()),
        }
    }

    /// Chain enemy turns until the player is up or the game is over.
    pub fn advance(&mut self) -> TurnState {
        loop {
            match self.step() {
                TurnState::EnemyActed(_) => continue,
                state => return state,
            }
        }
    }

    /// Move the player by one cell, or attack the enemy standing there.
    ///
    /// Returns `false` without touching any state when it is not the
    /// player's turn or the target is out of bounds, a wall, or otherwise
    /// not actionable. After `true` the caller must run the end check,
    /// notify observers and advance; `end_player_turn` does exactly that.
    pub fn move_player(&mut self, d_row: i32, d_col: i32) -> bool {
        if self.outcome.is_terminal() || !self.is_player_turn() {
            return false;
        }
        let Some(from) = ecs::position_of(&self.world, self.player) else {
            return false;
        };
        let Some(to) = from.offset(d_row, d_col) else {
            return false;
        };
        if !self.grid.in_bounds(to) || self.grid.is_blocking(to) {
            return false;
        }

        let acted = match self.grid.occupant(to) {
            Some(target) if self.enemies.contains(&target) => {
                match CombatSystem::attack(&mut self.world, &mut self.grid, self.player, target) {
                    Some(result) => {
                        self.messages.extend(result.logs);
                        true
                    }
                    None => false,
                }
            }
            Some(_) => false,
            None => match MovementSystem::relocate(
                &mut self.world,
                &mut self.grid,
                self.player,
                to,
                self.trap_damage,
            ) {
                Ok(arrival) => {
                    self.messages.extend(arrival.logs);
                    true
                }
                Err(_) => false,
            },
        };

        if acted {
            self.turns.finish_active();
        }
        acted
    }

    /// End check, change notification, then the next actor.
    pub fn end_player_turn(&mut self) -> TurnState {
        if self.is_player_turn() {
            return TurnState::PlayerTurn;
        }
        let outcome = self.check_end();
        self.bus.notify_changed();
        if outcome.is_terminal() {
            return TurnState::Finished(outcome);
        }
        self.step()
    }

    /// Full player turn: move, then let every enemy act until the player is
    /// up again. A rejected move leaves the player's turn pending.
    pub fn player_turn(&mut self, direction: Direction) -> TurnState {
        if self.outcome.is_terminal() {
            return TurnState::Finished(self.outcome);
        }
        let (d_row, d_col) = direction.delta();
        if !self.move_player(d_row, d_col) {
            return TurnState::PlayerTurn;
        }
        match self.end_player_turn() {
            TurnState::EnemyActed(_) => self.advance(),
            state => state,
        }
    }

    /// Drop defeated enemies and decide the outcome. Terminal outcomes are
    /// reported to end listeners once and never revert.
    pub fn check_end(&mut self) -> Outcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }

        let world = &self.world;
        let mut defeated = Vec::new();
        self.enemies.retain(|&enemy| {
            let alive = ecs::is_alive(world, enemy);
            if !alive {
                defeated.push(enemy);
            }
            alive
        });
        for enemy in defeated {
            if let Ok(actor) = self.world.get::<&Actor>(enemy) {
                log::debug!("removing defeated {}", actor.name);
            }
            let _ = self.world.despawn(enemy);
        }

        self.outcome = if !ecs::is_alive(&self.world, self.player) {
            Outcome::Defeat
        } else if self.enemies.is_empty() {
            Outcome::Victory
        } else {
            Outcome::Undecided
        };

        if self.outcome.is_terminal() {
            self.turns.finish_active();
            let victory = self.outcome == Outcome::Victory;
            log::info!("game over after round {}: {:?}", self.turns.round(), self.outcome);
            self.messages.push(if victory {
                "Victory! Every enemy has been defeated.".to_string()
            } else {
                "Defeat... the hero has fallen.".to_string()
            });
            self.bus.notify_end(victory);
        }
        self.outcome
    }

    /// Trigger change listeners (for callers sequencing a player turn by hand).
    pub fn notify_changed(&mut self) {
        self.bus.notify_changed();
    }

    pub fn subscribe_changes(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        self.bus.subscribe_changes(listener)
    }

    pub fn subscribe_end(&mut self, listener: impl FnMut(bool) + 'static) -> ListenerId {
        self.bus.subscribe_end(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn roster(&self) -> Vec<Entity> {
        iter::once(self.player)
            .chain(self.enemies.iter().copied())
            .collect()
    }

    pub fn is_player_turn(&self) -> bool {
        self.turns.active() == Some(self.player)
    }

    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    pub fn active(&self) -> Option<Entity> {
        self.turns.active()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn legend(&self) -> &MapLegend {
        &self.legend
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// Enemies still counted as living (defeated ones leave at the next end check)
    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn entity(&self, entity: Entity) -> Option<EntityView> {
        ecs::describe(&self.world, entity)
    }

    pub fn player_view(&self) -> Option<EntityView> {
        self.entity(self.player)
    }

    /// The hero as it stands now, for carrying into the next level
    pub fn hero(&self) -> Option<Hero> {
        self.player_view().map(|view| Hero {
            name: view.name,
            stats: view.stats,
        })
    }

    /// Living actors in the order the next round would run them
    pub fn turn_order(&self) -> Vec<EntityView> {
        turn_system::turn_order(&self.world, &self.roster())
            .into_iter()
            .filter_map(|entity| self.entity(entity))
            .collect()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn render(&self) -> String {
        self.grid.render(&self.legend, |entity| {
            self.world
                .get::<&Actor>(entity)
                .map(|actor| actor.glyph())
                .unwrap_or('?')
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round(),
            active: self.active(),
            outcome: self.outcome,
            board: self.render(),
            entities: self
                .roster()
                .into_iter()
                .filter_map(|entity| self.entity(entity))
                .collect(),
        }
    }
}

fn placement_error(name: &str, at: Position, reason: dungeon::PlacementError) -> GameError {
    GameError::InvalidPlacement {
        name: name.to_string(),
        row: at.row,
        col: at.col,
        reason: reason.to_string(),
    }
}
