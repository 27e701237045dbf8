// src/combat/src/lib.rs
//! 战斗结算、敌人名单解析与敌人行为决策。

pub mod ai;
pub mod combatant;
pub mod enemy;

pub use crate::ai::{EnemyBrain, Intent};
pub use crate::combatant::{Combatant, Fighter, Stats};
pub use crate::enemy::EnemySpec;

/// Handles combat interactions between entities
pub struct Combat;

/// Combat configuration constants
mod constants {
    pub const MIN_DAMAGE: i32 = 1; // Every hit lands for at least this much
}

impl Combat {
    /// `max(1, attack - defense)`
    pub fn damage(attack: i32, defense: i32) -> i32 {
        attack.saturating_sub(defense).max(constants::MIN_DAMAGE)
    }

    /// Resolve a single attack. There are no counterattacks: the defender only
    /// loses health, and `defeated` reports whether it dropped to zero or below.
    pub fn resolve_attack<A, D>(attacker: &A, defender: &mut D) -> CombatResult
    where
        A: Combatant + ?Sized,
        D: Combatant + ?Sized,
    {
        let mut result = CombatResult::new();
        let damage = Self::damage(attacker.attack_power(), defender.defense());
        defender.take_damage(damage);
        result.damage = damage;
        result.log(format!(
            "{} hits {} for {} damage!",
            attacker.name(),
            defender.name(),
            damage
        ));

        if !defender.is_alive() {
            result.log(format!("{} defeated {}!", attacker.name(), defender.name()));
            result.defeated = true;
        }
        log::debug!(
            "{} -> {}: {} damage, {} hp left",
            attacker.name(),
            defender.name(),
            damage,
            defender.hp()
        );

        result
    }
}

/// Combat result with logs for the message panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatResult {
    pub logs: Vec<String>,
    pub damage: i32,
    pub defeated: bool,
}

impl CombatResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: String) {
        self.logs.push(message);
    }
}
