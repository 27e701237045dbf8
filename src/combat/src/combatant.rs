// src/combat/src/combatant.rs
use serde::{Deserialize, Serialize};

/// 玩家和敌人共享的战斗属性
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// 当前生命值，致命一击之后可能短暂为负
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    /// 决定每轮的行动顺序，越大越先
    pub speed: i32,
}

impl Stats {
    pub const fn new(health: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            health,
            attack,
            defense,
            speed,
        }
    }

    /// 生命值 ≤0 视为已被击败
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn apply_damage(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// 四项属性之和(创建英雄时的点数预算)
    /// 按 i64 求和，极端属性值不会溢出
    pub fn total_points(&self) -> i64 {
        [self.health, self.attack, self.defense, self.speed]
            .into_iter()
            .map(i64::from)
            .sum()
    }
}

/// 表示可以参加战斗的活体
pub trait Combatant {
    /// 获取名称
    fn name(&self) -> &str;

    /// 获取当前生命值
    fn hp(&self) -> i32;

    /// 获取基础攻击力
    fn attack_power(&self) -> i32;

    /// 获取防御力
    fn defense(&self) -> i32;

    /// 是否存活
    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// 承受已经结算好的伤害
    fn take_damage(&mut self, amount: i32);
}

/// 借用实体名称和属性的战斗视图
#[derive(Debug)]
pub struct Fighter<'a> {
    name: &'a str,
    stats: &'a mut Stats,
}

impl<'a> Fighter<'a> {
    pub fn new(name: &'a str, stats: &'a mut Stats) -> Self {
        Self { name, stats }
    }
}

impl Combatant for Fighter<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn hp(&self) -> i32 {
        self.stats.health
    }

    fn attack_power(&self) -> i32 {
        self.stats.attack
    }

    fn defense(&self) -> i32 {
        self.stats.defense
    }

    fn take_damage(&mut self, amount: i32) {
        self.stats.apply_damage(amount);
    }
}
