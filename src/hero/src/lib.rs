// src/hero/src/lib.rs
//! 英雄创建：名字加四项属性，总点数受预算限制。

use combat::Stats;
use error::GameError;
use serde::{Deserialize, Serialize};

/// 创建英雄时可分配的默认点数上限
pub const MAX_STAT_POINTS: i32 = 80;

/// 玩家控制的角色，跨关卡保留当前属性
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub stats: Stats,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            name: "Hero".to_string(),
            stats: Stats::new(50, 10, 5, 5),
        }
    }
}

impl Hero {
    /// 校验后创建英雄：名字非空、每项属性为正、总和不超过 `max_points`
    pub fn new(name: &str, stats: Stats, max_points: i32) -> error::Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidHero("name must not be empty".to_string()));
        }

        let fields = [
            ("health", stats.health),
            ("attack", stats.attack),
            ("defense", stats.defense),
            ("speed", stats.speed),
        ];
        if let Some((field, value)) = fields.iter().find(|(_, value)| *value <= 0) {
            return Err(GameError::InvalidHero(format!(
                "{field} must be positive, got {value}"
            )));
        }

        let total = stats.total_points();
        if total > i64::from(max_points) {
            return Err(GameError::InvalidHero(format!(
                "assigned {total} points, the maximum is {max_points}"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            stats,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }
}
