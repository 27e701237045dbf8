//! 游戏配置 (JSON)
//!
//! 所有字段都有默认值，配置文件只需写出要覆盖的部分：
//!
//! ```json
//! {
//!   "hero": { "name": "Ana", "health": 50, "attack": 10, "defense": 5, "speed": 5 },
//!   "legend": { "wall": "#", "trap": "^" },
//!   "levels": [ { "map": "levels/1.map", "enemies": "levels/1.enemies" } ],
//!   "seed": 42
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use combat::Stats;
use dungeon::{MapLegend, Position};
use error::GameError;
use hero::{Hero, MAX_STAT_POINTS};
use serde::{Deserialize, Serialize};

use crate::session::{DEFAULT_TRAP_DAMAGE, SessionOptions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub name: String,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        let hero = Hero::default();
        Self {
            name: hero.name,
            health: hero.stats.health,
            attack: hero.stats.attack,
            defense: hero.stats.defense,
            speed: hero.stats.speed,
        }
    }
}

/// 一个关卡：地图文件和敌人名单文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSource {
    pub map: PathBuf,
    pub enemies: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hero: HeroConfig,
    pub max_stat_points: i32,
    pub spawn: Position,
    pub legend: MapLegend,
    pub trap_damage: i32,
    pub levels: Vec<LevelSource>,
    /// 固定种子便于复现敌人的随机游走
    pub seed: Option<u64>,
    /// 敌人行动之间的展示延迟，不影响结算顺序
    pub enemy_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hero: HeroConfig::default(),
            max_stat_points: MAX_STAT_POINTS,
            spawn: Position::new(1, 1),
            legend: MapLegend::default(),
            trap_damage: DEFAULT_TRAP_DAMAGE,
            levels: Vec::new(),
            seed: None,
            enemy_delay_ms: 300,
        }
    }
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> error::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GameError::resource(path, e))?;
        let config = Self::from_json(&text)?;
        log::info!(
            "loaded config {} ({} levels)",
            path.display(),
            config.levels.len()
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> error::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.trap_damage < 0 {
            log::warn!("negative trap_damage {} heals on entry", config.trap_damage);
        }
        Ok(config)
    }

    /// 按属性预算校验后的英雄
    pub fn hero(&self) -> error::Result<Hero> {
        let HeroConfig {
            name,
            health,
            attack,
            defense,
            speed,
        } = &self.hero;
        Hero::new(
            name,
            Stats::new(*health, *attack, *defense, *speed),
            self.max_stat_points,
        )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            spawn: self.spawn,
            trap_damage: self.trap_damage,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = GameConfig::from_json(
            r#"{
                "hero": { "name": "Ana", "attack": 12 },
                "legend": { "trap": "^" },
                "levels": [ { "map": "a.map", "enemies": "a.txt" } ],
                "seed": 9
            }"#,
        )
        .unwrap();

        let hero = config.hero().unwrap();
        assert_eq!(hero.name, "Ana");
        assert_eq!(hero.stats, Stats::new(50, 12, 5, 5));
        assert_eq!(config.legend.trap, Some('^'));
        assert_eq!(config.legend.wall, '#');
        assert_eq!(config.levels.len(), 1);
        assert_eq!(config.session_options().seed, Some(9));
        assert_eq!(config.session_options().spawn, Position::new(1, 1));
    }

    #[test]
    fn hero_over_budget_is_rejected() {
        let config =
            GameConfig::from_json(r#"{ "hero": { "health": 70 }, "max_stat_points": 80 }"#)
                .unwrap();
        assert!(matches!(config.hero(), Err(GameError::InvalidHero(_))));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            GameConfig::from_json("{ levels: oops"),
            Err(GameError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "enemy_delay_ms": 0, "trap_damage": 3 }}"#).unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.enemy_delay_ms, 0);
        assert_eq!(config.trap_damage, 3);

        let missing = GameConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(GameError::ResourceError { .. })));
    }
}
