//! 关卡序列
//!
//! 胜利后英雄带着当前属性进入下一关，位置回到出生点；
//! 失败后可以用进入本关时的英雄重试。

use error::GameError;
use hero::Hero;

use crate::config::GameConfig;
use crate::level::Level;
use crate::session::{GameSession, Outcome};

/// Result of asking the campaign to move on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The level is still running or was lost
    Pending,
    /// Index of the level that is now current
    NextLevel(usize),
    Completed,
}

#[derive(Debug, Clone)]
pub struct Campaign {
    config: GameConfig,
    current: usize,
    /// The hero as it entered the current level
    entering: Hero,
    completed: bool,
}

impl Campaign {
    pub fn new(config: GameConfig, hero: Hero) -> error::Result<Self> {
        if config.levels.is_empty() {
            return Err(GameError::NoLevels);
        }
        Ok(Self {
            config,
            current: 0,
            entering: hero,
            completed: false,
        })
    }

    /// Load the current level and populate it with the entering hero.
    pub fn start_level(&self) -> error::Result<GameSession> {
        let source = &self.config.levels[self.current];
        let level = Level::load(&source.map, &source.enemies, &self.config.legend)?;
        log::info!(
            "level {}/{} with {} ({} hp)",
            self.current + 1,
            self.level_count(),
            self.entering.name,
            self.entering.stats.health
        );
        GameSession::new(level, &self.entering, &self.config.session_options())
    }

    /// Reload the current level from scratch.
    pub fn retry(&self) -> error::Result<GameSession> {
        log::info!("retrying level {}", self.current + 1);
        self.start_level()
    }

    /// Carry a won session's hero forward. Anything but a victory leaves the
    /// campaign where it is.
    pub fn advance_level(&mut self, session: &GameSession) -> Progress {
        if self.completed {
            return Progress::Completed;
        }
        if session.outcome() != Outcome::Victory {
            return Progress::Pending;
        }
        let Some(hero) = session.hero() else {
            return Progress::Pending;
        };

        if self.current + 1 >= self.level_count() {
            self.completed = true;
            log::info!("campaign complete");
            return Progress::Completed;
        }
        self.current += 1;
        self.entering = hero;
        Progress::NextLevel(self.current)
    }

    pub fn level_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.config.levels.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn hero(&self) -> &Hero {
        &self.entering
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
