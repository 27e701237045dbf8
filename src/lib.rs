//! 回合制地牢引擎
//!
//! 工作区子 crate 负责数据与规则 (`dungeon` 网格、`combat` 战斗与敌人行为、
//! `hero` 英雄创建、`error` 错误类型)，本 crate 把它们组合成可驱动的游戏会话。

pub mod campaign;
pub mod config;
pub mod ecs;
pub mod event_bus;
pub mod input;
pub mod level;
pub mod session;
pub mod systems;
pub mod turn_system;

pub use combat;
pub use dungeon;
pub use error;
pub use hero;

pub use crate::campaign::{Campaign, Progress};
pub use crate::config::{GameConfig, HeroConfig, LevelSource};
pub use crate::ecs::{Actor, EntityView, Role};
pub use crate::event_bus::{EventBus, ListenerId};
pub use crate::input::Command;
pub use crate::level::Level;
pub use crate::session::{GameSession, Outcome, SessionOptions, Snapshot, TurnState};
pub use crate::turn_system::TurnSystem;
