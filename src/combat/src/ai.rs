// src/combat/src/ai.rs
//! 敌人行为：视野内贪心逼近玩家，视野外随机游走。

use dungeon::{Direction, Grid, Position};
use rand::Rng;
use rand::seq::SliceRandom;
use strum::IntoEnumIterator;

/// 敌人本回合的意图，由调用方负责执行
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// 攻击相邻(含斜向)的玩家
    Attack,
    /// 移动到目标格子
    MoveTo(Position),
    /// 本回合不行动
    Wait,
}

/// 敌人的决策逻辑，不修改任何状态
pub struct EnemyBrain;

impl EnemyBrain {
    pub fn decide<R: Rng + ?Sized>(
        me: Position,
        vision: i32,
        player: Position,
        grid: &Grid,
        rng: &mut R,
    ) -> Intent {
        if me.manhattan(player) <= vision {
            Self::pursue(me, player, grid)
        } else {
            Self::wander(me, grid, rng)
        }
    }

    /// 朝玩家走一步，不做寻路
    fn pursue(me: Position, player: Position, grid: &Grid) -> Intent {
        let target = me.step_toward(player);
        if target == player {
            Intent::Attack
        } else if grid.is_walkable(target) {
            Intent::MoveTo(target)
        } else {
            Intent::Wait
        }
    }

    fn wander<R: Rng + ?Sized>(me: Position, grid: &Grid, rng: &mut R) -> Intent {
        let mut directions: Vec<Direction> = Direction::iter().collect();
        directions.shuffle(rng);
        directions
            .into_iter()
            .map(|direction| me.step(direction))
            .find(|&target| grid.is_walkable(target))
            .map_or(Intent::Wait, Intent::MoveTo)
    }
}
