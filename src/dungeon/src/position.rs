// src/dungeon/src/position.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// 地图坐标(行, 列)，行 0 是地图文件的第一行非空文本
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// 坐标溢出时返回 `None`
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Self> {
        Some(Self::new(
            self.row.checked_add(d_row)?,
            self.col.checked_add(d_col)?,
        ))
    }

    /// 单格位移，坐标在 i32 边界处饱和
    fn nudge(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.nudge(d_row, d_col)
    }

    /// 曼哈顿距离
    pub fn manhattan(self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// 两个轴各自朝目标前进一格(可能是斜向)
    pub fn step_toward(self, target: Position) -> Self {
        self.nudge(
            (target.row - self.row).signum(),
            (target.col - self.col).signum(),
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 四个轴向移动方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// (行增量, 列增量)
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }
}
