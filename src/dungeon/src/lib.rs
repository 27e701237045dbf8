//src/dungeon/src/lib.rs
//! 地牢地图：由文本加载的二维格子矩阵，每个格子可被一个实体占据。

pub mod grid;
pub mod position;
pub mod tiles;

pub use crate::grid::{Grid, PlacementError};
pub use crate::position::{Direction, Position};
pub use crate::tiles::{Cell, CellKind, MapLegend};
