// src/dungeon/src/tiles.rs
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// 格子的地形类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// 可通行的空地
    #[default]
    Open,
    /// 墙壁，阻挡移动且永远不会被占据
    Wall,
    /// 陷阱，可通行，进入时造成固定伤害
    Trap,
}

impl CellKind {
    pub fn is_blocking(self) -> bool {
        matches!(self, CellKind::Wall)
    }
}

/// 表示游戏中的一个地图格子
///
/// 占据者只保存实体标识(不拥有实体)，实体本身由会话的 `hecs::World` 持有。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    kind: CellKind,
    occupant: Option<Entity>,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            kind,
            occupant: None,
        }
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// 检查格子是否阻挡移动
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }

    pub fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    pub fn is_vacant(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_occupant(&mut self, entity: Entity) {
        self.occupant = Some(entity);
    }

    pub(crate) fn take_occupant(&mut self) -> Option<Entity> {
        self.occupant.take()
    }
}

/// 地图文本的字符图例
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLegend {
    /// 墙壁字符
    pub wall: char,
    /// 陷阱字符，`None` 表示地图中没有陷阱
    pub trap: Option<char>,
}

impl Default for MapLegend {
    fn default() -> Self {
        Self {
            wall: '#',
            trap: None,
        }
    }
}

impl MapLegend {
    pub fn with_trap(trap: char) -> Self {
        Self {
            trap: Some(trap),
            ..Self::default()
        }
    }

    /// 按图例解析单个字符，未知字符一律视为空地
    pub fn classify(&self, ch: char) -> CellKind {
        if ch == self.wall {
            CellKind::Wall
        } else if Some(ch) == self.trap {
            CellKind::Trap
        } else {
            CellKind::Open
        }
    }

    pub fn glyph(&self, kind: CellKind) -> char {
        match kind {
            CellKind::Open => '.',
            CellKind::Wall => self.wall,
            CellKind::Trap => self.trap.unwrap_or('^'),
        }
    }
}
