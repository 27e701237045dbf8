// src/dungeon/src/grid.rs
use std::io::Read;

use error::GameError;
use hecs::Entity;
use thiserror::Error;

use crate::position::Position;
use crate::tiles::{Cell, CellKind, MapLegend};

/// 放置或移动实体失败的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("position is outside the map")]
    OutOfBounds,
    #[error("cell is a wall")]
    Wall,
    #[error("cell is already occupied")]
    Occupied,
    #[error("source cell has no occupant")]
    NoOccupant,
}

/// 矩形格子矩阵，加载后尺寸固定，按 (行, 列) 索引
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// 从地图文本构建网格
    ///
    /// 每个非空行是一行格子，宽度取最长的行；短行末尾之外的格子为空地。
    pub fn parse(text: &str, legend: &MapLegend) -> error::Result<Self> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        if lines.is_empty() {
            return Err(GameError::FormatError("map contains no rows".to_string()));
        }

        let cols = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let mut cells = Vec::with_capacity(lines.len() * cols);
        for line in &lines {
            let mut chars = line.chars();
            for _ in 0..cols {
                let kind = chars.next().map_or(CellKind::Open, |ch| legend.classify(ch));
                cells.push(Cell::new(kind));
            }
        }

        Ok(Self {
            cells,
            rows: lines.len(),
            cols,
        })
    }

    /// 从任意读取源加载地图，读取失败或非 UTF-8 内容视为格式错误
    pub fn from_reader<R: Read>(mut reader: R, legend: &MapLegend) -> error::Result<Self> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| GameError::FormatError(format!("unreadable map: {e}")))?;
        Self::parse(&text, legend)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.row as usize * self.cols + pos.col as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    pub fn kind(&self, pos: Position) -> Option<CellKind> {
        self.cell(pos).map(Cell::kind)
    }

    /// 越界位置不算阻挡，调用方需要单独检查 `in_bounds`
    pub fn is_blocking(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(Cell::is_blocking)
    }

    pub fn occupant(&self, pos: Position) -> Option<Entity> {
        self.cell(pos).and_then(Cell::occupant)
    }

    /// 在界内、非墙壁且无人占据
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos)
            .is_some_and(|cell| !cell.is_blocking() && cell.is_vacant())
    }

    fn check_enterable(&self, pos: Position) -> Result<(), PlacementError> {
        let cell = self.cell(pos).ok_or(PlacementError::OutOfBounds)?;
        if cell.is_blocking() {
            Err(PlacementError::Wall)
        } else if !cell.is_vacant() {
            Err(PlacementError::Occupied)
        } else {
            Ok(())
        }
    }

    /// 把实体放入格子，返回进入的地形类型(调用方据此结算陷阱)
    pub fn place(&mut self, entity: Entity, pos: Position) -> Result<CellKind, PlacementError> {
        self.check_enterable(pos)?;
        let cell = self.cell_mut(pos).ok_or(PlacementError::OutOfBounds)?;
        cell.set_occupant(entity);
        Ok(cell.kind())
    }

    /// 清空格子并返回原占据者
    pub fn vacate(&mut self, pos: Position) -> Option<Entity> {
        self.cell_mut(pos).and_then(Cell::take_occupant)
    }

    /// 把 `from` 的占据者移动到 `to`，目标不可进入时两个格子都保持不变
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<CellKind, PlacementError> {
        self.check_enterable(to)?;
        let entity = self.vacate(from).ok_or(PlacementError::NoOccupant)?;
        self.place(entity, to)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| Position::new(row as i32, col as i32))
        })
    }

    /// 所有被占据的格子
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Entity)> + '_ {
        self.positions()
            .filter_map(|pos| self.occupant(pos).map(|entity| (pos, entity)))
    }

    /// 以文本形式绘制网格，占据者的字符由 `glyph` 决定
    pub fn render(&self, legend: &MapLegend, glyph: impl Fn(Entity) -> char) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for (i, cell) in self.cells.iter().enumerate() {
            let ch = match cell.occupant() {
                Some(entity) => glyph(entity),
                None => legend.glyph(cell.kind()),
            };
            out.push(ch);
            if (i + 1) % self.cols == 0 {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn legend() -> MapLegend {
        MapLegend::default()
    }

    #[test]
    fn parse_skips_blank_lines_and_pads_short_rows() {
        let grid = Grid::parse("\n#####\n#..\n\n#...#\n", &legend()).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.kind(Position::new(1, 4)), Some(CellKind::Open));
        assert_eq!(grid.kind(Position::new(2, 4)), Some(CellKind::Wall));
        assert_eq!(grid.render(&legend(), |_| '?'), "#####\n#....\n#...#\n");
    }

    #[test]
    fn empty_map_is_a_format_error() {
        let err = Grid::parse("\n   \n", &legend()).unwrap_err();
        assert!(matches!(err, GameError::FormatError(_)));
    }

    #[test]
    fn unreadable_reader_is_a_format_error() {
        let bytes: &[u8] = &[0xff, 0xfe, b'#'];
        let err = Grid::from_reader(bytes, &legend()).unwrap_err();
        assert!(matches!(err, GameError::FormatError(_)));
    }

    #[test]
    fn bounds() {
        let grid = Grid::parse("...\n...", &legend()).unwrap();
        assert!(grid.in_bounds(Position::new(1, 2)));
        assert!(!grid.in_bounds(Position::new(2, 0)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
        assert!(!grid.is_walkable(Position::new(-1, 0)));
    }

    #[test]
    fn place_relocate_and_vacate() {
        let mut world = World::new();
        let hero = world.spawn(("hero",));
        let rat = world.spawn(("rat",));
        let mut grid = Grid::parse("#...\n#..^", &MapLegend::with_trap('^')).unwrap();

        assert_eq!(grid.place(hero, Position::new(0, 0)), Err(PlacementError::Wall));
        assert_eq!(grid.place(hero, Position::new(0, 1)), Ok(CellKind::Open));
        assert_eq!(grid.place(rat, Position::new(0, 1)), Err(PlacementError::Occupied));
        assert_eq!(grid.place(rat, Position::new(5, 1)), Err(PlacementError::OutOfBounds));
        assert_eq!(grid.place(rat, Position::new(0, 2)), Ok(CellKind::Open));

        // 目标被占据时原格子保持不变
        assert_eq!(
            grid.relocate(Position::new(0, 1), Position::new(0, 2)),
            Err(PlacementError::Occupied)
        );
        assert_eq!(grid.occupant(Position::new(0, 1)), Some(hero));

        assert_eq!(
            grid.relocate(Position::new(0, 2), Position::new(1, 3)),
            Ok(CellKind::Trap)
        );
        assert!(grid.cell(Position::new(0, 2)).unwrap().is_vacant());
        assert_eq!(grid.vacate(Position::new(1, 3)), Some(rat));
        assert_eq!(grid.occupied().collect::<Vec<_>>(), vec![(Position::new(0, 1), hero)]);
    }

    proptest! {
        #[test]
        fn walls_match_hash_characters(lines in proptest::collection::vec("[#.x ]{0,11}[#.x]", 1..8)) {
            let text = lines.join("\n");
            let grid = Grid::parse(&text, &legend()).unwrap();
            let width = lines.iter().map(|l| l.chars().count()).max().unwrap();
            prop_assert_eq!(grid.rows(), lines.len());
            prop_assert_eq!(grid.cols(), width);
            for (row, line) in lines.iter().enumerate() {
                for col in 0..width {
                    let expected = line.chars().nth(col) == Some('#');
                    prop_assert_eq!(grid.is_blocking(Position::new(row as i32, col as i32)), expected);
                }
            }
        }
    }
}
