// src/dungeon/src/grid.rs
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rooms::Rect;

/// 网格坐标（地图坐标系，x 向右，y 向下）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 按偏移量平移
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// 格子类型，数值与生成器输出一致
#[repr(u8)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum TileType {
    #[default]
    Empty = 0,
    Room = 1,
    Corridor = 2,
}

impl TileType {
    /// 可以站立的格子（房间或走廊）
    pub fn is_floor(self) -> bool {
        !matches!(self, TileType::Empty)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// 格子总数，按 usize 计算（负尺寸按 0 处理）
pub(crate) fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

/// 地牢格子矩阵，每个格子一个 `TileType`
///
/// Generation writes into it through [`DungeonGrid::fill_rect`]; after that
/// the grid is only read. Reads outside the bounds report `Empty`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonGrid {
    width: i32,
    height: i32,
    cells: Vec<TileType>,
}

impl DungeonGrid {
    /// 创建全部为 Empty 的网格
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![TileType::Empty; cell_count(width, height)],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// 查询格子类型，越界返回 Empty
    pub fn get(&self, pos: Position) -> TileType {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .unwrap_or(TileType::Empty)
    }

    pub fn set(&mut self, pos: Position, tile: TileType) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = tile;
        }
    }

    /// Paints `rect` with `tile`, clipped to the grid.
    pub fn fill_rect(&mut self, rect: &Rect, tile: TileType) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.width).min(self.width);
        let y1 = (rect.y + rect.height).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = y as usize * self.width as usize + x as usize;
                self.cells[idx] = tile;
            }
        }
    }

    /// 遍历所有坐标（行优先）
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    pub fn cells(&self) -> &[TileType] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_count_does_not_overflow_i32() {
        assert_eq!(cell_count(50_000, 50_000), 2_500_000_000);
        assert_eq!(cell_count(-3, 10), 0);
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let mut grid = DungeonGrid::new(4, 3);
        grid.set(Position::new(0, 0), TileType::Room);
        assert_eq!(grid.get(Position::new(0, 0)), TileType::Room);
        assert_eq!(grid.get(Position::new(-1, 0)), TileType::Empty);
        assert_eq!(grid.get(Position::new(4, 0)), TileType::Empty);
        assert_eq!(grid.get(Position::new(0, 3)), TileType::Empty);
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut grid = DungeonGrid::new(5, 5);
        grid.fill_rect(&Rect::new(-2, 3, 4, 10), TileType::Corridor);
        // x ∈ [0, 2), y ∈ [3, 5)
        assert_eq!(grid.count(TileType::Corridor), 4);
        assert_eq!(grid.get(Position::new(1, 4)), TileType::Corridor);
        assert_eq!(grid.get(Position::new(2, 4)), TileType::Empty);
    }

    #[test]
    fn tile_values_match_generator_codes() {
        assert_eq!(TileType::Empty.as_u8(), 0);
        assert_eq!(TileType::Room.as_u8(), 1);
        assert_eq!(TileType::Corridor.as_u8(), 2);
        assert!(TileType::Corridor.is_floor());
        assert!(!TileType::Empty.is_floor());
    }
}
