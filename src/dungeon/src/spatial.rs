// src/dungeon/src/spatial.rs
use serde::{Deserialize, Serialize};

use crate::grid::{DungeonGrid, Position, TileType};
use crate::obstacles::{Obstacle, ObstacleLayer};

/// Tile grid plus obstacle layer: the read model movement and rendering query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialGrid {
    grid: DungeonGrid,
    obstacles: ObstacleLayer,
}

impl SpatialGrid {
    pub fn new(grid: DungeonGrid, obstacles: ObstacleLayer) -> Self {
        Self { grid, obstacles }
    }

    /// 没有障碍物的网格
    pub fn without_obstacles(grid: DungeonGrid) -> Self {
        let obstacles = ObstacleLayer::empty(grid.width(), grid.height());
        Self { grid, obstacles }
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &DungeonGrid {
        &self.grid
    }

    pub fn obstacles(&self) -> &ObstacleLayer {
        &self.obstacles
    }

    /// 清除格子上的障碍物
    pub fn clear_obstacle(&mut self, pos: Position) -> Option<Obstacle> {
        self.obstacles.remove(pos)
    }

    /// 格子类型，越界为 Empty
    pub fn tile_type(&self, pos: Position) -> TileType {
        self.grid.get(pos)
    }

    pub fn has_obstacle(&self, pos: Position) -> bool {
        self.obstacles.has_obstacle(pos)
    }

    pub fn obstacle_at(&self, pos: Position) -> Option<Obstacle> {
        self.obstacles.get(pos)
    }

    /// Floor that is not an obstacle-occupied room tile.
    ///
    /// Obstacles only block inside rooms; a corridor cell stays walkable
    /// whatever the obstacle layer holds there.
    pub fn is_walkable(&self, pos: Position) -> bool {
        match self.tile_type(pos) {
            TileType::Empty => false,
            TileType::Room => !self.has_obstacle(pos),
            TileType::Corridor => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::ObjectKind;
    use crate::rooms::Rect;

    fn crate_at(layer: &mut ObstacleLayer, x: i32, y: i32) {
        layer.place(Position::new(x, y), Obstacle {
            kind: ObjectKind::Crate,
            variant: 1,
        });
    }

    #[test]
    fn obstacles_block_rooms_but_not_corridors() {
        let mut grid = DungeonGrid::new(6, 3);
        grid.fill_rect(&Rect::new(0, 0, 3, 3), TileType::Room);
        grid.fill_rect(&Rect::new(3, 1, 3, 1), TileType::Corridor);
        let mut layer = ObstacleLayer::empty(6, 3);
        crate_at(&mut layer, 1, 1);
        crate_at(&mut layer, 4, 1);
        crate_at(&mut layer, 4, 0);
        let spatial = SpatialGrid::new(grid, layer);

        assert!(!spatial.is_walkable(Position::new(1, 1)));
        assert!(spatial.is_walkable(Position::new(0, 1)));
        assert!(spatial.is_walkable(Position::new(4, 1)));
        // 空格子上的障碍物也不改变结果
        assert!(!spatial.is_walkable(Position::new(4, 0)));
        assert!(spatial.has_obstacle(Position::new(4, 0)));
    }

    #[test]
    fn outside_reads_are_empty_and_clear() {
        let spatial = SpatialGrid::without_obstacles(DungeonGrid::new(2, 2));
        let outside = Position::new(-4, 9);
        assert_eq!(spatial.tile_type(outside), TileType::Empty);
        assert!(!spatial.has_obstacle(outside));
        assert!(spatial.obstacle_at(outside).is_none());
        assert!(!spatial.is_walkable(outside));
    }
}
