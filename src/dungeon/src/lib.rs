//src/dungeon/src/lib.rs
//! 地牢生成：BSP 分割、房间与走廊、障碍物层、贴图变体。
//!
//! [`Dungeon::generate`] 把各部分组装成一个只读的地牢，
//! 出生点取面积最小的房间中心，出口取面积最大的房间中心。

use error::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod bsp;
pub mod grid;
pub mod obstacles;
pub mod rng;
pub mod rooms;
pub mod spatial;
pub mod variants;

pub use crate::bsp::{DungeonConfig, GeneratedLayout, MIN_LEAF_SIDE};
pub use crate::grid::{DungeonGrid, Position, TileType};
pub use crate::obstacles::{ObjectKind, Obstacle, ObstacleConfig, ObstacleLayer};
pub use crate::rng::DungeonRng;
pub use crate::rooms::{Rect, RoomRect};
pub use crate::spatial::SpatialGrid;
pub use crate::variants::{ActorSprite, TextureFields, TileTexture, VariantField};

/// 生成完成后的地牢（生成后不可变）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub seed: u64,
    pub rooms: Vec<RoomRect>,
    pub spawn: Position,
    pub exit: Position,
    spatial: SpatialGrid,
    decorations: ObstacleLayer,
    textures: TextureFields,
}

impl Dungeon {
    /// 生成一层地牢
    pub fn generate(
        config: &DungeonConfig,
        obstacles: &ObstacleConfig,
        decorations: &ObstacleConfig,
    ) -> Result<Self, ConfigurationError> {
        let layout = bsp::generate(config)?;
        let seed = layout.seed;
        let (width, height) = (config.width, config.height);

        let obstacle_layer = ObstacleLayer::scatter(width, height, obstacles, seed.wrapping_add(3))?;
        let decoration_layer =
            ObstacleLayer::scatter(width, height, decorations, seed.wrapping_add(4))?;

        let dungeon = Self::from_layout(
            seed,
            SpatialGrid::new(layout.grid, obstacle_layer),
            layout.rooms,
            decoration_layer,
        )?;
        info!(
            seed,
            spawn = ?dungeon.spawn,
            exit = ?dungeon.exit,
            obstacles = dungeon.spatial.obstacles().count(),
            "dungeon ready"
        );
        Ok(dungeon)
    }

    /// 由现成的网格和房间组装（测试与工具使用）
    pub fn from_layout(
        seed: u64,
        mut spatial: SpatialGrid,
        rooms: Vec<RoomRect>,
        decorations: ObstacleLayer,
    ) -> Result<Self, ConfigurationError> {
        let (spawn_room, exit_room) =
            rooms::spawn_and_exit(&rooms).ok_or(ConfigurationError::NoRooms)?;
        let (spawn, exit) = (spawn_room.center(), exit_room.center());
        // spawn and exit must stay reachable
        for pos in [spawn, exit] {
            if spatial.clear_obstacle(pos).is_some() {
                debug!(?pos, "cleared obstacle under spawn/exit");
            }
        }
        let textures = TextureFields::generate(spatial.width(), spatial.height(), seed);
        Ok(Self {
            seed,
            spawn,
            exit,
            rooms,
            spatial,
            decorations,
            textures,
        })
    }

    pub fn width(&self) -> i32 {
        self.spatial.width()
    }

    pub fn height(&self) -> i32 {
        self.spatial.height()
    }

    pub fn spatial(&self) -> &SpatialGrid {
        &self.spatial
    }

    pub fn tile_type(&self, pos: Position) -> TileType {
        self.spatial.tile_type(pos)
    }

    pub fn has_obstacle(&self, pos: Position) -> bool {
        self.spatial.has_obstacle(pos)
    }

    /// Blocking object on a room tile, as the renderer should show it.
    pub fn obstacle_at(&self, pos: Position) -> Option<Obstacle> {
        if self.tile_type(pos) == TileType::Room {
            self.spatial.obstacle_at(pos)
        } else {
            None
        }
    }

    /// 装饰物（只在房间里显示，不挡路）
    pub fn decoration_at(&self, pos: Position) -> Option<Obstacle> {
        if self.tile_type(pos) == TileType::Room {
            self.decorations.get(pos)
        } else {
            None
        }
    }

    pub fn tile_variant(&self, pos: Position) -> u32 {
        self.textures.variant(self.tile_type(pos), pos)
    }

    /// 文本形式的地图：`#` 空、`.` 房间、`,` 走廊、`x` 房间障碍物、`<` 出生点、`>` 出口
    pub fn ascii_rows(&self) -> Vec<String> {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| {
                        let pos = Position::new(x, y);
                        if pos == self.spawn {
                            '<'
                        } else if pos == self.exit {
                            '>'
                        } else if self.obstacle_at(pos).is_some() {
                            'x'
                        } else {
                            match self.tile_type(pos) {
                                TileType::Empty => '#',
                                TileType::Room => '.',
                                TileType::Corridor => ',',
                            }
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn summary(&self) -> DungeonSummary {
        DungeonSummary {
            seed: self.seed,
            width: self.width(),
            height: self.height(),
            rooms: self.rooms.clone(),
            spawn: self.spawn,
            exit: self.exit,
            rows: self.ascii_rows(),
        }
    }
}

/// `--dump` 输出的地牢概要
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonSummary {
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub rooms: Vec<RoomRect>,
    pub spawn: Position,
    pub exit: Position,
    pub rows: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> DungeonConfig {
        DungeonConfig {
            width: 40,
            height: 30,
            splitting_iterations: 3,
            split_range: 0.5,
            corridor_width: 3,
            seed: Some(seed),
        }
    }

    #[test]
    fn spawn_and_exit_are_room_centers() {
        let dungeon = Dungeon::generate(
            &small_config(4),
            &ObstacleConfig::default(),
            &ObstacleConfig::decorations(),
        )
        .unwrap();
        let smallest = dungeon.rooms.iter().map(|r| r.area()).min().unwrap();
        let largest = dungeon.rooms.iter().map(|r| r.area()).max().unwrap();
        assert!(dungeon
            .rooms
            .iter()
            .any(|r| r.area() == smallest && r.center() == dungeon.spawn));
        assert!(dungeon
            .rooms
            .iter()
            .any(|r| r.area() == largest && r.center() == dungeon.exit));
        assert_eq!(dungeon.tile_type(dungeon.spawn), TileType::Room);
        assert_eq!(dungeon.tile_type(dungeon.exit), TileType::Room);
    }

    #[test]
    fn obstacles_are_only_reported_on_room_tiles() {
        let everywhere = ObstacleConfig {
            fill: 1.0,
            ..ObstacleConfig::default()
        };
        let dungeon =
            Dungeon::generate(&small_config(8), &everywhere, &ObstacleConfig::decorations())
                .unwrap();
        for pos in dungeon.spatial().grid().positions() {
            if pos == dungeon.spawn || pos == dungeon.exit {
                assert!(!dungeon.has_obstacle(pos));
                continue;
            }
            let on_room = dungeon.tile_type(pos) == TileType::Room;
            assert_eq!(dungeon.obstacle_at(pos).is_some(), on_room);
            // 矩阵层面每个格子都有物体
            assert!(dungeon.has_obstacle(pos));
        }
    }

    #[test]
    fn ascii_rows_match_dimensions() {
        let dungeon = Dungeon::generate(
            &small_config(1),
            &ObstacleConfig::default(),
            &ObstacleConfig::decorations(),
        )
        .unwrap();
        let rows = dungeon.ascii_rows();
        assert_eq!(rows.len(), 30);
        assert!(rows.iter().all(|r| r.chars().count() == 40));
        assert_eq!(rows.iter().map(|r| r.matches('<').count()).sum::<usize>(), 1);
    }

    #[test]
    fn empty_room_list_is_rejected() {
        let spatial = SpatialGrid::without_obstacles(DungeonGrid::new(5, 5));
        assert_eq!(
            Dungeon::from_layout(0, spatial, Vec::new(), ObstacleLayer::empty(5, 5)),
            Err(ConfigurationError::NoRooms)
        );
    }
}
