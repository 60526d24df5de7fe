//! Test helpers: a small hand-built dungeon and a config that always generates.

#![allow(dead_code)]

use bsp_dungeon::config::GameConfig;
use bsp_dungeon::simulation::SimulationState;
use dungeon::{
    Dungeon, DungeonConfig, DungeonGrid, ObjectKind, Obstacle, ObstacleLayer, Position, Rect,
    SpatialGrid, TileType,
};
use entity::{Entity, Roster};

pub const ARENA_SEED: u64 = 7;

/// Two rooms joined by a corridor (`x` marks crates):
///
/// ```text
///      0123456789AB
/// y=0  ############
/// y=1  #.....######
/// y=2  #x....###...
/// y=3  #..>..,x,.<.
/// y=4  #.....###...
/// y=5  #.....######
/// y=6  ############
/// ```
///
/// Room A (1,1,5,5) is the exit room, room B (9,2,3,3) the spawn room.
/// The crate at (7,3) lies in the corridor and does not block.
pub fn arena() -> Dungeon {
    let mut grid = DungeonGrid::new(12, 7);
    let room_a = Rect::new(1, 1, 5, 5);
    let room_b = Rect::new(9, 2, 3, 3);
    grid.fill_rect(&Rect::new(6, 3, 3, 1), TileType::Corridor);
    grid.fill_rect(&room_a, TileType::Room);
    grid.fill_rect(&room_b, TileType::Room);

    let mut obstacles = ObstacleLayer::empty(12, 7);
    for pos in [Position::new(1, 2), Position::new(7, 3)] {
        obstacles.place(pos, Obstacle {
            kind: ObjectKind::Crate,
            variant: 1,
        });
    }

    Dungeon::from_layout(
        ARENA_SEED,
        SpatialGrid::new(grid, obstacles),
        vec![room_a, room_b],
        ObstacleLayer::empty(12, 7),
    )
    .expect("arena has rooms")
}

/// Arena with the player on the spawn point and the given enemies.
pub fn arena_state(enemies: &[Position]) -> SimulationState {
    let dungeon = arena();
    let mut roster = Roster::new(Entity::player(dungeon.spawn, 100, 100));
    for (idx, &pos) in enemies.iter().enumerate() {
        roster.add_enemy(Entity::enemy(pos, 30, idx as u32 % 3));
    }
    SimulationState::from_parts(dungeon, roster)
}

/// A small three-level dungeon with the default enemy roster.
pub fn small_config(seed: u64) -> GameConfig {
    GameConfig {
        dungeon: DungeonConfig {
            width: 48,
            height: 36,
            splitting_iterations: 3,
            split_range: 0.5,
            corridor_width: 3,
            seed: Some(seed),
        },
        ..GameConfig::default()
    }
}
