// src/entity/src/roster.rs
//! 实体名册：玩家 + 敌人列表，以及基于网格和彼此位置的移动规则。

use dungeon::{ActorSprite, DungeonRng, Position, SpatialGrid, TileType};
use error::GameError;
use tracing::{debug, trace, warn};

use crate::entity::{Direction, Entity};

/// 名册中的实体标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Player,
    Enemy(usize),
}

/// The player plus every tracked enemy, in spawn order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    player: Entity,
    enemies: Vec<Entity>,
}

impl Roster {
    pub fn new(player: Entity) -> Self {
        Self {
            player,
            enemies: Vec::new(),
        }
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.enemies.get_mut(index)
    }

    pub fn add_enemy(&mut self, enemy: Entity) -> EntityId {
        self.enemies.push(enemy);
        EntityId::Enemy(self.enemies.len() - 1)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        match id {
            EntityId::Player => Some(&self.player),
            EntityId::Enemy(idx) => self.enemies.get(idx),
        }
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match id {
            EntityId::Player => Some(&mut self.player),
            EntityId::Enemy(idx) => self.enemies.get_mut(idx),
        }
    }

    /// 所有实体及其标识
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        std::iter::once((EntityId::Player, &self.player)).chain(
            self.enemies
                .iter()
                .enumerate()
                .map(|(idx, e)| (EntityId::Enemy(idx), e)),
        )
    }

    /// 查询位置上的实体
    pub fn occupant_at(&self, pos: Position) -> Option<EntityId> {
        self.iter()
            .find(|(_, e)| e.position == pos)
            .map(|(id, _)| id)
    }

    /// Whether any entity other than `mover` stands on `pos`.
    pub fn is_occupied_by_other(&self, pos: Position, mover: EntityId) -> bool {
        self.iter().any(|(id, e)| id != mover && e.position == pos)
    }

    /// 移动规则：目标是地面、不是房间里的障碍物、没有其他实体
    pub fn can_move_to(&self, spatial: &SpatialGrid, mover: EntityId, target: Position) -> bool {
        spatial.is_walkable(target) && !self.is_occupied_by_other(target, mover)
    }

    /// Moves one step if the target is free; a blocked move is a no-op.
    pub fn try_move(&mut self, spatial: &SpatialGrid, mover: EntityId, dir: Direction) -> bool {
        let Some(entity) = self.get(mover) else {
            return false;
        };
        let target = dir.apply(entity.position);
        if !self.can_move_to(spatial, mover, target) {
            trace!(?mover, ?dir, ?target, "move blocked");
            return false;
        }
        if let Some(entity) = self.get_mut(mover) {
            entity.position = target;
        }
        true
    }

    /// One-shot random walk: shuffle the four directions and take the first
    /// that is free. Returns the direction taken, if any.
    pub fn wander(
        &mut self,
        spatial: &SpatialGrid,
        index: usize,
        rng: &mut DungeonRng,
    ) -> Option<Direction> {
        let mut directions = Direction::ALL;
        rng.shuffle(&mut directions);
        let mover = EntityId::Enemy(index);
        directions
            .into_iter()
            .find(|&dir| self.try_move(spatial, mover, dir))
    }

    /// Drops enemies whose health reached zero. Returns how many were removed.
    pub fn remove_defeated(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(Entity::is_alive);
        let removed = before - self.enemies.len();
        if removed > 0 {
            debug!(removed, remaining = self.enemies.len(), "despawned defeated enemies");
        }
        removed
    }

    /// Rejection-samples a room cell with no obstacle and no entity on it.
    pub fn find_free_tile(
        &self,
        spatial: &SpatialGrid,
        rng: &mut DungeonRng,
        max_attempts: u32,
    ) -> Result<Position, GameError> {
        if spatial.width() > 0 && spatial.height() > 0 {
            for attempt in 0..max_attempts {
                let pos = Position::new(
                    rng.random_range(0..spatial.width()),
                    rng.random_range(0..spatial.height()),
                );
                if spatial.tile_type(pos) == TileType::Room
                    && !spatial.has_obstacle(pos)
                    && self.occupant_at(pos).is_none()
                {
                    trace!(attempt, ?pos, "found free tile");
                    return Ok(pos);
                }
            }
        }
        warn!(max_attempts, "no free room tile found");
        Err(GameError::NoValidSpawn {
            attempts: max_attempts,
        })
    }

    /// 在空闲房间格子上放置 `count` 个敌人
    pub fn spawn_enemies(
        &mut self,
        spatial: &SpatialGrid,
        count: usize,
        max_health: u32,
        max_attempts: u32,
        rng: &mut DungeonRng,
    ) -> Result<(), GameError> {
        for _ in 0..count {
            let pos = self.find_free_tile(spatial, rng, max_attempts)?;
            let variant = rng.random_range(0..ActorSprite::Enemy.variants());
            self.add_enemy(Entity::enemy(pos, max_health, variant));
        }
        debug!(enemies = self.enemies.len(), "spawned enemies");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon::{DungeonGrid, ObjectKind, Obstacle, ObstacleLayer, Rect};
    use pretty_assertions::assert_eq;

    /// 7x5 房间 + 右侧走廊
    fn arena() -> SpatialGrid {
        let mut grid = DungeonGrid::new(12, 5);
        grid.fill_rect(&Rect::new(0, 0, 7, 5), TileType::Room);
        grid.fill_rect(&Rect::new(7, 2, 5, 1), TileType::Corridor);
        let mut obstacles = ObstacleLayer::empty(12, 5);
        obstacles.place(Position::new(3, 1), Obstacle {
            kind: ObjectKind::Crate,
            variant: 0,
        });
        obstacles.place(Position::new(9, 2), Obstacle {
            kind: ObjectKind::Crate,
            variant: 2,
        });
        SpatialGrid::new(grid, obstacles)
    }

    fn roster_at(x: i32, y: i32) -> Roster {
        Roster::new(Entity::player(Position::new(x, y), 100, 100))
    }

    #[test]
    fn player_moves_onto_free_floor() {
        let spatial = arena();
        let mut roster = roster_at(2, 2);
        assert!(roster.try_move(&spatial, EntityId::Player, Direction::Right));
        assert_eq!(roster.player().position, Position::new(3, 2));
    }

    #[test]
    fn room_obstacles_block() {
        let spatial = arena();
        let mut roster = roster_at(3, 2);
        assert!(!roster.try_move(&spatial, EntityId::Player, Direction::Up));
        assert_eq!(roster.player().position, Position::new(3, 2));
    }

    #[test]
    fn corridor_obstacles_do_not_block() {
        let spatial = arena();
        let mut roster = roster_at(8, 2);
        assert!(roster.try_move(&spatial, EntityId::Player, Direction::Right));
        assert_eq!(roster.player().position, Position::new(9, 2));
    }

    #[test]
    fn empty_tiles_and_map_edges_block() {
        let spatial = arena();
        let mut roster = roster_at(8, 2);
        assert!(!roster.try_move(&spatial, EntityId::Player, Direction::Up));
        let mut edge = roster_at(0, 0);
        assert!(!edge.try_move(&spatial, EntityId::Player, Direction::Left));
        assert!(!edge.try_move(&spatial, EntityId::Player, Direction::Up));
    }

    #[test]
    fn entities_block_each_other_both_ways() {
        let spatial = arena();
        let mut roster = roster_at(1, 1);
        let enemy = roster.add_enemy(Entity::enemy(Position::new(2, 1), 10, 0));

        assert!(!roster.try_move(&spatial, EntityId::Player, Direction::Right));
        assert!(!roster.try_move(&spatial, enemy, Direction::Left));
        // 自己的位置不算占用
        assert!(roster.can_move_to(&spatial, enemy, Position::new(2, 1)));
        assert_eq!(roster.occupant_at(Position::new(2, 1)), Some(enemy));
    }

    #[test]
    fn boxed_in_enemy_stays_put() {
        let mut grid = DungeonGrid::new(3, 3);
        grid.set(Position::new(1, 1), TileType::Room);
        let spatial = SpatialGrid::without_obstacles(grid);
        let mut roster = roster_at(0, 0);
        roster.add_enemy(Entity::enemy(Position::new(1, 1), 10, 0));
        let mut rng = DungeonRng::new(5);
        assert_eq!(roster.wander(&spatial, 0, &mut rng), None);
        assert_eq!(roster.enemies()[0].position, Position::new(1, 1));
    }

    #[test]
    fn wander_takes_the_only_open_direction() {
        let mut grid = DungeonGrid::new(3, 3);
        grid.set(Position::new(1, 1), TileType::Room);
        grid.set(Position::new(1, 2), TileType::Corridor);
        let spatial = SpatialGrid::without_obstacles(grid);
        for seed in 0..16 {
            let mut roster = roster_at(0, 0);
            roster.add_enemy(Entity::enemy(Position::new(1, 1), 10, 0));
            let mut rng = DungeonRng::new(seed);
            assert_eq!(roster.wander(&spatial, 0, &mut rng), Some(Direction::Down));
            assert_eq!(roster.enemies()[0].position, Position::new(1, 2));
        }
    }

    #[test]
    fn wander_is_reproducible_for_a_seed() {
        let spatial = arena();
        let run = |seed| {
            let mut roster = roster_at(0, 0);
            roster.add_enemy(Entity::enemy(Position::new(5, 3), 10, 0));
            let mut rng = DungeonRng::new(seed);
            (0..20)
                .map(|_| roster.wander(&spatial, 0, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(31), run(31));
    }

    #[test]
    fn spawned_enemies_land_on_free_room_tiles() {
        let spatial = arena();
        let mut roster = roster_at(0, 0);
        let mut rng = DungeonRng::new(12);
        roster.spawn_enemies(&spatial, 10, 20, 1_000, &mut rng).unwrap();
        assert_eq!(roster.enemies().len(), 10);
        for (id, entity) in roster.iter().skip(1) {
            assert_eq!(spatial.tile_type(entity.position), TileType::Room);
            assert!(!spatial.has_obstacle(entity.position));
            assert!(!roster.is_occupied_by_other(entity.position, id));
            assert!(entity.texture_variant() < ActorSprite::Enemy.variants());
        }
    }

    #[test]
    fn spawn_search_gives_up_after_the_cap() {
        let spatial = SpatialGrid::without_obstacles(DungeonGrid::new(10, 10));
        let roster = roster_at(0, 0);
        let mut rng = DungeonRng::new(1);
        let err = roster.find_free_tile(&spatial, &mut rng, 50).unwrap_err();
        assert!(matches!(err, GameError::NoValidSpawn { attempts: 50 }));
    }

    #[test]
    fn defeated_enemies_are_removed() {
        let mut roster = roster_at(0, 0);
        roster.add_enemy(Entity::enemy(Position::new(1, 0), 10, 0));
        roster.add_enemy(Entity::enemy(Position::new(2, 0), 10, 0));
        if let Some(enemy) = roster.enemy_mut(0) {
            enemy.reduce_health(10);
        }
        assert_eq!(roster.remove_defeated(), 1);
        assert_eq!(roster.enemies().len(), 1);
        assert_eq!(roster.enemies()[0].position, Position::new(2, 0));
    }
}
