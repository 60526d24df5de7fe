// src/dungeon/src/obstacles.rs
//! 障碍物层
//!
//! 与格子矩阵平行的一层，每个格子要么为空，要么放着一个物体及其贴图变体。
//! 布置时不看格子类型；只有房间里的障碍物会挡路（见 `SpatialGrid`）。

use error::ConfigurationError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::grid::{Position, cell_count};
use crate::rng::DungeonRng;
use crate::variants::VariantField;

/// Keeps the fill draws off the stream the variant fields use.
const FILL_STREAM: u64 = 0x6F62_7374_6163_6C65;

/// 物体种类
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ObjectKind {
    Crate,
    Bones,
    Cobweb,
}

impl ObjectKind {
    pub const fn variants(self) -> u32 {
        match self {
            ObjectKind::Crate => 4,
            ObjectKind::Bones => 2,
            ObjectKind::Cobweb => 2,
        }
    }
}

/// 一个格子上的物体
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObjectKind,
    pub variant: u32,
}

/// 障碍物布置参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub kinds: Vec<ObjectKind>,
    /// 每个格子放置物体的概率
    pub fill: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            kinds: vec![ObjectKind::Crate],
            fill: 0.25,
        }
    }
}

impl ObstacleConfig {
    /// 装饰层：稀疏、不挡路
    pub fn decorations() -> Self {
        Self {
            kinds: vec![ObjectKind::Bones, ObjectKind::Cobweb],
            fill: 0.02,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.fill) {
            return Err(ConfigurationError::InvalidFill(self.fill));
        }
        Ok(())
    }
}

/// `Option<Obstacle>` per cell; outside the bounds there is never one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleLayer {
    width: i32,
    height: i32,
    cells: Vec<Option<Obstacle>>,
}

impl ObstacleLayer {
    pub fn empty(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![None; cell_count(width, height)],
        }
    }

    /// Scatters objects independently per cell with probability `fill`.
    ///
    /// Every kind gets its own variant field seeded with `seed`; the kind
    /// for a placed cell is drawn uniformly when more than one is configured.
    pub fn scatter(
        width: i32,
        height: i32,
        config: &ObstacleConfig,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let mut layer = Self::empty(width, height);
        if config.kinds.is_empty() {
            return Ok(layer);
        }

        let fields: Vec<VariantField> = config
            .kinds
            .iter()
            .map(|kind| VariantField::generate(width, height, kind.variants(), seed))
            .collect();

        let mut rng = DungeonRng::new(seed ^ FILL_STREAM);
        for y in 0..layer.height {
            for x in 0..layer.width {
                if rng.random_f64() > config.fill {
                    continue;
                }
                let pick = if config.kinds.len() > 1 {
                    rng.random_range(0..config.kinds.len())
                } else {
                    0
                };
                let pos = Position::new(x, y);
                layer.place(
                    pos,
                    Obstacle {
                        kind: config.kinds[pick],
                        variant: fields[pick].get(pos),
                    },
                );
            }
        }
        Ok(layer)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// 在格子上放置物体（越界忽略）
    pub fn place(&mut self, pos: Position, obstacle: Obstacle) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Some(obstacle);
        }
    }

    /// Clears a cell, returning what was there.
    pub fn remove(&mut self, pos: Position) -> Option<Obstacle> {
        let idx = self.index(pos)?;
        self.cells[idx].take()
    }

    pub fn get(&self, pos: Position) -> Option<Obstacle> {
        self.index(pos).and_then(|idx| self.cells[idx])
    }

    pub fn has_obstacle(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fill_places_nothing_and_full_fill_everything() {
        let none = ObstacleConfig {
            fill: 0.0,
            ..ObstacleConfig::default()
        };
        assert_eq!(ObstacleLayer::scatter(20, 20, &none, 1).unwrap().count(), 0);

        let all = ObstacleConfig {
            fill: 1.0,
            ..ObstacleConfig::default()
        };
        assert_eq!(ObstacleLayer::scatter(20, 20, &all, 1).unwrap().count(), 400);
    }

    #[test]
    fn fill_rate_is_roughly_respected() {
        let layer = ObstacleLayer::scatter(100, 100, &ObstacleConfig::default(), 42).unwrap();
        let rate = layer.count() as f64 / 10_000.0;
        assert!((0.2..0.3).contains(&rate), "rate {rate}");
    }

    #[test]
    fn placed_variants_respect_their_kind() {
        let layer =
            ObstacleLayer::scatter(60, 40, &ObstacleConfig::decorations(), 8).unwrap();
        for y in 0..40 {
            for x in 0..60 {
                if let Some(obstacle) = layer.get(Position::new(x, y)) {
                    assert!(obstacle.variant < obstacle.kind.variants());
                    assert_ne!(obstacle.kind, ObjectKind::Crate);
                }
            }
        }
    }

    #[test]
    fn invalid_fill_is_rejected() {
        let config = ObstacleConfig {
            fill: 1.2,
            ..ObstacleConfig::default()
        };
        assert_eq!(
            ObstacleLayer::scatter(5, 5, &config, 0),
            Err(ConfigurationError::InvalidFill(1.2))
        );
    }

    #[test]
    fn nothing_outside_the_layer() {
        let mut layer = ObstacleLayer::empty(3, 3);
        layer.place(Position::new(5, 5), Obstacle {
            kind: ObjectKind::Crate,
            variant: 0,
        });
        assert_eq!(layer.count(), 0);
        assert!(!layer.has_obstacle(Position::new(-1, 0)));
    }
}
