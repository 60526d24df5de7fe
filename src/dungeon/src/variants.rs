// src/dungeon/src/variants.rs
//! 贴图变体分配
//!
//! 每个格子预先抽取一个变体编号，渲染时按编号挑选字形和颜色，
//! 同一个种子得到同一张“花纹”。

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::grid::{Position, TileType, cell_count};
use crate::rng::DungeonRng;

/// 地面贴图种类
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum TileTexture {
    Wall,
    Room,
    Corridor,
}

impl TileTexture {
    /// 每种贴图可用的变体数量
    pub const fn variants(self) -> u32 {
        match self {
            TileTexture::Wall => 1,
            TileTexture::Room => 3,
            TileTexture::Corridor => 4,
        }
    }

    pub fn for_tile(tile: TileType) -> Self {
        match tile {
            TileType::Empty => TileTexture::Wall,
            TileType::Room => TileTexture::Room,
            TileType::Corridor => TileTexture::Corridor,
        }
    }
}

/// 角色贴图种类
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ActorSprite {
    Player,
    Enemy,
}

impl ActorSprite {
    pub const fn variants(self) -> u32 {
        match self {
            ActorSprite::Player => 1,
            ActorSprite::Enemy => 3,
        }
    }
}

/// Per-cell variant indices in `[0, variants)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantField {
    width: i32,
    height: i32,
    values: Vec<u32>,
}

impl VariantField {
    /// 所有格子都取变体 0
    pub fn zeros(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            values: vec![0; cell_count(width, height)],
        }
    }

    /// One uniform draw per cell; a single-variant texture draws nothing.
    pub fn generate(width: i32, height: i32, variants: u32, seed: u64) -> Self {
        let mut field = Self::zeros(width, height);
        if variants > 1 {
            let mut rng = DungeonRng::new(seed);
            for value in field.values.iter_mut() {
                *value = rng.random_range(0..variants);
            }
        }
        field
    }

    /// 越界返回 0
    pub fn get(&self, pos: Position) -> u32 {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return 0;
        }
        self.values[pos.y as usize * self.width as usize + pos.x as usize]
    }

    pub fn max_value(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// 墙、房间、走廊三张变体表
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureFields {
    pub wall: VariantField,
    pub room: VariantField,
    pub corridor: VariantField,
}

impl TextureFields {
    /// Room uses `seed`, corridor `seed + 1`, wall `seed + 2`.
    pub fn generate(width: i32, height: i32, seed: u64) -> Self {
        Self {
            room: VariantField::generate(width, height, TileTexture::Room.variants(), seed),
            corridor: VariantField::generate(
                width,
                height,
                TileTexture::Corridor.variants(),
                seed.wrapping_add(1),
            ),
            wall: VariantField::generate(
                width,
                height,
                TileTexture::Wall.variants(),
                seed.wrapping_add(2),
            ),
        }
    }

    /// 根据格子类型查询变体
    pub fn variant(&self, tile: TileType, pos: Position) -> u32 {
        match TileTexture::for_tile(tile) {
            TileTexture::Wall => self.wall.get(pos),
            TileTexture::Room => self.room.get(pos),
            TileTexture::Corridor => self.corridor.get(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn single_variant_field_is_all_zero() {
        let field = VariantField::generate(10, 10, 1, 99);
        assert_eq!(field.max_value(), 0);
    }

    #[test]
    fn variants_stay_below_the_count() {
        for texture in TileTexture::iter() {
            let field = VariantField::generate(30, 20, texture.variants(), 5);
            assert!(field.max_value() < texture.variants());
        }
    }

    #[test]
    fn same_seed_same_field() {
        assert_eq!(
            VariantField::generate(16, 8, 4, 77),
            VariantField::generate(16, 8, 4, 77)
        );
        assert_ne!(
            VariantField::generate(16, 8, 4, 77),
            VariantField::generate(16, 8, 4, 78)
        );
    }

    #[test]
    fn out_of_range_lookup_is_variant_zero() {
        let field = VariantField::generate(4, 4, 4, 1);
        assert_eq!(field.get(Position::new(-3, 2)), 0);
        assert_eq!(field.get(Position::new(2, 40)), 0);
    }
}
