// src/entity/src/entity.rs
use dungeon::{ActorSprite, Position};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// 四个移动方向
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// 单位偏移 (dx, dy)，y 轴向下
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn apply(self, pos: Position) -> Position {
        let (dx, dy) = self.delta();
        pos.offset(dx, dy)
    }
}

/// 玩家专属的能量值
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    pub current: u32,
    pub max: u32,
}

impl Energy {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// 角色区分：能量只属于玩家，敌人自主移动
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player(Energy),
    Enemy,
}

/// Player or enemy: one struct, role-specific data in [`Role`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Position,
    pub role: Role,
    max_health: u32,
    health: u32,
    texture_variant: u32,
}

impl Entity {
    pub fn player(position: Position, max_health: u32, max_energy: u32) -> Self {
        Self {
            position,
            role: Role::Player(Energy::full(max_energy)),
            max_health,
            health: max_health,
            texture_variant: 0,
        }
    }

    pub fn enemy(position: Position, max_health: u32, texture_variant: u32) -> Self {
        Self {
            position,
            role: Role::Enemy,
            max_health,
            health: max_health,
            texture_variant,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }

    pub fn sprite(&self) -> ActorSprite {
        match self.role {
            Role::Player(_) => ActorSprite::Player,
            Role::Enemy => ActorSprite::Enemy,
        }
    }

    /// 创建时确定，之后不变
    pub fn texture_variant(&self) -> u32 {
        self.texture_variant
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// 扣除生命值，最低为 0
    pub fn reduce_health(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn health_ratio(&self) -> f64 {
        ratio(self.health, self.max_health)
    }

    pub fn energy(&self) -> Option<u32> {
        match self.role {
            Role::Player(energy) => Some(energy.current),
            Role::Enemy => None,
        }
    }

    pub fn max_energy(&self) -> Option<u32> {
        match self.role {
            Role::Player(energy) => Some(energy.max),
            Role::Enemy => None,
        }
    }

    /// 扣除能量，最低为 0；敌人没有能量，调用无效果
    pub fn reduce_energy(&mut self, amount: u32) {
        if let Role::Player(energy) = &mut self.role {
            energy.current = energy.current.saturating_sub(amount);
        }
    }

    pub fn energy_ratio(&self) -> Option<f64> {
        match self.role {
            Role::Player(energy) => Some(ratio(energy.current, energy.max)),
            Role::Enemy => None,
        }
    }
}

fn ratio(current: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        current as f64 / max as f64
    }
}
