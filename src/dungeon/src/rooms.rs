// src/dungeon/src/rooms.rs
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::grid::Position;

/// 轴对齐矩形 (x, y, width, height)，房间和走廊都用它描述
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// 生成器输出的房间矩形
pub type RoomRect = Rect;

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// 获取中心点 (x + w/2, y + h/2)
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x < self.x + self.width
            && pos.y < self.y + self.height
    }

    /// 遍历矩形覆盖的所有坐标
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Position::new(x, y)))
    }
}

/// Spawn is the smallest room, exit the largest. Ties go to the earliest room.
pub fn spawn_and_exit(rooms: &[RoomRect]) -> Option<(RoomRect, RoomRect)> {
    let spawn = rooms.iter().min_by_key(|r| r.area())?;
    let (_, exit) = rooms
        .iter()
        .enumerate()
        .max_by_key(|(idx, r)| (r.area(), Reverse(*idx)))?;
    Some((*spawn, *exit))
}
