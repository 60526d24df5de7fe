//! 相机：以玩家为中心的奇数尺寸视口。
//!
//! 视口永远居中，地图边缘以外的格子按空地（墙）处理。

use dungeon::Position;
use error::ConfigurationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    columns: u16,
    rows: u16,
}

impl Viewport {
    pub fn new(columns: u16, rows: u16) -> Result<Self, ConfigurationError> {
        if columns % 2 == 0 || rows % 2 == 0 {
            return Err(ConfigurationError::InvalidViewport { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// World position shown in the top-left cell.
    pub fn origin(&self, center: Position) -> Position {
        center.offset(-i32::from(self.columns / 2), -i32::from(self.rows / 2))
    }

    /// 视口格子 (col, row) 对应的世界坐标
    pub fn world_at(&self, center: Position, col: u16, row: u16) -> Position {
        self.origin(center).offset(i32::from(col), i32::from(row))
    }

    /// Viewport cell showing `pos`, if it is on screen.
    pub fn to_view(&self, center: Position, pos: Position) -> Option<(u16, u16)> {
        let origin = self.origin(center);
        let col = u16::try_from(pos.x - origin.x).ok()?;
        let row = u16::try_from(pos.y - origin.y).ok()?;
        (col < self.columns && row < self.rows).then_some((col, row))
    }
}
