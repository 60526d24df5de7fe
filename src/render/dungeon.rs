//! 地牢渲染器
//!
//! 以玩家为中心截取视口，按格子类型和贴图变体选择字符与颜色，
//! 再叠加障碍物、装饰物、出口和实体。每个地图格子占 `tile_width` 个终端列。

use dungeon::{Dungeon, ObjectKind, Obstacle, Position, TileType};
use entity::{Entity, Role};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

use crate::render::camera::Viewport;
use crate::simulation::SimulationState;

/// 一个格子的外观
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: char,
    pub fg: Color,
    /// 是否用同一字符填满整个格子宽度
    pub fill: bool,
}

impl Glyph {
    const fn terrain(symbol: char, fg: Color) -> Self {
        Self {
            symbol,
            fg,
            fill: true,
        }
    }

    const fn sprite(symbol: char, fg: Color) -> Self {
        Self {
            symbol,
            fg,
            fill: false,
        }
    }
}

/// 地牢渲染器
pub struct DungeonRenderer {
    pub viewport: Viewport,
    pub tile_width: u16,
}

impl DungeonRenderer {
    pub fn new(viewport: Viewport, tile_width: u16) -> Self {
        Self {
            viewport,
            tile_width: tile_width.max(1),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &SimulationState) {
        let block = Block::default()
            .title(format!(" 地牢 #{} ", state.dungeon.seed))
            .title_alignment(ratatui::layout::Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 100)))
            .border_type(BorderType::Rounded);

        let inner_area = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            DungeonWidget {
                state,
                viewport: self.viewport,
                tile_width: self.tile_width,
            },
            inner_area,
        );
    }
}

struct DungeonWidget<'a> {
    state: &'a SimulationState,
    viewport: Viewport,
    tile_width: u16,
}

impl Widget for DungeonWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let center = self.state.player().position;
        for row in 0..self.viewport.rows() {
            for col in 0..self.viewport.columns() {
                let pos = self.viewport.world_at(center, col, row);
                let glyph = self.glyph_at(pos);
                for dx in 0..self.tile_width {
                    let x = area.left() + col * self.tile_width + dx;
                    let y = area.top() + row;
                    if x >= area.right() || y >= area.bottom() {
                        continue;
                    }
                    let symbol = if dx == 0 || glyph.fill {
                        glyph.symbol
                    } else {
                        ' '
                    };
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(symbol)
                            .set_fg(glyph.fg)
                            .set_bg(Color::Black);
                    }
                }
            }
        }
    }
}

impl DungeonWidget<'_> {
    /// 实体 > 出口 > 房间里的物体 > 地形
    fn glyph_at(&self, pos: Position) -> Glyph {
        let dungeon = &self.state.dungeon;
        if let Some(id) = self.state.roster.occupant_at(pos) {
            if let Some(entity) = self.state.roster.get(id) {
                return entity_glyph(entity);
            }
        }
        if pos == dungeon.exit {
            return Glyph::sprite('>', Color::Cyan);
        }
        if let Some(obstacle) = dungeon.obstacle_at(pos) {
            return object_glyph(obstacle);
        }
        if let Some(decoration) = dungeon.decoration_at(pos) {
            return object_glyph(decoration);
        }
        tile_glyph(dungeon, pos)
    }
}

/// 地形外观：格子类型决定字符，贴图变体决定色调
pub fn tile_glyph(dungeon: &Dungeon, pos: Position) -> Glyph {
    let variant = dungeon.tile_variant(pos) as u8;
    match dungeon.tile_type(pos) {
        TileType::Empty => Glyph::terrain('█', Color::Rgb(60, 60, 60)),
        TileType::Room => {
            let shade = 110 + variant * 15;
            Glyph::terrain('·', Color::Rgb(shade, shade, shade - 20))
        }
        TileType::Corridor => {
            let shade = 90 + variant * 12;
            Glyph::terrain('░', Color::Rgb(shade - 10, shade, shade))
        }
    }
}

fn object_glyph(obstacle: Obstacle) -> Glyph {
    match obstacle.kind {
        ObjectKind::Crate => {
            let tone = 110 + obstacle.variant as u8 * 20;
            Glyph::sprite('▣', Color::Rgb(tone, tone / 2, 20))
        }
        ObjectKind::Bones => Glyph::sprite('%', Color::Rgb(200, 200, 180)),
        ObjectKind::Cobweb => Glyph::sprite('※', Color::Gray),
    }
}

fn entity_glyph(entity: &Entity) -> Glyph {
    match entity.role {
        Role::Player(_) => Glyph::sprite('@', Color::Yellow),
        Role::Enemy => {
            let fg = match entity.texture_variant() {
                0 => Color::Red,
                1 => Color::LightRed,
                _ => Color::Magenta,
            };
            Glyph::sprite('g', fg)
        }
    }
}
