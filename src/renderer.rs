//! Ratatui renderer for the simulation state.

use std::time::{Duration, Instant};

use anyhow::Context;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::ScreenConfig;
use crate::render::{DungeonRenderer, HudRenderer, Viewport};
use crate::simulation::SimulationState;

/// Trait for rendering the game state
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> anyhow::Result<()>;

    /// Draw the current game state
    fn draw(&mut self, state: &SimulationState) -> anyhow::Result<()>;

    /// Cleanup resources
    fn cleanup(&mut self) -> anyhow::Result<()>;
}

/// Trait for time management
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GameClock;

impl Clock for GameClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Ratatui terminal renderer, generic over the backend.
pub struct RatatuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    dungeon_renderer: DungeonRenderer,
    hud_renderer: HudRenderer,
}

impl<B: Backend> RatatuiRenderer<B> {
    pub fn new(backend: B, screen: &ScreenConfig) -> anyhow::Result<Self> {
        let viewport = Viewport::new(screen.columns, screen.rows)?;
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            dungeon_renderer: DungeonRenderer::new(viewport, screen.tile_width),
            hud_renderer: HudRenderer::new(),
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

/// HUD 在上，地牢居中，底部一行按键提示
fn render_frame(
    frame: &mut Frame<'_>,
    hud: &HudRenderer,
    dungeon: &DungeonRenderer,
    state: &SimulationState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // HUD (状态栏)
            Constraint::Min(3),    // 地牢
            Constraint::Length(1), // 按键提示
        ])
        .split(frame.area());

    hud.render(frame, chunks[0], state);
    dungeon.render(frame, chunks[1], state);

    let hint = Paragraph::new("方向键 / WASD / ZQSD / hjkl 移动，Esc 退出")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(hint, chunks[2]);
}

impl<B: Backend> Renderer for RatatuiRenderer<B> {
    fn init(&mut self) -> anyhow::Result<()> {
        self.terminal.clear().context("Failed to clear terminal")?;
        self.terminal.hide_cursor().context("Failed to hide cursor")?;
        Ok(())
    }

    fn draw(&mut self, state: &SimulationState) -> anyhow::Result<()> {
        let Self {
            terminal,
            dungeon_renderer,
            hud_renderer,
        } = self;
        terminal
            .draw(|f| render_frame(f, hud_renderer, dungeon_renderer, state))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
