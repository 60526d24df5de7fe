//! HUD 渲染器
//!
//! 显示玩家状态：生命值、能量、回合数、种子，以及出口/游戏结束提示。

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::simulation::SimulationState;

/// HUD 渲染器
///
/// 布局：
/// ```text
/// | ===== 生命值 ===== | ===== 能量 ===== | 回合 + 种子 |
/// ```
#[derive(Default)]
pub struct HudRenderer;

impl HudRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &SimulationState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35), // 血条
                Constraint::Percentage(35), // 能量条
                Constraint::Percentage(30), // 回合信息
            ])
            .split(area);

        let player = state.player();
        let health_label = format!("HP {}/{}", player.health(), player.max_health());
        self.render_gauge(frame, chunks[0], player.health_ratio(), health_label, health_color);

        let energy_ratio = player.energy_ratio().unwrap_or(0.0);
        let energy_label = format!(
            "EN {}/{}",
            player.energy().unwrap_or(0),
            player.max_energy().unwrap_or(0)
        );
        self.render_gauge(frame, chunks[1], energy_ratio, energy_label, |_| Color::Cyan);

        self.render_status(frame, chunks[2], state);
    }

    fn render_gauge(
        &self,
        frame: &mut Frame,
        area: Rect,
        ratio: f64,
        label: String,
        color: impl Fn(f64) -> Color,
    ) {
        let ratio = ratio.clamp(0.0, 1.0);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(color(ratio)).add_modifier(Modifier::BOLD))
            .percent((ratio * 100.0).round() as u16)
            .label(label)
            .use_unicode(true);
        frame.render_widget(gauge, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, state: &SimulationState) {
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("回合 {}", state.turn()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("种子 {}", state.dungeon.seed),
                Style::default().fg(Color::Gray),
            ),
        ])];

        if state.is_over() {
            lines.push(Line::from(Span::styled(
                "游戏结束",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        } else if state.at_exit() {
            lines.push(Line::from(Span::styled(
                "到达出口！",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }
}

/// 根据生命值比例选择颜色
fn health_color(ratio: f64) -> Color {
    match ratio {
        r if r > 0.6 => Color::Green,
        r if r > 0.3 => Color::Yellow,
        _ => Color::Red,
    }
}
