//! Input handling: crossterm key events mapped to game commands.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use entity::Direction;

/// 玩家指令
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

/// Trait for input sources
pub trait InputSource {
    /// Poll for a command, waiting at most `timeout`
    fn poll(&mut self, timeout: Duration) -> anyhow::Result<Option<Command>>;
}

/// Console input source backed by crossterm polling.
#[derive(Default)]
pub struct ConsoleInput;

impl ConsoleInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for ConsoleInput {
    fn poll(&mut self, timeout: Duration) -> anyhow::Result<Option<Command>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(map_key(key));
            }
        }
        Ok(None)
    }
}

/// Replays a fixed list of commands, then reports no input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    commands: VecDeque<Command>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> anyhow::Result<Option<Command>> {
        Ok(self.commands.pop_front())
    }
}

/// 按键映射（支持方向键、WASD、ZQSD、vi-keys）
///
/// 只处理按下事件；Esc 和 Ctrl-C 退出。
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Esc, _) => Some(Command::Quit),

        (KeyCode::Up, _)
        | (KeyCode::Char('w'), _)
        | (KeyCode::Char('z'), _)
        | (KeyCode::Char('k'), _) => Some(Command::Move(Direction::Up)),
        (KeyCode::Down, _) | (KeyCode::Char('s'), _) | (KeyCode::Char('j'), _) => {
            Some(Command::Move(Direction::Down))
        }
        (KeyCode::Left, _)
        | (KeyCode::Char('a'), _)
        | (KeyCode::Char('q'), _)
        | (KeyCode::Char('h'), _) => Some(Command::Move(Direction::Left)),
        (KeyCode::Right, _) | (KeyCode::Char('d'), _) | (KeyCode::Char('l'), _) => {
            Some(Command::Move(Direction::Right))
        }

        _ => None,
    }
}
