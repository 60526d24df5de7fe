//! 固定帧率的游戏循环。
//!
//! 每一帧：
//! - Input: 在剩余的帧时间内等待输入
//! - Step: 把移动指令交给模拟状态（碰撞、回合、敌人、死亡规则）
//! - Render: 渲染已经结算完毕的状态
//!
//! 游戏结束后继续渲染，直到玩家退出。

use std::time::Duration;

use tracing::{debug, info};

use crate::input::{Command, InputSource};
use crate::renderer::{Clock, GameClock, Renderer};
use crate::simulation::{SimulationState, StepOutcome};

/// 主游戏循环
pub struct GameLoop<R: Renderer, I: InputSource, C: Clock = GameClock> {
    pub state: SimulationState,
    pub renderer: R,
    pub input_source: I,
    pub clock: C,
    pub is_running: bool,
    frame_interval: Duration,
    frames: u64,
}

impl<R: Renderer, I: InputSource> GameLoop<R, I, GameClock> {
    pub fn new(state: SimulationState, renderer: R, input_source: I, frame_interval: Duration) -> Self {
        Self::with_clock(state, renderer, input_source, GameClock, frame_interval)
    }
}

impl<R: Renderer, I: InputSource, C: Clock> GameLoop<R, I, C> {
    pub fn with_clock(
        state: SimulationState,
        renderer: R,
        input_source: I,
        clock: C,
        frame_interval: Duration,
    ) -> Self {
        Self {
            state,
            renderer,
            input_source,
            clock,
            is_running: true,
            frame_interval,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until a quit command arrives.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.renderer.init()?;
        self.renderer.draw(&self.state)?;
        let result = self.run_until_quit();
        self.renderer.cleanup()?;
        info!(frames = self.frames, turn = self.state.turn(), "game loop finished");
        result
    }

    fn run_until_quit(&mut self) -> anyhow::Result<()> {
        while self.is_running {
            self.tick()?;
        }
        Ok(())
    }

    /// One frame: input, step, render, then sleep off the remaining frame time.
    pub fn tick(&mut self) -> anyhow::Result<()> {
        let frame_start = self.clock.now();

        if let Some(command) = self.input_source.poll(self.frame_interval)? {
            self.handle_command(command);
        }
        if self.is_running {
            self.renderer.draw(&self.state)?;
        }
        self.frames += 1;

        let elapsed = self.clock.now().saturating_duration_since(frame_start);
        if let Some(remaining) = self.frame_interval.checked_sub(elapsed) {
            self.clock.sleep(remaining);
        }
        Ok(())
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Quit => {
                debug!("quit requested");
                self.is_running = false;
            }
            Command::Move(direction) => match self.state.step(direction) {
                StepOutcome::Moved { turn } => debug!(turn, %direction, "player moved"),
                StepOutcome::Blocked => {}
                StepOutcome::GameOver => debug!("move ignored after game over"),
            },
        }
    }
}
