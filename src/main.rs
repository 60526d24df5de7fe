use std::io;

use anyhow::Context;
use bsp_dungeon::config::Cli;
use bsp_dungeon::game_loop::GameLoop;
use bsp_dungeon::input::ConsoleInput;
use bsp_dungeon::logging;
use bsp_dungeon::renderer::RatatuiRenderer;
use bsp_dungeon::simulation::SimulationState;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dungeon::Dungeon;
use error::{GameError, handle_error};
use ratatui::backend::CrosstermBackend;
use scopeguard::defer;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_dir)?;
    let config = cli.resolve_config().map_err(report)?;

    if cli.dump {
        let dungeon = Dungeon::generate(&config.dungeon, &config.obstacles, &config.decorations)
            .map_err(|e| report(e.into()))?;
        let summary = serde_json::to_string_pretty(&dungeon.summary())?;
        println!("{summary}");
        return Ok(());
    }

    let state = SimulationState::new(&config).map_err(report)?;
    let seed = state.dungeon.seed;

    enable_raw_mode().context("Failed to enable raw mode")?;
    defer! {
        let _ = disable_raw_mode();
    }
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    defer! {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }

    let renderer = RatatuiRenderer::new(CrosstermBackend::new(io::stdout()), &config.screen)?;
    let mut game = GameLoop::new(state, renderer, ConsoleInput::new(), config.frame_interval());
    game.run()?;

    let turn = game.state.turn();
    let status = game.state.status();
    tracing::info!(seed, turn, %status, "session ended");
    Ok(())
}

/// 把启动错误写进日志，并在终端打印面向玩家的提示
fn report(error: GameError) -> anyhow::Error {
    tracing::error!(%error, "startup failed");
    eprintln!("{}", handle_error(&error));
    anyhow::Error::new(error)
}
