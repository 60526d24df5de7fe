//! BSP dungeon explorer: a generated dungeon, a player, wandering enemies
//! and a turn counter, drawn in the terminal.

pub mod config;
pub mod game_loop;
pub mod input;
pub mod logging;
pub mod render;
pub mod renderer;
pub mod simulation;
pub mod turn_system;

pub use config::{Cli, GameConfig};
pub use simulation::{GameStatus, SimulationState, StepOutcome};
