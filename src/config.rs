//! 游戏配置：JSON 文件 + 命令行覆盖。
//!
//! 每个字段都有默认值，配置文件里只需写要改的部分。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use dungeon::{DungeonConfig, ObstacleConfig};
use error::{ConfigurationError, GameError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 视口和终端单元格设置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// 可见的地图列数（奇数，玩家居中）
    pub columns: u16,
    /// 可见的地图行数（奇数）
    pub rows: u16,
    /// 每个地图格子占用的终端列数
    pub tile_width: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            columns: 15,
            rows: 9,
            tile_width: 2,
        }
    }
}

impl ScreenConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let odd = |n: u16| n % 2 == 1;
        if !odd(self.columns) || !odd(self.rows) || self.tile_width == 0 {
            return Err(ConfigurationError::InvalidViewport {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u32,
    pub max_energy: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_energy: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub count: usize,
    pub max_health: u32,
    /// 出生点拒绝采样的尝试上限
    pub spawn_attempts: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: 6,
            max_health: 30,
            spawn_attempts: 1_000,
        }
    }
}

/// 全部可配置项
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub dungeon: DungeonConfig,
    pub obstacles: ObstacleConfig,
    pub decorations: ObstacleConfig,
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    /// 每秒帧数
    pub frame_rate: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dungeon: DungeonConfig::default(),
            obstacles: ObstacleConfig::default(),
            decorations: ObstacleConfig::decorations(),
            screen: ScreenConfig::default(),
            player: PlayerConfig::default(),
            enemies: EnemyConfig::default(),
            frame_rate: 60,
        }
    }
}

impl GameConfig {
    /// 从 JSON 文件加载并校验
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.dungeon.validate()?;
        self.obstacles.validate()?;
        self.decorations.validate()?;
        self.screen.validate()?;
        Ok(())
    }

    /// 命令行参数覆盖配置文件
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.random_seed {
            self.dungeon.seed = None;
        } else if let Some(seed) = cli.seed {
            self.dungeon.seed = Some(seed);
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }
}

/// BSP dungeon explorer
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// JSON config file (missing keys fall back to defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dungeon seed, overrides the config file
    #[arg(long, conflicts_with = "random_seed")]
    pub seed: Option<u64>,

    /// Seed from the wall clock instead of the configured seed
    #[arg(long)]
    pub random_seed: bool,

    /// Print the generated dungeon as JSON and exit
    #[arg(long)]
    pub dump: bool,

    /// Directory for the log file
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Cli {
    /// 读取配置文件（如有）并应用命令行覆盖
    pub fn resolve_config(&self) -> Result<GameConfig, GameError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        config.apply_cli(self);
        config.validate()?;
        Ok(config)
    }
}
