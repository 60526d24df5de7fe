//! 游戏错误处理模块
//!
//! 地牢生成与模拟本身是封闭的：非法移动不是错误，只是空操作。
//! 这里只收集真正需要上报的失败：配置误用、出生点搜索耗尽、配置文件读写。

use thiserror::Error;

/// 配置误用错误（生成前或生成过程中发现）
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// 地牢每条边必须在 [3, 4096] 之间
    #[error("dungeon sides must lie in [3, 4096], got {width}x{height}")]
    InvalidDungeonSize { width: i32, height: i32 },

    /// 分割范围必须在 [0, 1] 之间
    #[error("split range must lie in [0, 1], got {0}")]
    InvalidSplitRange(f64),

    /// 走廊宽度至少为 1
    #[error("corridor width must be at least 1, got {0}")]
    InvalidCorridorWidth(i32),

    /// 分割次数过多，无法保证每个叶子区域都不小于最小边长
    #[error(
        "{iterations} splitting iterations do not fit in a {width}x{height} dungeon \
         with leaves of at least {min_side}x{min_side}"
    )]
    TooManySplits {
        width: i32,
        height: i32,
        iterations: u32,
        min_side: i32,
    },

    /// 区域太小，无法再分割出两个合格的子区域
    #[error(
        "a {width}x{height} area cannot take {splits} more splits with sides of at least {min_side}"
    )]
    DegenerateSplit {
        splits: u32,
        width: i32,
        height: i32,
        min_side: i32,
    },

    /// 填充概率必须在 [0, 1] 之间
    #[error("fill probability must lie in [0, 1], got {0}")]
    InvalidFill(f64),

    /// 视口尺寸必须为正奇数
    #[error("viewport must have odd, positive dimensions, got {columns}x{rows}")]
    InvalidViewport { columns: u16, rows: u16 },

    /// 生成结果中没有房间
    #[error("generation produced no rooms")]
    NoRooms,
}

/// 游戏运行过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 配置误用
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// 在尝试次数上限内没有找到空闲的房间格子
    #[error("no free room tile found after {attempts} attempts")]
    NoValidSpawn { attempts: u32 },

    /// 配置文件读取错误
    #[error("failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// 配置文件解析错误
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// 将错误转换为面向玩家的简短消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::Configuration(e) => format!("地牢配置无效: {}", e),
        GameError::NoValidSpawn { .. } => "地牢里没有空闲的位置放置敌人".to_string(),
        GameError::ConfigIo(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "配置文件不存在".to_string(),
            std::io::ErrorKind::PermissionDenied => "没有权限读取配置文件".to_string(),
            _ => format!("IO错误: {}", e),
        },
        GameError::ConfigParse(e) => format!("配置文件格式错误: {}", e),
    }
}
