//! 模块化渲染系统
//!
//! - `camera` - 以玩家为中心的视口
//! - `dungeon` - 地牢地图与实体
//! - `hud` - 玩家状态栏

pub mod camera;
pub mod dungeon;
pub mod hud;

pub use self::camera::Viewport;
pub use self::dungeon::DungeonRenderer;
pub use self::hud::HudRenderer;
