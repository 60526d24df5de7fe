//! BSP (binary space partitioning) dungeon generator.
//!
//! The dungeon area is split recursively `splitting_iterations` times. Every
//! leaf gets a room carved somewhere in its middle half, and every internal
//! node gets a straight corridor joining the centers of its two children.
//! All randomness comes from one [`DungeonRng`] consumed in a fixed order:
//! split draws first (generation by generation), then four draws per leaf
//! room. Corridors need no randomness.
//!
//! A split never leaves a child too small for the splits still below it:
//! the drawn extent is clamped so both children keep enough room, and the
//! other axis is used when the preferred one is too short. Configurations
//! that cannot fit the tree at all are rejected by [`DungeonConfig::validate`],
//! so a validated configuration generates for every seed.

use error::ConfigurationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::{DungeonGrid, TileType};
use crate::rng::{self, DungeonRng};
use crate::rooms::{Rect, RoomRect};

/// Smallest side a BSP leaf may have. Below this the carved room can miss
/// the leaf center and the corridor network no longer reaches it.
pub const MIN_LEAF_SIDE: i32 = 3;

/// Largest side accepted on either axis.
pub const MAX_DUNGEON_SIDE: i32 = 4096;

/// Aspect ratio at which the split axis is forced.
const FORCED_SPLIT_RATIO: f64 = 1.5;

/// BSP 生成参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    pub splitting_iterations: u32,
    /// 0 表示总是对半分，1 表示可在 0-100% 之间任意分割
    pub split_range: f64,
    pub corridor_width: i32,
    /// `None` 时使用时间种子（不可复现）
    pub seed: Option<u64>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 75,
            splitting_iterations: 5,
            split_range: 0.5,
            corridor_width: 3,
            seed: Some(42),
        }
    }
}

impl DungeonConfig {
    /// Rejects configurations that would produce degenerate leaves.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let sides = MIN_LEAF_SIDE..=MAX_DUNGEON_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(ConfigurationError::InvalidDungeonSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.split_range) {
            return Err(ConfigurationError::InvalidSplitRange(self.split_range));
        }
        if self.corridor_width < 1 {
            return Err(ConfigurationError::InvalidCorridorWidth(self.corridor_width));
        }
        if self.splitting_iterations > split_capacity(self.width, self.height) {
            return Err(ConfigurationError::TooManySplits {
                width: self.width,
                height: self.height,
                iterations: self.splitting_iterations,
                min_side: MIN_LEAF_SIDE,
            });
        }
        Ok(())
    }
}

/// How many levels of binary splits a `width` x `height` area takes while
/// every leaf keeps both sides at least [`MIN_LEAF_SIDE`].
///
/// Each axis holds `side / MIN_LEAF_SIDE` minimal cells and can be halved
/// `ilog2` of that many times; the two axes add up.
pub fn split_capacity(width: i32, height: i32) -> u32 {
    axis_capacity(width) + axis_capacity(height)
}

fn axis_capacity(side: i32) -> u32 {
    (side / MIN_LEAF_SIDE).max(1).ilog2()
}

/// Smallest extent a child may get along the split axis so that it still
/// takes `remaining` splits, given its unchanged side `across` the cut.
fn min_child_extent(across: i32, remaining: u32) -> i64 {
    let doublings = remaining.saturating_sub(axis_capacity(across)).min(40);
    i64::from(MIN_LEAF_SIDE) << doublings
}

/// Bounds of the split fraction for a given range.
fn fraction_bounds(split_range: f64) -> (f64, f64) {
    ((1.0 - split_range) / 2.0, (1.0 + split_range) / 2.0)
}

/// 生成结果：格子矩阵 + 房间矩形列表
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLayout {
    pub grid: DungeonGrid,
    pub rooms: Vec<RoomRect>,
    pub corridors: Vec<Rect>,
    /// 实际使用的种子（未配置种子时为时间种子）
    pub seed: u64,
}

/// 分割轴
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    /// 沿 x 方向切开（子区域左右排列）
    Vertical,
    /// 沿 y 方向切开（子区域上下排列）
    Horizontal,
}

impl SplitAxis {
    fn flipped(self) -> Self {
        match self {
            SplitAxis::Vertical => SplitAxis::Horizontal,
            SplitAxis::Horizontal => SplitAxis::Vertical,
        }
    }
}

/// 分割树节点，只在生成期间存在
#[derive(Clone, Debug)]
struct Area {
    bounds: Rect,
    children: Option<(usize, usize)>,
}

/// Runs the whole pipeline: split, carve rooms, carve corridors, paint.
pub fn generate(config: &DungeonConfig) -> Result<GeneratedLayout, ConfigurationError> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rng::time_seed);
    let mut rng = DungeonRng::new(seed);

    let mut areas = vec![Area {
        bounds: Rect::new(0, 0, config.width, config.height),
        children: None,
    }];
    let mut generations: Vec<Vec<usize>> = vec![vec![0]];

    for depth in 0..config.splitting_iterations {
        let remaining = config.splitting_iterations - depth - 1;
        let mut next = Vec::with_capacity(generations[depth as usize].len() * 2);
        for &idx in &generations[depth as usize] {
            let (first, second) =
                split(&areas[idx].bounds, config.split_range, remaining, &mut rng)?;
            let first_idx = areas.len();
            areas.push(Area {
                bounds: first,
                children: None,
            });
            areas.push(Area {
                bounds: second,
                children: None,
            });
            areas[idx].children = Some((first_idx, first_idx + 1));
            next.push(first_idx);
            next.push(first_idx + 1);
        }
        debug!(depth = depth + 1, areas = next.len(), "split generation");
        generations.push(next);
    }

    let leaves = generations.last().map(Vec::as_slice).unwrap_or_default();
    let rooms: Vec<RoomRect> = leaves
        .iter()
        .map(|&idx| room_rectangle(&areas[idx].bounds, &mut rng))
        .collect();

    // 自底向上：从倒数第二代一直到根
    let mut corridors = Vec::new();
    for generation in generations.iter().rev().skip(1) {
        for &idx in generation {
            if let Some((a, b)) = areas[idx].children {
                corridors.push(corridor_rectangle(
                    &areas[a].bounds,
                    &areas[b].bounds,
                    config.corridor_width,
                ));
            }
        }
    }

    let grid = rects_to_grid(config.width, config.height, &rooms, &corridors);

    info!(
        seed,
        width = config.width,
        height = config.height,
        rooms = rooms.len(),
        corridors = corridors.len(),
        "generated BSP dungeon"
    );

    Ok(GeneratedLayout {
        grid,
        rooms,
        corridors,
        seed,
    })
}

/// Picks the split axis from the aspect ratio, drawing only on a tie.
pub fn choose_axis(area: &Rect, rng: &mut DungeonRng) -> SplitAxis {
    let (w, h) = (area.width as f64, area.height as f64);
    if w / h >= FORCED_SPLIT_RATIO {
        SplitAxis::Vertical
    } else if h / w >= FORCED_SPLIT_RATIO {
        SplitAxis::Horizontal
    } else if rng.random_range(0..=1) == 0 {
        SplitAxis::Vertical
    } else {
        SplitAxis::Horizontal
    }
}

/// 按 split_range 把一个区域切成两个子区域
///
/// `remaining` is how many further splits each child has to take. The drawn
/// extent is clamped so both children can still take them; when the
/// preferred axis is too short for that, the other axis is cut instead.
pub fn split(
    area: &Rect,
    split_range: f64,
    remaining: u32,
    rng: &mut DungeonRng,
) -> Result<(Rect, Rect), ConfigurationError> {
    if !(0.0..=1.0).contains(&split_range) {
        return Err(ConfigurationError::InvalidSplitRange(split_range));
    }
    let preferred = choose_axis(area, rng);

    let (low, high) = fraction_bounds(split_range);
    let fraction = (rng.random_f64() * split_range + low).clamp(low, high);

    for axis in [preferred, preferred.flipped()] {
        let (side, across) = match axis {
            SplitAxis::Vertical => (area.width, area.height),
            SplitAxis::Horizontal => (area.height, area.width),
        };
        let side = i64::from(side);
        let min_extent = min_child_extent(across, remaining);
        if 2 * min_extent > side {
            continue;
        }
        let drawn = (side as f64 * fraction).round_ties_even() as i64;
        let extent = drawn.clamp(min_extent, side - min_extent) as i32;
        if axis != preferred {
            debug!(?area, ?axis, "preferred split axis too short, cutting the other one");
        }
        return Ok(cut(area, axis, extent));
    }

    Err(ConfigurationError::DegenerateSplit {
        splits: remaining.saturating_add(1),
        width: area.width,
        height: area.height,
        min_side: MIN_LEAF_SIDE,
    })
}

fn cut(area: &Rect, axis: SplitAxis, extent: i32) -> (Rect, Rect) {
    match axis {
        SplitAxis::Vertical => (
            Rect::new(area.x, area.y, extent, area.height),
            Rect::new(area.x + extent, area.y, area.width - extent, area.height),
        ),
        SplitAxis::Horizontal => (
            Rect::new(area.x, area.y, area.width, extent),
            Rect::new(area.x, area.y + extent, area.width, area.height - extent),
        ),
    }
}

/// Carves a room whose corners sit within a quarter of the leaf's extent
/// from the leaf's own corners.
pub fn room_rectangle(area: &Rect, rng: &mut DungeonRng) -> RoomRect {
    let x1 = rng.random_range(0..=area.width / 4) + area.x;
    let y1 = rng.random_range(0..=area.height / 4) + area.y;
    let x2 = rng.random_range(0..=area.width / 4) + area.x + 3 * area.width / 4;
    let y2 = rng.random_range(0..=area.height / 4) + area.y + 3 * area.height / 4;
    Rect::new(x1, y1, x2 - x1, y2 - y1)
}

/// 连接两个兄弟区域中心的直线走廊
pub fn corridor_rectangle(first: &Rect, second: &Rect, corridor_width: i32) -> Rect {
    let c1 = first.center();
    let c2 = second.center();

    let before = corridor_width / 2;
    let after = before + corridor_width % 2;

    let (x1, y1, x2, y2) = if c1.x == c2.x {
        (
            c1.x - before,
            c1.y.min(c2.y) - before,
            c1.x + after,
            c1.y.max(c2.y) + after,
        )
    } else {
        (
            c1.x.min(c2.x) - before,
            c1.y - before,
            c1.x.max(c2.x) + after,
            c1.y + after,
        )
    };
    Rect::new(x1, y1, x2 - x1, y2 - y1)
}

/// Paints corridors first and rooms second so overlaps resolve to rooms.
pub fn rects_to_grid(
    width: i32,
    height: i32,
    rooms: &[RoomRect],
    corridors: &[Rect],
) -> DungeonGrid {
    let mut grid = DungeonGrid::new(width, height);
    for corridor in corridors {
        grid.fill_rect(corridor, TileType::Corridor);
    }
    for room in rooms {
        grid.fill_rect(room, TileType::Room);
    }
    grid
}
