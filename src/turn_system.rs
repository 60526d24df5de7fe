//! Turn counter and enemy scheduling.
//!
//! The `TurnSystem` only runs after a player move has actually succeeded:
//! it bumps the counter, then lets every enemy wander once, strictly in
//! roster order. Each enemy's draw is reseeded from
//! `(base_seed, turn, enemy_index)` so a given seed replays identically.

use dungeon::rng::derive_seed;
use dungeon::{DungeonRng, SpatialGrid};
use entity::Roster;
use tracing::{debug, trace};

/// What one enemy phase did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number after the increment
    pub turn: u64,
    /// Seed each wander call ran with, one entry per call in roster order
    pub enemy_seeds: Vec<u64>,
    /// Enemies that found a free direction
    pub moved: usize,
}

impl TurnReport {
    /// 本回合实际调用了多少次敌人移动
    pub fn invoked(&self) -> usize {
        self.enemy_seeds.len()
    }
}

#[derive(Clone, Debug)]
pub struct TurnSystem {
    turn: u64,
    base_seed: u64,
    rng: DungeonRng,
}

impl TurnSystem {
    pub fn new(base_seed: u64) -> Self {
        Self {
            turn: 0,
            base_seed,
            rng: DungeonRng::new(base_seed),
        }
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// 第 `index` 个敌人在当前回合使用的种子
    pub fn enemy_seed(&self, index: usize) -> u64 {
        derive_seed(self.base_seed, self.turn, index)
    }

    /// Advances one turn and moves the enemies.
    ///
    /// Callers must only invoke this after a successful player move; a
    /// blocked move leaves both the counter and the enemies untouched.
    pub fn advance(&mut self, roster: &mut Roster, spatial: &SpatialGrid) -> TurnReport {
        self.turn += 1;

        let mut enemy_seeds = Vec::with_capacity(roster.enemies().len());
        let mut moved = 0;
        for index in 0..roster.enemies().len() {
            let seed = self.enemy_seed(index);
            self.rng.reseed(seed);
            enemy_seeds.push(seed);
            if let Some(dir) = roster.wander(spatial, index, &mut self.rng) {
                trace!(turn = self.turn, index, %dir, "enemy moved");
                moved += 1;
            }
        }

        debug!(turn = self.turn, invoked = enemy_seeds.len(), moved, "turn advanced");
        TurnReport {
            turn: self.turn,
            enemy_seeds,
            moved,
        }
    }
}
