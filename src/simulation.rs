//! 模拟状态：地牢、实体名册、回合计数，由游戏循环独占。
//!
//! 一次玩家输入对应一次 [`SimulationState::step`]：
//! 先检查碰撞，成功才推进回合并让敌人依次行动，最后应用死亡规则。

use dungeon::{Dungeon, DungeonRng};
use entity::{Direction, Entity, EntityId, Roster};
use error::GameError;
use strum::Display;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::turn_system::{TurnReport, TurnSystem};

/// Stream offset for the enemy spawn draws.
const SPAWN_STREAM: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Result of one player step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { turn: u64 },
    Blocked,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct SimulationState {
    pub dungeon: Dungeon,
    pub roster: Roster,
    pub turns: TurnSystem,
    status: GameStatus,
    last_report: Option<TurnReport>,
}

impl SimulationState {
    /// 按配置生成地牢，玩家放在出生点，敌人随机分布在空闲房间格子上
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        let dungeon = Dungeon::generate(&config.dungeon, &config.obstacles, &config.decorations)?;
        let player = Entity::player(
            dungeon.spawn,
            config.player.max_health,
            config.player.max_energy,
        );
        let mut roster = Roster::new(player);
        let mut rng = DungeonRng::new(dungeon.seed.wrapping_add(SPAWN_STREAM));
        roster.spawn_enemies(
            dungeon.spatial(),
            config.enemies.count,
            config.enemies.max_health,
            config.enemies.spawn_attempts,
            &mut rng,
        )?;
        info!(
            seed = dungeon.seed,
            enemies = roster.enemies().len(),
            "simulation ready"
        );
        Ok(Self::from_parts(dungeon, roster))
    }

    /// Wraps an existing dungeon and roster, turn counter at 0.
    pub fn from_parts(dungeon: Dungeon, roster: Roster) -> Self {
        let turns = TurnSystem::new(dungeon.seed);
        Self {
            dungeon,
            roster,
            turns,
            status: GameStatus::Running,
            last_report: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn turn(&self) -> u64 {
        self.turns.turn()
    }

    pub fn player(&self) -> &Entity {
        self.roster.player()
    }

    /// 最近一次敌人阶段的结果
    pub fn last_report(&self) -> Option<&TurnReport> {
        self.last_report.as_ref()
    }

    /// Moves the player; on success advances the turn and runs the enemies.
    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        if self.is_over() {
            return StepOutcome::GameOver;
        }

        let spatial = self.dungeon.spatial();
        if !self.roster.try_move(spatial, EntityId::Player, direction) {
            debug!(%direction, turn = self.turns.turn(), "player blocked");
            return StepOutcome::Blocked;
        }

        let report = self.turns.advance(&mut self.roster, spatial);
        let turn = report.turn;
        self.last_report = Some(report);
        self.apply_death_policy();

        if self.at_exit() {
            info!(turn, "player reached the exit");
        }
        if self.is_over() {
            StepOutcome::GameOver
        } else {
            StepOutcome::Moved { turn }
        }
    }

    /// Applies damage to an entity, then the death rules.
    pub fn damage(&mut self, id: EntityId, amount: u32) {
        let target = match id {
            EntityId::Player => Some(self.roster.player_mut()),
            EntityId::Enemy(idx) => self.roster.enemy_mut(idx),
        };
        if let Some(entity) = target {
            entity.reduce_health(amount);
        }
        self.apply_death_policy();
    }

    /// 玩家是否站在出口
    pub fn at_exit(&self) -> bool {
        self.roster.player().position == self.dungeon.exit
    }

    /// Player at 0 health ends the game; defeated enemies are despawned.
    fn apply_death_policy(&mut self) {
        if !self.roster.player().is_alive() && !self.is_over() {
            info!(turn = self.turns.turn(), "player died");
            self.status = GameStatus::GameOver;
        }
        self.roster.remove_defeated();
    }
}
