// src/entity/src/lib.rs
//! 玩家与敌人：共享的实体结构、移动规则、随机游走和出生点搜索。

pub mod entity;
pub mod roster;

pub use crate::entity::{Direction, Energy, Entity, Role};
pub use crate::roster::{EntityId, Roster};
