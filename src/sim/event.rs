//! Gameplay events
//!
//! Rules never call back into the host. Anything worth reporting is queued
//! on the session and drained by the host after each frame.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, TowerKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlacementModeChanged { mode: Option<TowerKind> },
    TowerPlaced {
        id: EntityId,
        pos: Vec2,
        cost: u32,
        towers: usize,
        max_towers: u32,
    },
    TowersCleared { refund: u32 },
    RepairApplied { amount: i32 },
    RangeExpanded { range: f32, cost: u32 },
    WaveStarted { wave: u32, enemies: u32 },
    EnemySpawned { id: EntityId, pos: Vec2, remaining: u32 },
    EnemyReachedBase { id: EntityId, damage: i32 },
    EnemyDefeated { id: EntityId, pos: Vec2, reward: u32 },
    WaveEnded {
        wave: u32,
        restored: i32,
        max_towers: u32,
    },
    GameOver { wave: u32, sats: u32 },
    Restarted,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PlacementModeChanged { mode } => match mode {
                Some(kind) => write!(f, "Tower placement mode: {}", kind.as_str()),
                None => write!(f, "Tower placement mode: none"),
            },
            GameEvent::TowerPlaced {
                pos,
                cost,
                towers,
                max_towers,
                ..
            } => write!(
                f,
                "Tower placed at ({}, {}), cost: {} sats, towers: {}/{}",
                pos.x, pos.y, cost, towers, max_towers
            ),
            GameEvent::TowersCleared { refund } => {
                write!(f, "Towers cleared, refunded {} sats", refund)
            }
            GameEvent::RepairApplied { amount } => {
                write!(f, "Small repairs applied, +{} base health", amount)
            }
            GameEvent::RangeExpanded { range, cost } => {
                write!(f, "Range expanded to {}, cost: {} sats", range, cost)
            }
            GameEvent::WaveStarted { wave, enemies } => {
                write!(f, "Wave {} started, {} enemies", wave, enemies)
            }
            GameEvent::EnemySpawned { remaining, .. } => {
                write!(f, "Enemy spawned, {} remaining to spawn", remaining)
            }
            GameEvent::EnemyReachedBase { damage, .. } => {
                write!(f, "Enemy reached base, -{} health", damage)
            }
            GameEvent::EnemyDefeated { reward, .. } => {
                write!(f, "Enemy defeated, +{} sats", reward)
            }
            GameEvent::WaveEnded {
                wave,
                restored,
                max_towers,
            } => write!(
                f,
                "Wave {} ended, restored {} base health, new tower points: {}",
                wave, restored, max_towers
            ),
            GameEvent::GameOver { wave, sats } => {
                write!(f, "Game over at wave {}, sats: {}", wave, sats)
            }
            GameEvent::Restarted => write!(f, "Game restarted"),
        }
    }
}
