//! Player actions and the sats economy
//!
//! Every action checks its eligibility against the current state first and
//! only then mutates. A refused action returns the reason and leaves the
//! session exactly as it was.

use glam::Vec2;
use thiserror::Error;

use super::event::GameEvent;
use super::spawner;
use super::state::{Base, EntityId, GameState, Tower, TowerKind};
use crate::consts::*;
use crate::elapsed_ms;

/// Why a player action was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("a wave is in progress")]
    WaveActive,
    #[error("the game is over")]
    GameOver,
    #[error("the game is still running")]
    NotGameOver,
    #[error("insufficient sats ({available} < {needed})")]
    InsufficientSats { needed: u32, available: u32 },
    #[error("max towers ({placed}/{max})")]
    TowerLimit { placed: usize, max: u32 },
    #[error("outside canvas bounds")]
    OutOfBounds,
    #[error("too soon after the last placement")]
    PlacementCooldown,
    #[error("too soon after the last button press")]
    Debounced,
    #[error("no towers to clear")]
    NoTowers,
    #[error("range already at its limit ({range})")]
    RangeCapped { range: f32 },
    #[error("not placing a tower")]
    NotPlacing,
}

/// Price of the next range expansion at the given range
pub fn expand_range_cost(range: f32) -> u32 {
    (RANGE_BASE_COST * RANGE_COST_GROWTH.powf(range as f64 / RANGE_COST_SCALE)).round() as u32
}

fn ensure_building(state: &GameState) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if state.wave_active {
        return Err(ActionError::WaveActive);
    }
    Ok(())
}

fn ensure_sats(state: &GameState, needed: u32) -> Result<(), ActionError> {
    if state.sats < needed {
        return Err(ActionError::InsufficientSats {
            needed,
            available: state.sats,
        });
    }
    Ok(())
}

fn ensure_tower_slot(state: &GameState) -> Result<(), ActionError> {
    if state.towers.len() >= state.max_tower_points as usize {
        return Err(ActionError::TowerLimit {
            placed: state.towers.len(),
            max: state.max_tower_points,
        });
    }
    Ok(())
}

/// Eligibility for arming tower placement
pub fn can_select_tower(state: &GameState, kind: TowerKind) -> Result<(), ActionError> {
    ensure_building(state)?;
    ensure_sats(state, kind.cost())?;
    ensure_tower_slot(state)
}

/// Eligibility for placing a tower at `pos`
pub fn can_place_tower(
    state: &GameState,
    kind: TowerKind,
    pos: Vec2,
    now: u64,
) -> Result<(), ActionError> {
    ensure_building(state)?;
    if elapsed_ms(now, state.last_placement_ms).is_some_and(|e| e < PLACEMENT_COOLDOWN_MS) {
        return Err(ActionError::PlacementCooldown);
    }
    ensure_sats(state, kind.cost())?;
    ensure_tower_slot(state)?;
    if !state.in_bounds(pos) {
        return Err(ActionError::OutOfBounds);
    }
    Ok(())
}

pub fn can_repair(state: &GameState) -> Result<(), ActionError> {
    ensure_building(state)?;
    ensure_sats(state, REPAIR_COST)
}

pub fn can_start_wave(state: &GameState) -> Result<(), ActionError> {
    ensure_building(state)
}

pub fn can_clear_towers(state: &GameState) -> Result<(), ActionError> {
    ensure_building(state)?;
    if state.towers.is_empty() {
        return Err(ActionError::NoTowers);
    }
    Ok(())
}

pub fn can_expand_range(state: &GameState) -> Result<(), ActionError> {
    ensure_building(state)?;
    ensure_sats(state, expand_range_cost(state.base.range))?;
    if state.base.range >= Base::range_cap(state.canvas_width) {
        return Err(ActionError::RangeCapped {
            range: state.base.range,
        });
    }
    Ok(())
}

/// Toggle firewall placement mode on or off
pub fn toggle_placement(state: &mut GameState) -> Result<(), ActionError> {
    let kind = TowerKind::Firewall;
    can_select_tower(state, kind)?;
    state.placement = if state.placement == Some(kind) {
        None
    } else {
        Some(kind)
    };
    if state.placement.is_none() {
        state.aim = None;
    }
    state.emit(GameEvent::PlacementModeChanged {
        mode: state.placement,
    });
    Ok(())
}

/// Track the pointer for the placement preview
pub fn aim(state: &mut GameState, pos: Vec2) -> Result<(), ActionError> {
    if state.game_over {
        return Err(ActionError::GameOver);
    }
    if state.placement.is_none() {
        return Err(ActionError::NotPlacing);
    }
    state.aim = Some(pos);
    Ok(())
}

/// Build a tower at `pos`, paying its cost
pub fn place_tower(
    state: &mut GameState,
    pos: Vec2,
    now: u64,
) -> Result<EntityId, ActionError> {
    let kind = state.placement.unwrap_or_default();
    if let Err(err) = can_place_tower(state, kind, pos, now) {
        log::debug!("Placement failed: {}", err);
        return Err(err);
    }

    let id = state.next_entity_id();
    state.towers.push(Tower::new(id, pos, kind));
    state.sats -= kind.cost();
    state.last_placement_ms = Some(now);
    state.emit(GameEvent::TowerPlaced {
        id,
        pos,
        cost: kind.cost(),
        towers: state.towers.len(),
        max_towers: state.max_tower_points,
    });
    Ok(id)
}

/// Patch up the base for a few sats
pub fn small_repair(state: &mut GameState) -> Result<(), ActionError> {
    can_repair(state)?;
    state.sats -= REPAIR_COST;
    state.base.health += REPAIR_AMOUNT;
    state.emit(GameEvent::RepairApplied {
        amount: REPAIR_AMOUNT,
    });
    Ok(())
}

/// Begin the next wave; building is locked until it ends
pub fn start_wave(state: &mut GameState, now: u64) -> Result<(), ActionError> {
    can_start_wave(state)?;
    state.wave += 1;
    state.wave_active = true;
    state.placement = None;
    state.aim = None;
    spawner::start(state, now);
    Ok(())
}

/// Sell every tower back at full price
pub fn clear_towers(state: &mut GameState) -> Result<(), ActionError> {
    can_clear_towers(state)?;
    let refund: u32 = state.towers.iter().map(|t| t.cost).sum();
    state.sats += refund;
    state.towers.clear();
    state.placement = None;
    state.aim = None;
    state.emit(GameEvent::TowersCleared { refund });
    Ok(())
}

/// Buy another step of base range
pub fn expand_range(state: &mut GameState) -> Result<(), ActionError> {
    can_expand_range(state)?;
    let cost = expand_range_cost(state.base.range);
    state.sats -= cost;
    state.base.range += RANGE_STEP;
    state.emit(GameEvent::RangeExpanded {
        range: state.base.range,
        cost,
    });
    Ok(())
}

/// Start over after a game over
pub fn restart(state: &mut GameState) -> Result<(), ActionError> {
    if !state.game_over {
        return Err(ActionError::NotGameOver);
    }
    spawner::cancel(state);
    state.reset();
    state.emit(GameEvent::Restarted);
    Ok(())
}

/// Adopt a new canvas size: re-center the base and shrink its range to fit
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    state.canvas_width = width.round();
    state.canvas_height = height.round();
    state.base.pos = Base::center(width, height);
    state.base.range = state.base.range.min(Base::range_cap(width).round());
    log::debug!("Resized to {}x{}", state.canvas_width, state.canvas_height);
}
