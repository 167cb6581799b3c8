//! Built-in build-and-defend policy
//!
//! Drives headless runs: fills tower slots on a ring around the base,
//! repairs when health is low, buys range with leftover sats and then starts
//! the next wave. Only ever issues actions the economy would accept.

use glam::Vec2;

use crate::consts::TOWER_RADIUS;
use crate::controls::ControlId;
use crate::game::HostEvent;
use crate::sim::economy::{self, ActionError};
use crate::sim::{GameState, TowerKind};

/// Repair once health drops below this
const REPAIR_THRESHOLD: i32 = 12;
/// Golden angle, spreads successive towers evenly around the base
const SLOT_ANGLE: f32 = 2.399_963;
const SLOTS_PER_RING: usize = 6;

/// Where the `index`th tower goes
pub fn tower_slot(state: &GameState, index: usize) -> Vec2 {
    let ring = (index / SLOTS_PER_RING) as f32;
    let radius = state.base.radius + TOWER_RADIUS * 3.0 + ring * TOWER_RADIUS * 3.0;
    let theta = index as f32 * SLOT_ANGLE;
    state.base.pos + radius * Vec2::new(theta.cos(), theta.sin())
}

/// Next input the policy wants to send, if any
pub fn decide(state: &GameState, now: u64) -> Option<HostEvent> {
    if state.game_over || state.wave_active {
        return None;
    }

    let slot = tower_slot(state, state.towers.len());
    match economy::can_place_tower(state, TowerKind::Firewall, slot, now) {
        Ok(()) => {
            return Some(HostEvent::Place {
                x: slot.x,
                y: slot.y,
            });
        }
        // Still affordable, just too soon: wait rather than start the wave
        Err(ActionError::PlacementCooldown) => return None,
        Err(_) => {}
    }
    if state.base.health < REPAIR_THRESHOLD && economy::can_repair(state).is_ok() {
        return Some(HostEvent::Press(ControlId::SmallRepairs));
    }
    if economy::can_expand_range(state).is_ok() {
        return Some(HostEvent::Press(ControlId::ExpandRange));
    }
    economy::can_start_wave(state)
        .is_ok()
        .then_some(HostEvent::Press(ControlId::StartWave))
}
