//! On-screen control widgets
//!
//! Widget state is never stored. Each frame (or after each action) the host
//! asks for the current views, which are computed from the session alone.

use serde::{Deserialize, Serialize};

use crate::consts::{REPAIR_COST, TOWER_COST};
use crate::sim::economy::{self, ActionError};
use crate::sim::{GameState, TowerKind};

/// Panel a control belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlGroup {
    Tools,
    Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    FirewallTower,
    SmallRepairs,
    StartWave,
    ClearTowers,
    ExpandRange,
}

impl ControlId {
    pub const ALL: [ControlId; 5] = [
        ControlId::FirewallTower,
        ControlId::SmallRepairs,
        ControlId::StartWave,
        ControlId::ClearTowers,
        ControlId::ExpandRange,
    ];

    /// Stable element id for hosts that key widgets by name
    pub fn key(&self) -> &'static str {
        match self {
            ControlId::FirewallTower => "tower-1",
            ControlId::SmallRepairs => "small-repairs",
            ControlId::StartWave => "start-wave",
            ControlId::ClearTowers => "clear-towers",
            ControlId::ExpandRange => "expand-range",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    pub fn group(&self) -> ControlGroup {
        match self {
            ControlId::FirewallTower | ControlId::SmallRepairs => ControlGroup::Tools,
            _ => ControlGroup::Actions,
        }
    }

    /// Human-readable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ControlId::FirewallTower => "Firewall Tower",
            ControlId::SmallRepairs => "Small Repairs",
            ControlId::StartWave => "Start Wave",
            ControlId::ClearTowers => "Clear Towers",
            ControlId::ExpandRange => "Expand Range",
        }
    }
}

/// What a widget should currently show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlView {
    pub id: ControlId,
    pub label: String,
    pub enabled: bool,
    /// Highlighted (selected mode, or an action worth taking now)
    pub active: bool,
}

/// Derive one control's view from the session
pub fn control(state: &GameState, id: ControlId) -> ControlView {
    let (label, enabled, active) = match id {
        ControlId::FirewallTower => {
            let enabled = economy::can_select_tower(state, TowerKind::Firewall).is_ok();
            let selected = state.placement == Some(TowerKind::Firewall);
            (
                format!("{} ({} SATs)", id.name(), TOWER_COST),
                enabled,
                selected && enabled,
            )
        }
        ControlId::SmallRepairs => (
            format!("{} ({} SATs)", id.name(), REPAIR_COST),
            economy::can_repair(state).is_ok(),
            false,
        ),
        ControlId::StartWave => {
            let enabled = economy::can_start_wave(state).is_ok();
            (id.name().to_string(), enabled, enabled)
        }
        ControlId::ClearTowers => {
            let enabled = economy::can_clear_towers(state).is_ok();
            (id.name().to_string(), enabled, enabled)
        }
        ControlId::ExpandRange => {
            let cost = economy::expand_range_cost(state.base.range);
            let enabled = economy::can_expand_range(state).is_ok();
            (format!("{} ({} SATs)", id.name(), cost), enabled, enabled)
        }
    };
    ControlView {
        id,
        label,
        enabled,
        active,
    }
}

/// Views for every control, in panel order
pub fn view(state: &GameState) -> Vec<ControlView> {
    ControlId::ALL.iter().map(|&id| control(state, id)).collect()
}

/// Run the action behind a control
pub fn activate(state: &mut GameState, id: ControlId, now: u64) -> Result<(), ActionError> {
    match id {
        ControlId::FirewallTower => economy::toggle_placement(state),
        ControlId::SmallRepairs => economy::small_repair(state),
        ControlId::StartWave => economy::start_wave(state, now),
        ControlId::ClearTowers => economy::clear_towers(state),
        ControlId::ExpandRange => economy::expand_range(state),
    }
}
