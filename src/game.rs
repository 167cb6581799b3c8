//! Frame driver and host boundary
//!
//! The host owns the clock, the drawing surface and the widgets. It feeds
//! input in as [`HostEvent`]s and calls [`Game::frame`] once per display
//! refresh.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BUTTON_DEBOUNCE_MS;
use crate::controls::{self, ControlId, ControlView};
use crate::elapsed_ms;
use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::economy::{self, ActionError};
use crate::sim::{GameEvent, GameState, spawner, tick};

/// Normalized input delivered by the host adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// Pointer moved over the canvas
    Aim { x: f32, y: f32 },
    /// Canvas tapped or clicked
    Place { x: f32, y: f32 },
    /// On-screen control pressed
    Press(ControlId),
    Restart,
    Resize { width: f32, height: f32 },
}

/// Widget side of the host
pub trait UiHost {
    /// Reflect a control view into its widget. Returns false when the
    /// widget does not exist.
    fn show_control(&mut self, view: &ControlView) -> bool;
}

/// One game session plus its host-facing plumbing
pub struct Game {
    state: GameState,
    /// Button debounce clock; widget state, not part of the session
    last_press_ms: Option<u64>,
}

impl Game {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.resolve_seed();
        log::info!(
            "New session: seed {}, canvas {}x{}",
            seed,
            settings.canvas_width,
            settings.canvas_height
        );
        Self::with_seed(seed, settings.canvas_width, settings.canvas_height)
    }

    pub fn with_seed(seed: u64, width: f32, height: f32) -> Self {
        Self {
            state: GameState::new(seed, width, height),
            last_press_ms: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.game_over
    }

    /// Apply one host event at host time `now`.
    ///
    /// A tap on the canvas after game over restarts the session.
    pub fn handle(&mut self, event: HostEvent, now: u64) -> Result<(), ActionError> {
        let result = match event {
            HostEvent::Aim { x, y } => {
                // Pointer motion outside placement mode is routine; stay quiet
                return match economy::aim(&mut self.state, Vec2::new(x, y)) {
                    Err(ActionError::NotPlacing) => Ok(()),
                    other => other,
                };
            }
            HostEvent::Place { .. } if self.state.game_over => economy::restart(&mut self.state),
            HostEvent::Place { x, y } => {
                economy::place_tower(&mut self.state, Vec2::new(x, y), now).map(|_| ())
            }
            HostEvent::Press(id) => self.press(id, now),
            HostEvent::Restart => economy::restart(&mut self.state),
            HostEvent::Resize { width, height } => {
                economy::resize(&mut self.state, width, height);
                Ok(())
            }
        };
        if let Err(err) = &result {
            log::debug!("{:?} refused: {}", event, err);
        }
        result
    }

    /// Debounced control press
    pub fn press(&mut self, id: ControlId, now: u64) -> Result<(), ActionError> {
        if elapsed_ms(now, self.last_press_ms).is_some_and(|e| e < BUTTON_DEBOUNCE_MS) {
            return Err(ActionError::Debounced);
        }
        self.last_press_ms = Some(now);
        log::debug!("{} pressed", id.name());

        let result = controls::activate(&mut self.state, id, now);
        if let Err(err) = &result {
            log::info!("{} action failed: {}", id.name(), err);
        }
        result
    }

    /// Run one display frame: spawner, simulation, then drawing.
    ///
    /// Once the game is over nothing runs until a restart. Returns whether
    /// the frame was drawn.
    pub fn frame(&mut self, now: u64, surface: &mut impl Surface) -> bool {
        if self.state.game_over {
            return false;
        }
        spawner::pump(&mut self.state, now);
        tick(&mut self.state, now);
        renderer::render(&self.state, surface, now);
        true
    }

    /// Draw the current state without advancing it. Hosts call this when
    /// the surface was wiped (e.g. by a resize) while the game is over.
    pub fn redraw(&self, now: u64, surface: &mut impl Surface) {
        renderer::render(&self.state, surface, now);
    }

    /// Push current control views into the host's widgets
    pub fn sync_controls(&self, ui: &mut impl UiHost) {
        for view in controls::view(&self.state) {
            if !ui.show_control(&view) {
                log::warn!("Control widget '{}' not found; skipping", view.id.key());
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::{DrawCmd, DrawList};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeUi {
        widgets: HashMap<ControlId, ControlView>,
        missing: Vec<ControlId>,
    }

    impl UiHost for FakeUi {
        fn show_control(&mut self, view: &ControlView) -> bool {
            if self.missing.contains(&view.id) {
                return false;
            }
            self.widgets.insert(view.id, view.clone());
            true
        }
    }

    fn game() -> Game {
        Game::with_seed(11, 400.0, 600.0)
    }

    #[test]
    fn test_button_presses_are_debounced() {
        let mut game = game();
        game.press(ControlId::SmallRepairs, 1000).unwrap();
        assert_eq!(
            game.press(ControlId::SmallRepairs, 1200),
            Err(ActionError::Debounced)
        );
        assert_eq!(game.state().sats, STARTING_SATS - REPAIR_COST);

        game.press(ControlId::SmallRepairs, 1300).unwrap();
        assert_eq!(game.state().sats, STARTING_SATS - 2 * REPAIR_COST);
    }

    #[test]
    fn test_failed_press_still_debounces() {
        let mut game = game();
        assert_eq!(
            game.press(ControlId::ClearTowers, 0),
            Err(ActionError::NoTowers)
        );
        assert_eq!(
            game.press(ControlId::StartWave, 100),
            Err(ActionError::Debounced)
        );
        assert!(!game.state().wave_active);
    }

    #[test]
    fn test_refused_press_leaves_session_untouched() {
        let mut game = game();
        game.press(ControlId::StartWave, 0).unwrap();
        let before = serde_json::to_string(game.state()).unwrap();

        assert_eq!(
            game.press(ControlId::StartWave, 1000),
            Err(ActionError::WaveActive)
        );
        assert_eq!(serde_json::to_string(game.state()).unwrap(), before);
        // The refused press still debounces the next one
        assert_eq!(
            game.press(ControlId::StartWave, 1100),
            Err(ActionError::Debounced)
        );
    }

    #[test]
    fn test_redraw_after_game_over() {
        let mut game = game();
        game.state.base.health = 0;
        game.frame(0, &mut DrawList::new());
        assert!(game.is_over());

        let mut surface = DrawList::new();
        assert!(!game.frame(16, &mut surface));
        assert!(surface.is_empty());

        game.handle(
            HostEvent::Resize {
                width: 300.0,
                height: 500.0,
            },
            32,
        )
        .unwrap();
        game.redraw(32, &mut surface);
        assert!(surface.contains_text("Tap to Restart"));
        assert!(matches!(surface.commands[0], DrawCmd::Clear { width, .. } if width == 300.0));
    }

    #[test]
    fn test_aim_outside_placement_is_silent() {
        let mut game = game();
        assert_eq!(game.handle(HostEvent::Aim { x: 5.0, y: 5.0 }, 0), Ok(()));
        assert_eq!(game.state().aim, None);

        game.press(ControlId::FirewallTower, 0).unwrap();
        game.handle(HostEvent::Aim { x: 5.0, y: 5.0 }, 0).unwrap();
        assert_eq!(game.state().aim, Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_frame_stops_after_game_over() {
        let mut game = game();
        let mut surface = DrawList::new();
        assert!(game.frame(0, &mut surface));

        game.state.base.health = 0;
        assert!(game.frame(16, &mut surface), "game-over frame is drawn");
        assert!(surface.contains_text("Game Over"));
        assert!(game.is_over());

        let drawn = surface.len();
        assert!(!game.frame(32, &mut surface));
        assert_eq!(surface.len(), drawn);
    }

    #[test]
    fn test_tap_restarts_after_game_over() {
        let mut game = game();
        game.state.base.health = 0;
        game.frame(0, &mut DrawList::new());
        assert!(game.is_over());

        game.handle(HostEvent::Place { x: 100.0, y: 100.0 }, 500).unwrap();
        assert!(!game.is_over());
        assert!(game.state().towers.is_empty(), "restart tap builds nothing");
        assert_eq!(game.state().base.health, STARTING_HEALTH);
        assert!(game.frame(516, &mut DrawList::new()));
    }

    #[test]
    fn test_restart_refused_while_running() {
        let mut game = game();
        assert_eq!(
            game.handle(HostEvent::Restart, 0),
            Err(ActionError::NotGameOver)
        );
    }

    #[test]
    fn test_sync_controls_skips_missing_widgets() {
        let mut game = game();
        game.handle(HostEvent::Place { x: 50.0, y: 50.0 }, 0).unwrap();
        let mut ui = FakeUi {
            missing: vec![ControlId::ExpandRange],
            ..FakeUi::default()
        };
        game.sync_controls(&mut ui);

        assert_eq!(ui.widgets.len(), 4);
        assert!(ui.widgets[&ControlId::ClearTowers].enabled);
        assert!(!ui.widgets.contains_key(&ControlId::ExpandRange));
    }

    #[test]
    fn test_resize_recenters_base() {
        let mut game = game();
        game.handle(
            HostEvent::Resize {
                width: 200.4,
                height: 300.0,
            },
            0,
        )
        .unwrap();
        let state = game.state();
        assert_eq!(state.canvas_width, 200.0);
        assert_eq!(state.base.pos, Vec2::new(100.0, 150.0));
        assert_eq!(state.base.range, 50.0);
    }

    #[test]
    fn test_events_drain_once() {
        let mut game = game();
        game.press(ControlId::StartWave, 0).unwrap();
        let events = game.drain_events();
        assert!(matches!(events[0], GameEvent::WaveStarted { wave: 1, enemies: 2 }));
        assert!(game.drain_events().is_empty());
    }
}
