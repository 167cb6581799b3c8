//! Sat Defense - a tower-defense arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, targeting, spawning, economy, per-frame tick)
//! - `controls`: Control widgets derived from game state
//! - `renderer`: Draws game state onto a host-provided 2D surface
//! - `game`: Frame driver and host input boundary
//! - `autoplay`: Simple build-and-defend policy for headless runs
//! - `platform`: Browser adapter
//! - `settings`: Host configuration

pub mod autoplay;
pub mod controls;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controls::{ControlId, ControlView};
pub use game::{Game, HostEvent, UiHost};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default frame period (~60 Hz display refresh)
    pub const FRAME_MS: u64 = 16;

    /// Session start values
    pub const STARTING_SATS: u32 = 21;
    pub const STARTING_HEALTH: i32 = 21;
    pub const STARTING_TOWER_POINTS: u32 = 3;

    /// Base defaults
    pub const BASE_RADIUS: f32 = 15.0;
    pub const BASE_MAX_START_RANGE: f32 = 100.0;
    /// Range may never reach closer than this to the canvas edge
    pub const RANGE_EDGE_MARGIN: f32 = 50.0;
    pub const BASE_DAMAGE: i32 = 1;
    pub const BASE_FIRE_RATE_MS: u64 = 1000;

    /// Firewall tower defaults
    pub const TOWER_RADIUS: f32 = 12.0;
    pub const TOWER_RANGE: f32 = 80.0;
    pub const TOWER_DAMAGE: i32 = 1;
    pub const TOWER_FIRE_RATE_MS: u64 = 1000;
    pub const TOWER_COST: u32 = 7;
    /// Towers never take damage; kept for parity with the unit sheet
    pub const TOWER_HEALTH: i32 = 7;

    /// Basic enemy defaults
    pub const ENEMY_SIZE: f32 = 10.0;
    pub const ENEMY_HEALTH: i32 = 3;
    /// Pixels per frame
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_DAMAGE: i32 = 3;
    pub const ENEMY_REWARD_MODIFIER: u32 = 1;
    /// Sats per kill before the enemy's reward modifier
    pub const KILL_REWARD: u32 = 5;

    /// Projectile defaults (speed in pixels per frame)
    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_RADIUS: f32 = 2.0;

    /// Visual effects
    pub const EXPLOSION_START_RADIUS: f32 = 10.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 40.0;
    pub const EXPLOSION_DURATION_MS: u64 = 500;
    pub const ANNOUNCEMENT_DURATION_MS: u64 = 2000;

    /// Economy
    pub const REPAIR_COST: u32 = 5;
    pub const REPAIR_AMOUNT: i32 = 5;
    pub const RANGE_STEP: f32 = 10.0;
    pub const RANGE_BASE_COST: f64 = 10.0;
    pub const RANGE_COST_GROWTH: f64 = 1.5;
    pub const RANGE_COST_SCALE: f64 = 50.0;

    /// Input debounce
    pub const PLACEMENT_COOLDOWN_MS: u64 = 200;
    pub const BUTTON_DEBOUNCE_MS: u64 = 300;

    /// Spawning
    pub const ENEMIES_PER_WAVE: u32 = 2;
    pub const SPAWN_BASE_INTERVAL_MS: f64 = 1000.0;
    pub const SPAWN_MIN_INTERVAL_MS: f64 = 200.0;

    /// HUD
    pub const HEADER_HEIGHT: f32 = 30.0;
}

/// Milliseconds elapsed since `since`, or `None` if it never happened
#[inline]
pub fn elapsed_ms(now: u64, since: Option<u64>) -> Option<u64> {
    since.map(|t| now.saturating_sub(t))
}
