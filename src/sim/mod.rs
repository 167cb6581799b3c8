//! Simulation module
//!
//! All gameplay logic lives here. Time comes from the host as a millisecond
//! clock; nothing in this module reads wall time or touches the drawing
//! surface.

pub mod economy;
pub mod event;
pub mod spawner;
pub mod state;
pub mod targeting;
pub mod tick;

pub use economy::{ActionError, expand_range_cost};
pub use event::GameEvent;
pub use state::{
    Announcement, Base, Enemy, EnemyKind, EntityId, Explosion, GameState, Kill, Projectile,
    ProjectileStep, SpawnTimer, Tower, TowerKind,
};
pub use targeting::nearest_enemy;
pub use tick::tick;
