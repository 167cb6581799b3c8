//! Wave spawn scheduler
//!
//! The spawner runs on its own recurring timer rather than on the frame
//! cadence. The host's event loop dispatches it through [`pump`], which fires
//! every interval that came due since the last call. Both the timer and the
//! frame update run to completion on the same thread, so the enemy list is
//! never observed half-modified.

use glam::Vec2;
use rand::Rng;

use super::event::GameEvent;
use super::state::{Announcement, Enemy, EnemyKind, GameState, SpawnTimer};
use crate::consts::*;

/// Delay between spawns for a wave; shrinks as waves progress
pub fn spawn_interval_ms(wave: u32) -> u64 {
    (SPAWN_BASE_INTERVAL_MS / (1.0 + wave as f64 / 10.0)).max(SPAWN_MIN_INTERVAL_MS) as u64
}

/// Number of enemies a wave spawns
pub fn wave_size(wave: u32) -> u32 {
    wave * ENEMIES_PER_WAVE
}

/// Arm the spawner for the current wave.
///
/// The first enemy arrives one interval after `now`.
pub fn start(state: &mut GameState, now: u64) {
    if !state.wave_active {
        return;
    }
    let wave = state.wave;
    state.enemies_to_spawn = wave_size(wave);
    let interval_ms = spawn_interval_ms(wave);
    state.spawn_timer = Some(SpawnTimer {
        interval_ms,
        next_fire_ms: now + interval_ms,
    });
    state
        .announcements
        .push(Announcement::new(format!("Wave {} Started!", wave), now));
    state.emit(GameEvent::WaveStarted {
        wave,
        enemies: state.enemies_to_spawn,
    });
}

/// Cancel the spawn timer. Takes effect immediately.
pub fn cancel(state: &mut GameState) {
    if state.spawn_timer.take().is_some() {
        log::debug!("Spawn timer cancelled ({} left unspawned)", state.enemies_to_spawn);
    }
}

/// Run every timer firing due at or before `now`. Returns how many enemies
/// were spawned.
pub fn pump(state: &mut GameState, now: u64) -> u32 {
    let mut spawned = 0;
    while let Some(timer) = state.spawn_timer {
        if timer.next_fire_ms > now {
            break;
        }
        if state.enemies_to_spawn == 0 || state.game_over {
            cancel(state);
            break;
        }

        let pos = edge_point(&mut state.rng, state.canvas_width, state.canvas_height);
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, EnemyKind::Basic));
        state.enemies_to_spawn -= 1;
        spawned += 1;
        state.emit(GameEvent::EnemySpawned {
            id,
            pos,
            remaining: state.enemies_to_spawn,
        });

        if state.enemies_to_spawn == 0 {
            cancel(state);
        } else {
            state.spawn_timer = Some(SpawnTimer {
                next_fire_ms: timer.next_fire_ms + timer.interval_ms,
                ..timer
            });
        }
    }
    spawned
}

/// Uniform point on one of the four canvas edges (edge chosen uniformly)
pub fn edge_point(rng: &mut impl Rng, width: f32, height: f32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * width, 0.0),
        1 => Vec2::new(width, rng.random::<f32>() * height),
        2 => Vec2::new(rng.random::<f32>() * width, height),
        _ => Vec2::new(0.0, rng.random::<f32>() * height),
    }
}
