//! Per-frame simulation update
//!
//! Stage order within a frame is fixed: base fire, towers, enemies,
//! projectiles, effect expiry, wave-end check, game-over check. Later stages
//! see the deaths and shots staged by earlier ones.

use super::event::GameEvent;
use super::spawner;
use super::state::{Announcement, Explosion, GameState, Kill, Projectile, ProjectileStep};
use super::targeting::nearest_enemy;

/// Advance the session by one frame at host time `now` (milliseconds)
pub fn tick(state: &mut GameState, now: u64) {
    if state.game_over {
        return;
    }

    fire_base(state, now);
    update_towers(state, now);
    update_enemies(state);
    update_projectiles(state, now);
    expire_effects(state, now);
    check_wave_end(state, now);
    check_game_over(state);
}

fn fire_base(state: &mut GameState, now: u64) {
    let base = &mut state.base;
    if !base.ready_to_fire(now) {
        return;
    }
    if let Some(target) = nearest_enemy(&state.enemies, base.pos, base.range) {
        state
            .projectiles
            .push(Projectile::new(base.pos, target.id, base.damage));
        base.last_shot_ms = Some(now);
    }
}

fn update_towers(state: &mut GameState, now: u64) {
    for tower in &mut state.towers {
        if let Some(shot) = tower.update(&state.enemies, now) {
            state.projectiles.push(shot);
        }
    }
}

fn update_enemies(state: &mut GameState) {
    let mut contacts = Vec::new();
    for enemy in &mut state.enemies {
        if let Some(damage) = enemy.update(&mut state.base) {
            state.base_health_lost += damage;
            contacts.push((enemy.id, damage));
        }
    }
    for (id, damage) in contacts {
        state.emit(GameEvent::EnemyReachedBase { id, damage });
    }
    remove_dead_enemies(state);
}

fn update_projectiles(state: &mut GameState, now: u64) {
    let mut kills: Vec<Kill> = Vec::new();
    let enemies = &mut state.enemies;
    state.projectiles.retain_mut(|projectile| {
        let target = enemies.iter_mut().find(|e| e.id == projectile.target);
        match projectile.update(target) {
            ProjectileStep::Flying => true,
            ProjectileStep::Lost => false,
            ProjectileStep::Hit { kill } => {
                kills.extend(kill);
                false
            }
        }
    });

    for kill in kills {
        state.sats += kill.reward;
        state.explosions.push(Explosion::new(kill.pos, now));
        state.emit(GameEvent::EnemyDefeated {
            id: kill.enemy,
            pos: kill.pos,
            reward: kill.reward,
        });
    }
    remove_dead_enemies(state);
}

fn remove_dead_enemies(state: &mut GameState) {
    let before = state.enemies.len();
    state.enemies.retain(|e| e.is_alive());
    if state.enemies.len() != before {
        log::debug!("Enemy removed, {} enemies remain", state.enemies.len());
    }
}

fn expire_effects(state: &mut GameState, now: u64) {
    state.explosions.retain(|e| !e.is_expired(now));
    state.announcements.retain(|a| !a.is_expired(now));
}

fn check_wave_end(state: &mut GameState, now: u64) {
    let finished = state.wave_active
        && state.enemies.is_empty()
        && state.enemies_to_spawn == 0
        && state.spawn_timer.is_none()
        && !state.game_over;
    if !finished {
        return;
    }

    state.wave_active = false;
    state.max_tower_points += 1;
    let restored = state.base_health_lost / 2;
    state.base.health += restored;
    state.base_health_lost = 0;
    state
        .announcements
        .push(Announcement::new(format!("Wave {} Ended!", state.wave), now));
    state.emit(GameEvent::WaveEnded {
        wave: state.wave,
        restored,
        max_towers: state.max_tower_points,
    });
}

fn check_game_over(state: &mut GameState) {
    if state.base.health > 0 {
        return;
    }
    state.game_over = true;
    state.placement = None;
    spawner::cancel(state);
    state.emit(GameEvent::GameOver {
        wave: state.wave,
        sats: state.sats,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::economy;
    use crate::sim::state::{Enemy, EnemyKind, Tower, TowerKind};
    use glam::Vec2;

    fn session() -> GameState {
        GameState::new(5, 400.0, 600.0)
    }

    fn spawn_enemy(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, pos, EnemyKind::Basic));
        id
    }

    #[test]
    fn test_base_fires_at_enemy_in_range() {
        let mut state = session();
        let id = spawn_enemy(&mut state, Vec2::new(200.0, 250.0));

        tick(&mut state, 0);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].target, id);
        assert_eq!(state.base.last_shot_ms, Some(0));

        // Still cooling down
        tick(&mut state, 500);
        assert!(state.projectiles.len() <= 1);
    }

    #[test]
    fn test_base_ignores_enemy_out_of_range() {
        let mut state = session();
        spawn_enemy(&mut state, Vec2::new(200.0, 0.0));
        tick(&mut state, 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.base.last_shot_ms, None);
    }

    #[test]
    fn test_tower_shots_join_projectiles() {
        let mut state = session();
        state.towers.push(Tower::new(90, Vec2::new(20.0, 20.0), TowerKind::Firewall));
        spawn_enemy(&mut state, Vec2::new(40.0, 20.0));

        tick(&mut state, 0);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.towers[0].last_shot_ms, Some(0));
    }

    #[test]
    fn test_enemy_reaching_base_is_removed_same_frame() {
        let mut state = session();
        state.wave_active = true;
        spawn_enemy(&mut state, Vec2::new(210.0, 300.0));

        tick(&mut state, 0);
        assert!(state.enemies.is_empty());
        assert!(state.events.contains(&GameEvent::EnemyReachedBase {
            id: 1,
            damage: ENEMY_DAMAGE
        }));
        // Wave ended the same frame and restored half the loss
        assert!(!state.wave_active);
        assert_eq!(state.base.health, STARTING_HEALTH - ENEMY_DAMAGE + ENEMY_DAMAGE / 2);
        assert_eq!(state.base_health_lost, 0);
    }

    #[test]
    fn test_second_projectile_gets_no_reward() {
        let mut state = session();
        let id = spawn_enemy(&mut state, Vec2::new(50.0, 50.0));
        state.enemies[0].health = 1;
        let pos = state.enemies[0].pos;
        state.projectiles.push(Projectile::new(pos, id, 1));
        state.projectiles.push(Projectile::new(pos, id, 1));
        let sats = state.sats;

        tick(&mut state, 0);
        assert_eq!(state.sats, sats + KILL_REWARD);
        assert!(state.projectiles.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.explosions.len(), 1);
        let defeats = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDefeated { .. }))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn test_orphaned_projectile_is_dropped() {
        let mut state = session();
        state.projectiles.push(Projectile::new(Vec2::ZERO, 12345, 1));
        tick(&mut state, 0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_effects_pruned_in_update() {
        let mut state = session();
        state.explosions.push(Explosion::new(Vec2::ZERO, 0));
        state.announcements.push(Announcement::new("hi", 0));

        tick(&mut state, EXPLOSION_DURATION_MS + 1);
        assert!(state.explosions.is_empty());
        assert_eq!(state.announcements.len(), 1);

        tick(&mut state, ANNOUNCEMENT_DURATION_MS + 1);
        assert!(state.announcements.is_empty());
    }

    #[test]
    fn test_wave_waits_for_pending_spawns() {
        let mut state = session();
        economy::start_wave(&mut state, 0).unwrap();

        tick(&mut state, 16);
        assert!(state.wave_active, "spawn timer still live");
        assert_eq!(state.enemies_to_spawn, 2);
    }

    #[test]
    fn test_wave_end_escalates_and_restores() {
        let mut state = session();
        state.wave = 1;
        state.wave_active = true;
        state.base.health = 12;
        state.base_health_lost = 9;

        tick(&mut state, 100);
        assert!(!state.wave_active);
        assert_eq!(state.max_tower_points, STARTING_TOWER_POINTS + 1);
        assert_eq!(state.base.health, 16);
        assert_eq!(state.base_health_lost, 0);
        assert_eq!(state.announcements.last().map(|a| a.text.as_str()), Some("Wave 1 Ended!"));
        assert!(state.events.contains(&GameEvent::WaveEnded {
            wave: 1,
            restored: 4,
            max_towers: 4
        }));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = session();
        state.wave_active = true;
        state.base.health = 2;
        spawn_enemy(&mut state, Vec2::new(200.0, 290.0));
        spawn_enemy(&mut state, Vec2::new(200.0, 100.0));

        tick(&mut state, 0);
        assert!(state.game_over);
        assert_eq!(state.base.health, 0);
        assert!(state.spawn_timer.is_none());

        let frozen = serde_json::to_string(&state).unwrap();
        tick(&mut state, 5000);
        assert_eq!(serde_json::to_string(&state).unwrap(), frozen);
    }

    #[test]
    fn test_fresh_session_scenario() {
        let mut state = session();
        economy::place_tower(&mut state, Vec2::new(150.0, 300.0), 0).unwrap();
        assert_eq!(state.sats, 14);
        assert_eq!(state.towers.len(), 1);

        economy::start_wave(&mut state, 0).unwrap();
        assert_eq!(state.wave, 1);
        assert_eq!(state.enemies_to_spawn, 2);

        let mut now = 0;
        let mut spawned = 0;
        while state.wave_active && now < 120_000 {
            now += FRAME_MS;
            spawned += spawner::pump(&mut state, now);
            tick(&mut state, now);
        }

        assert_eq!(spawned, 2);
        assert!(!state.wave_active);
        assert!(!state.game_over);
        assert_eq!(state.max_tower_points, STARTING_TOWER_POINTS + 1);
        // Whatever got through, half of it came back (floored)
        let lost: i32 = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::EnemyReachedBase { damage, .. } => Some(*damage),
                _ => None,
            })
            .sum();
        assert_eq!(state.base.health, STARTING_HEALTH - lost + lost / 2);
    }
}
