//! Nearest-enemy query shared by the base and every tower

use glam::Vec2;

use super::state::Enemy;

/// Closest living enemy strictly inside `range` of `origin`.
///
/// Linear scan in collection order; on equal distances the enemy that comes
/// first wins.
pub fn nearest_enemy(enemies: &[Enemy], origin: Vec2, range: f32) -> Option<&Enemy> {
    let mut closest = None;
    let mut min_dist = f32::INFINITY;
    for enemy in enemies.iter().filter(|e| e.is_alive()) {
        let dist = enemy.pos.distance(origin);
        if dist < range && dist < min_dist {
            min_dist = dist;
            closest = Some(enemy);
        }
    }
    closest
}
