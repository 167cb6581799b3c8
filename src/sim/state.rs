//! Game state and entity types
//!
//! Everything one session owns lives in `GameState`. Entities update
//! themselves against explicitly passed context and report outcomes to the
//! caller; they never hold references back into the session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::consts::*;
use crate::elapsed_ms;

/// Stable handle for towers, enemies and projectiles
pub type EntityId = u32;

/// Buildable tower variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TowerKind {
    #[default]
    Firewall,
}

impl TowerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TowerKind::Firewall => "firewall",
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            TowerKind::Firewall => TOWER_COST,
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
}

/// True when a weapon with the given fire rate may shoot again
#[inline]
fn cooled_down(now: u64, last_shot_ms: Option<u64>, fire_rate_ms: u64) -> bool {
    elapsed_ms(now, last_shot_ms).is_none_or(|elapsed| elapsed >= fire_rate_ms)
}

/// The defended structure at the canvas center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub pos: Vec2,
    pub radius: f32,
    pub range: f32,
    pub damage: i32,
    pub fire_rate_ms: u64,
    pub last_shot_ms: Option<u64>,
    /// Signed and uncapped; the session ends once it drops to zero
    pub health: i32,
}

impl Base {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            pos: Self::center(canvas_width, canvas_height),
            radius: BASE_RADIUS,
            range: Self::range_cap(canvas_width).round().min(BASE_MAX_START_RANGE).max(0.0),
            damage: BASE_DAMAGE,
            fire_rate_ms: BASE_FIRE_RATE_MS,
            last_shot_ms: None,
            health: STARTING_HEALTH,
        }
    }

    /// Rounded canvas center
    pub fn center(canvas_width: f32, canvas_height: f32) -> Vec2 {
        Vec2::new((canvas_width / 2.0).round(), (canvas_height / 2.0).round())
    }

    /// Largest range the base may be expanded to on a canvas this wide
    pub fn range_cap(canvas_width: f32) -> f32 {
        canvas_width / 2.0 - RANGE_EDGE_MARGIN
    }

    pub fn ready_to_fire(&self, now: u64) -> bool {
        cooled_down(now, self.last_shot_ms, self.fire_rate_ms)
    }
}

/// A placed defensive unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub id: EntityId,
    pub pos: Vec2,
    pub kind: TowerKind,
    pub radius: f32,
    pub range: f32,
    pub damage: i32,
    pub fire_rate_ms: u64,
    pub last_shot_ms: Option<u64>,
    /// Never reduced: towers are indestructible
    pub health: i32,
    pub cost: u32,
}

impl Tower {
    pub fn new(id: EntityId, pos: Vec2, kind: TowerKind) -> Self {
        match kind {
            TowerKind::Firewall => Self {
                id,
                pos,
                kind,
                radius: TOWER_RADIUS,
                range: TOWER_RANGE,
                damage: TOWER_DAMAGE,
                fire_rate_ms: TOWER_FIRE_RATE_MS,
                last_shot_ms: None,
                health: TOWER_HEALTH,
                cost: kind.cost(),
            },
        }
    }

    /// Fire at the nearest enemy in range once the cooldown has elapsed
    pub fn update(&mut self, enemies: &[Enemy], now: u64) -> Option<Projectile> {
        if !cooled_down(now, self.last_shot_ms, self.fire_rate_ms) {
            return None;
        }
        let target = super::targeting::nearest_enemy(enemies, self.pos, self.range)?;
        self.last_shot_ms = Some(now);
        Some(Projectile::new(self.pos, target.id, self.damage))
    }
}

/// A hostile unit walking straight at the base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub size: f32,
    pub health: i32,
    pub speed: f32,
    pub damage: i32,
    pub reward_modifier: u32,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Basic => Self {
                id,
                pos,
                kind,
                size: ENEMY_SIZE,
                health: ENEMY_HEALTH,
                speed: ENEMY_SPEED,
                damage: ENEMY_DAMAGE,
                reward_modifier: ENEMY_REWARD_MODIFIER,
            },
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Sats granted for destroying this enemy
    pub fn reward(&self) -> u32 {
        KILL_REWARD * self.reward_modifier
    }

    /// Advance one frame toward the base.
    ///
    /// On contact the enemy damages the base (never more than the health it
    /// has left), marks itself dead and returns the damage dealt. It does not
    /// move on the frame it makes contact.
    pub fn update(&mut self, base: &mut Base) -> Option<i32> {
        let to_base = base.pos - self.pos;
        let dist = to_base.length();
        if dist < base.radius + self.size {
            let damage = self.damage.min(base.health.max(0));
            base.health -= damage;
            self.health = 0;
            return Some(damage);
        }
        self.pos += to_base / dist * self.speed;
        None
    }
}

/// Outcome of destroying an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub enemy: EntityId,
    pub pos: Vec2,
    pub reward: u32,
}

/// What a projectile did this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    /// Still homing; keep it
    Flying,
    /// Target gone or already dead; drop it
    Lost,
    /// Reached the target and dealt damage; drop it
    Hit { kill: Option<Kill> },
}

/// A homing shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Weak reference: resolved against the live enemy list every frame
    pub target: EntityId,
    pub damage: i32,
    pub speed: f32,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, target: EntityId, damage: i32) -> Self {
        Self {
            pos,
            target,
            damage,
            speed: PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
        }
    }

    /// Home toward the target's current position, or strike it when close
    pub fn update(&mut self, target: Option<&mut Enemy>) -> ProjectileStep {
        let Some(target) = target.filter(|t| t.is_alive()) else {
            return ProjectileStep::Lost;
        };

        let to_target = target.pos - self.pos;
        let dist = to_target.length();
        if dist < self.speed {
            target.health -= self.damage;
            let kill = (!target.is_alive()).then(|| Kill {
                enemy: target.id,
                pos: target.pos,
                reward: target.reward(),
            });
            return ProjectileStep::Hit { kill };
        }

        self.pos += to_target / dist * self.speed;
        ProjectileStep::Flying
    }
}

/// Expanding ring left behind by a destroyed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub created_ms: u64,
    pub duration_ms: u64,
}

impl Explosion {
    pub fn new(pos: Vec2, now: u64) -> Self {
        Self {
            pos,
            created_ms: now,
            duration_ms: EXPLOSION_DURATION_MS,
        }
    }

    /// 0 at creation, 1 at the end of its lifetime
    pub fn progress(&self, now: u64) -> f32 {
        effect_progress(now, self.created_ms, self.duration_ms)
    }

    pub fn radius(&self, now: u64) -> f32 {
        EXPLOSION_START_RADIUS + (EXPLOSION_MAX_RADIUS - EXPLOSION_START_RADIUS) * self.progress(now)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created_ms) > self.duration_ms
    }
}

/// Fading banner text ("Wave 3 Started!")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub text: String,
    pub created_ms: u64,
    pub duration_ms: u64,
}

impl Announcement {
    pub fn new(text: impl Into<String>, now: u64) -> Self {
        Self {
            text: text.into(),
            created_ms: now,
            duration_ms: ANNOUNCEMENT_DURATION_MS,
        }
    }

    pub fn progress(&self, now: u64) -> f32 {
        effect_progress(now, self.created_ms, self.duration_ms)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created_ms) > self.duration_ms
    }
}

fn effect_progress(now: u64, created_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (now.saturating_sub(created_ms) as f32 / duration_ms as f32).min(1.0)
}

/// Recurring spawn timer, independent of the frame cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    pub next_fire_ms: u64,
}

/// Complete session state (in-memory only, reset on restart)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the spawn RNG was created from
    pub seed: u64,
    /// Spawn position RNG
    pub(crate) rng: Pcg32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Currency
    pub sats: u32,
    /// Waves started so far
    pub wave: u32,
    /// Tower capacity; grows by one per completed wave
    pub max_tower_points: u32,
    pub base: Base,
    pub towers: Vec<Tower>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub announcements: Vec<Announcement>,
    /// Tower type the next map click builds, if any
    pub placement: Option<TowerKind>,
    /// Last pointer position while placing (preview only)
    pub aim: Option<Vec2>,
    pub wave_active: bool,
    pub game_over: bool,
    pub enemies_to_spawn: u32,
    /// Base health lost during the current wave
    pub base_health_lost: i32,
    pub last_placement_ms: Option<u64>,
    pub spawn_timer: Option<SpawnTimer>,
    /// Events not yet drained by the host
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a fresh session on a canvas of the given size
    pub fn new(seed: u64, canvas_width: f32, canvas_height: f32) -> Self {
        let canvas_width = canvas_width.round();
        let canvas_height = canvas_height.round();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            canvas_width,
            canvas_height,
            sats: STARTING_SATS,
            wave: 0,
            max_tower_points: STARTING_TOWER_POINTS,
            base: Base::new(canvas_width, canvas_height),
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            announcements: Vec::new(),
            placement: None,
            aim: None,
            wave_active: false,
            game_over: false,
            enemies_to_spawn: 0,
            base_health_lost: 0,
            last_placement_ms: None,
            spawn_timer: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Return every session and base field to its initial value.
    ///
    /// Canvas size, the RNG stream, ID allocation and undrained events
    /// carry over. The spawn timer is cancelled as part of the reset.
    pub fn reset(&mut self) {
        let mut fresh = Self::new(self.seed, self.canvas_width, self.canvas_height);
        fresh.rng = self.rng.clone();
        fresh.next_id = self.next_id;
        fresh.events = std::mem::take(&mut self.events);
        *self = fresh;
    }

    /// Queue an event for the host and log it
    pub fn emit(&mut self, event: GameEvent) {
        log::info!("[EVENT] {}", event);
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// True when the point lies on the canvas
    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x < self.canvas_width && pos.y >= 0.0 && pos.y < self.canvas_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_at(x: f32, y: f32) -> Base {
        let mut base = Base::new(400.0, 600.0);
        base.pos = Vec2::new(x, y);
        base
    }

    #[test]
    fn test_base_initial_range_clamped_to_canvas() {
        assert_eq!(Base::new(400.0, 600.0).range, 100.0);
        // 250 / 2 - 50 = 75
        assert_eq!(Base::new(250.0, 600.0).range, 75.0);
        assert_eq!(Base::new(400.0, 600.0).pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_enemy_walks_toward_base() {
        let mut base = base_at(100.0, 0.0);
        let mut enemy = Enemy::new(1, Vec2::ZERO, EnemyKind::Basic);

        assert_eq!(enemy.update(&mut base), None);
        assert!((enemy.pos - Vec2::new(ENEMY_SPEED, 0.0)).length() < 1e-5);
        assert_eq!(base.health, STARTING_HEALTH);
    }

    #[test]
    fn test_enemy_contact_damages_base_and_dies() {
        let mut base = base_at(0.0, 0.0);
        // Just inside radius + size
        let start = Vec2::new(BASE_RADIUS + ENEMY_SIZE - 1.0, 0.0);
        let mut enemy = Enemy::new(1, start, EnemyKind::Basic);

        assert_eq!(enemy.update(&mut base), Some(ENEMY_DAMAGE));
        assert_eq!(base.health, STARTING_HEALTH - ENEMY_DAMAGE);
        assert!(!enemy.is_alive());
        assert_eq!(enemy.pos, start, "no movement on the contact frame");
    }

    #[test]
    fn test_enemy_damage_capped_by_remaining_health() {
        let mut base = base_at(0.0, 0.0);
        base.health = 2;
        let mut enemy = Enemy::new(1, Vec2::new(5.0, 0.0), EnemyKind::Basic);

        assert_eq!(enemy.update(&mut base), Some(2));
        assert_eq!(base.health, 0);
    }

    #[test]
    fn test_projectile_homes_on_moving_target() {
        let mut enemy = Enemy::new(7, Vec2::new(100.0, 0.0), EnemyKind::Basic);
        let mut shot = Projectile::new(Vec2::ZERO, enemy.id, 1);

        assert_eq!(shot.update(Some(&mut enemy)), ProjectileStep::Flying);
        assert!((shot.pos - Vec2::new(PROJECTILE_SPEED, 0.0)).length() < 1e-5);

        // Target moves; the next step re-aims at the new position
        enemy.pos = Vec2::new(PROJECTILE_SPEED, 100.0);
        assert_eq!(shot.update(Some(&mut enemy)), ProjectileStep::Flying);
        assert!((shot.pos - Vec2::new(PROJECTILE_SPEED, PROJECTILE_SPEED)).length() < 1e-4);
    }

    #[test]
    fn test_projectile_kill_reports_reward() {
        let mut enemy = Enemy::new(3, Vec2::new(1.0, 0.0), EnemyKind::Basic);
        enemy.health = 1;
        let mut shot = Projectile::new(Vec2::ZERO, enemy.id, 1);

        let step = shot.update(Some(&mut enemy));
        assert_eq!(
            step,
            ProjectileStep::Hit {
                kill: Some(Kill {
                    enemy: 3,
                    pos: Vec2::new(1.0, 0.0),
                    reward: KILL_REWARD * ENEMY_REWARD_MODIFIER,
                })
            }
        );
    }

    #[test]
    fn test_projectile_hit_without_kill() {
        let mut enemy = Enemy::new(3, Vec2::new(1.0, 0.0), EnemyKind::Basic);
        let mut shot = Projectile::new(Vec2::ZERO, enemy.id, 1);

        assert_eq!(shot.update(Some(&mut enemy)), ProjectileStep::Hit { kill: None });
        assert_eq!(enemy.health, ENEMY_HEALTH - 1);
    }

    #[test]
    fn test_projectile_lost_when_target_missing_or_dead() {
        let mut shot = Projectile::new(Vec2::ZERO, 9, 1);
        assert_eq!(shot.update(None), ProjectileStep::Lost);

        let mut dead = Enemy::new(9, Vec2::new(1.0, 0.0), EnemyKind::Basic);
        dead.health = 0;
        assert_eq!(shot.update(Some(&mut dead)), ProjectileStep::Lost);
        assert_eq!(dead.health, 0);
    }

    #[test]
    fn test_tower_respects_fire_rate() {
        let enemies = vec![Enemy::new(2, Vec2::new(30.0, 0.0), EnemyKind::Basic)];
        let mut tower = Tower::new(1, Vec2::ZERO, TowerKind::Firewall);

        assert!(tower.update(&enemies, 0).is_some());
        assert!(tower.update(&enemies, TOWER_FIRE_RATE_MS - 1).is_none());
        let shot = tower.update(&enemies, TOWER_FIRE_RATE_MS).expect("cooled down");
        assert_eq!(shot.target, 2);
    }

    #[test]
    fn test_tower_without_target_keeps_cooldown_ready() {
        let far = vec![Enemy::new(2, Vec2::new(500.0, 0.0), EnemyKind::Basic)];
        let mut tower = Tower::new(1, Vec2::ZERO, TowerKind::Firewall);

        assert!(tower.update(&far, 10).is_none());
        assert_eq!(tower.last_shot_ms, None);
    }

    #[test]
    fn test_effects_expire_after_duration() {
        let explosion = Explosion::new(Vec2::ZERO, 1000);
        assert_eq!(explosion.radius(1000), EXPLOSION_START_RADIUS);
        assert!(!explosion.is_expired(1000 + EXPLOSION_DURATION_MS));
        assert!(explosion.is_expired(1001 + EXPLOSION_DURATION_MS));

        let banner = Announcement::new("Wave 1 Started!", 0);
        assert!(!banner.is_expired(ANNOUNCEMENT_DURATION_MS));
        assert!(banner.is_expired(ANNOUNCEMENT_DURATION_MS + 1));
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = GameState::new(42, 400.0, 600.0);
        state.sats = 3;
        state.wave = 5;
        state.game_over = true;
        state.base.health = -2;
        state.base.range = 140.0;
        state.towers.push(Tower::new(1, Vec2::ONE, TowerKind::Firewall));
        state.spawn_timer = Some(SpawnTimer {
            interval_ms: 500,
            next_fire_ms: 10,
        });

        state.reset();

        assert_eq!(state.sats, STARTING_SATS);
        assert_eq!(state.wave, 0);
        assert!(!state.game_over);
        assert_eq!(state.base.health, STARTING_HEALTH);
        assert_eq!(state.base.range, 100.0);
        assert!(state.towers.is_empty());
        assert!(state.spawn_timer.is_none());
        assert_eq!(state.canvas_width, 400.0);
    }
}
