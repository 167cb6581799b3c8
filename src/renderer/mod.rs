//! Vector rendering module
//!
//! Draws a read-only view of the session onto a host-provided [`Surface`].
//! Rendering never mutates gameplay state; expired effects are pruned by the
//! simulation tick, not here.

pub mod commands;
pub mod shapes;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HEADER_HEIGHT, TOWER_RADIUS};
use crate::sim::GameState;

pub use commands::{DrawCmd, DrawList};

/// Linear RGBA, components in 0..=1
pub type Color = [f32; 4];

/// Palette
pub mod colors {
    use super::Color;

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
    }

    pub const GREEN: Color = rgba(0, 255, 0, 1.0);
    pub const YELLOW: Color = rgba(255, 255, 0, 1.0);
    pub const RED: Color = rgba(255, 0, 0, 1.0);
    pub const WHITE: Color = rgba(255, 255, 255, 1.0);
    pub const HEADER_BG: Color = rgba(42, 42, 42, 0.8);
    pub const OVERLAY: Color = rgba(0, 0, 0, 0.8);

    pub const fn with_alpha(color: Color, alpha: f32) -> Color {
        [color[0], color[1], color[2], alpha]
    }
}

/// Neon halo drawn behind a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub glow: Option<Glow>,
}

impl Stroke {
    pub const fn plain(color: Color) -> Self {
        Self {
            color,
            width: 1.0,
            glow: None,
        }
    }

    pub const fn neon(color: Color, halo: Color, blur: f32) -> Self {
        Self {
            color,
            width: 1.0,
            glow: Some(Glow { color: halo, blur }),
        }
    }

    pub const fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

/// 2D drawing surface supplied by the host
pub trait Surface {
    /// Erase everything and start a new frame
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke);
    /// Closed outline through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], stroke: Stroke);
    /// Text centered on `pos`, `size` in pixels
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

const HEADER_TEXT_SIZE: f32 = 14.0;
const HEALTH_TEXT_SIZE: f32 = 12.0;
const ANNOUNCEMENT_TEXT_SIZE: f32 = 18.0;
const GAME_OVER_TEXT_SIZE: f32 = 28.0;
const RESTART_TEXT_SIZE: f32 = 16.0;
const RANGE_RING_ALPHA: f32 = 0.3;

/// Header line: "Wave N | Towers a/b | Budget s | Health h"
pub fn stats_text(state: &GameState) -> String {
    format!(
        "Wave {} | Towers {}/{} | Budget {} | Health {}",
        state.wave,
        state.towers.len(),
        state.max_tower_points,
        state.sats,
        state.base.health
    )
}

/// Draw one frame of the session at host time `now`
pub fn render(state: &GameState, surface: &mut impl Surface, now: u64) {
    let width = state.canvas_width;
    let height = state.canvas_height;
    surface.clear(width, height);

    draw_header(state, surface);
    draw_base(state, surface);

    let tower_stroke = Stroke::neon(colors::YELLOW, colors::YELLOW, 8.0);
    let tower_ring = Stroke::neon(
        colors::with_alpha(colors::YELLOW, RANGE_RING_ALPHA),
        colors::YELLOW,
        8.0,
    );
    for tower in &state.towers {
        surface.stroke_polygon(&shapes::hexagon(tower.pos, tower.radius), tower_stroke);
        surface.stroke_circle(tower.pos, tower.range, tower_ring);
    }

    let enemy_stroke = Stroke::neon(colors::RED, colors::RED, 8.0);
    for enemy in &state.enemies {
        surface.stroke_polygon(&shapes::triangle(enemy.pos, enemy.size), enemy_stroke);
    }

    let projectile_stroke = Stroke::neon(colors::WHITE, colors::WHITE, 4.0).width(0.5);
    for projectile in &state.projectiles {
        surface.stroke_circle(projectile.pos, projectile.radius, projectile_stroke);
    }

    for explosion in &state.explosions {
        let fade = 1.0 - explosion.progress(now);
        let stroke = Stroke::neon(colors::with_alpha(colors::RED, fade), colors::RED, 8.0);
        surface.stroke_circle(explosion.pos, explosion.radius(now), stroke);
    }

    for announcement in &state.announcements {
        let fade = 1.0 - announcement.progress(now);
        surface.fill_text(
            &announcement.text,
            Vec2::new(width / 2.0, height / 4.0),
            ANNOUNCEMENT_TEXT_SIZE,
            colors::with_alpha(colors::GREEN, fade),
        );
    }

    if let (Some(_), Some(aim)) = (state.placement, state.aim) {
        surface.stroke_polygon(
            &shapes::hexagon(aim, TOWER_RADIUS),
            Stroke::plain(colors::with_alpha(colors::YELLOW, 0.5)),
        );
    }

    if state.game_over {
        draw_game_over(width, height, surface);
    }
}

fn draw_header(state: &GameState, surface: &mut impl Surface) {
    surface.fill_rect(
        Vec2::ZERO,
        Vec2::new(state.canvas_width, HEADER_HEIGHT),
        colors::HEADER_BG,
    );
    surface.fill_text(
        &stats_text(state),
        Vec2::new(state.canvas_width / 2.0, HEADER_HEIGHT / 2.0),
        HEADER_TEXT_SIZE,
        colors::GREEN,
    );
}

fn draw_base(state: &GameState, surface: &mut impl Surface) {
    let base = &state.base;
    surface.stroke_circle(
        base.pos,
        base.radius,
        Stroke::neon(colors::GREEN, colors::GREEN, 8.0),
    );
    surface.stroke_circle(
        base.pos,
        base.range,
        Stroke::neon(
            colors::with_alpha(colors::GREEN, RANGE_RING_ALPHA),
            colors::GREEN,
            8.0,
        ),
    );
    surface.fill_text(
        &base.health.to_string(),
        base.pos,
        HEALTH_TEXT_SIZE,
        colors::WHITE,
    );
}

fn draw_game_over(width: f32, height: f32, surface: &mut impl Surface) {
    surface.fill_rect(Vec2::ZERO, Vec2::new(width, height), colors::OVERLAY);
    surface.fill_text(
        "Game Over",
        Vec2::new(width / 2.0, height / 2.0 - 20.0),
        GAME_OVER_TEXT_SIZE,
        colors::GREEN,
    );
    surface.fill_text(
        "Tap to Restart",
        Vec2::new(width / 2.0, height / 2.0 + 20.0),
        RESTART_TEXT_SIZE,
        colors::GREEN,
    );
}
