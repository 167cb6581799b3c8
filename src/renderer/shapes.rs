//! Outline generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

/// Regular polygon with `sides` corners, first corner at `start_angle`
pub fn regular_polygon(center: Vec2, radius: f32, sides: u32, start_angle: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let theta = start_angle + (i as f32 / sides as f32) * 2.0 * PI;
            center + radius * Vec2::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Flat-sided hexagon used for towers and the placement preview
pub fn hexagon(center: Vec2, radius: f32) -> Vec<Vec2> {
    regular_polygon(center, radius, 6, 0.0)
}

/// Upward-pointing triangle used for enemies
pub fn triangle(center: Vec2, size: f32) -> Vec<Vec2> {
    let (sin, cos) = (PI / 6.0).sin_cos();
    vec![
        Vec2::new(center.x, center.y - size),
        Vec2::new(center.x + size * cos, center.y + size * sin),
        Vec2::new(center.x - size * cos, center.y + size * sin),
    ]
}
