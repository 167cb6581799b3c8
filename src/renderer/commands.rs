//! Recording surface
//!
//! Captures draw calls instead of rasterizing them. Used by the headless
//! binary and by tests that need to inspect what a frame would show.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Color, Stroke, Surface};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Clear {
        width: f32,
        height: f32,
    },
    FillRect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Vec2>,
        stroke: Stroke,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text strings in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn polygons(&self, sides: usize) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Polygon { points, .. } if points.len() == sides))
            .count()
    }

    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, &Stroke)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Circle {
                center,
                radius,
                stroke,
            } => Some((*center, *radius, stroke)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear { width, height });
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCmd::FillRect { pos, size, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            stroke,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], stroke: Stroke) {
        self.commands.push(DrawCmd::Polygon {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}
