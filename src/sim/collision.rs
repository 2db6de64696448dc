//! Collision detection for axis-aligned boxes
//!
//! Every entity is a box anchored at its top-left corner. Bullets and
//! enemies use strict edge overlap; power-up pickup uses centre distance.

use glam::Vec2;

/// Axis-aligned rectangle (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Centre-distance overlap: centres closer than half the summed extents
    /// on both axes
    pub fn overlaps_centered(&self, other: &Rect) -> bool {
        let d = (self.center() - other.center()).abs();
        let reach = (self.size + other.size) * 0.5;
        d.x < reach.x && d.y < reach.y
    }
}

/// Whether an enemy of the given half-extent at `target` is inside a splash
/// of `radius` centred at `impact`
#[inline]
pub fn within_splash(impact: Vec2, radius: f32, target: Vec2, half_extent: f32) -> bool {
    impact.distance(target) <= radius + half_extent
}
