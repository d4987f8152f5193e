//! Axis-aligned rectangle geometry and overlap tests
//!
//! Every gameplay hitbox is a rectangle described by its center and size.
//! Ships are drawn tilted, but rotation is purely cosmetic and never enters
//! the collision test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by center point and full extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Whether this rectangle overlaps `other`
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self.center, self.size, other.center, other.size)
    }
}

/// Standard AABB overlap: extents must overlap on both axes.
///
/// Rectangles that merely touch along an edge do not overlap.
#[inline]
pub fn aabb_overlap(center_a: Vec2, size_a: Vec2, center_b: Vec2, size_b: Vec2) -> bool {
    let delta = (center_a - center_b).abs();
    let reach = (size_a + size_b) * 0.5;
    delta.x < reach.x && delta.y < reach.y
}

/// Clamp a center so a rectangle of `size` stays fully inside `[0, bounds]`
#[inline]
pub fn clamp_inside(center: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let half = size * 0.5;
    // max before min: a rect larger than the bounds pins to the far edge
    center.max(half).min(bounds - half)
}
