//! Narrow-phase shape tests.

use bevy::prelude::*;

/// Collision shape of a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    /// Capsule around the segment `start..end`.
    Beam { start: Vec2, end: Vec2, half_width: f32 },
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match *self {
            Shape::Circle { center, radius } => {
                Rect::from_center_half_size(center, Vec2::splat(radius))
            }
            Shape::Beam { start, end, half_width } => {
                Rect::from_corners(start, end).inflate(half_width)
            }
        }
    }

    pub fn hits_circle(&self, center: Vec2, radius: f32) -> bool {
        match *self {
            Shape::Circle { center: c, radius: r } => circles_overlap(c, r, center, radius),
            Shape::Beam { start, end, half_width } => {
                let reach = half_width + radius;
                segment_distance_squared(center, start, end) < reach * reach
            }
        }
    }
}

/// Two circles collide when the distance between centers is less than the sum of radii.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Circle against an axis-aligned rectangle.
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    let closest = center.clamp(rect.min, rect.max);
    closest.distance_squared(center) < radius * radius
}

/// Squared distance from `p` to the segment `a..b`.
pub fn segment_distance_squared(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}
