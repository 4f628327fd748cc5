//! Direction math shared by movement strategies and emission patterns.
//!
//! Directions are unit vectors in simulation space (+y down). A zero vector is
//! never a valid direction: every helper falls back to [`DOWN`].

use bevy::prelude::*;

pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);
pub const UP: Vec2 = Vec2::new(0.0, -1.0);

/// Dot product below which two headings count as opposite.
const OPPOSITE_DOT: f32 = -0.999;

/// Normalize, or fall back to straight down for (near) zero vectors.
#[inline]
pub fn unit_or_down(v: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(DOWN)
}

/// Unit direction from `from` towards `target`; straight down without a target.
#[inline]
pub fn aim(from: Vec2, target: Option<Vec2>) -> Vec2 {
    target.map_or(DOWN, |t| unit_or_down(t - from))
}

/// Unit direction for an angle in degrees, measured from +x towards +y (screen down).
/// 90 degrees is straight down.
#[inline]
pub fn from_degrees(deg: f32) -> Vec2 {
    Vec2::from_angle(deg.to_radians())
}

/// Turn `current` towards `desired` by fraction `t` of the angle between them.
///
/// Spherical interpolation keeps the turn rate bounded. When the headings are
/// nearly opposite the rotation direction is undefined, so fall back to a plain
/// lerp, which picks a side deterministically.
pub fn steer(current: Vec2, desired: Vec2, t: f32) -> Vec2 {
    let current = unit_or_down(current);
    let desired = unit_or_down(desired);

    if current.dot(desired) < OPPOSITE_DOT {
        return current
            .lerp(desired, t)
            .try_normalize()
            .unwrap_or_else(|| current.perp());
    }

    let angle = current.angle_to(desired) * t;
    Vec2::from_angle(angle).rotate(current)
}

/// `n` evenly spaced headings spanning `spread_deg`, centered on `center_deg`.
pub fn fan(center_deg: f32, spread_deg: f32, n: usize) -> impl Iterator<Item = Vec2> {
    let (start, step) = if n > 1 {
        (center_deg - spread_deg * 0.5, spread_deg / (n - 1) as f32)
    } else {
        (center_deg, 0.0)
    };
    (0..n).map(move |i| from_degrees(start + step * i as f32))
}
