//! Spatial state shared by every simulated entity.

use bevy::prelude::*;

/// Authoritative position and circular collision extent.
///
/// Simulation coordinates: origin at the top-left of the playfield, +y pointing
/// down the screen. Rendering derives its `Transform` from this every frame;
/// nothing writes position back from the transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
}

impl Body {
    #[inline]
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }

    /// Axis-aligned bounds of the collision circle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_center_half_size(self.pos, Vec2::splat(self.radius))
    }
}

/// Marker: entity should be removed from the world.
///
/// Nothing despawns in the middle of the frame. Systems mark, and the reclaim
/// step despawns once collision resolution is done with the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;
