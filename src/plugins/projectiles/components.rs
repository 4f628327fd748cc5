use bevy::prelude::*;

use crate::common::body::Body;
use crate::common::motion::{unit_or_down, DOWN};
use crate::plugins::collision::shapes::Shape;

/// Marker for entities owned by the projectile pool.
#[derive(Component)]
pub struct PooledProjectile;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    /// Retired this frame; the commit step hands it back to the pool.
    PendingReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Enemy,
    Player,
}

/// Flight model and visual family of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShotKind {
    #[default]
    Normal,
    /// Steers towards a locked enemy.
    Homing,
    /// Long thin beam segment, hit-tested as a capsule.
    Laser,
    Ice,
    Vortex,
}

/// Target lock of a homing projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomingLock {
    #[default]
    Off,
    /// Looking for the nearest live enemy.
    Seeking,
    Locked(Entity),
    /// The locked target died; keep flying straight.
    Lost,
}

/// Everything a producer decides about a shot.
///
/// This is the only input to [`Projectile::armed`], which is used both when
/// the pool spawns a fresh entity and when it re-arms a recycled one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub side: Side,
    pub kind: ShotKind,
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    /// Visual radius; the hit radius is derived from it.
    pub radius: f32,
    /// Beam length for lasers, zero otherwise.
    pub length: f32,
    pub tint: Color,
    /// Frames spent motionless before the shot starts moving.
    pub frozen_frames: u32,
    pub lifetime: u32,
    pub damage: i32,
}

pub const ENEMY_SHOT_TINT: Color = Color::srgb(1.0, 0.35, 0.45);
pub const PLAYER_SHOT_TINT: Color = Color::srgb(0.55, 0.9, 1.0);
pub const HOMING_SHOT_TINT: Color = Color::srgb(0.7, 1.0, 0.55);

/// Enemy shots have no natural expiry besides leaving the field; this bounds stragglers.
const ENEMY_SHOT_LIFETIME: u32 = 1200;
const PLAYER_SHOT_LIFETIME: u32 = 300;
const HOMING_SHOT_LIFETIME: u32 = 480;

/// Fraction of the visual radius that actually collides.
const HIT_SCALE: f32 = 0.8;

impl ShotRequest {
    pub fn enemy(origin: Vec2, direction: Vec2, speed: f32) -> Self {
        Self {
            side: Side::Enemy,
            kind: ShotKind::Normal,
            origin,
            direction: unit_or_down(direction),
            speed,
            radius: 8.0,
            length: 0.0,
            tint: ENEMY_SHOT_TINT,
            frozen_frames: 0,
            lifetime: ENEMY_SHOT_LIFETIME,
            damage: 1,
        }
    }

    pub fn player(origin: Vec2, direction: Vec2) -> Self {
        Self {
            side: Side::Player,
            speed: 8.0,
            radius: 12.0,
            tint: PLAYER_SHOT_TINT,
            lifetime: PLAYER_SHOT_LIFETIME,
            ..Self::enemy(origin, direction, 0.0)
        }
    }

    pub fn homing(origin: Vec2) -> Self {
        Self {
            kind: ShotKind::Homing,
            speed: 6.0,
            tint: HOMING_SHOT_TINT,
            lifetime: HOMING_SHOT_LIFETIME,
            ..Self::player(origin, crate::common::motion::UP)
        }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn kind(mut self, kind: ShotKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn laser(mut self, length: f32) -> Self {
        self.kind = ShotKind::Laser;
        self.length = length;
        self
    }

    pub fn frozen(mut self, frames: u32) -> Self {
        self.frozen_frames = frames;
        self
    }

    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.radius * HIT_SCALE
    }

    #[inline]
    pub fn body(&self) -> Body {
        Body::new(self.origin, self.hit_radius())
    }

    /// Sprite extent: a disc, or a beam `length` long.
    pub fn sprite_size(&self) -> Vec2 {
        match self.kind {
            ShotKind::Laser => Vec2::new(self.radius * 2.0, self.length),
            _ => Vec2::splat(self.radius * 2.0),
        }
    }
}

/// Mutable per-shot state. Reset wholesale on every (re)use.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub side: Side,
    pub kind: ShotKind,
    pub direction: Vec2,
    pub speed: f32,
    pub length: f32,
    pub tint: Color,
    pub frozen_frames: u32,
    pub lifetime: u32,
    pub damage: i32,
    pub homing: HomingLock,
}

impl Projectile {
    /// The single constructor for a live shot.
    pub fn armed(req: &ShotRequest) -> Self {
        Self {
            side: req.side,
            kind: req.kind,
            direction: unit_or_down(req.direction),
            speed: req.speed,
            length: req.length,
            tint: req.tint,
            frozen_frames: req.frozen_frames,
            lifetime: req.lifetime,
            damage: req.damage,
            homing: if req.kind == ShotKind::Homing {
                HomingLock::Seeking
            } else {
                HomingLock::Off
            },
        }
    }

    /// State of a shot parked in the pool.
    pub fn inert() -> Self {
        Self {
            side: Side::Enemy,
            kind: ShotKind::Normal,
            direction: DOWN,
            speed: 0.0,
            length: 0.0,
            tint: Color::NONE,
            frozen_frames: 0,
            lifetime: 0,
            damage: 0,
            homing: HomingLock::Off,
        }
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen_frames > 0
    }

    /// Collision shape at the given body.
    pub fn shape(&self, body: &Body) -> Shape {
        match self.kind {
            ShotKind::Laser => {
                let half = self.direction * (self.length * 0.5);
                Shape::Beam {
                    start: body.pos - half,
                    end: body.pos + half,
                    half_width: body.radius,
                }
            }
            _ => Shape::Circle {
                center: body.pos,
                radius: body.radius,
            },
        }
    }

    /// Facing angle in radians for presentation.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.direction.y.atan2(self.direction.x)
    }
}
