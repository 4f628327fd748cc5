//! Movement strategies.
//!
//! Each archetype gets one strategy at spawn time. A strategy owns whatever
//! state its motion needs and moves the body by writing `Body::pos` directly.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::common::motion::{aim, steer, DOWN};
use crate::common::tunables::frames_from_ms;
use crate::plugins::projectiles::components::ShotRequest;

use super::archetype::Archetype;

/// What a strategy may look at while moving.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    pub target: Option<Vec2>,
    pub field: Vec2,
    pub half_extent: f32,
    /// Boss scripts may request a sideways dash (sign gives the direction).
    pub lateral_dash: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmbushPhase {
    Settle { frames_left: u32 },
    Aim { shots_left: u32, cooldown: u32 },
    Chase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub cooldown: u32,
    pub frames_left: u32,
    pub dir: f32,
    pub speed: f32,
}

/// Waypoint loop used by the secret boss.
pub const SECRET_ROUTE: [Vec2; 4] = [
    Vec2::new(300.0, 170.0),
    Vec2::new(140.0, 240.0),
    Vec2::new(300.0, 300.0),
    Vec2::new(460.0, 240.0),
];

const ZIGZAG_FLIP_FRAMES: u32 = 80;
const AMBUSH_SETTLE_FRAMES: u32 = frames_from_ms(2000);
const AMBUSH_SHOT_FRAMES: u32 = frames_from_ms(300);
const AMBUSH_SHOTS: u32 = 5;
const TANK_WEAVE_AMPLITUDE: f32 = 60.0;
/// 0.0025 rad per millisecond, expressed per frame.
const TANK_WEAVE_RATE: f32 = 0.0025 * 1000.0 / 60.0;
const TANK_LERP: f32 = 0.08;
const WAVE_BOB_AMPLITUDE: f32 = 3.0;
const HUNTER_TURN_RATE: f32 = 0.08;
const BOSS_ENTRY_Y: f32 = 90.0;
const BOSS_DASH_SPEED: f32 = 3.0;

#[derive(Component, Debug, Clone, PartialEq)]
pub enum MovementStrategy {
    /// Diagonal descent that flips its horizontal component periodically.
    Zigzag { velocity: Vec2, speed: f32, timer: u32 },
    /// Pause, fire an aimed volley, then charge the player.
    Ambush { phase: AmbushPhase, speed: f32 },
    /// Slow descent with a sinusoidal sway and random lateral bursts.
    TankWeave { anchor_x: f32, phase: f32, t: f32, speed: f32, burst: Burst },
    /// Horizontal sweep with a small vertical bob.
    Weave { dir_x: f32, base_y: f32, angle: f32, speed: f32 },
    /// Bounded-turn pursuit of the player.
    Pursuit { heading: Vec2, speed: f32 },
    /// Boss entry: descend, then sway around a home line.
    Hover { speed: f32, sway: f32, dash_dir: f32 },
    /// Scripted loop through fixed points.
    Waypoints { route: &'static [Vec2], cursor: usize, speed: f32 },
}

impl MovementStrategy {
    pub fn for_archetype(archetype: Archetype, spawn: Vec2, field: Vec2, rng: &mut impl Rng) -> Self {
        let speed = archetype.stats().speed;
        match archetype {
            Archetype::Normal => MovementStrategy::Zigzag {
                velocity: Vec2::new(if rng.random_bool(0.5) { 1.0 } else { -1.0 }, 1.0),
                speed,
                timer: 0,
            },
            Archetype::Fast => MovementStrategy::Ambush {
                phase: AmbushPhase::Settle { frames_left: AMBUSH_SETTLE_FRAMES },
                speed,
            },
            Archetype::Tank => MovementStrategy::TankWeave {
                anchor_x: spawn.x,
                phase: rng.random_range(0.0..TAU),
                t: 0.0,
                speed,
                burst: Burst {
                    cooldown: rng.random_range(120..=300),
                    frames_left: 0,
                    dir: 0.0,
                    speed: 0.0,
                },
            },
            Archetype::Wave => MovementStrategy::Weave {
                dir_x: if spawn.x < field.x * 0.5 { 1.0 } else { -1.0 },
                base_y: spawn.y,
                angle: 0.0,
                speed,
            },
            Archetype::Hunter => MovementStrategy::Pursuit { heading: DOWN, speed },
            Archetype::SecretBoss => MovementStrategy::Waypoints { route: &SECRET_ROUTE, cursor: 0, speed },
            Archetype::MidBoss | Archetype::StageBoss | Archetype::GrandBoss => {
                MovementStrategy::Hover { speed, sway: 0.0, dash_dir: 0.0 }
            }
        }
    }

    /// Move one frame. Strategies that fire as part of their script return the shot.
    pub fn step(&mut self, pos: &mut Vec2, ctx: &MoveContext, rng: &mut impl Rng) -> Option<ShotRequest> {
        match self {
            MovementStrategy::Zigzag { velocity, speed, timer } => {
                *timer += 1;
                if *timer > ZIGZAG_FLIP_FRAMES {
                    velocity.x = -velocity.x;
                    *timer = 0;
                }
                *pos += *velocity * *speed;
                None
            }

            MovementStrategy::Ambush { phase, speed } => match phase {
                AmbushPhase::Settle { frames_left } => {
                    *frames_left = frames_left.saturating_sub(1);
                    if *frames_left == 0 {
                        *phase = AmbushPhase::Aim { shots_left: AMBUSH_SHOTS, cooldown: AMBUSH_SHOT_FRAMES };
                    }
                    None
                }
                AmbushPhase::Aim { shots_left, cooldown } => {
                    *cooldown = cooldown.saturating_sub(1);
                    if *cooldown > 0 {
                        return None;
                    }
                    *cooldown = AMBUSH_SHOT_FRAMES;
                    *shots_left -= 1;
                    let origin = Vec2::new(pos.x, pos.y + ctx.half_extent);
                    let shot = ShotRequest::enemy(origin, aim(origin, ctx.target), 3.0);
                    if *shots_left == 0 {
                        *phase = AmbushPhase::Chase;
                    }
                    Some(shot)
                }
                AmbushPhase::Chase => {
                    *pos += aim(*pos, ctx.target) * *speed;
                    None
                }
            },

            MovementStrategy::TankWeave { anchor_x, phase, t, speed, burst } => {
                pos.y += *speed;
                *t += 1.0;

                if burst.frames_left > 0 {
                    pos.x += burst.dir * burst.speed;
                    burst.frames_left -= 1;
                } else {
                    let target_x = *anchor_x + (*t * TANK_WEAVE_RATE + *phase).sin() * TANK_WEAVE_AMPLITUDE;
                    pos.x += (target_x - pos.x) * TANK_LERP;

                    if burst.cooldown > 0 {
                        burst.cooldown -= 1;
                    } else {
                        if rng.random::<f32>() < 0.25 {
                            burst.dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                            burst.speed = rng.random_range(3.0..=5.0);
                            burst.frames_left = rng.random_range(18..=36);
                        }
                        burst.cooldown = rng.random_range(160..=360);
                    }
                }

                let min_x = ctx.half_extent;
                let max_x = ctx.field.x - ctx.half_extent;
                if pos.x < min_x || pos.x > max_x {
                    pos.x = pos.x.clamp(min_x, max_x.max(min_x));
                    *anchor_x = pos.x;
                }
                None
            }

            MovementStrategy::Weave { dir_x, base_y, angle, speed } => {
                pos.x += *dir_x * *speed;
                *angle += 0.1;
                pos.y = *base_y + angle.sin() * WAVE_BOB_AMPLITUDE;
                None
            }

            MovementStrategy::Pursuit { heading, speed } => {
                *heading = steer(*heading, aim(*pos, ctx.target), HUNTER_TURN_RATE);
                *pos += *heading * *speed;
                None
            }

            MovementStrategy::Hover { speed, sway, dash_dir } => {
                let home_y = BOSS_ENTRY_Y + ctx.half_extent;
                let min_x = ctx.half_extent;
                let max_x = (ctx.field.x - ctx.half_extent).max(min_x);

                if pos.y < home_y {
                    pos.y = (pos.y + *speed).min(home_y);
                    return None;
                }

                match ctx.lateral_dash {
                    Some(dir) => {
                        if *dash_dir == 0.0 {
                            *dash_dir = dir.signum();
                        }
                        pos.x += *dash_dir * BOSS_DASH_SPEED;
                        if pos.x <= min_x || pos.x >= max_x {
                            *dash_dir = -*dash_dir;
                        }
                    }
                    None => {
                        *dash_dir = 0.0;
                        *sway += 1.0 / 60.0;
                        pos.x += sway.sin() * 2.0;
                    }
                }
                pos.x = pos.x.clamp(min_x, max_x);
                None
            }

            MovementStrategy::Waypoints { route, cursor, speed } => {
                if route.is_empty() {
                    return None;
                }
                let goal = route[*cursor % route.len()];
                let to_goal = goal - *pos;
                if to_goal.length() <= *speed {
                    *pos = goal;
                    *cursor = (*cursor + 1) % route.len();
                } else {
                    *pos += to_goal.normalize() * *speed;
                }
                None
            }
        }
    }
}
