//! Fire strategies for regular enemies. Bosses use the pattern engine instead.

use bevy::prelude::*;
use rand::Rng;

use crate::common::motion::{aim, fan, from_degrees, DOWN};
use crate::plugins::projectiles::components::ShotRequest;

use super::archetype::Archetype;

const SCATTER_PERIOD: u32 = 18;
const SPREAD_PERIOD: u32 = 40;
const DRIP_PERIOD: u32 = 60;
const SNIPER_PERIOD: u32 = 120;

#[derive(Component, Debug, Clone, PartialEq)]
pub enum FireStrategy {
    /// Never fires on its own.
    Holster,
    /// Occasional loose burst straight down.
    Scatter { timer: u32 },
    /// Fan of 3-5 shots around straight down.
    Spread { timer: u32 },
    /// Single slow shot on a fixed period.
    Drip { timer: u32 },
    /// Single shot aimed at the player.
    Sniper { timer: u32, period: u32 },
}

impl FireStrategy {
    pub fn for_archetype(archetype: Archetype, rng: &mut impl Rng) -> Self {
        match archetype {
            Archetype::Normal => FireStrategy::Scatter { timer: 0 },
            Archetype::Tank => FireStrategy::Spread { timer: 0 },
            Archetype::Wave => FireStrategy::Drip { timer: 0 },
            Archetype::Hunter => FireStrategy::Sniper {
                timer: rng.random_range(0..SNIPER_PERIOD),
                period: SNIPER_PERIOD,
            },
            // Fast enemies fire from their movement script; bosses have pattern tables.
            _ => FireStrategy::Holster,
        }
    }

    /// Advance one frame, appending any shots to `out`.
    pub fn step(
        &mut self,
        pos: Vec2,
        half_extent: f32,
        target: Option<Vec2>,
        rng: &mut impl Rng,
        out: &mut Vec<ShotRequest>,
    ) {
        let muzzle = Vec2::new(pos.x, pos.y + half_extent);

        match self {
            FireStrategy::Holster => {}

            FireStrategy::Scatter { timer } => {
                *timer += 1;
                if *timer < SCATTER_PERIOD {
                    return;
                }
                *timer = 0;
                if rng.random::<f32>() >= 0.1 {
                    return;
                }
                for _ in 0..rng.random_range(1..=3) {
                    let origin = muzzle + Vec2::new(rng.random_range(-12.0..=12.0), 0.0);
                    out.push(ShotRequest::enemy(origin, DOWN, rng.random_range(1.5..=3.0)));
                }
            }

            FireStrategy::Spread { timer } => {
                *timer += 1;
                if *timer < SPREAD_PERIOD {
                    return;
                }
                *timer = 0;
                if !rng.random_bool(0.5) {
                    return;
                }
                let count = rng.random_range(3..=5);
                for dir in fan(90.0, 60.0, count) {
                    out.push(ShotRequest::enemy(muzzle, dir, rng.random_range(1.2..=2.5)));
                }
            }

            FireStrategy::Drip { timer } => {
                *timer += 1;
                if *timer > DRIP_PERIOD {
                    *timer = 0;
                    out.push(ShotRequest::enemy(muzzle, from_degrees(90.0), 2.5));
                }
            }

            FireStrategy::Sniper { timer, period } => {
                *timer += 1;
                if *timer >= *period {
                    *timer = 0;
                    out.push(ShotRequest::enemy(muzzle, aim(muzzle, target), 3.0));
                }
            }
        }
    }
}
