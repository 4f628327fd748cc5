//! Per-frame projectile motion: frozen countdown, lifetime decay, homing.

use bevy::prelude::*;

use crate::common::body::Body;
use crate::common::motion::{aim, steer};
use crate::plugins::enemies::{Enemy, LifeState};

use super::components::{HomingLock, Projectile, ProjectileState};

/// Fraction of the remaining angle a homing shot turns each frame.
pub const HOMING_TURN_RATE: f32 = 5.0 * 0.02;

/// Nearest live enemy to `from`, if any.
fn nearest_enemy<'a>(
    from: Vec2,
    enemies: impl Iterator<Item = (Entity, &'a Body, &'a LifeState)>,
) -> Option<Entity> {
    enemies
        .filter(|(_, _, life)| life.is_alive())
        .map(|(e, body, _)| (e, body.pos.distance_squared(from)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Advance a homing lock and return the position to steer towards.
fn homing_target(
    lock: &mut HomingLock,
    from: Vec2,
    q_enemies: &Query<(Entity, &Body, &LifeState), (With<Enemy>, Without<Projectile>)>,
) -> Option<Vec2> {
    if *lock == HomingLock::Seeking {
        if let Some(e) = nearest_enemy(from, q_enemies.iter()) {
            *lock = HomingLock::Locked(e);
        }
    }

    let HomingLock::Locked(target) = *lock else {
        return None;
    };

    match q_enemies.get(target) {
        Ok((_, body, life)) if life.is_alive() => Some(body.pos),
        _ => {
            *lock = HomingLock::Lost;
            None
        }
    }
}

pub fn move_projectiles(
    q_enemies: Query<(Entity, &Body, &LifeState), (With<Enemy>, Without<Projectile>)>,
    mut q: Query<(&mut Projectile, &mut Body, &mut ProjectileState), Without<Enemy>>,
) {
    for (mut projectile, mut body, mut state) in &mut q {
        if *state != ProjectileState::Active {
            continue;
        }

        if projectile.frozen_frames > 0 {
            projectile.frozen_frames -= 1;
            if projectile.frozen_frames > 0 {
                continue;
            }
        }

        if projectile.lifetime == 0 {
            *state = ProjectileState::PendingReturn;
            continue;
        }
        projectile.lifetime -= 1;

        if projectile.homing != HomingLock::Off {
            let mut lock = projectile.homing;
            if let Some(target) = homing_target(&mut lock, body.pos, &q_enemies) {
                let desired = aim(body.pos, Some(target));
                projectile.direction = steer(projectile.direction, desired, HOMING_TURN_RATE);
            }
            projectile.homing = lock;
        }

        let step = projectile.direction * projectile.speed;
        body.pos += step;
    }
}
