//! Return commit: recycle projectiles back into the pool.
//!
//! This system is the owner of the *Inactive invariants*. Inactive projectiles are:
//! - hidden
//! - inert (`Projectile::inert`, zero-radius body)
//! - parked in the pool free list, or despawned when the pool is full
//!
//! Anything that wants a projectile gone only writes `PendingReturn`, so a
//! projectile retired by two systems in one frame is still returned once.

use bevy::prelude::*;

use crate::common::body::Body;

use super::components::{PooledProjectile, Projectile, ProjectileState, Side};
use super::pool::{ProjectilePool, Returned};

pub fn return_to_pool_commit(
    mut commands: Commands,
    mut pool: ResMut<ProjectilePool>,
    mut q: Query<(
        Entity,
        &mut ProjectileState,
        &mut Projectile,
        &mut Body,
        &mut Visibility,
    ), With<PooledProjectile>>,
) {
    for (e, mut state, mut projectile, mut body, mut vis) in &mut q {
        if *state != ProjectileState::PendingReturn {
            continue;
        }

        *state = ProjectileState::Inactive;
        *projectile = Projectile::inert();
        body.radius = 0.0;
        *vis = Visibility::Hidden;

        if let Returned::Dropped(e) = pool.put(e) {
            commands.entity(e).despawn();
        }
    }
}

/// Retire every active enemy shot. Returns how many were retired.
///
/// Used by the bomb and by the boss-defeat sweep; the commit step above does
/// the actual return on the same frame.
pub fn retire_enemy_shots(q: &mut Query<(&Projectile, &mut ProjectileState)>) -> u32 {
    let mut retired = 0;
    for (projectile, mut state) in q.iter_mut() {
        if projectile.side == Side::Enemy && *state == ProjectileState::Active {
            *state = ProjectileState::PendingReturn;
            retired += 1;
        }
    }
    retired
}
