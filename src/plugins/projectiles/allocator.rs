//! Spawn consumer: arm projectiles from the pool.
//!
//! A recycled entity and an overflow entity end up in the same state because
//! both go through `Projectile::armed` and `ShotRequest::body`. An empty pool is
//! a capacity signal, never a reason to drop the shot.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::body::Body;

use super::components::{PooledProjectile, Projectile, ProjectileState};
use super::messages::SpawnShot;
use super::pool::{armed_projectile, ProjectilePool};

pub fn allocate_shots(
    mut commands: Commands,
    mut pool: ResMut<ProjectilePool>,
    mut reader: MessageReader<SpawnShot>,
    mut q: Query<(
        &mut ProjectileState,
        &mut Projectile,
        &mut Body,
        &mut Sprite,
        &mut Visibility,
    ), With<PooledProjectile>>,
) {
    for SpawnShot(req) in reader.read() {
        let acquired = pool.get(|| commands.spawn(armed_projectile(*req)).id());

        if acquired.overflowed {
            if pool.overflow_allocations() == 1 {
                warn!("projectile pool exhausted at {} in use; allocating past capacity", pool.in_use());
            } else {
                debug!("projectile pool overflow #{}", pool.overflow_allocations());
            }
            continue;
        }

        let Ok((mut state, mut projectile, mut body, mut sprite, mut vis)) = q.get_mut(acquired.item) else {
            warn!("pooled entity {:?} lost its projectile components", acquired.item);
            continue;
        };

        *state = ProjectileState::Active;
        *projectile = Projectile::armed(req);
        *body = req.body();
        sprite.color = req.tint;
        sprite.custom_size = Some(req.sprite_size());
        *vis = Visibility::Visible;
    }
}
