//! Playfield plugin: bounds enforcement and deferred despawn.
//!
//! ```text
//! SimSet::Cull     reap_off_field   shots leaving the field go back to the pool,
//!                                   enemies and items past the reap margin are marked
//! SimSet::Reclaim  despawn_marked   PendingDespawn entities leave the world
//! ```
//!
//! Enemies enter from outside the field (bosses from above, wave enemies from
//! the sides), so they get a margin. Shots do not.

use bevy::prelude::*;

use crate::common::body::{Body, PendingDespawn};
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::enemies::Enemy;
use crate::plugins::items::Item;
use crate::plugins::projectiles::components::{Projectile, ProjectileState};

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, reap_off_field.in_set(SimSet::Cull))
        .add_systems(
            FixedUpdate,
            despawn_marked
                .in_set(SimSet::Reclaim)
                .after(crate::plugins::enemies::enemy_death_progress),
        );
}

#[inline]
fn outside(region: &Rect, bounds: Rect) -> bool {
    region.intersect(bounds).is_empty()
}

pub fn reap_off_field(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut q_shots: Query<(&Body, &Projectile, &mut ProjectileState)>,
    q_bodies: Query<(Entity, &Body), (Or<(With<Enemy>, With<Item>)>, Without<PendingDespawn>)>,
) {
    let field = tunables.field_rect();
    for (body, projectile, mut state) in &mut q_shots {
        if *state == ProjectileState::Active && outside(&field, projectile.shape(body).bounds()) {
            *state = ProjectileState::PendingReturn;
        }
    }

    let reap = tunables.reap_rect();
    for (entity, body) in &q_bodies {
        if outside(&reap, body.bounds()) {
            commands.entity(entity).insert(PendingDespawn);
        }
    }
}

pub fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for entity in &q {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests;
