//! Projectiles plugin: **message-based producer → consumer** spawning + pooling.
//!
//! # Data flow (one fixed frame)
//! ```text
//!  SimSet::Act       producers: player gun, enemy weapons, boss patterns
//!                    - write: SpawnShot(ShotRequest)
//!                          │
//!                          v
//!  SimSet::Allocate  allocate_shots
//!                    - pops ProjectilePool (overflow allocates, never drops)
//!                    - arms: ProjectileState, Projectile, Body, Sprite, Visibility
//!                          │
//!                          v
//!  SimSet::Advance   move_projectiles: frozen countdown, lifetime, homing steer
//!  SimSet::Cull      off-field reap marks PendingReturn
//!  SimSet::Resolve   collisions / bomb / boss sweep mark PendingReturn
//!                          │
//!                          v
//!  SimSet::Reclaim   return_to_pool_commit
//!                    - writes the Inactive invariants, pushes back to the free list
//! ```
//!
//! Producers never borrow the pool. The allocator is the single writer on the
//! way out and the commit system the single writer on the way back.

pub mod allocator;
pub mod commit;
pub mod components;
pub mod flight;
pub mod messages;
pub mod pool;

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;

pub struct ProjectilesPlugin;

/// Maintain spawn request message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnShot>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        let capacity = app
            .world()
            .get_resource::<Tunables>()
            .map_or_else(|| Tunables::default().pool_capacity, |t| t.pool_capacity);

        app.insert_resource(pool::ProjectilePool::new(capacity))
            .add_systems(OnEnter(GameState::InGame), pool::init_projectile_pool);

        app.init_resource::<Messages<messages::SpawnShot>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        app.add_systems(FixedUpdate, allocator::allocate_shots.in_set(SimSet::Allocate))
            .add_systems(FixedUpdate, flight::move_projectiles.in_set(SimSet::Advance))
            .add_systems(FixedUpdate, commit::return_to_pool_commit.in_set(SimSet::Reclaim));
    }
}
