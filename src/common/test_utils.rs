//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a single
//! system without building a schedule. Systems that use `Commands` only enqueue
//! structural changes, so the helper flushes the world before returning.

use bevy::ecs::message::{Message, MessageReader, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Drain every message of type `M` currently buffered in the world.
///
/// A fresh reader starts at the oldest buffered message, so this sees
/// everything written since the last two `Messages::update` calls.
pub fn collect_messages<M: Message + Clone>(world: &mut World) -> Vec<M> {
    if world.get_resource::<Messages<M>>().is_none() {
        return Vec::new();
    }
    run_system_once(world, |mut reader: MessageReader<M>| {
        reader.read().cloned().collect::<Vec<M>>()
    })
}
