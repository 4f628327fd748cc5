//! Buffered spawn requests.
//!
//! Producers (player gun, enemy weapons, boss patterns) only write intent.
//! The allocator is the single consumer and the only system that pops the pool.
//!
//! This is a producer → queue → consumer pipeline.

use bevy::prelude::*;

use super::components::ShotRequest;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnShot(pub ShotRequest);
