//! Bomb: a wide beam from the player to the top of the field.
//!
//! While active it
//! - clears every enemy shot each frame,
//! - damages enemies under the beam every second frame,
//! - makes the player immune to collisions.

use bevy::prelude::*;

use crate::common::body::Body;
use crate::common::combat::{Damageable, Health};
use crate::plugins::boss::{wound, BossBrain};
use crate::plugins::collision::shapes::circle_overlaps_rect;
use crate::plugins::collision::{ColliderClass, SpatialIndex};
use crate::plugins::enemies::{Enemy, LifeState};
use crate::plugins::projectiles::commit::retire_enemy_shots;
use crate::plugins::projectiles::components::{Projectile, ProjectileState};

use super::{Player, PLAYER_HALF_EXTENT};

pub const BEAM_HALF_WIDTH: f32 = 206.0;
const BEAM_DAMAGE: i32 = 1;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BombState {
    pub frames_left: u32,
    pub elapsed: u32,
    /// Set by `tick` for every frame the bomb ran, its last frame included.
    shielding: bool,
}

impl BombState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    /// Start a bomb lasting `frames`. Refused while one is already running.
    pub fn try_activate(&mut self, frames: u32) -> bool {
        if self.is_active() || frames == 0 {
            return false;
        }
        *self = Self { frames_left: frames, elapsed: 0, shielding: false };
        true
    }

    /// Whether the player is immune this frame.
    #[inline]
    pub fn shields_player(&self) -> bool {
        self.shielding
    }

    /// Advance one frame. Returns `true` on frames that deal damage.
    pub fn tick(&mut self) -> bool {
        self.shielding = self.is_active();
        if !self.shielding {
            return false;
        }
        self.frames_left -= 1;
        self.elapsed += 1;
        self.elapsed % 2 == 0
    }
}

/// Beam area for a player at `player_pos`: from the field top down to the sprite top.
pub fn beam_rect(player_pos: Vec2) -> Rect {
    Rect::new(
        player_pos.x - BEAM_HALF_WIDTH,
        0.0,
        player_pos.x + BEAM_HALF_WIDTH,
        (player_pos.y - PLAYER_HALF_EXTENT).max(0.0),
    )
}

pub fn resolve_bomb(
    mut bomb: ResMut<BombState>,
    index: Res<SpatialIndex>,
    q_player: Query<&Body, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(&Body, &LifeState, &mut Health, Option<&mut BossBrain>), With<Enemy>>,
    mut q_shots: Query<(&Projectile, &mut ProjectileState)>,
) {
    let strikes = bomb.tick();
    if !bomb.shields_player() {
        return;
    }
    retire_enemy_shots(&mut q_shots);

    if !strikes {
        return;
    }
    let Ok(player) = q_player.single() else {
        return;
    };

    let beam = beam_rect(player.pos);
    for entry in index.candidates(beam) {
        if entry.class != ColliderClass::Enemy {
            continue;
        }
        let Ok((body, life, mut health, mut brain)) = q_enemies.get_mut(entry.entity) else {
            continue;
        };
        if !life.is_alive() || !health.is_alive() {
            continue;
        }
        if circle_overlaps_rect(body.pos, body.radius, &beam) {
            wound(&mut health, brain.as_deref_mut(), BEAM_DAMAGE);
        }
    }
}
