//! Tunable gameplay constants.
//!
//! Every duration in here is in frames of the fixed 60 Hz tick. Designers think
//! in milliseconds, so `frames_from_ms` does the conversion at definition sites.

use bevy::prelude::*;
use thiserror::Error;

/// Logical ticks per second of the fixed-step pipeline.
pub const TICK_HZ: u32 = 60;

/// Convert a millisecond duration to whole frames at [`TICK_HZ`].
pub const fn frames_from_ms(ms: u32) -> u32 {
    ms * TICK_HZ / 1000
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("playfield must have a positive size, got {width}x{height}")]
    EmptyPlayfield { width: f32, height: f32 },
    #[error("projectile pool capacity must be at least 1")]
    ZeroPoolCapacity,
    #[error("on-field enemy cap must be at least 1")]
    ZeroEnemyCap,
    #[error("player start ({x}, {y}) lies outside the playfield")]
    PlayerOutsideField { x: f32, y: f32 },
    #[error("campaign has no stages")]
    EmptyCampaign,
    #[error("stage {stage} has no waves")]
    EmptyStage { stage: usize },
    #[error("stage {stage} wave {wave} triggers before the wave preceding it")]
    WaveOutOfOrder { stage: usize, wave: usize },
    #[error("stage {stage} wave {wave} spawns nothing")]
    EmptyWave { stage: usize, wave: usize },
}

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub field_width: f32,
    pub field_height: f32,
    /// Enemies and items may drift this far outside the field before they are reaped.
    pub reap_margin: f32,
    pub pool_capacity: usize,
    pub max_enemies_on_field: usize,
    pub player_start: Vec2,
    pub player_speed: f32,
    pub player_health: i32,
    pub invincibility_frames: u32,
    pub bomb_stock: u32,
    pub max_bombs: u32,
    pub bomb_frames: u32,
    pub stage_clear_wait: u32,
    /// Append the secret-boss stage to the campaign.
    pub extra_stage: bool,
    pub seed: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            field_width: 600.0,
            field_height: 800.0,
            reap_margin: 150.0,
            pool_capacity: 512,
            max_enemies_on_field: 20,
            player_start: Vec2::new(300.0, 700.0),
            player_speed: 5.0,
            player_health: 3,
            invincibility_frames: frames_from_ms(2000),
            bomb_stock: 3,
            max_bombs: 5,
            bomb_frames: 180,
            stage_clear_wait: frames_from_ms(3000),
            extra_stage: false,
            seed: 0x5eed_da4a_u64,
        }
    }
}

impl Tunables {
    #[inline]
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// The playfield in simulation coordinates: origin top-left, +y down.
    #[inline]
    pub fn field_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.field_width, self.field_height)
    }

    /// Region outside of which enemies and items are reaped.
    #[inline]
    pub fn reap_rect(&self) -> Rect {
        self.field_rect().inflate(self.reap_margin)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::EmptyPlayfield {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::ZeroPoolCapacity);
        }
        if self.max_enemies_on_field == 0 {
            return Err(ConfigError::ZeroEnemyCap);
        }
        if !self.field_rect().contains(self.player_start) {
            return Err(ConfigError::PlayerOutsideField {
                x: self.player_start.x,
                y: self.player_start.y,
            });
        }
        Ok(())
    }
}
