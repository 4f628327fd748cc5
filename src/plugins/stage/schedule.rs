//! Spawn tables.
//!
//! Waves are written in milliseconds, the way they were designed, and stored
//! in frames.

use bevy::prelude::*;

use crate::common::tunables::{frames_from_ms, ConfigError};
use crate::plugins::enemies::Archetype;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSpec {
    /// Frames after stage start at which the wave may begin.
    pub start: u32,
    pub archetype: Archetype,
    pub count: u32,
    /// Frames between two spawns of this wave.
    pub interval: u32,
}

impl WaveSpec {
    pub const fn at_ms(start_ms: u32, archetype: Archetype, count: u32, interval_ms: u32) -> Self {
        Self {
            start: frames_from_ms(start_ms),
            archetype,
            count,
            interval: frames_from_ms(interval_ms),
        }
    }

    /// A single boss, issued as soon as its wave begins.
    pub const fn boss_at_ms(start_ms: u32, archetype: Archetype) -> Self {
        Self::at_ms(start_ms, archetype, 1, 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageSpec {
    pub waves: Vec<WaveSpec>,
}

/// Every stage of a run, in order.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Campaign {
    pub stages: Vec<StageSpec>,
}

impl Campaign {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::EmptyCampaign);
        }
        for (s, stage) in self.stages.iter().enumerate() {
            let stage_no = s + 1;
            if stage.waves.is_empty() {
                return Err(ConfigError::EmptyStage { stage: stage_no });
            }
            for (w, wave) in stage.waves.iter().enumerate() {
                if wave.count == 0 {
                    return Err(ConfigError::EmptyWave { stage: stage_no, wave: w + 1 });
                }
                if w > 0 && wave.start < stage.waves[w - 1].start {
                    return Err(ConfigError::WaveOutOfOrder { stage: stage_no, wave: w + 1 });
                }
            }
        }
        Ok(())
    }
}

pub fn default_campaign(extra_stage: bool) -> Campaign {
    use Archetype::*;

    let mut stages = vec![
        StageSpec {
            waves: vec![
                WaveSpec::at_ms(0, Normal, 8, 800),
                WaveSpec::at_ms(5_000, Fast, 5, 600),
                WaveSpec::at_ms(10_000, Wave, 7, 900),
                WaveSpec::at_ms(16_000, Tank, 6, 1_000),
                WaveSpec::at_ms(23_000, Normal, 12, 500),
                WaveSpec::boss_at_ms(30_000, MidBoss),
                WaveSpec::at_ms(38_000, Normal, 15, 400),
                WaveSpec::boss_at_ms(45_000, StageBoss),
            ],
        },
        StageSpec {
            waves: vec![
                WaveSpec::at_ms(0, Normal, 15, 400),
                WaveSpec::at_ms(8_000, Fast, 8, 400),
                WaveSpec::at_ms(15_000, Tank, 8, 800),
                WaveSpec::at_ms(23_000, Wave, 10, 600),
                WaveSpec::at_ms(29_000, Hunter, 6, 1_000),
                WaveSpec::boss_at_ms(32_000, GrandBoss),
            ],
        },
    ];

    if extra_stage {
        stages.push(StageSpec {
            waves: vec![
                WaveSpec::at_ms(0, Hunter, 10, 500),
                WaveSpec::boss_at_ms(10_000, SecretBoss),
            ],
        });
    }

    Campaign { stages }
}
