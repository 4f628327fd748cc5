//! Archetype table: base stats per spawnable enemy kind.

use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

use crate::plugins::boss::table::{self, PatternTable};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Normal,
    Fast,
    Tank,
    Wave,
    Hunter,
    MidBoss,
    StageBoss,
    GrandBoss,
    SecretBoss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    pub health: i32,
    pub score: u32,
    /// Square sprite edge length.
    pub size: f32,
    pub speed: f32,
    pub color: Color,
}

impl ArchetypeStats {
    /// Collision radius: 90% of the half extent.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * 0.45
    }

    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown archetype id `{0}`")]
pub struct UnknownArchetype(pub String);

impl Archetype {
    pub const ALL: [Archetype; 9] = [
        Archetype::Normal,
        Archetype::Fast,
        Archetype::Tank,
        Archetype::Wave,
        Archetype::Hunter,
        Archetype::MidBoss,
        Archetype::StageBoss,
        Archetype::GrandBoss,
        Archetype::SecretBoss,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Archetype::Normal => "normal",
            Archetype::Fast => "fast",
            Archetype::Tank => "tank",
            Archetype::Wave => "wave",
            Archetype::Hunter => "hunter",
            Archetype::MidBoss => "mid-boss",
            Archetype::StageBoss => "stage-boss",
            Archetype::GrandBoss => "grand-boss",
            Archetype::SecretBoss => "secret-boss",
        }
    }

    pub fn stats(self) -> ArchetypeStats {
        let (health, score, size, speed, color) = match self {
            Archetype::Normal => (3, 10, 50.0, 1.0, Color::srgb(0.85, 0.3, 0.3)),
            Archetype::Fast => (1, 20, 40.0, 3.0, Color::srgb(1.0, 0.6, 0.2)),
            Archetype::Tank => (6, 30, 60.0, 0.5, Color::srgb(0.5, 0.55, 0.6)),
            Archetype::Wave => (2, 25, 45.0, 2.5, Color::srgb(0.3, 0.7, 0.95)),
            Archetype::Hunter => (4, 40, 55.0, 2.0, Color::srgb(0.75, 0.3, 0.85)),
            Archetype::MidBoss => (180, 80, 100.0, 1.0, Color::srgb(0.95, 0.75, 0.3)),
            Archetype::StageBoss => (80, 100, 120.0, 1.0, Color::srgb(0.9, 0.2, 0.5)),
            Archetype::GrandBoss => (300, 500, 180.0, 0.8, Color::srgb(0.65, 0.1, 0.2)),
            Archetype::SecretBoss => (500, 2000, 150.0, 1.2, Color::srgb(0.9, 0.9, 1.0)),
        };
        ArchetypeStats { health, score, size, speed, color }
    }

    #[inline]
    pub fn is_boss(self) -> bool {
        self.pattern_table().is_some()
    }

    pub fn pattern_table(self) -> Option<&'static PatternTable> {
        match self {
            Archetype::MidBoss => Some(&table::MID_BOSS),
            Archetype::StageBoss => Some(&table::STAGE_BOSS),
            Archetype::GrandBoss => Some(&table::GRAND_BOSS),
            Archetype::SecretBoss => Some(&table::SECRET_BOSS),
            _ => None,
        }
    }
}

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| UnknownArchetype(s.to_owned()))
    }
}
