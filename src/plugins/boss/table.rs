//! Per-archetype pattern tables.
//!
//! A table is plain data: which patterns a boss cycles through, how often each
//! one emits, and how long attacks, idle waits and enraged attacks last.

use super::patterns::PatternId::{self, *};

/// One entry of a rotation: a pattern and its emission cadence in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSlot {
    pub id: PatternId,
    /// Emit when `pattern_timer % cadence == 0`.
    pub cadence: u32,
    /// Secondary emission on its own cadence (aimed follow-up shots).
    pub echo: Option<u32>,
}

impl PatternSlot {
    pub const fn new(id: PatternId, cadence: u32) -> Self {
        Self { id, cadence, echo: None }
    }

    pub const fn with_echo(mut self, cadence: u32) -> Self {
        self.echo = Some(cadence);
        self
    }

    pub const IDLE: PatternSlot = PatternSlot::new(Idle, 1);
}

#[derive(Debug, PartialEq, Eq)]
pub struct PatternTable {
    pub name: &'static str,
    /// Attack order while calm. Idle waits are interleaved between entries.
    pub rotation: &'static [PatternSlot],
    /// Pool drawn from at random once enraged. Empty means "keep the rotation".
    pub intense: &'static [PatternSlot],
    pub attack_frames: u32,
    pub idle_frames: u32,
    pub enraged_frames: u32,
}

pub static STAGE_BOSS: PatternTable = PatternTable {
    name: "stage-boss",
    rotation: &[
        PatternSlot::new(WaveSpread, 15),
        PatternSlot::new(BurstRing, 50),
        PatternSlot::new(ScatterShot, 35),
        PatternSlot::new(AimedShot, 45),
        PatternSlot::new(DoubleHelix, 5),
        PatternSlot::new(RadialVortex, 12),
        PatternSlot::new(LaserSweep, 12),
    ],
    intense: &[
        PatternSlot::new(DoubleHelix, 5),
        PatternSlot::new(RadialVortex, 12),
        PatternSlot::new(LaserSweep, 12),
    ],
    attack_frames: 240,
    idle_frames: 120,
    enraged_frames: 180,
};

pub static MID_BOSS: PatternTable = PatternTable {
    name: "mid-boss",
    rotation: &[
        PatternSlot::new(ScatterShot, 30),
        PatternSlot::new(AimedShot, 45).with_echo(90),
        PatternSlot::new(WaveSpread, 20),
    ],
    intense: &[],
    attack_frames: 240,
    idle_frames: 120,
    enraged_frames: 240,
};

pub static GRAND_BOSS: PatternTable = PatternTable {
    name: "grand-boss",
    rotation: &[
        PatternSlot::new(WaveSpread, 12),
        PatternSlot::new(BurstRing, 40),
        PatternSlot::new(ScatterShot, 30),
        PatternSlot::new(AimedShot, 30).with_echo(60),
    ],
    intense: &[
        PatternSlot::new(DoubleHelix, 4),
        PatternSlot::new(RadialVortex, 10),
        PatternSlot::new(LaserSweep, 10),
        PatternSlot::new(Laevateinn, 1),
        PatternSlot::new(IcicleFall, 1),
    ],
    attack_frames: 240,
    idle_frames: 90,
    enraged_frames: 200,
};

pub static SECRET_BOSS: PatternTable = PatternTable {
    name: "secret-boss",
    rotation: &[
        PatternSlot::new(LaserSweep, 10),
        PatternSlot::new(IcicleFall, 1),
        PatternSlot::new(Laevateinn, 1),
        PatternSlot::new(RadialVortex, 10),
    ],
    intense: &[],
    attack_frames: 220,
    idle_frames: 90,
    enraged_frames: 150,
};
