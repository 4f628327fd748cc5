//! Stage director: turns the campaign tables into spawn orders frame by frame.
//!
//! ```text
//! Spawning ──(final wave complete, field empty)──▶ ClearWait ──▶ Spawning (next stage)
//!                                                          └──▶ Finished (last stage)
//! ```
//!
//! The director is plain data. The stage plugin feeds it a census of the field
//! and carries out whatever it asks for, which keeps every rule testable
//! without a world.

use bevy::prelude::*;
use rand::Rng;

use crate::plugins::enemies::Archetype;

use super::schedule::{Campaign, StageSpec, WaveSpec};

/// While a boss is alive the next wave trigger is kept this many frames ahead.
pub const BOSS_HOLD_FRAMES: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    Spawning,
    ClearWait { frames_left: u32 },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    StageStarted(usize),
    StageCleared(usize),
    GameClear,
}

/// What the director needs to know about the field this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldCensus {
    /// Living enemies, bosses included. Dying ones are not counted.
    pub enemies_on_field: usize,
    pub boss_alive: bool,
    pub player_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorStep {
    pub spawn: Option<(Archetype, Vec2)>,
    pub event: Option<StageEvent>,
}

#[derive(Resource, Debug, Clone)]
pub struct StageDirector {
    campaign: Campaign,
    stage: usize,
    /// Wave triggers of the current stage, relative to `stage_start`. Boss
    /// gating pushes these forward.
    triggers: Vec<u32>,
    stage_start: u64,
    wave: Option<usize>,
    spawned: u32,
    next_spawn: u64,
    phase: StagePhase,
    max_on_field: usize,
    clear_wait: u32,
}

impl StageDirector {
    pub fn new(campaign: Campaign, max_on_field: usize, clear_wait: u32) -> Self {
        let mut director = Self {
            campaign,
            stage: 0,
            triggers: Vec::new(),
            stage_start: 0,
            wave: None,
            spawned: 0,
            next_spawn: 0,
            phase: StagePhase::Spawning,
            max_on_field,
            clear_wait,
        };
        director.enter_stage(0, 0);
        director
    }

    /// 1-based number of the stage being played.
    #[inline]
    pub fn stage_number(&self) -> usize {
        self.stage + 1
    }

    #[inline]
    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    #[inline]
    pub fn is_clearing(&self) -> bool {
        matches!(self.phase, StagePhase::ClearWait { .. })
    }

    /// Index of the wave currently issuing spawns, if any has begun.
    #[inline]
    pub fn wave_index(&self) -> Option<usize> {
        self.wave
    }

    #[inline]
    pub fn spawned_in_wave(&self) -> u32 {
        self.spawned
    }

    /// Restart the whole campaign from the first stage at frame `now`.
    pub fn restart(&mut self, now: u64) {
        self.enter_stage(0, now);
    }

    fn enter_stage(&mut self, stage: usize, now: u64) {
        self.stage = stage;
        self.triggers = self
            .current_stage()
            .map(|s| s.waves.iter().map(|w| w.start).collect())
            .unwrap_or_default();
        self.stage_start = now;
        self.wave = None;
        self.spawned = 0;
        self.next_spawn = now;
        self.phase = if self.triggers.is_empty() {
            StagePhase::Finished
        } else {
            StagePhase::Spawning
        };
    }

    fn current_stage(&self) -> Option<&StageSpec> {
        self.campaign.stages.get(self.stage)
    }

    fn current_wave(&self) -> Option<&WaveSpec> {
        let wave = self.wave?;
        self.current_stage()?.waves.get(wave)
    }

    fn wave_count(&self) -> usize {
        self.triggers.len()
    }

    /// Every spawn issued and, for a boss wave, the boss confirmed gone.
    fn wave_complete(&self, census: &FieldCensus) -> bool {
        match self.current_wave() {
            Some(wave) => self.spawned >= wave.count && !(wave.archetype.is_boss() && census.boss_alive),
            None => true,
        }
    }

    pub fn step(
        &mut self,
        now: u64,
        census: &FieldCensus,
        field: Vec2,
        rng: &mut impl Rng,
    ) -> DirectorStep {
        match self.phase {
            StagePhase::Finished => DirectorStep::default(),
            StagePhase::ClearWait { frames_left } => self.step_clear_wait(frames_left, now, census),
            StagePhase::Spawning => self.step_spawning(now, census, field, rng),
        }
    }

    fn step_clear_wait(&mut self, frames_left: u32, now: u64, census: &FieldCensus) -> DirectorStep {
        if census.boss_alive {
            return DirectorStep::default();
        }
        let frames_left = frames_left.saturating_sub(1);
        if frames_left > 0 {
            self.phase = StagePhase::ClearWait { frames_left };
            return DirectorStep::default();
        }

        let next = self.stage + 1;
        if next >= self.campaign.stages.len() {
            self.phase = StagePhase::Finished;
            return DirectorStep { spawn: None, event: Some(StageEvent::GameClear) };
        }
        self.enter_stage(next, now);
        DirectorStep {
            spawn: None,
            event: Some(StageEvent::StageStarted(self.stage_number())),
        }
    }

    fn step_spawning(
        &mut self,
        now: u64,
        census: &FieldCensus,
        field: Vec2,
        rng: &mut impl Rng,
    ) -> DirectorStep {
        let elapsed = now.saturating_sub(self.stage_start);
        let upcoming = self.wave.map_or(0, |w| w + 1);

        if upcoming < self.wave_count() {
            if census.boss_alive {
                let held = u32::try_from(elapsed).unwrap_or(u32::MAX).saturating_add(BOSS_HOLD_FRAMES);
                self.triggers[upcoming] = self.triggers[upcoming].max(held);
            } else if elapsed >= u64::from(self.triggers[upcoming]) && self.wave_complete(census) {
                self.wave = Some(upcoming);
                self.spawned = 0;
                self.next_spawn = now;
                debug!("stage {} wave {} begins", self.stage_number(), upcoming + 1);
            }
        }

        let Some(wave) = self.current_wave().copied() else {
            return DirectorStep::default();
        };

        if self.spawned >= wave.count {
            let last_wave = upcoming >= self.wave_count();
            if last_wave && self.wave_complete(census) && census.enemies_on_field == 0 {
                self.phase = StagePhase::ClearWait { frames_left: self.clear_wait.max(1) };
                return DirectorStep {
                    spawn: None,
                    event: Some(StageEvent::StageCleared(self.stage_number())),
                };
            }
            return DirectorStep::default();
        }

        if now < self.next_spawn {
            return DirectorStep::default();
        }
        self.next_spawn = now + u64::from(wave.interval);

        if !census.player_alive || census.enemies_on_field >= self.max_on_field {
            return DirectorStep::default();
        }

        self.spawned += 1;
        DirectorStep {
            spawn: Some((wave.archetype, spawn_position(wave.archetype, field, rng))),
            event: None,
        }
    }
}

/// Entry point for a fresh enemy of `archetype` on a field of size `field`.
pub fn spawn_position(archetype: Archetype, field: Vec2, rng: &mut impl Rng) -> Vec2 {
    match archetype {
        Archetype::Wave => {
            let x = if rng.random_bool(0.5) { -30.0 } else { field.x + 30.0 };
            Vec2::new(x, rng.random_range(80.0..=150.0))
        }
        Archetype::GrandBoss => Vec2::new(field.x / 2.0, -120.0),
        a if a.is_boss() => Vec2::new(field.x / 2.0, -80.0),
        _ => Vec2::new(rng.random_range(50.0..=(field.x - 50.0).max(50.0)), 10.0),
    }
}
