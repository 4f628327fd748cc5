//! Boss plugin: the attack-pattern state machine.
//!
//! A boss carries a [`BossBrain`] built from its archetype's [`PatternTable`].
//! Every live frame the brain advances its pattern timer, switches pattern
//! when the timer runs past the current duration, and emits the current
//! pattern's shots.
//!
//! ```text
//!   rotation[0] ──timer──▶ Idle ──timer──▶ rotation[1] ──▶ Idle ──▶ ...
//!        │
//!        └─ health <= max/2 ──▶ enraged: random pick from the intense subset,
//!                                 shorter timer, no idle waits
//! ```
//!
//! Enrage is latched the moment damage is applied (see [`wound`]) and never
//! cleared. Some patterns hold the transition until their own script is done.

pub mod patterns;
pub mod table;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::common::body::Body;
use crate::common::combat::{DamageOutcome, Damageable, Health};
use crate::common::tunables::Tunables;
use crate::plugins::core::{SimRng, SimSet};
use crate::plugins::enemies::{Archetype, Boss, LifeState, MoveContext, MovementStrategy};
use crate::plugins::player::{Player, PlayerVitals};
use crate::plugins::projectiles::components::ShotRequest;
use crate::plugins::projectiles::messages::SpawnShot;

pub use patterns::{PatternContext, PatternId, PatternMemory};
pub use table::{PatternSlot, PatternTable};

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, boss_behaviour.in_set(SimSet::Act));
}

#[derive(Component, Debug, Clone)]
pub struct BossBrain {
    table: &'static PatternTable,
    slot: PatternSlot,
    pattern_timer: u32,
    enraged: bool,
    /// Index of the next rotation entry.
    cursor: usize,
    memory: PatternMemory,
}

impl BossBrain {
    pub fn new(table: &'static PatternTable, rng: &mut impl Rng) -> Self {
        Self {
            table,
            slot: table.rotation.first().copied().unwrap_or(PatternSlot::IDLE),
            pattern_timer: 0,
            enraged: false,
            cursor: 1,
            memory: PatternMemory::new(rng),
        }
    }

    #[inline]
    pub fn pattern(&self) -> PatternId {
        self.slot.id
    }

    #[inline]
    pub fn pattern_timer(&self) -> u32 {
        self.pattern_timer
    }

    /// Frames the current pattern runs before the next transition check passes.
    pub fn pattern_duration(&self) -> u32 {
        if self.slot.id == PatternId::Idle {
            self.table.idle_frames
        } else if self.enraged {
            self.table.enraged_frames
        } else {
            self.table.attack_frames
        }
    }

    #[inline]
    pub fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// Latch enrage once health is at or below half. Returns `true` on the
    /// call that flips it.
    pub fn observe_health(&mut self, health: &Health) -> bool {
        if self.enraged || health.hp * 2 > health.max {
            return false;
        }
        self.enraged = true;
        info!("{} enraged at {}/{}", self.table.name, health.hp, health.max);
        true
    }

    /// Advance one frame. Returns the new pattern when a transition happened.
    pub fn tick(&mut self, health: &Health, rng: &mut impl Rng) -> Option<PatternId> {
        self.observe_health(health);
        self.pattern_timer += 1;

        if self.pattern_timer <= self.pattern_duration() || self.memory.holds(self.pattern_timer) {
            return None;
        }

        self.slot = self.next_slot(rng);
        self.pattern_timer = 0;
        self.memory.on_transition();
        Some(self.slot.id)
    }

    fn next_slot(&mut self, rng: &mut impl Rng) -> PatternSlot {
        if self.enraged {
            if let Some(slot) = self.table.intense.choose(rng) {
                return *slot;
            }
        }

        if self.slot.id != PatternId::Idle {
            return PatternSlot::IDLE;
        }

        let rotation = self.table.rotation;
        if rotation.is_empty() {
            return PatternSlot::IDLE;
        }
        let slot = rotation[self.cursor % rotation.len()];
        self.cursor = (self.cursor + 1) % rotation.len();
        slot
    }

    /// Shots of the current pattern for this frame.
    pub fn emit(&mut self, ctx: &PatternContext, out: &mut Vec<ShotRequest>) {
        let duration = self.pattern_duration();
        patterns::emit(self.slot, self.pattern_timer, duration, ctx, &mut self.memory, out);
    }

    /// The vortex is fired from a standstill.
    #[inline]
    pub fn halts_movement(&self) -> bool {
        self.slot.id == PatternId::RadialVortex
    }

    #[inline]
    pub fn lateral_dash(&self) -> Option<f32> {
        self.memory.lateral_dash
    }

    /// Charge-up highlight requested by the current pattern.
    #[inline]
    pub fn charging(&self) -> bool {
        self.memory.charge_overlay
    }
}

/// Health of a boss seen through its brain: damage also feeds the enrage check.
pub struct BossVitals<'a> {
    pub health: &'a mut Health,
    pub brain: Option<&'a mut BossBrain>,
}

impl Damageable for BossVitals<'_> {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        if outcome != DamageOutcome::Ignored {
            if let Some(brain) = self.brain.as_deref_mut() {
                brain.observe_health(self.health);
            }
        }
        outcome
    }

    fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}

/// Apply damage to any enemy; bosses pass their brain so enrage flips on this call.
pub fn wound(health: &mut Health, brain: Option<&mut BossBrain>, amount: i32) -> DamageOutcome {
    BossVitals { health, brain }.apply_damage(amount)
}

/// Pattern timer, movement, and emission for every live boss.
pub fn boss_behaviour(
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut shots: MessageWriter<SpawnShot>,
    q_player: Query<(&Body, &PlayerVitals), (With<Player>, Without<Boss>)>,
    mut q: Query<
        (&mut Body, &Archetype, &Health, &LifeState, &mut BossBrain, &mut MovementStrategy),
        With<Boss>,
    >,
) {
    let target = q_player
        .single()
        .ok()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(body, _)| body.pos);

    let mut out = Vec::new();

    for (mut body, archetype, health, life, mut brain, mut movement) in &mut q {
        // A flagged death stops emission immediately; shots in flight stay.
        if !life.is_alive() || !health.is_alive() {
            continue;
        }

        if let Some(next) = brain.tick(health, &mut rng.0) {
            debug!("{} -> {:?} (enraged: {})", archetype.id(), next, brain.is_enraged());
        }

        let half_extent = archetype.stats().half_extent();
        if !brain.halts_movement() {
            let ctx = MoveContext {
                target,
                field: tunables.field_size(),
                half_extent,
                lateral_dash: brain.lateral_dash(),
            };
            movement.step(&mut body.pos, &ctx, &mut rng.0);
        }

        let ctx = PatternContext { center: body.pos, half_extent, target };
        brain.emit(&ctx, &mut out);
    }

    for req in out {
        shots.write(SpawnShot(req));
    }
}
