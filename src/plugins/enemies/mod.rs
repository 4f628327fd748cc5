//! Enemies plugin: archetype spawning, per-frame behaviour, and the death lifecycle.
//!
//! ```text
//! SimSet::Act      enemy_behaviour        movement strategy, then fire strategy
//! SimSet::Resolve  enemy_death_trigger    Alive -> Dying once health is gone
//!                                         (score, drops, boss sweep happen here)
//! SimSet::Reclaim  enemy_death_progress   fade out, then Dead + PendingDespawn
//! ```
//!
//! Collision only ever lowers `Health`. The death trigger is the single place
//! that turns a depleted enemy into a dying one, so points and drops are handed
//! out exactly once no matter how many shots landed on the killing frame.
//!
//! Bosses share the spawn path and the lifecycle but act through
//! [`BossBrain`](crate::plugins::boss::BossBrain) instead of a fire strategy.

pub mod archetype;
pub mod movement;
pub mod weapon;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::Rng;

use crate::common::body::{Body, PendingDespawn};
use crate::common::combat::{Damageable, Health};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::boss::BossBrain;
use crate::plugins::core::{Score, SimRng, SimSet};
use crate::plugins::items::{roll_drop, spawn_item, ItemKind};
use crate::plugins::player::{Player, PlayerVitals};
use crate::plugins::presentation::GameEvent;
use crate::plugins::projectiles::commit::retire_enemy_shots;
use crate::plugins::projectiles::components::{Projectile, ProjectileState};
use crate::plugins::projectiles::messages::SpawnShot;

pub use archetype::{Archetype, ArchetypeStats, UnknownArchetype};
pub use movement::{MoveContext, MovementStrategy};
pub use weapon::FireStrategy;

/// Frames an enemy spends fading out after death (0.35 s).
pub const DEATH_FRAMES: u32 = 21;

/// Points for every enemy shot converted when a boss falls.
pub const SWEEP_POINTS_PER_SHOT: u32 = 100;

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

#[derive(Component, Debug, Clone, Copy)]
pub struct Boss;

/// Enemy lifecycle.
///
/// - Alive: moves, fires, collides.
/// - Dying: short fade; invisible to collision and to the stage census.
/// - Dead: terminal, waiting for despawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Dying { frames_left: u32 },
    Dead,
}

impl LifeState {
    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeState::Alive)
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, enemy_behaviour.in_set(SimSet::Act))
        .add_systems(
            FixedUpdate,
            enemy_death_trigger
                .in_set(SimSet::Resolve)
                .after(crate::plugins::collision::resolve_player_shots)
                .after(crate::plugins::items::item_pickup),
        )
        .add_systems(FixedUpdate, enemy_death_progress.in_set(SimSet::Reclaim));
}

/// Spawn one enemy of `archetype` at `pos` (simulation coordinates).
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: Archetype,
    pos: Vec2,
    field: Vec2,
    rng: &mut impl Rng,
) -> Entity {
    let stats = archetype.stats();

    let mut entity = commands.spawn((
        Name::new(format!("Enemy({})", archetype.id())),
        Enemy,
        archetype,
        Health::new(stats.health),
        LifeState::Alive,
        Body::new(pos, stats.radius()),
        MovementStrategy::for_archetype(archetype, pos, field, rng),
        FireStrategy::for_archetype(archetype, rng),
        Sprite {
            color: stats.color,
            custom_size: Some(Vec2::splat(stats.size)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        DespawnOnExit(GameState::InGame),
    ));

    if let Some(table) = archetype.pattern_table() {
        entity.insert((Boss, BossBrain::new(table, rng)));
    }

    debug!("spawned {} at ({:.0}, {:.0})", archetype.id(), pos.x, pos.y);
    entity.id()
}

/// Movement then firing for every live non-boss enemy.
pub fn enemy_behaviour(
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut shots: MessageWriter<SpawnShot>,
    q_player: Query<(&Body, &PlayerVitals), (With<Player>, Without<Enemy>)>,
    mut q: Query<
        (&mut Body, &Archetype, &LifeState, &mut MovementStrategy, &mut FireStrategy),
        (With<Enemy>, Without<Boss>),
    >,
) {
    let target = q_player
        .single()
        .ok()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(body, _)| body.pos);

    let mut out = Vec::new();

    for (mut body, archetype, life, mut movement, mut weapon) in &mut q {
        if !life.is_alive() {
            continue;
        }
        let half_extent = archetype.stats().half_extent();
        let ctx = MoveContext {
            target,
            field: tunables.field_size(),
            half_extent,
            lateral_dash: None,
        };

        if let Some(shot) = movement.step(&mut body.pos, &ctx, &mut rng.0) {
            out.push(shot);
        }
        weapon.step(body.pos, half_extent, target, &mut rng.0, &mut out);
    }

    for req in out {
        shots.write(SpawnShot(req));
    }
}

/// Latch depleted enemies into `Dying` and hand out everything a kill earns.
pub fn enemy_death_trigger(
    mut commands: Commands,
    mut score: ResMut<Score>,
    mut rng: ResMut<SimRng>,
    mut events: MessageWriter<GameEvent>,
    mut q_enemies: Query<
        (&Body, &Archetype, &Health, &mut LifeState, Has<Boss>),
        (With<Enemy>, Without<PendingDespawn>),
    >,
    mut q_shots: Query<(&Projectile, &mut ProjectileState)>,
) {
    for (body, archetype, health, mut life, is_boss) in &mut q_enemies {
        if !life.is_alive() || health.is_alive() {
            continue;
        }

        *life = LifeState::Dying { frames_left: DEATH_FRAMES };
        score.award(archetype.stats().score);
        events.write(GameEvent::EnemyDeath {
            archetype: *archetype,
            position: body.pos,
        });

        if is_boss {
            spawn_item(&mut commands, ItemKind::Bomb, body.pos);
            let converted = retire_enemy_shots(&mut q_shots);
            score.award(converted * SWEEP_POINTS_PER_SHOT);
            info!("{} defeated, {} shots converted", archetype.id(), converted);
            events.write(GameEvent::BossDefeated {
                archetype: *archetype,
                bullets_converted: converted,
            });
        } else if let Some(kind) = roll_drop(&mut rng.0) {
            spawn_item(&mut commands, kind, body.pos);
        }
    }
}

/// Fade dying enemies, then mark them for despawn.
pub fn enemy_death_progress(
    mut commands: Commands,
    mut q: Query<(Entity, &mut LifeState, Option<&mut Sprite>), (With<Enemy>, Without<PendingDespawn>)>,
) {
    for (entity, mut life, sprite) in &mut q {
        let LifeState::Dying { frames_left } = &mut *life else {
            continue;
        };

        *frames_left = frames_left.saturating_sub(1);

        if let Some(mut sprite) = sprite {
            let mut c = sprite.color.to_srgba();
            c.alpha = *frames_left as f32 / DEATH_FRAMES as f32;
            sprite.color = c.into();
        }

        if *frames_left == 0 {
            *life = LifeState::Dead;
            commands.entity(entity).insert(PendingDespawn);
        }
    }
}
