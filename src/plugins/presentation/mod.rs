//! Presentation boundary: what the simulation tells the outside world.
//!
//! Two channels leave the core:
//! - `FrameSnapshot`: a read-only resource rebuilt at the end of every fixed
//!   frame. Renderers and HUDs draw from it and nothing else.
//! - `GameEvent`: fire-and-forget messages for audio and effects. The core
//!   never waits on a consumer.

use bevy::ecs::message::{MessageReader, Messages};
use bevy::prelude::*;

use crate::common::body::{Body, PendingDespawn};
use crate::common::combat::Health;
use crate::common::state::{RunStatus, Session};
use crate::plugins::boss::BossBrain;
use crate::plugins::core::{FrameClock, Score, SimSet};
use crate::plugins::enemies::{Archetype, Enemy, LifeState};
use crate::plugins::items::{Item, ItemKind};
use crate::plugins::player::bomb::{beam_rect, BombState};
use crate::plugins::player::{Player, PlayerVitals};
use crate::plugins::projectiles::components::{Projectile, ProjectileState, ShotKind, Side};
use crate::plugins::stage::StageDirector;

/// Player blink period while invincible, in frames.
const BLINK_FRAMES: u32 = 4;

#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyDeath { archetype: Archetype, position: Vec2 },
    PlayerHit { remaining: i32 },
    BombActivated,
    BossDefeated { archetype: Archetype, bullets_converted: u32 },
    ItemCollected { kind: ItemKind },
    StageStarted { stage: usize },
    StageCleared { stage: usize },
    GameClear,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Player,
    Enemy(Archetype),
    Shot { side: Side, kind: ShotKind },
    Item(ItemKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub entity: Entity,
    /// Simulation coordinates (top-left origin, +y down).
    pub position: Vec2,
    /// Facing in radians, same frame as `position`.
    pub rotation: f32,
    pub kind: VisualKind,
    pub health_ratio: f32,
    /// Blinking player or a boss charging an attack.
    pub highlighted: bool,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub entities: Vec<EntityView>,
    pub score: u64,
    pub stage: usize,
    pub lives: i32,
    pub bombs: u32,
    pub power: u8,
    pub boss_health: Option<f32>,
    pub bomb_beam: Option<Rect>,
    pub stage_clear: bool,
    pub game_clear: bool,
    pub game_over: bool,
    pub paused: bool,
}

impl FrameSnapshot {
    pub fn view(&self, entity: Entity) -> Option<&EntityView> {
        self.entities.iter().find(|v| v.entity == entity)
    }
}

fn update_game_events(mut msgs: ResMut<Messages<GameEvent>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<GameEvent>>()
        .init_resource::<FrameSnapshot>()
        .add_systems(PostUpdate, update_game_events)
        .add_systems(FixedUpdate, publish_snapshot.in_set(SimSet::Publish))
        .add_systems(Update, log_game_events);
}

/// Rebuild the snapshot from the current world state.
pub fn publish_snapshot(
    clock: Res<FrameClock>,
    score: Res<Score>,
    session: Res<Session>,
    bomb: Res<BombState>,
    director: Option<Res<StageDirector>>,
    mut snapshot: ResMut<FrameSnapshot>,
    q_player: Query<(Entity, &Body, &PlayerVitals), With<Player>>,
    q_enemies: Query<
        (Entity, &Body, &Archetype, &Health, &LifeState, Option<&BossBrain>),
        (With<Enemy>, Without<PendingDespawn>),
    >,
    q_items: Query<(Entity, &Body, &Item), Without<PendingDespawn>>,
    q_shots: Query<(Entity, &Body, &Projectile, &ProjectileState)>,
) {
    let mut snap = FrameSnapshot {
        frame: clock.0,
        score: score.total,
        stage: director.as_ref().map_or(1, |d| d.stage_number()),
        stage_clear: director.as_ref().is_some_and(|d| d.is_clearing()),
        game_clear: session.status == RunStatus::GameClear,
        game_over: session.status == RunStatus::GameOver,
        paused: session.status == RunStatus::Paused,
        entities: std::mem::take(&mut snapshot.entities),
        ..default()
    };
    snap.entities.clear();

    if let Ok((entity, body, vitals)) = q_player.single() {
        snap.lives = vitals.health;
        snap.bombs = vitals.bombs;
        snap.power = vitals.power;
        if bomb.is_active() || bomb.shields_player() {
            snap.bomb_beam = Some(beam_rect(body.pos));
        }
        snap.entities.push(EntityView {
            entity,
            position: body.pos,
            rotation: 0.0,
            kind: VisualKind::Player,
            health_ratio: vitals.health as f32 / vitals.max_health.max(1) as f32,
            highlighted: vitals.is_invincible() && (vitals.invincible_frames / BLINK_FRAMES) % 2 == 0,
        });
    }

    for (entity, body, archetype, health, life, brain) in &q_enemies {
        if *life == LifeState::Dead {
            continue;
        }
        if brain.is_some() && life.is_alive() && snap.boss_health.is_none() {
            snap.boss_health = Some(health.ratio());
        }
        snap.entities.push(EntityView {
            entity,
            position: body.pos,
            rotation: 0.0,
            kind: VisualKind::Enemy(*archetype),
            health_ratio: health.ratio(),
            highlighted: brain.is_some_and(BossBrain::charging),
        });
    }

    for (entity, body, item) in &q_items {
        snap.entities.push(EntityView {
            entity,
            position: body.pos,
            rotation: 0.0,
            kind: VisualKind::Item(item.kind),
            health_ratio: 1.0,
            highlighted: item.attracted,
        });
    }

    for (entity, body, projectile, state) in &q_shots {
        if *state != ProjectileState::Active {
            continue;
        }
        snap.entities.push(EntityView {
            entity,
            position: body.pos,
            rotation: projectile.rotation(),
            kind: VisualKind::Shot { side: projectile.side, kind: projectile.kind },
            health_ratio: 1.0,
            highlighted: projectile.is_frozen(),
        });
    }

    *snapshot = snap;
}

fn log_game_events(mut events: MessageReader<GameEvent>) {
    for event in events.read() {
        match event {
            GameEvent::BossDefeated { archetype, bullets_converted } => {
                debug!("{} down, {} bullets converted", archetype.id(), bullets_converted);
            }
            GameEvent::PlayerHit { remaining } => debug!("player hit, {remaining} left"),
            other => trace!("{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests;
