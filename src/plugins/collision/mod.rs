//! Collision plugin: spatial index rebuild + hit resolution.
//!
//! ```text
//! SimSet::Index    rebuild_spatial_index
//!                  - clear, then insert live enemies and active shots of both sides
//! SimSet::Resolve  resolve_player_hits
//!                  - at most one damaging hit on the player per frame
//!                  resolve_player_shots
//!                  - each active player shot damages at most one enemy, then retires
//! ```
//!
//! Resolution never despawns. Shots are retired by writing `PendingReturn` and
//! enemies lose health only; the enemy death trigger later turns a depleted
//! enemy into a dying one, which is where score and drops are handed out.
//!
//! Candidates come back from the index as a set. They are sorted by entity
//! before resolution so "first match wins" is deterministic.

pub mod quadtree;
pub mod shapes;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::body::{Body, PendingDespawn};
use crate::common::combat::{DamageOutcome, Damageable, Health};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::boss::{wound, BossBrain};
use crate::plugins::core::SimSet;
use crate::plugins::enemies::{Boss, Enemy, LifeState};
use crate::plugins::player::bomb::BombState;
use crate::plugins::player::{Player, PlayerVitals, PLAYER_HALF_EXTENT};
use crate::plugins::presentation::GameEvent;
use crate::plugins::projectiles::components::{Projectile, ProjectileState, Side};

use quadtree::Quadtree;
use shapes::circles_overlap;

/// Extra reach around a player shot when gathering enemy candidates.
const SHOT_QUERY_PAD: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColliderClass {
    Enemy,
    EnemyShot,
    PlayerShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexEntry {
    pub entity: Entity,
    pub class: ColliderClass,
}

/// This frame's quadtree over the playfield.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SpatialIndex(pub Quadtree<IndexEntry>);

impl SpatialIndex {
    pub fn new(field: Rect) -> Self {
        Self(Quadtree::new(field))
    }

    /// Entries overlapping `region`, in a stable order.
    pub fn candidates(&self, region: Rect) -> Vec<IndexEntry> {
        let mut hits: Vec<IndexEntry> = self.query(region).into_iter().collect();
        hits.sort_unstable();
        hits
    }
}

pub fn plugin(app: &mut App) {
    let field = app
        .world()
        .get_resource::<Tunables>()
        .map_or_else(|| Tunables::default().field_rect(), Tunables::field_rect);

    app.insert_resource(SpatialIndex::new(field))
        .add_systems(OnEnter(GameState::InGame), clear_index);

    app.add_systems(FixedUpdate, rebuild_spatial_index.in_set(SimSet::Index))
        .add_systems(
            FixedUpdate,
            (resolve_player_hits, resolve_player_shots)
                .chain()
                .in_set(SimSet::Resolve)
                .after(crate::plugins::player::bomb::resolve_bomb),
        );
}

fn clear_index(mut index: ResMut<SpatialIndex>) {
    index.clear();
}

pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    q_enemies: Query<(Entity, &Body, &LifeState), (With<Enemy>, Without<PendingDespawn>)>,
    q_shots: Query<(Entity, &Body, &Projectile, &ProjectileState)>,
) {
    index.clear();

    for (entity, body, life) in &q_enemies {
        if life.is_alive() {
            index.insert(IndexEntry { entity, class: ColliderClass::Enemy }, body.bounds());
        }
    }

    for (entity, body, projectile, state) in &q_shots {
        if *state != ProjectileState::Active {
            continue;
        }
        let class = match projectile.side {
            Side::Enemy => ColliderClass::EnemyShot,
            Side::Player => ColliderClass::PlayerShot,
        };
        index.insert(IndexEntry { entity, class }, projectile.shape(body).bounds());
    }
}

/// Enemies and enemy shots against the player. First match wins.
pub fn resolve_player_hits(
    mut commands: Commands,
    index: Res<SpatialIndex>,
    bomb: Res<BombState>,
    mut events: MessageWriter<GameEvent>,
    mut q_player: Query<(&Body, &mut PlayerVitals), With<Player>>,
    mut q_enemies: Query<(&Body, &mut LifeState), (With<Enemy>, Without<Boss>, Without<Player>)>,
    mut q_shots: Query<(&Body, &Projectile, &mut ProjectileState), (Without<Enemy>, Without<Player>)>,
) {
    let Ok((player_body, mut vitals)) = q_player.single_mut() else {
        return;
    };
    if !vitals.is_alive() || vitals.is_invincible() || bomb.shields_player() {
        return;
    }

    let region = Rect::from_center_half_size(player_body.pos, Vec2::splat(PLAYER_HALF_EXTENT));

    for entry in index.candidates(region) {
        let hit = match entry.class {
            ColliderClass::Enemy => {
                // Bosses are not in this query: touching a boss is harmless.
                let Ok((body, mut life)) = q_enemies.get_mut(entry.entity) else {
                    continue;
                };
                if !life.is_alive()
                    || !circles_overlap(player_body.pos, player_body.radius, body.pos, body.radius)
                {
                    continue;
                }
                *life = LifeState::Dead;
                commands.entity(entry.entity).insert(PendingDespawn);
                true
            }
            ColliderClass::EnemyShot => {
                let Ok((body, projectile, mut state)) = q_shots.get_mut(entry.entity) else {
                    continue;
                };
                if *state != ProjectileState::Active
                    || !projectile.shape(body).hits_circle(player_body.pos, player_body.radius)
                {
                    continue;
                }
                *state = ProjectileState::PendingReturn;
                true
            }
            ColliderClass::PlayerShot => false,
        };

        if hit {
            if vitals.apply_damage(1) != DamageOutcome::Ignored {
                debug!("player hit, {} left", vitals.health);
                events.write(GameEvent::PlayerHit { remaining: vitals.health });
            }
            break;
        }
    }
}

/// Player shots against enemies. Each shot damages at most one enemy.
pub fn resolve_player_shots(
    index: Res<SpatialIndex>,
    mut q_shots: Query<(&Body, &Projectile, &mut ProjectileState), Without<Enemy>>,
    mut q_enemies: Query<(&Body, &LifeState, &mut Health, Option<&mut BossBrain>), With<Enemy>>,
) {
    for (body, projectile, mut state) in &mut q_shots {
        if *state != ProjectileState::Active || projectile.side != Side::Player {
            continue;
        }

        let shape = projectile.shape(body);
        let region = shape.bounds().inflate(SHOT_QUERY_PAD);

        for entry in index.candidates(region) {
            if entry.class != ColliderClass::Enemy {
                continue;
            }
            let Ok((enemy_body, life, mut health, mut brain)) = q_enemies.get_mut(entry.entity) else {
                continue;
            };
            if !life.is_alive() || !health.is_alive() {
                continue;
            }
            if !shape.hits_circle(enemy_body.pos, enemy_body.radius) {
                continue;
            }

            wound(&mut health, brain.as_deref_mut(), projectile.damage);
            *state = ProjectileState::PendingReturn;
            break;
        }
    }
}

#[cfg(test)]
mod tests;
