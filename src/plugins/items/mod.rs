//! Items plugin: drops, falling motion, attraction, and pickup.
//!
//! Items fall slowly. Once the player rises into the top strip of the field
//! every item on screen is pulled towards the player and stays pulled.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::Rng;

use crate::common::body::{Body, PendingDespawn};
use crate::common::combat::Damageable;
use crate::common::state::GameState;
use crate::plugins::collision::shapes::circles_overlap;
use crate::plugins::core::{Score, SimSet};
use crate::plugins::player::{Player, PlayerVitals, PLAYER_HALF_EXTENT};
use crate::plugins::presentation::GameEvent;

pub const ITEM_RADIUS: f32 = 12.0;
pub const SCORE_ITEM_VALUE: u32 = 1000;
const FALL_SPEED: f32 = 2.0;
const ATTRACT_SPEED: f32 = 12.0;
/// Player sprite top above this line pulls every item in.
const ATTRACT_LINE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Power,
    Score,
    Bomb,
}

impl ItemKind {
    pub fn tint(self) -> Color {
        match self {
            ItemKind::Power => Color::srgb(1.0, 0.3, 0.3),
            ItemKind::Score => Color::srgb(0.3, 0.6, 1.0),
            ItemKind::Bomb => Color::srgb(0.3, 1.0, 0.4),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub attracted: bool,
}

/// Drop roll for a regular kill: 20% score, 45% power, otherwise nothing.
pub fn roll_drop(rng: &mut impl Rng) -> Option<ItemKind> {
    let roll: f32 = rng.random();
    if roll < 0.20 {
        Some(ItemKind::Score)
    } else if roll < 0.65 {
        Some(ItemKind::Power)
    } else {
        None
    }
}

pub fn spawn_item(commands: &mut Commands, kind: ItemKind, pos: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Item"),
            Item { kind, attracted: false },
            Body::new(pos, ITEM_RADIUS),
            Sprite {
                color: kind.tint(),
                custom_size: Some(Vec2::splat(ITEM_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 2.5),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, item_motion.in_set(SimSet::Advance))
        .add_systems(
            FixedUpdate,
            item_pickup
                .in_set(SimSet::Resolve)
                .after(crate::plugins::collision::resolve_player_shots),
        );
}

pub fn item_motion(
    q_player: Query<(&Body, &PlayerVitals), (With<Player>, Without<Item>)>,
    mut q_items: Query<(&mut Body, &mut Item), Without<PendingDespawn>>,
) {
    let player = q_player
        .single()
        .ok()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(body, _)| body.pos);

    let pull = player.is_some_and(|pos| pos.y - PLAYER_HALF_EXTENT < ATTRACT_LINE);

    for (mut body, mut item) in &mut q_items {
        if pull {
            item.attracted = true;
        }
        match player.filter(|_| item.attracted) {
            Some(target) => {
                let to_player = target - body.pos;
                if to_player.length() <= ATTRACT_SPEED {
                    body.pos = target;
                } else {
                    body.pos += to_player.normalize() * ATTRACT_SPEED;
                }
            }
            None => body.pos.y += FALL_SPEED,
        }
    }
}

pub fn item_pickup(
    mut commands: Commands,
    mut score: ResMut<Score>,
    mut events: MessageWriter<GameEvent>,
    mut q_player: Query<(&Body, &mut PlayerVitals), (With<Player>, Without<Item>)>,
    q_items: Query<(Entity, &Body, &Item), Without<PendingDespawn>>,
) {
    let Ok((player, mut vitals)) = q_player.single_mut() else {
        return;
    };
    if !vitals.is_alive() {
        return;
    }

    for (entity, body, item) in &q_items {
        if !circles_overlap(player.pos, PLAYER_HALF_EXTENT, body.pos, body.radius) {
            continue;
        }
        match item.kind {
            ItemKind::Power => {
                vitals.gain_power();
            }
            ItemKind::Score => score.award(SCORE_ITEM_VALUE),
            ItemKind::Bomb => {
                vitals.gain_bomb();
            }
        }
        commands.entity(entity).insert(PendingDespawn);
        events.write(GameEvent::ItemCollected { kind: item.kind });
    }
}

#[cfg(test)]
mod tests;
