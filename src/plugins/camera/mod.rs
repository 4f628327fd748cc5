//! Camera plugin (render-only).
//!
//! The simulation never reads or writes `Transform`. This plugin derives it
//! from the published `FrameSnapshot`, mapping simulation coordinates
//! (top-left origin, +y down) onto Bevy's centered, +y up world:
//!
//! ```text
//! world.x = sim.x - W/2
//! world.y = H/2 - sim.y
//! ```
//!
//! Query disjointness (B0001): the camera and the backdrop are never in the
//! snapshot, and the sync query excludes them with `Without<...>`.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::presentation::{FrameSnapshot, VisualKind};

#[derive(Component)]
pub struct MainCamera;

#[derive(Component)]
struct Backdrop;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_camera, spawn_backdrop))
        .add_systems(
            PostUpdate,
            sync_sprites
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn spawn_backdrop(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("Backdrop"),
        Backdrop,
        Sprite::from_color(Color::srgb(0.06, 0.06, 0.12), tunables.field_size()),
        Transform::from_xyz(0.0, 0.0, -10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Simulation position to world translation.
#[inline]
pub fn to_world(sim: Vec2, field: Vec2) -> Vec2 {
    Vec2::new(sim.x - field.x * 0.5, field.y * 0.5 - sim.y)
}

/// Simulation facing to a sprite rotation. Shot sprites are drawn along +y.
#[inline]
pub fn to_world_rotation(sim_angle: f32) -> f32 {
    -sim_angle - std::f32::consts::FRAC_PI_2
}

fn sync_sprites(
    tunables: Res<Tunables>,
    snapshot: Res<FrameSnapshot>,
    mut q: Query<(&mut Transform, &mut Visibility), (Without<MainCamera>, Without<Backdrop>)>,
) {
    let field = tunables.field_size();
    for view in &snapshot.entities {
        let Ok((mut tf, mut vis)) = q.get_mut(view.entity) else {
            continue;
        };
        let pos = to_world(view.position, field);
        tf.translation.x = pos.x;
        tf.translation.y = pos.y;

        if let VisualKind::Shot { .. } = view.kind {
            tf.rotation = Quat::from_rotation_z(to_world_rotation(view.rotation));
        }

        // Invincibility blink.
        if view.kind == VisualKind::Player {
            *vis = if view.highlighted {
                Visibility::Hidden
            } else {
                Visibility::Inherited
            };
        }
    }
}
