//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::projectiles::ProjectilesPlugin;

pub mod boss;
pub mod collision;
pub mod core;
pub mod enemies;
pub mod input;
pub mod items;
pub mod player;
pub mod playfield;
pub mod presentation;
pub mod projectiles;
pub mod stage;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: it settles the `Tunables` the others size themselves from.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    presentation::plugin(app);
    collision::plugin(app);
    playfield::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    boss::plugin(app);
    items::plugin(app);
    stage::plugin(app);
    input::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
