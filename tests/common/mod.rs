//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `danmaku_game::game::configure_headless` to install gameplay plugins.
//!
//! Fixed frames are stepped by running `FixedUpdate` directly, so tests never
//! depend on wall-clock time.
#![allow(dead_code)]

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use danmaku_game::common::tunables::Tunables;
use danmaku_game::plugins::enemies::Archetype;
use danmaku_game::plugins::stage::{Campaign, StageSpec, WaveSpec};

pub fn app_headless() -> App {
    app_with(None, None)
}

/// Headless app with optional configuration overrides.
pub fn app_with(tunables: Option<Tunables>, campaign: Option<Campaign>) -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    if let Some(tunables) = tunables {
        app.insert_resource(tunables);
    }
    if let Some(campaign) = campaign {
        app.insert_resource(campaign);
    }

    danmaku_game::game::configure_headless(&mut app);
    app
}

/// A campaign whose only wave is far in the future, so tests own the field.
pub fn quiet_campaign() -> Campaign {
    Campaign {
        stages: vec![StageSpec {
            waves: vec![WaveSpec { start: 1_000_000, archetype: Archetype::Normal, count: 1, interval: 0 }],
        }],
    }
}

/// Run one app update so `OnEnter(InGame)` has spawned the run.
pub fn boot(app: &mut App) {
    app.update();
}

/// Advance the simulation by `frames` fixed frames.
pub fn step(app: &mut App, frames: u32) {
    for _ in 0..frames {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}
