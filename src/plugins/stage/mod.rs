//! Stage plugin: campaign progression and enemy spawning.
//!
//! Runs in `SimSet::Spawn`, before anything moves, so enemies issued this
//! frame act on the same frame. The census only counts `Alive` enemies, which
//! makes a dying boss release the wave gate immediately.

pub mod director;
pub mod schedule;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::body::PendingDespawn;
use crate::common::combat::Damageable;
use crate::common::state::{GameState, RunStatus, Session};
use crate::common::tunables::Tunables;
use crate::plugins::core::{FrameClock, SimRng, SimSet};
use crate::plugins::enemies::{spawn_enemy, Boss, Enemy, LifeState};
use crate::plugins::player::{Player, PlayerVitals};
use crate::plugins::presentation::GameEvent;

pub use director::{DirectorStep, FieldCensus, StageDirector, StageEvent, StagePhase};
pub use schedule::{default_campaign, Campaign, StageSpec, WaveSpec};

pub fn plugin(app: &mut App) {
    let tunables = app.world().get_resource::<Tunables>().cloned().unwrap_or_default();
    let provided = app.world().get_resource::<Campaign>().cloned();
    let campaign = checked_campaign(provided, tunables.extra_stage);

    app.insert_resource(StageDirector::new(
        campaign.clone(),
        tunables.max_enemies_on_field,
        tunables.stage_clear_wait,
    ))
    .insert_resource(campaign)
    .add_systems(OnEnter(GameState::InGame), start_campaign)
    .add_systems(FixedUpdate, run_stage_director.in_set(SimSet::Spawn));
}

fn checked_campaign(provided: Option<Campaign>, extra_stage: bool) -> Campaign {
    let Some(campaign) = provided else {
        return default_campaign(extra_stage);
    };
    match campaign.validate() {
        Ok(()) => campaign,
        Err(err) => {
            error!("invalid campaign ({err}); using the built-in stages");
            default_campaign(extra_stage)
        }
    }
}

/// Rebuild the director from the campaign at the start of every run.
pub fn start_campaign(
    tunables: Res<Tunables>,
    campaign: Res<Campaign>,
    mut director: ResMut<StageDirector>,
    mut events: MessageWriter<GameEvent>,
) {
    *director = StageDirector::new(
        campaign.clone(),
        tunables.max_enemies_on_field,
        tunables.stage_clear_wait,
    );
    info!("stage 1 of {}", campaign.stages.len());
    events.write(GameEvent::StageStarted { stage: director.stage_number() });
}

pub fn run_stage_director(
    mut commands: Commands,
    clock: Res<FrameClock>,
    tunables: Res<Tunables>,
    mut director: ResMut<StageDirector>,
    mut rng: ResMut<SimRng>,
    mut session: ResMut<Session>,
    mut events: MessageWriter<GameEvent>,
    q_enemies: Query<(&LifeState, Has<Boss>), (With<Enemy>, Without<PendingDespawn>)>,
    q_player: Query<&PlayerVitals, With<Player>>,
) {
    let mut census = FieldCensus {
        player_alive: q_player.single().is_ok_and(|v| v.is_alive()),
        ..default()
    };
    for (life, is_boss) in &q_enemies {
        if life.is_alive() {
            census.enemies_on_field += 1;
            census.boss_alive |= is_boss;
        }
    }

    let field = tunables.field_size();
    let step = director.step(clock.0, &census, field, &mut rng.0);

    if let Some((archetype, pos)) = step.spawn {
        spawn_enemy(&mut commands, archetype, pos, field, &mut rng.0);
    }

    match step.event {
        Some(StageEvent::StageStarted(stage)) => {
            info!("stage {stage} started");
            events.write(GameEvent::StageStarted { stage });
        }
        Some(StageEvent::StageCleared(stage)) => {
            info!("stage {stage} cleared");
            events.write(GameEvent::StageCleared { stage });
        }
        Some(StageEvent::GameClear) => {
            if session.finish(RunStatus::GameClear) {
                info!("game clear at frame {}", clock.0);
                events.write(GameEvent::GameClear);
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests;
