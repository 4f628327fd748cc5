use bevy::ecs::message::Messages;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;
use crate::common::tunables::{frames_from_ms, ConfigError};
use crate::common::test_utils::{collect_messages, run_system_once};
use crate::plugins::enemies::Archetype;

const FIELD: Vec2 = Vec2::new(600.0, 800.0);

fn wave(start: u32, archetype: Archetype, count: u32, interval: u32) -> WaveSpec {
    WaveSpec { start, archetype, count, interval }
}

fn campaign(stages: Vec<Vec<WaveSpec>>) -> Campaign {
    Campaign {
        stages: stages.into_iter().map(|waves| StageSpec { waves }).collect(),
    }
}

fn calm(enemies: usize) -> FieldCensus {
    FieldCensus { enemies_on_field: enemies, boss_alive: false, player_alive: true }
}

#[test]
fn default_campaign_is_valid_and_uses_frame_triggers() {
    let campaign = default_campaign(false);
    assert_eq!(campaign.validate(), Ok(()));
    assert_eq!(campaign.stages.len(), 2);

    let stage1 = &campaign.stages[0].waves;
    assert_eq!(stage1[1], wave(300, Archetype::Fast, 5, 36));
    assert_eq!(stage1[5].archetype, Archetype::MidBoss);
    assert_eq!(stage1[5].start, frames_from_ms(30_000));
    assert_eq!(stage1.last().map(|w| w.archetype), Some(Archetype::StageBoss));
    assert_eq!(
        campaign.stages[1].waves.last().map(|w| (w.archetype, w.start)),
        Some((Archetype::GrandBoss, 1920))
    );

    let extra = default_campaign(true);
    assert_eq!(extra.validate(), Ok(()));
    assert_eq!(
        extra.stages[2].waves.last().map(|w| w.archetype),
        Some(Archetype::SecretBoss)
    );
}

#[test]
fn validation_reports_the_offending_wave() {
    assert_eq!(campaign(vec![]).validate(), Err(ConfigError::EmptyCampaign));

    let c = campaign(vec![vec![wave(0, Archetype::Normal, 1, 10)], vec![]]);
    assert_eq!(c.validate(), Err(ConfigError::EmptyStage { stage: 2 }));

    let c = campaign(vec![vec![wave(100, Archetype::Normal, 1, 10), wave(50, Archetype::Fast, 1, 10)]]);
    assert_eq!(c.validate(), Err(ConfigError::WaveOutOfOrder { stage: 1, wave: 2 }));

    let c = campaign(vec![vec![wave(0, Archetype::Normal, 0, 10)]]);
    assert_eq!(c.validate(), Err(ConfigError::EmptyWave { stage: 1, wave: 1 }));
}

#[test]
fn no_wave_starts_while_a_boss_lives() {
    let mut rng = Pcg32::seed_from_u64(1);
    let mut director = StageDirector::new(
        campaign(vec![vec![
            wave(0, Archetype::MidBoss, 1, 0),
            wave(10, Archetype::Normal, 2, 5),
        ]]),
        20,
        60,
    );

    let first = director.step(0, &calm(0), FIELD, &mut rng);
    assert_eq!(first.spawn.map(|(a, _)| a), Some(Archetype::MidBoss));

    let boss_up = FieldCensus { enemies_on_field: 1, boss_alive: true, player_alive: true };
    for now in 1..=100 {
        let step = director.step(now, &boss_up, FIELD, &mut rng);
        assert_eq!(step.spawn, None, "frame {now} spawned under a live boss");
    }

    // The trigger was last pushed on frame 100, so the next wave waits for it.
    let mut first_normal = None;
    for now in 101..=120 {
        if director.step(now, &calm(0), FIELD, &mut rng).spawn.is_some() {
            first_normal = Some(now);
            break;
        }
    }
    assert_eq!(first_normal, Some(100 + u64::from(director::BOSS_HOLD_FRAMES)));
}

#[test]
fn next_wave_waits_for_the_current_one_to_finish_issuing() {
    let mut rng = Pcg32::seed_from_u64(2);
    let mut director = StageDirector::new(
        campaign(vec![vec![
            wave(0, Archetype::Normal, 3, 10),
            wave(5, Archetype::Fast, 1, 0),
        ]]),
        20,
        60,
    );

    assert_eq!(director.wave_index(), None);

    let mut spawns: Vec<(u64, Archetype)> = Vec::new();
    for now in 0..30 {
        let step = director.step(now, &calm(0), FIELD, &mut rng);
        if let Some((archetype, _)) = step.spawn {
            spawns.push((now, archetype));
        }
        let expected_wave = if now < 21 { 0 } else { 1 };
        assert_eq!(director.wave_index(), Some(expected_wave), "frame {now}");
    }

    assert_eq!(
        spawns,
        vec![
            (0, Archetype::Normal),
            (10, Archetype::Normal),
            (20, Archetype::Normal),
            (21, Archetype::Fast),
        ]
    );
}

#[test]
fn enemy_cap_and_dead_player_throttle_spawns() {
    let mut rng = Pcg32::seed_from_u64(3);
    let mut director = StageDirector::new(
        campaign(vec![vec![wave(0, Archetype::Normal, 5, 1)]]),
        2,
        60,
    );

    for now in 0..10 {
        assert_eq!(director.step(now, &calm(2), FIELD, &mut rng).spawn, None);
    }
    let dead = FieldCensus { enemies_on_field: 0, boss_alive: false, player_alive: false };
    for now in 10..20 {
        assert_eq!(director.step(now, &dead, FIELD, &mut rng).spawn, None);
    }
    assert_eq!(director.spawned_in_wave(), 0);

    assert!(director.step(20, &calm(1), FIELD, &mut rng).spawn.is_some());
    assert_eq!(director.spawned_in_wave(), 1);
}

#[test]
fn stages_chain_through_clear_wait_into_game_clear() {
    let mut rng = Pcg32::seed_from_u64(4);
    let mut director = StageDirector::new(
        campaign(vec![
            vec![wave(0, Archetype::Normal, 1, 0)],
            vec![wave(0, Archetype::Fast, 1, 0)],
        ]),
        20,
        3,
    );

    let mut events = Vec::new();
    for now in 0..40 {
        if let Some(event) = director.step(now, &calm(0), FIELD, &mut rng).event {
            events.push((now, event));
        }
    }

    let kinds: Vec<StageEvent> = events.iter().map(|(_, e)| *e).collect();
    assert_eq!(
        kinds,
        vec![
            StageEvent::StageCleared(1),
            StageEvent::StageStarted(2),
            StageEvent::StageCleared(2),
            StageEvent::GameClear,
        ]
    );
    assert_eq!(events[1].0 - events[0].0, 3);
    assert_eq!(director.phase(), StagePhase::Finished);
    assert_eq!(director.stage_number(), 2);
}

#[test]
fn clear_waits_for_the_field_to_empty() {
    let mut rng = Pcg32::seed_from_u64(5);
    let mut director = StageDirector::new(
        campaign(vec![vec![wave(0, Archetype::Normal, 1, 0)]]),
        20,
        3,
    );

    director.step(0, &calm(0), FIELD, &mut rng);
    for now in 1..50 {
        assert_eq!(director.step(now, &calm(1), FIELD, &mut rng).event, None);
    }
    assert!(!director.is_clearing());
    assert_eq!(
        director.step(50, &calm(0), FIELD, &mut rng).event,
        Some(StageEvent::StageCleared(1))
    );
    assert!(director.is_clearing());
}

#[test]
fn spawn_positions_follow_archetype() {
    let mut rng = Pcg32::seed_from_u64(6);
    for _ in 0..50 {
        let p = director::spawn_position(Archetype::Wave, FIELD, &mut rng);
        assert!(p.x == -30.0 || p.x == 630.0);
        assert!((80.0..=150.0).contains(&p.y));

        let p = director::spawn_position(Archetype::Tank, FIELD, &mut rng);
        assert!((50.0..=550.0).contains(&p.x));
        assert_eq!(p.y, 10.0);
    }
    assert_eq!(
        director::spawn_position(Archetype::GrandBoss, FIELD, &mut rng),
        Vec2::new(300.0, -120.0)
    );
    assert_eq!(
        director::spawn_position(Archetype::MidBoss, FIELD, &mut rng),
        Vec2::new(300.0, -80.0)
    );
}

fn stage_world(campaign: Campaign) -> World {
    let mut world = World::new();
    let tunables = Tunables::default();
    world.insert_resource(StageDirector::new(campaign, tunables.max_enemies_on_field, 2));
    world.insert_resource(tunables);
    world.insert_resource(SimRng::seeded(7));
    world.init_resource::<FrameClock>();
    world.init_resource::<Session>();
    world.init_resource::<Messages<GameEvent>>();
    world.spawn((Player, PlayerVitals::from_tunables(&Tunables::default())));
    world
}

#[test]
fn director_system_spawns_and_finishes_the_run() {
    let mut world = stage_world(campaign(vec![vec![wave(0, Archetype::Hunter, 1, 0)]]));

    run_system_once(&mut world, run_stage_director);
    let enemies: Vec<(Entity, Archetype)> = world
        .query_filtered::<(Entity, &Archetype), With<Enemy>>()
        .iter(&world)
        .map(|(e, a)| (e, *a))
        .collect();
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].1, Archetype::Hunter);

    // A dying enemy no longer holds the stage open.
    *world.get_mut::<LifeState>(enemies[0].0).expect("life state") = LifeState::Dying { frames_left: 5 };

    for frame in 1..10 {
        world.resource_mut::<FrameClock>().0 = frame;
        run_system_once(&mut world, run_stage_director);
    }

    assert_eq!(world.resource::<Session>().status, RunStatus::GameClear);
    let events = collect_messages::<GameEvent>(&mut world);
    assert!(events.iter().any(|e| matches!(e, GameEvent::StageCleared { stage: 1 })));
    assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::GameClear)).count(), 1);
}

#[test]
fn invalid_campaign_falls_back_to_built_in_stages() {
    let broken = campaign(vec![]);
    assert_eq!(checked_campaign(Some(broken), false), default_campaign(false));
    assert_eq!(checked_campaign(None, true), default_campaign(true));
}
