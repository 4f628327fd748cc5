use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;
use crate::common::motion::UP;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::boss::table::MID_BOSS;
use crate::plugins::projectiles::components::ShotRequest;
use crate::plugins::stage::{default_campaign, StageDirector};

fn snapshot_world() -> World {
    let mut world = World::new();
    world.insert_resource(FrameClock(42));
    world.insert_resource(Score { total: 1_500 });
    world.init_resource::<Session>();
    world.init_resource::<BombState>();
    world.init_resource::<FrameSnapshot>();
    world.insert_resource(StageDirector::new(default_campaign(false), 20, 180));
    world
}

fn spawn_player(world: &mut World) -> Entity {
    world
        .spawn((
            Player,
            Body::new(Vec2::new(300.0, 700.0), 5.0),
            PlayerVitals::from_tunables(&Tunables::default()),
        ))
        .id()
}

#[test]
fn snapshot_lists_live_entities_and_hud_values() {
    let mut world = snapshot_world();
    let player = spawn_player(&mut world);

    let mut rng = Pcg32::seed_from_u64(3);
    let mut health = Health::new(180);
    health.hp = 45;
    let boss = world
        .spawn((
            Enemy,
            Archetype::MidBoss,
            health,
            LifeState::Alive,
            Body::new(Vec2::new(300.0, 120.0), 45.0),
            BossBrain::new(&MID_BOSS, &mut rng),
        ))
        .id();

    let req = ShotRequest::player(Vec2::new(300.0, 600.0), UP);
    let live_shot = world
        .spawn((Projectile::armed(&req), req.body(), ProjectileState::Active))
        .id();
    let parked = world
        .spawn((Projectile::inert(), Body::default(), ProjectileState::Inactive))
        .id();
    let gone = world
        .spawn((
            Item { kind: ItemKind::Power, attracted: false },
            Body::new(Vec2::ZERO, 12.0),
            PendingDespawn,
        ))
        .id();

    run_system_once(&mut world, publish_snapshot);

    let snap = world.resource::<FrameSnapshot>();
    assert_eq!(snap.frame, 42);
    assert_eq!(snap.score, 1_500);
    assert_eq!(snap.stage, 1);
    assert_eq!(snap.lives, 3);
    assert_eq!(snap.power, 1);
    assert_eq!(snap.boss_health, Some(0.25));
    assert!(!snap.paused && !snap.game_over && !snap.game_clear && !snap.stage_clear);

    assert_eq!(snap.view(player).map(|v| v.kind), Some(VisualKind::Player));
    assert_eq!(snap.view(boss).map(|v| v.health_ratio), Some(0.25));
    let shot = snap.view(live_shot).expect("active shot is visible");
    assert_eq!(shot.kind, VisualKind::Shot { side: Side::Player, kind: ShotKind::Normal });
    assert!((shot.rotation - (-std::f32::consts::FRAC_PI_2)).abs() < 1e-5);
    assert!(snap.view(parked).is_none());
    assert!(snap.view(gone).is_none());
}

#[test]
fn snapshot_tracks_session_and_bomb() {
    let mut world = snapshot_world();
    spawn_player(&mut world);
    world.resource_mut::<BombState>().try_activate(10);
    world.resource_mut::<Session>().toggle_pause();

    run_system_once(&mut world, publish_snapshot);
    {
        let snap = world.resource::<FrameSnapshot>();
        assert!(snap.paused);
        assert_eq!(snap.bomb_beam, Some(beam_rect(Vec2::new(300.0, 700.0))));
        assert_eq!(snap.boss_health, None);
    }

    world.resource_mut::<Session>().toggle_pause();
    world.resource_mut::<Session>().finish(RunStatus::GameOver);
    run_system_once(&mut world, publish_snapshot);
    let snap = world.resource::<FrameSnapshot>();
    assert!(snap.game_over);
    assert!(!snap.paused);
}

#[test]
fn invincible_player_blinks() {
    let mut world = snapshot_world();
    let player = spawn_player(&mut world);
    world.get_mut::<PlayerVitals>(player).expect("vitals").invincible_frames = 8;

    run_system_once(&mut world, publish_snapshot);
    assert_eq!(
        world.resource::<FrameSnapshot>().view(player).map(|v| v.highlighted),
        Some(true)
    );

    world.get_mut::<PlayerVitals>(player).expect("vitals").invincible_frames = 5;
    run_system_once(&mut world, publish_snapshot);
    assert_eq!(
        world.resource::<FrameSnapshot>().view(player).map(|v| v.highlighted),
        Some(false)
    );
}
