use bevy::ecs::message::Messages;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;
use crate::common::test_utils::{collect_messages, run_system_once};
use crate::common::tunables::Tunables;

fn item_world() -> World {
    let mut world = World::new();
    world.init_resource::<Score>();
    world.init_resource::<Messages<GameEvent>>();
    world
}

fn spawn_player_at(world: &mut World, pos: Vec2) -> Entity {
    world
        .spawn((Player, Body::new(pos, 5.0), PlayerVitals::from_tunables(&Tunables::default())))
        .id()
}

fn spawn_item_at(world: &mut World, kind: ItemKind, pos: Vec2) -> Entity {
    world
        .spawn((Item { kind, attracted: false }, Body::new(pos, ITEM_RADIUS)))
        .id()
}

#[test]
fn drop_rates_match_the_table() {
    let mut rng = Pcg32::seed_from_u64(99);
    let (mut score, mut power, mut none) = (0, 0, 0);
    for _ in 0..20_000 {
        match roll_drop(&mut rng) {
            Some(ItemKind::Score) => score += 1,
            Some(ItemKind::Power) => power += 1,
            Some(ItemKind::Bomb) => panic!("regular kills never drop bombs"),
            None => none += 1,
        }
    }
    let share = |n: i32| n as f32 / 20_000.0;
    assert!((share(score) - 0.20).abs() < 0.02);
    assert!((share(power) - 0.45).abs() < 0.02);
    assert!((share(none) - 0.35).abs() < 0.02);
}

#[test]
fn items_fall_without_attraction() {
    let mut world = item_world();
    spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    let item = spawn_item_at(&mut world, ItemKind::Power, Vec2::new(100.0, 100.0));

    for _ in 0..5 {
        run_system_once(&mut world, item_motion);
    }

    assert_eq!(world.get::<Body>(item).map(|b| b.pos), Some(Vec2::new(100.0, 110.0)));
}

#[test]
fn top_line_pulls_items_for_good() {
    let mut world = item_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 40.0));
    let item = spawn_item_at(&mut world, ItemKind::Score, Vec2::new(300.0, 400.0));

    run_system_once(&mut world, item_motion);
    assert_eq!(world.get::<Body>(item).map(|b| b.pos.y), Some(400.0 - 12.0));
    assert_eq!(world.get::<Item>(item).map(|i| i.attracted), Some(true));

    // Dropping back down does not release the item.
    world.get_mut::<Body>(player).expect("player body").pos.y = 700.0;
    run_system_once(&mut world, item_motion);
    assert_eq!(world.get::<Body>(item).map(|b| b.pos.y), Some(388.0 + 12.0));
}

#[test]
fn pickups_apply_their_effect_once() {
    let mut world = item_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    spawn_item_at(&mut world, ItemKind::Power, Vec2::new(300.0, 690.0));
    spawn_item_at(&mut world, ItemKind::Score, Vec2::new(310.0, 700.0));
    spawn_item_at(&mut world, ItemKind::Bomb, Vec2::new(290.0, 710.0));
    let far = spawn_item_at(&mut world, ItemKind::Score, Vec2::new(100.0, 100.0));

    run_system_once(&mut world, item_pickup);
    run_system_once(&mut world, item_pickup);

    let vitals = world.get::<PlayerVitals>(player).expect("vitals");
    assert_eq!(vitals.power, 2);
    assert_eq!(vitals.bombs, Tunables::default().bomb_stock + 1);
    assert_eq!(world.resource::<Score>().total, u64::from(SCORE_ITEM_VALUE));
    assert!(world.get::<PendingDespawn>(far).is_none());

    let collected = collect_messages::<GameEvent>(&mut world)
        .into_iter()
        .filter(|e| matches!(e, GameEvent::ItemCollected { .. }))
        .count();
    assert_eq!(collected, 3);
}

#[test]
fn dead_player_collects_nothing() {
    let mut world = item_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    world.get_mut::<PlayerVitals>(player).expect("vitals").health = 0;
    let item = spawn_item_at(&mut world, ItemKind::Score, Vec2::new(300.0, 700.0));

    run_system_once(&mut world, item_pickup);

    assert!(world.get::<PendingDespawn>(item).is_none());
    assert_eq!(world.resource::<Score>().total, 0);
}
