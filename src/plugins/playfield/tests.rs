use bevy::prelude::*;

use super::*;
use crate::common::motion::DOWN;
use crate::common::test_utils::run_system_once;
use crate::plugins::items::ItemKind;
use crate::plugins::projectiles::components::ShotRequest;

fn field_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world
}

fn spawn_shot(world: &mut World, req: ShotRequest) -> Entity {
    world
        .spawn((Projectile::armed(&req), req.body(), ProjectileState::Active))
        .id()
}

#[test]
fn shots_leaving_the_field_return_to_the_pool() {
    let mut world = field_world();
    let inside = spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(300.0, 400.0), DOWN, 2.0));
    let below = spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(300.0, 830.0), DOWN, 2.0));
    let grazing = spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(-2.0, 400.0), DOWN, 2.0));

    run_system_once(&mut world, reap_off_field);

    assert_eq!(world.get::<ProjectileState>(inside), Some(&ProjectileState::Active));
    assert_eq!(world.get::<ProjectileState>(below), Some(&ProjectileState::PendingReturn));
    assert_eq!(world.get::<ProjectileState>(grazing), Some(&ProjectileState::Active));
}

#[test]
fn enemies_and_items_get_a_margin() {
    let mut world = field_world();
    let entering = world.spawn((Enemy, Body::new(Vec2::new(300.0, -80.0), 45.0))).id();
    let flanking = world.spawn((Enemy, Body::new(Vec2::new(-30.0, 100.0), 20.0))).id();
    let gone = world.spawn((Enemy, Body::new(Vec2::new(300.0, 1_000.0), 20.0))).id();
    let item = world
        .spawn((
            Item { kind: ItemKind::Score, attracted: false },
            Body::new(Vec2::new(300.0, 990.0), 12.0),
        ))
        .id();

    run_system_once(&mut world, reap_off_field);

    assert!(world.get::<PendingDespawn>(entering).is_none());
    assert!(world.get::<PendingDespawn>(flanking).is_none());
    assert!(world.get::<PendingDespawn>(gone).is_some());
    assert!(world.get::<PendingDespawn>(item).is_some());
}

#[test]
fn marked_entities_are_despawned() {
    let mut world = field_world();
    let keep = world.spawn(Body::default()).id();
    let drop = world.spawn((Body::default(), PendingDespawn)).id();

    run_system_once(&mut world, despawn_marked);

    assert!(world.get_entity(keep).is_ok());
    assert!(world.get_entity(drop).is_err());
}
