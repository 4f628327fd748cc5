use bevy::ecs::message::Messages;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::quadtree::{overlaps, Quadtree};
use super::*;
use crate::common::motion::{DOWN, UP};
use crate::common::test_utils::{collect_messages, run_system_once};
use crate::plugins::player::bomb::resolve_bomb;
use crate::plugins::projectiles::components::ShotRequest;

fn random_rect(rng: &mut Pcg32, field: Vec2, max_size: f32) -> Rect {
    let min = Vec2::new(rng.random_range(0.0..field.x), rng.random_range(0.0..field.y));
    let size = Vec2::new(rng.random_range(1.0..max_size), rng.random_range(1.0..max_size));
    Rect::from_corners(min, min + size)
}

fn brute_force(items: &[(u32, Rect)], region: Rect) -> Vec<u32> {
    let mut hits: Vec<u32> = items
        .iter()
        .filter(|(_, bounds)| overlaps(bounds, &region))
        .map(|(id, _)| *id)
        .collect();
    hits.sort_unstable();
    hits
}

fn sorted(tree: &Quadtree<u32>, region: Rect) -> Vec<u32> {
    let mut hits: Vec<u32> = tree.query(region).into_iter().collect();
    hits.sort_unstable();
    hits
}

#[test]
fn quadtree_query_matches_brute_force_on_fifty_entities() {
    let field = Vec2::new(800.0, 600.0);
    let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
    let mut tree = Quadtree::with_limits(Rect::from_corners(Vec2::ZERO, field), 4, 8);

    let items: Vec<(u32, Rect)> = (0..50).map(|id| (id, random_rect(&mut rng, field, 30.0))).collect();
    for (id, bounds) in &items {
        tree.insert(*id, *bounds);
    }

    let region = Rect::new(350.0, 250.0, 450.0, 350.0);
    assert_eq!(sorted(&tree, region), brute_force(&items, region));
    assert!(tree.node_count() > 1, "fifty items must split a capacity-4 root");
}

#[test]
fn quadtree_randomized_queries_match_brute_force() {
    let field = Vec2::new(600.0, 800.0);
    let mut rng = Pcg32::seed_from_u64(7);
    let mut tree = Quadtree::new(Rect::from_corners(Vec2::ZERO, field));

    for round in 0..40 {
        tree.clear();
        let count = rng.random_range(1..=150);
        let items: Vec<(u32, Rect)> = (0..count as u32)
            .map(|id| (id, random_rect(&mut rng, field, 60.0)))
            .collect();
        for (id, bounds) in &items {
            tree.insert(*id, *bounds);
        }
        for _ in 0..10 {
            let region = random_rect(&mut rng, field, 250.0);
            assert_eq!(sorted(&tree, region), brute_force(&items, region), "round {round}");
        }
    }
}

#[test]
fn quadtree_clear_and_depth_cap() {
    let mut tree = Quadtree::with_limits(Rect::new(0.0, 0.0, 600.0, 800.0), 4, 8);
    let spot = Rect::from_center_half_size(Vec2::new(10.0, 10.0), Vec2::splat(1.0));
    for id in 0..100u32 {
        tree.insert(id, spot);
    }
    assert!(tree.depth() <= 8);
    assert_eq!(tree.query(spot).len(), 100);

    tree.clear();
    assert_eq!(tree.node_count(), 1);
    assert!(tree.query(tree.region()).is_empty());
}

#[test]
fn quadtree_rejects_items_outside_the_field() {
    let mut tree = Quadtree::new(Rect::new(0.0, 0.0, 600.0, 800.0));
    assert!(!tree.insert(1u32, Rect::new(-50.0, -50.0, -10.0, -10.0)));
    assert!(tree.insert(2u32, Rect::new(-5.0, -5.0, 5.0, 5.0)));
    assert_eq!(sorted(&tree, Rect::new(-100.0, -100.0, 700.0, 900.0)), vec![2]);
}

#[test]
fn quadtree_keeps_points_on_split_lines() {
    let field = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut tree = Quadtree::with_limits(field, 4, 8);
    let mut items: Vec<(u32, Rect)> = (0..4u32)
        .map(|id| {
            let x = 100.0 + 10.0 * id as f32;
            (id, Rect::new(x, 100.0, x + 5.0, 105.0))
        })
        .collect();
    // Lies exactly on the root's vertical split; inserting it triggers the split.
    items.push((4, Rect::new(400.0, 450.0, 400.0, 450.0)));
    // Corner of the playfield.
    items.push((5, Rect::new(0.0, 0.0, 0.0, 0.0)));
    for (id, bounds) in &items {
        assert!(tree.insert(*id, *bounds));
    }
    assert!(tree.node_count() > 1);

    for region in [
        Rect::new(350.0, 400.0, 450.0, 500.0),
        Rect::new(-10.0, -10.0, 10.0, 10.0),
        Rect::new(0.0, 0.0, 800.0, 600.0),
    ] {
        assert_eq!(sorted(&tree, region), brute_force(&items, region));
    }
    assert_eq!(sorted(&tree, Rect::new(350.0, 400.0, 450.0, 500.0)), vec![4]);
}

fn collision_world() -> World {
    let mut world = World::new();
    world.insert_resource(SpatialIndex::new(Rect::new(0.0, 0.0, 600.0, 800.0)));
    world.init_resource::<BombState>();
    world.init_resource::<Messages<GameEvent>>();
    world
}

fn spawn_enemy_at(world: &mut World, pos: Vec2, hp: i32) -> Entity {
    world
        .spawn((Enemy, Health::new(hp), LifeState::Alive, Body::new(pos, 20.0)))
        .id()
}

fn spawn_shot(world: &mut World, req: ShotRequest) -> Entity {
    world
        .spawn((Projectile::armed(&req), req.body(), ProjectileState::Active))
        .id()
}

fn spawn_player_at(world: &mut World, pos: Vec2) -> Entity {
    world
        .spawn((
            Player,
            Body::new(pos, 5.0),
            PlayerVitals::from_tunables(&Tunables::default()),
        ))
        .id()
}

fn resolve(world: &mut World) {
    run_system_once(world, rebuild_spatial_index);
    run_system_once(world, resolve_bomb);
    run_system_once(world, resolve_player_hits);
    run_system_once(world, resolve_player_shots);
}

#[test]
fn one_shot_damages_one_of_two_overlapping_enemies() {
    let mut world = collision_world();
    let a = spawn_enemy_at(&mut world, Vec2::new(300.0, 300.0), 3);
    let b = spawn_enemy_at(&mut world, Vec2::new(305.0, 300.0), 3);
    let shot = spawn_shot(&mut world, ShotRequest::player(Vec2::new(302.0, 305.0), UP));

    resolve(&mut world);

    let hp = |e| world.get::<Health>(e).map(|h| h.hp).unwrap_or_default();
    assert_eq!(hp(a) + hp(b), 5);
    assert_eq!(world.get::<ProjectileState>(shot), Some(&ProjectileState::PendingReturn));
}

#[test]
fn boss_damage_feeds_enrage() {
    use crate::plugins::boss::table::MID_BOSS;

    let mut world = collision_world();
    let mut rng = Pcg32::seed_from_u64(1);
    let mut health = Health::new(180);
    health.hp = 91;
    let boss = world
        .spawn((
            Enemy,
            Boss,
            health,
            LifeState::Alive,
            Body::new(Vec2::new(300.0, 200.0), 45.0),
            BossBrain::new(&MID_BOSS, &mut rng),
        ))
        .id();
    spawn_shot(&mut world, ShotRequest::player(Vec2::new(300.0, 220.0), UP));

    resolve(&mut world);

    assert_eq!(world.get::<Health>(boss).map(|h| h.hp), Some(90));
    assert_eq!(world.get::<BossBrain>(boss).map(BossBrain::is_enraged), Some(true));
}

#[test]
fn player_takes_at_most_one_hit_per_frame() {
    let mut world = collision_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    let first = spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(300.0, 698.0), DOWN, 2.0));
    let second = spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(301.0, 702.0), DOWN, 2.0));

    resolve(&mut world);

    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(2));
    let retired = [first, second]
        .into_iter()
        .filter(|e| world.get::<ProjectileState>(*e) == Some(&ProjectileState::PendingReturn))
        .count();
    assert_eq!(retired, 1);

    // Invincibility covers the shot that is still overlapping.
    resolve(&mut world);
    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(2));

    let hits = collect_messages::<GameEvent>(&mut world)
        .into_iter()
        .filter(|e| matches!(e, GameEvent::PlayerHit { remaining: 2 }))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn laser_beam_hits_along_its_length() {
    let mut world = collision_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    // Center 60 px away; the beam itself reaches the player.
    spawn_shot(
        &mut world,
        ShotRequest::enemy(Vec2::new(300.0, 640.0), DOWN, 2.0).laser(150.0),
    );

    resolve(&mut world);

    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(2));
}

#[test]
fn ramming_an_enemy_kills_it_without_points() {
    let mut world = collision_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    let enemy = spawn_enemy_at(&mut world, Vec2::new(310.0, 705.0), 3);

    resolve(&mut world);

    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(2));
    assert_eq!(world.get::<LifeState>(enemy), Some(&LifeState::Dead));
    assert!(world.get::<PendingDespawn>(enemy).is_some());
    assert_eq!(world.get::<Health>(enemy).map(|h| h.hp), Some(3));
}

#[test]
fn active_bomb_shields_the_player() {
    let mut world = collision_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    world.resource_mut::<BombState>().try_activate(30);
    spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(300.0, 700.0), DOWN, 2.0));

    resolve(&mut world);

    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(3));
}

#[test]
fn bomb_shield_holds_through_its_last_frame() {
    let mut world = collision_world();
    let player = spawn_player_at(&mut world, Vec2::new(300.0, 700.0));
    let enemy = spawn_enemy_at(&mut world, Vec2::new(310.0, 705.0), 3);
    world.resource_mut::<BombState>().try_activate(2);

    for _ in 0..2 {
        resolve(&mut world);
        assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(3));
    }
    assert!(!world.resource::<BombState>().is_active());
    assert_eq!(world.get::<LifeState>(enemy), Some(&LifeState::Alive));

    resolve(&mut world);
    assert_eq!(world.get::<PlayerVitals>(player).map(|v| v.health), Some(2));
    assert_eq!(world.get::<LifeState>(enemy), Some(&LifeState::Dead));
}

#[test]
fn inactive_and_dying_entities_are_not_indexed() {
    let mut world = collision_world();
    let dying = spawn_enemy_at(&mut world, Vec2::new(100.0, 100.0), 3);
    *world.get_mut::<LifeState>(dying).expect("life") = LifeState::Dying { frames_left: 4 };
    spawn_enemy_at(&mut world, Vec2::new(200.0, 100.0), 3);
    world.spawn((Projectile::inert(), Body::new(Vec2::new(50.0, 50.0), 0.0), ProjectileState::Inactive));
    spawn_shot(&mut world, ShotRequest::enemy(Vec2::new(400.0, 400.0), DOWN, 2.0));

    run_system_once(&mut world, rebuild_spatial_index);

    let all = world.resource::<SpatialIndex>().candidates(Rect::new(0.0, 0.0, 600.0, 800.0));
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|e| e.class == ColliderClass::Enemy));
    assert!(all.iter().any(|e| e.class == ColliderClass::EnemyShot));
}
