//! Fixed-capacity free-list recycler.
//!
//! `ObjectPool<T>` is plain data: it knows nothing about ECS. The projectile
//! plugin wraps an `ObjectPool<Entity>` in the [`ProjectilePool`] resource.
//!
//! Conservation: `free_len() + in_use()` equals `total_allocated()` at all
//! times. It only grows when `get` runs dry (overflow) and only shrinks when
//! `put` finds the free list already full (drop).

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::body::Body;
use crate::common::state::GameState;

use super::components::{PooledProjectile, Projectile, ProjectileState, ShotRequest};

/// Result of [`ObjectPool::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired<T> {
    pub item: T,
    /// The free list was empty and `item` was freshly allocated.
    pub overflowed: bool,
}

/// Result of [`ObjectPool::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returned<T> {
    Recycled,
    /// Free list already at capacity; the caller disposes of the item.
    Dropped(T),
}

#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    free: Vec<T>,
    capacity: usize,
    in_use: usize,
    overflow_allocations: u64,
}

impl<T> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            in_use: 0,
            overflow_allocations: 0,
        }
    }

    /// Allocate items until the free list is at capacity.
    pub fn warm(&mut self, mut make: impl FnMut() -> T) {
        while self.free.len() < self.capacity {
            self.free.push(make());
        }
    }

    /// Forget every item and counter. Used when the items' owner was torn down.
    pub fn reset(&mut self) {
        self.free.clear();
        self.in_use = 0;
        self.overflow_allocations = 0;
    }

    /// Hand out a recycled item, or allocate one with `make` when none is free.
    pub fn get(&mut self, make: impl FnOnce() -> T) -> Acquired<T> {
        self.in_use += 1;
        match self.free.pop() {
            Some(item) => Acquired { item, overflowed: false },
            None => {
                self.overflow_allocations += 1;
                Acquired { item: make(), overflowed: true }
            }
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    #[inline]
    pub fn total_allocated(&self) -> usize {
        self.free.len() + self.in_use
    }

    #[inline]
    pub fn overflow_allocations(&self) -> u64 {
        self.overflow_allocations
    }
}

impl<T: PartialEq> ObjectPool<T> {
    /// Take an item back. Full pools drop it instead.
    pub fn put(&mut self, item: T) -> Returned<T> {
        debug_assert!(!self.free.contains(&item), "item returned to the pool twice");
        self.in_use = self.in_use.saturating_sub(1);
        if self.free.len() >= self.capacity {
            return Returned::Dropped(item);
        }
        self.free.push(item);
        Returned::Recycled
    }

    /// True if `item` is parked in the free list.
    pub fn is_free(&self, item: &T) -> bool {
        self.free.contains(item)
    }
}

/// Pool of projectile entities, shared by both sides.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct ProjectilePool(pub ObjectPool<Entity>);

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self(ObjectPool::new(capacity))
    }
}

/// Components of a parked projectile.
pub fn inert_projectile() -> impl Bundle {
    (
        Name::new("Projectile(Pooled)"),
        PooledProjectile,
        ProjectileState::Inactive,
        Projectile::inert(),
        Body::default(),
        Sprite {
            color: Color::NONE,
            custom_size: Some(Vec2::ZERO),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 2.0),
        Visibility::Hidden,
        DespawnOnExit(GameState::InGame),
    )
}

/// Components of a projectile fired straight out of an overflow allocation.
pub fn armed_projectile(req: ShotRequest) -> impl Bundle {
    (
        Name::new("Projectile(Overflow)"),
        PooledProjectile,
        ProjectileState::Active,
        Projectile::armed(&req),
        req.body(),
        Sprite {
            color: req.tint,
            custom_size: Some(req.sprite_size()),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 2.0),
        Visibility::Visible,
        DespawnOnExit(GameState::InGame),
    )
}

/// Pre-spawn the pool's entities, all inactive.
///
/// Runs on every entry into `InGame`. The previous run's entities were
/// despawned on exit, so the free list is rebuilt from scratch.
pub fn init_projectile_pool(mut commands: Commands, mut pool: ResMut<ProjectilePool>) {
    pool.reset();
    pool.warm(|| commands.spawn(inert_projectile()).id());
    debug!("projectile pool warmed with {} entities", pool.free_len());
}
