//! Damage capability.
//!
//! Anything that can be hit implements [`Damageable`]. Collision code never
//! probes for fields; it calls `apply_damage` and reacts to the outcome.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed: target already dead, invincible, or zero damage.
    Ignored,
    Wounded,
    /// Health crossed to zero on this call. Reported exactly once per life.
    Killed,
}

pub trait Damageable {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome;
    fn is_alive(&self) -> bool;
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { hp: max, max }
    }

    /// Remaining health in `[0, 1]`.
    #[inline]
    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    /// Restore health up to the maximum. Dead targets stay dead.
    pub fn heal(&mut self, amount: i32) {
        if self.hp <= 0 || amount <= 0 {
            return;
        }
        self.hp = (self.hp + amount).min(self.max);
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.hp <= 0 || amount <= 0 {
            return DamageOutcome::Ignored;
        }
        self.hp -= amount;
        if self.hp <= 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
