//! Player plugin.
//!
//! Pipeline:
//! - Update: the input plugin samples devices into the `PlayerIntent` resource
//! - FixedUpdate (Act): consume intents: move, fire, trigger the bomb
//! - FixedUpdate (Resolve): bomb damage first, game-over check last
//!
//! The player is a single entity. Systems reach it through `Query::single()`
//! and treat "missing" as a normal case rather than a panic.

pub mod bomb;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::body::Body;
use crate::common::combat::{DamageOutcome, Damageable};
use crate::common::motion::UP;
use crate::common::state::{GameState, RunStatus, Session};
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::presentation::GameEvent;
use crate::plugins::projectiles::components::ShotRequest;
use crate::plugins::projectiles::messages::SpawnShot;

use bomb::BombState;

/// Half the sprite edge; used for clamping, the bomb beam, and the coarse query box.
pub const PLAYER_HALF_EXTENT: f32 = 25.0;
pub const PLAYER_HIT_RADIUS: f32 = 5.0;
pub const MAX_POWER: u8 = 5;

/// Frames between volleys while the trigger is held.
const SHOT_PERIOD: u32 = 11;
const HOMING_PERIOD: u32 = 20;
const SLOW_FACTOR: f32 = 0.5;

#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Intents for the current frame. Edge-triggered flags are consumed by the
/// system that acts on them.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerIntent {
    /// -1, 0 or 1 per axis, +y down.
    pub axis: IVec2,
    pub fire: bool,
    /// Half-speed precision movement.
    pub slow: bool,
    pub bomb: bool,
    pub pause: bool,
    pub reset: bool,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerVitals {
    pub health: i32,
    pub max_health: i32,
    pub invincible_frames: u32,
    pub invincibility_window: u32,
    pub power: u8,
    pub bombs: u32,
    pub max_bombs: u32,
}

impl PlayerVitals {
    pub fn from_tunables(t: &Tunables) -> Self {
        Self {
            health: t.player_health,
            max_health: t.player_health,
            invincible_frames: 0,
            invincibility_window: t.invincibility_frames,
            power: 1,
            bombs: t.bomb_stock.min(t.max_bombs),
            max_bombs: t.max_bombs,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_frames > 0
    }

    pub fn tick(&mut self) {
        self.invincible_frames = self.invincible_frames.saturating_sub(1);
    }

    /// Returns `false` when already at full power.
    pub fn gain_power(&mut self) -> bool {
        if self.power >= MAX_POWER {
            return false;
        }
        self.power += 1;
        true
    }

    pub fn gain_bomb(&mut self) -> bool {
        if self.bombs >= self.max_bombs {
            return false;
        }
        self.bombs += 1;
        true
    }
}

impl Damageable for PlayerVitals {
    fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if amount <= 0 || !self.is_alive() || self.is_invincible() {
            return DamageOutcome::Ignored;
        }
        self.health = (self.health - amount).max(0);
        self.power = 1;
        self.invincible_frames = self.invincibility_window;
        if self.health == 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Main gun and homing launcher cooldowns.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Gun {
    pub cooldown: u32,
    pub homing_cooldown: u32,
}

impl Gun {
    /// One frame of trigger handling at `origin` (player center).
    pub fn trigger(&mut self, held: bool, origin: Vec2, power: u8, out: &mut Vec<ShotRequest>) {
        if held && self.cooldown == 0 {
            for offset in volley(power) {
                out.push(ShotRequest::player(origin + *offset, UP));
            }
            self.cooldown = SHOT_PERIOD;
        }

        if held && power >= MAX_POWER && self.homing_cooldown == 0 {
            for dx in [-PLAYER_HALF_EXTENT, PLAYER_HALF_EXTENT] {
                out.push(ShotRequest::homing(origin + Vec2::new(dx, 0.0)));
            }
            self.homing_cooldown = HOMING_PERIOD;
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        self.homing_cooldown = self.homing_cooldown.saturating_sub(1);
    }
}

const TOP: f32 = -PLAYER_HALF_EXTENT;
const VOLLEY_SINGLE: [Vec2; 1] = [Vec2::new(0.0, TOP)];
const VOLLEY_TWIN: [Vec2; 2] = [Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)];
const VOLLEY_THREE_WAY: [Vec2; 3] = [Vec2::new(0.0, TOP), Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0)];
const VOLLEY_WIDE: [Vec2; 4] = [
    Vec2::new(-8.0, TOP),
    Vec2::new(8.0, TOP),
    Vec2::new(-25.0, 0.0),
    Vec2::new(25.0, 0.0),
];

/// Muzzle offsets per power level, relative to the player center. Full power
/// goes back to the three-way volley and adds homing shots on top.
fn volley(power: u8) -> &'static [Vec2] {
    match power {
        0 | 1 => &VOLLEY_SINGLE,
        2 => &VOLLEY_TWIN,
        4 => &VOLLEY_WIDE,
        _ => &VOLLEY_THREE_WAY,
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerIntent>()
        .init_resource::<BombState>()
        .add_systems(OnEnter(GameState::InGame), (reset_player_state, spawn_player))
        .add_systems(FixedUpdate, player_control.in_set(SimSet::Act))
        .add_systems(FixedUpdate, bomb::resolve_bomb.in_set(SimSet::Resolve))
        .add_systems(
            FixedUpdate,
            check_game_over
                .in_set(SimSet::Resolve)
                .after(crate::plugins::enemies::enemy_death_trigger),
        );
}

fn reset_player_state(mut intent: ResMut<PlayerIntent>, mut bomb: ResMut<BombState>) {
    *intent = PlayerIntent::default();
    *bomb = BombState::default();
}

pub fn spawn_player(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("Player"),
        Player,
        Body::new(tunables.player_start, PLAYER_HIT_RADIUS),
        PlayerVitals::from_tunables(&tunables),
        Gun::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(PLAYER_HALF_EXTENT * 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 3.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Apply this frame's intents to the player.
pub fn player_control(
    tunables: Res<Tunables>,
    mut intent: ResMut<PlayerIntent>,
    mut bomb: ResMut<BombState>,
    mut shots: MessageWriter<SpawnShot>,
    mut events: MessageWriter<GameEvent>,
    mut q: Query<(&mut Body, &mut PlayerVitals, &mut Gun), With<Player>>,
) {
    let bomb_pressed = std::mem::take(&mut intent.bomb);

    let Ok((mut body, mut vitals, mut gun)) = q.single_mut() else {
        return;
    };
    if !vitals.is_alive() {
        return;
    }

    let speed = tunables.player_speed * if intent.slow { SLOW_FACTOR } else { 1.0 };
    let step = intent.axis.clamp(IVec2::NEG_ONE, IVec2::ONE).as_vec2().normalize_or_zero() * speed;
    let min = Vec2::splat(PLAYER_HALF_EXTENT);
    let max = (tunables.field_size() - min).max(min);
    body.pos = (body.pos + step).clamp(min, max);

    vitals.tick();

    if bomb_pressed && vitals.bombs > 0 && bomb.try_activate(tunables.bomb_frames) {
        vitals.bombs -= 1;
        info!("bomb activated, {} left", vitals.bombs);
        events.write(GameEvent::BombActivated);
    }

    let mut out = Vec::new();
    gun.trigger(intent.fire, body.pos, vitals.power, &mut out);
    for req in out {
        shots.write(SpawnShot(req));
    }
}

/// Terminal state once the player is out of health.
pub fn check_game_over(
    mut session: ResMut<Session>,
    mut events: MessageWriter<GameEvent>,
    q: Query<&PlayerVitals, With<Player>>,
) {
    let Ok(vitals) = q.single() else {
        return;
    };
    if !vitals.is_alive() && session.finish(RunStatus::GameOver) {
        info!("game over");
        events.write(GameEvent::GameOver);
    }
}
